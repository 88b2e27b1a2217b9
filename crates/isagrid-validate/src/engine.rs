use tracing::debug;

use isagrid_model::Cell;

use crate::context::{EditInput, EditTarget, ValidationContext};
use crate::handler::{effective_col_type, handler};
use crate::rejection::Rejection;

/// Validate and normalize a proposed edit without touching the cell.
pub fn validate_edit(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    if !target.editable {
        return Err(Rejection::NotEditable);
    }
    let col_type = if target.sample_column {
        isagrid_model::ColType::Protocol
    } else {
        effective_col_type(target.schema.col_type, target.config)
    };
    (handler(col_type).validate)(input, current, target, ctx)
}

/// Commit an edit: the cell is replaced on acceptance and left untouched on
/// rejection.
///
/// Values derived from this cell elsewhere in the row are not recomputed.
pub fn apply_edit(
    cell: &mut Cell,
    input: &EditInput,
    target: &EditTarget<'_>,
    ctx: &ValidationContext<'_>,
) -> Result<(), Rejection> {
    match validate_edit(input, cell, target, ctx) {
        Ok(accepted) => {
            *cell = accepted;
            Ok(())
        }
        Err(rejection) => {
            debug!(
                column = %target.schema.value,
                code = rejection.code(),
                "edit rejected"
            );
            Err(rejection)
        }
    }
}
