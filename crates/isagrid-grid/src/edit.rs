//! Cell edit commits against a built column layout.

use serde::Serialize;
use tracing::debug;

use isagrid_model::{Cell, IdentityToken, Table};
use isagrid_validate::{EditInput, EditTarget, apply_edit};

use crate::columns::{ColumnLayout, matching_edit_config};
use crate::context::GridContext;
use crate::error::EditError;
use crate::rows::row_identities;

/// Accepted cell value, as sent to the row backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdate {
    pub row: usize,
    pub col: usize,
    /// Identity token of the node owning the cell.
    pub identity_token: Option<IdentityToken>,
    pub is_new_row: bool,
    pub cell: Cell,
}

/// Validate an edit of one cell and apply it to the table.
///
/// The column's layout entry decides whether the cell is editable; the sample
/// column of an assay table is editable only in the unsaved new row.
pub fn commit_edit(
    table: &mut Table,
    layout: &ColumnLayout,
    ctx: &GridContext<'_>,
    row: usize,
    col: usize,
    input: &EditInput,
) -> Result<CellUpdate, EditError> {
    let leaf = layout.leaf(col).ok_or(EditError::NoSuchCell { row, col })?;
    let schema = table
        .field_header
        .get(col)
        .cloned()
        .ok_or(EditError::NoSuchCell { row, col })?;
    let config = match (ctx.edit_config, leaf.config_target.as_ref()) {
        (Some(edit_config), Some(target)) => matching_edit_config(edit_config, target, &schema),
        _ => None,
    };
    let identity_token = table
        .node_of(col)
        .and_then(|node| row_identities(table, row).remove(&node));
    let cell = table
        .cell_mut(row, col)
        .ok_or(EditError::NoSuchCell { row, col })?;

    let mut target = EditTarget::new(&schema, config);
    target.editable = leaf.editable && (!leaf.sample_column || cell.is_new_row);
    target.sample_column = leaf.sample_column;
    let validation = ctx.validation_context(cell.is_new_row);

    apply_edit(cell, input, &target, &validation)?;
    debug!(row, col, column = %schema.value, "cell edit applied");
    Ok(CellUpdate {
        row,
        col,
        identity_token,
        is_new_row: cell.is_new_row,
        cell: cell.clone(),
    })
}
