//! Row persistence through a [`RowBackend`].

use tracing::{debug, info};

use isagrid_grid::{CellUpdate, DeleteVerdict, LifecycleError, StudySession, row_identities};
use isagrid_model::GridId;

use crate::collaborators::RowBackend;
use crate::error::Result;

/// Send an accepted cell edit and store the server-normalized cell.
pub fn push_cell_update<B: RowBackend + ?Sized>(
    session: &mut StudySession,
    grid: &GridId,
    update: &CellUpdate,
    backend: &mut B,
) -> Result<()> {
    if update.is_new_row {
        debug!(%grid, row = update.row, "new row cells are sent when the row is saved");
        return Ok(());
    }
    let normalized = backend.update_cell(grid, update)?;
    let table = session.table_mut(grid)?;
    let cell = table
        .cell_mut(update.row, update.col)
        .ok_or_else(|| LifecycleError::RowOutOfRange {
            grid: grid.clone(),
            row: update.row,
        })?;
    *cell = normalized;
    Ok(())
}

/// Save the unsaved row, if any, and release the lock.
///
/// Returns the grid and row that were saved.
pub fn persist_unsaved_row<B: RowBackend + ?Sized>(
    session: &mut StudySession,
    backend: &mut B,
) -> Result<Option<(GridId, usize)>> {
    let Some((grid, row)) = session.unsaved_row() else {
        return Ok(None);
    };
    let cells = session
        .table(&grid)?
        .table_data
        .get(row)
        .cloned()
        .unwrap_or_default();
    let tokens = backend.insert_row(&grid, &cells)?;
    session.confirm_saved(&grid, row, &tokens)?;
    info!(%grid, row, nodes = tokens.len(), "unsaved row persisted");
    Ok(Some((grid, row)))
}

/// Delete a row locally and, unless it was never saved, on the backend.
pub fn delete_row<B: RowBackend + ?Sized>(
    session: &mut StudySession,
    grid: &GridId,
    row: usize,
    backend: &mut B,
) -> Result<DeleteVerdict> {
    let verdict = session.delete_verdict(grid, row)?;
    if verdict == DeleteVerdict::Ok {
        let identities = row_identities(session.table(grid)?, row);
        backend.delete_row(grid, &identities)?;
    }
    Ok(session.delete_row(grid, row)?)
}
