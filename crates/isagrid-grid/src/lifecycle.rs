//! Row lifecycle controller.
//!
//! A [`StudySession`] owns the study table and the tables of its assays. At
//! most one unsaved row may exist across all of them; while it exists, the
//! session holds an [`UnsavedRowLock`] naming the owning grid and the row's
//! identity token, and every other structural edit is refused.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use isagrid_model::{Cell, CellValue, ColType, EditConfig, GridId, IdentityToken, Table};

use crate::columns::{field_targets, matching_edit_config};
use crate::error::LifecycleError;
use crate::rows::NodeIdentities;

/// Outcome of a delete request. Exactly one applies to a row at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum DeleteVerdict {
    Ok,
    /// The row is the unsaved new row; deleting it cancels the insert.
    CancelUnsavedRow,
    /// Another row is unsaved somewhere in the study.
    UnsavedRowBlocks,
    OnlyRow,
    /// The row's sample is used by a row of this assay.
    ReferencedByAssay { assay: String },
}

impl DeleteVerdict {
    pub fn code(&self) -> &'static str {
        match self {
            DeleteVerdict::Ok => "ok",
            DeleteVerdict::CancelUnsavedRow => "cancel_unsaved_row",
            DeleteVerdict::UnsavedRowBlocks => "unsaved_row_blocks",
            DeleteVerdict::OnlyRow => "only_row",
            DeleteVerdict::ReferencedByAssay { .. } => "referenced_by_assay",
        }
    }

    pub fn message(&self) -> String {
        match self {
            DeleteVerdict::Ok => "row can be deleted".to_string(),
            DeleteVerdict::CancelUnsavedRow => "cancel the unsaved row".to_string(),
            DeleteVerdict::UnsavedRowBlocks => {
                "save or cancel the unsaved row before deleting rows".to_string()
            }
            DeleteVerdict::OnlyRow => "cannot delete the only row of a table".to_string(),
            DeleteVerdict::ReferencedByAssay { assay } => {
                format!("sample is used in assay {assay}")
            }
        }
    }

    pub fn is_permitted(&self) -> bool {
        matches!(self, DeleteVerdict::Ok | DeleteVerdict::CancelUnsavedRow)
    }
}

/// Session-scoped lock held while a row is unsaved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsavedRowLock {
    pub grid: GridId,
    /// Client token of the row's first node.
    pub row: IdentityToken,
}

#[derive(Debug, Clone)]
pub struct StudySession {
    study_uuid: String,
    study: Table,
    assays: BTreeMap<String, Table>,
    unsaved: Option<UnsavedRowLock>,
}

impl StudySession {
    pub fn new(study_uuid: impl Into<String>, study: Table) -> Self {
        Self {
            study_uuid: study_uuid.into(),
            study,
            assays: BTreeMap::new(),
            unsaved: None,
        }
    }

    pub fn add_assay(&mut self, assay_uuid: impl Into<String>, table: Table) {
        self.assays.insert(assay_uuid.into(), table);
    }

    pub fn study_uuid(&self) -> &str {
        &self.study_uuid
    }

    pub fn grids(&self) -> impl Iterator<Item = GridId> + '_ {
        std::iter::once(GridId::Study).chain(self.assays.keys().map(GridId::assay))
    }

    pub fn table(&self, grid: &GridId) -> Result<&Table, LifecycleError> {
        match grid {
            GridId::Study => Ok(&self.study),
            GridId::Assay(uuid) => self
                .assays
                .get(uuid)
                .ok_or_else(|| LifecycleError::UnknownGrid(grid.clone())),
        }
    }

    pub fn table_mut(&mut self, grid: &GridId) -> Result<&mut Table, LifecycleError> {
        match grid {
            GridId::Study => Ok(&mut self.study),
            GridId::Assay(uuid) => self
                .assays
                .get_mut(uuid)
                .ok_or_else(|| LifecycleError::UnknownGrid(grid.clone())),
        }
    }

    pub fn unsaved_lock(&self) -> Option<&UnsavedRowLock> {
        self.unsaved.as_ref()
    }

    /// Row index of the unsaved row in its grid.
    pub fn unsaved_row(&self) -> Option<(GridId, usize)> {
        let lock = self.unsaved.as_ref()?;
        let table = self.table(&lock.grid).ok()?;
        let row = (0..table.row_count()).find(|&row| row_token(table, row) == Some(&lock.row))?;
        Some((lock.grid.clone(), row))
    }

    /// Row inserts are allowed in every grid only while no row is unsaved,
    /// including the grid that holds the lock.
    pub fn structural_edits_allowed(&self) -> bool {
        self.unsaved.is_none()
    }

    /// Append a new unsaved row and take the lock.
    ///
    /// Every node gets a fresh client token; cells start from the configured
    /// default value and default unit.
    pub fn insert_row(
        &mut self,
        grid: &GridId,
        edit_config: Option<&EditConfig>,
    ) -> Result<usize, LifecycleError> {
        if let Some(lock) = &self.unsaved {
            return Err(LifecycleError::UnsavedRowPending {
                grid: lock.grid.clone(),
            });
        }
        let study_uuid = self.study_uuid.clone();
        let table = self.table_mut(grid)?;
        let targets = field_targets(table, &study_uuid, grid.assay_uuid());
        let mut cells = Vec::with_capacity(table.column_count());
        let mut first_token = None;
        for node in table.nodes() {
            let token = IdentityToken::new_client();
            first_token.get_or_insert_with(|| token.clone());
            for col in node.columns {
                let schema = &table.field_header[col];
                let config = edit_config
                    .and_then(|config| matching_edit_config(config, &targets[col], schema));
                let value = config
                    .and_then(|config| config.default.clone())
                    .map_or_else(CellValue::empty, CellValue::Text);
                let unit = config
                    .filter(|_| schema.col_type == ColType::Unit)
                    .and_then(|config| config.unit_default.clone());
                cells.push(Cell {
                    value,
                    unit,
                    identity_token: Some(token.clone()),
                    is_new_row: true,
                    col_type: Some(schema.col_type),
                    ..Cell::default()
                });
            }
        }
        let Some(row_token) = first_token else {
            return Err(LifecycleError::RowOutOfRange {
                grid: grid.clone(),
                row: table.row_count(),
            });
        };
        table.table_data.push(cells);
        let row = table.row_count() - 1;
        self.unsaved = Some(UnsavedRowLock {
            grid: grid.clone(),
            row: row_token,
        });
        info!(%grid, row, "inserted unsaved row");
        Ok(row)
    }

    /// Decide whether a row may be deleted. Evaluated fresh on every call.
    pub fn delete_verdict(&self, grid: &GridId, row: usize) -> Result<DeleteVerdict, LifecycleError> {
        let table = self.table(grid)?;
        if row >= table.row_count() {
            return Err(LifecycleError::RowOutOfRange {
                grid: grid.clone(),
                row,
            });
        }
        if table.row_count() == 1 {
            return Ok(DeleteVerdict::OnlyRow);
        }
        if let Some(lock) = &self.unsaved {
            if &lock.grid == grid && row_token(table, row) == Some(&lock.row) {
                return Ok(DeleteVerdict::CancelUnsavedRow);
            }
            return Ok(DeleteVerdict::UnsavedRowBlocks);
        }
        if *grid == GridId::Study
            && let Some(assay) = self.assay_using_sample(row)
        {
            return Ok(DeleteVerdict::ReferencedByAssay {
                assay: assay.to_string(),
            });
        }
        Ok(DeleteVerdict::Ok)
    }

    /// Delete a row when its verdict permits it. Deleting the unsaved row
    /// releases the lock.
    pub fn delete_row(&mut self, grid: &GridId, row: usize) -> Result<DeleteVerdict, LifecycleError> {
        let verdict = self.delete_verdict(grid, row)?;
        if !verdict.is_permitted() {
            debug!(%grid, row, code = verdict.code(), "row deletion refused");
            return Err(LifecycleError::Refused(verdict));
        }
        self.table_mut(grid)?.table_data.remove(row);
        if verdict == DeleteVerdict::CancelUnsavedRow {
            self.unsaved = None;
        }
        info!(%grid, row, code = verdict.code(), "row deleted");
        Ok(verdict)
    }

    /// Drop the unsaved row, wherever it is, and release the lock.
    pub fn cancel_unsaved(&mut self) -> Option<UnsavedRowLock> {
        if let Some((grid, row)) = self.unsaved_row()
            && let Ok(table) = self.table_mut(&grid)
        {
            table.table_data.remove(row);
        }
        let lock = self.unsaved.take();
        if let Some(lock) = &lock {
            info!(grid = %lock.grid, "cancelled unsaved row");
        }
        lock
    }

    /// Record that the backend persisted the unsaved row.
    ///
    /// Client tokens are replaced by the server-issued ones given per node;
    /// nodes missing from `tokens` keep their client token.
    pub fn confirm_saved(
        &mut self,
        grid: &GridId,
        row: usize,
        tokens: &NodeIdentities,
    ) -> Result<(), LifecycleError> {
        match self.unsaved_row() {
            Some((locked, locked_row)) if &locked == grid && locked_row == row => {}
            _ => {
                return Err(LifecycleError::NotUnsaved {
                    grid: grid.clone(),
                    row,
                });
            }
        }
        let table = self.table_mut(grid)?;
        for node in table.nodes() {
            let token = tokens.get(&node.index);
            for cell in &mut table.table_data[row][node.columns] {
                if let Some(token) = token {
                    cell.identity_token = Some(token.clone());
                }
                cell.is_new_row = false;
            }
        }
        self.unsaved = None;
        info!(%grid, row, "unsaved row confirmed");
        Ok(())
    }

    /// First assay whose rows use the sample of a study row.
    fn assay_using_sample(&self, row: usize) -> Option<&str> {
        let sample = sample_token(&self.study, row)?;
        self.assays
            .iter()
            .find(|(_, table)| {
                (0..table.row_count()).any(|assay_row| sample_token(table, assay_row) == Some(sample))
            })
            .map(|(uuid, _)| uuid.as_str())
    }
}

/// Token of a row's first node.
fn row_token(table: &Table, row: usize) -> Option<&IdentityToken> {
    let node = table.nodes().into_iter().next()?;
    table.table_data.get(row)?[node.columns]
        .iter()
        .find_map(|cell| cell.identity_token.as_ref())
}

/// Token of a row's first `Sample` node.
fn sample_token(table: &Table, row: usize) -> Option<&IdentityToken> {
    let node = table.nodes().into_iter().find(|node| {
        node.groups
            .first()
            .and_then(|group| table.top_header.get(*group))
            .is_some_and(|group| group.is_sample())
    })?;
    table.table_data.get(row)?[node.columns]
        .iter()
        .find_map(|cell| cell.identity_token.as_ref())
}
