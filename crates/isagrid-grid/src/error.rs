//! Error types for grid construction and row lifecycle operations.

use std::path::PathBuf;

use thiserror::Error;

use isagrid_model::{GridId, ModelError};
use isagrid_validate::Rejection;

use crate::lifecycle::DeleteVerdict;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GridError {
    #[error("invalid table: {0}")]
    Model(#[from] ModelError),

    #[error("failed to read settings {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("unknown grid: {0}")]
    UnknownGrid(GridId),

    #[error("row {row} does not exist in {grid}")]
    RowOutOfRange { grid: GridId, row: usize },

    #[error("column {col} does not exist")]
    ColumnOutOfRange { col: usize },
}

pub type Result<T> = std::result::Result<T, GridError>;

/// Structural edits refused by the row lifecycle controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("row deletion refused: {}", .0.message())]
    Refused(DeleteVerdict),

    #[error("an unsaved row in {grid} must be saved or cancelled first")]
    UnsavedRowPending { grid: GridId },

    #[error("row {row} in {grid} is not the unsaved row")]
    NotUnsaved { grid: GridId, row: usize },

    #[error("unknown grid: {0}")]
    UnknownGrid(GridId),

    #[error("row {row} does not exist in {grid}")]
    RowOutOfRange { grid: GridId, row: usize },
}

/// Failure of a single cell edit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("cell ({row}, {col}) does not exist")]
    NoSuchCell { row: usize, col: usize },
}
