//! Error types for backend collaborators and config sync.

use thiserror::Error;

use isagrid_grid::LifecycleError;
use isagrid_model::ModelError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    /// The backend could not be reached or failed to answer.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered and refused the request.
    #[error("backend rejected the request: {0}")]
    Rejected(String),

    #[error("invalid payload: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
