use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("row {row} has {found} cells, expected {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("top header spans {found} columns, field header has {expected}")]
    SpanMismatch { expected: usize, found: usize },
    #[error("top header group {group} is marked split but has no preceding node")]
    DanglingSplit { group: usize },
    #[error("invalid identity token: {0:?}")]
    InvalidToken(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
