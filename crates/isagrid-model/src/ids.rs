#![deny(unsafe_code)]

use std::fmt;

use uuid::Uuid;

use crate::ModelError;

/// Stable key shared by every cell of one node instance.
///
/// Persisted rows carry server-issued tokens; rows inserted on the client get
/// a random UUID until the backend confirms them.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidToken(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Fresh client-side token for a row that has not been saved yet.
    pub fn new_client() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one grid within a study session.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(tag = "kind", content = "uuid", rename_all = "lowercase")]
pub enum GridId {
    Study,
    Assay(String),
}

impl GridId {
    pub fn assay(uuid: impl Into<String>) -> Self {
        Self::Assay(uuid.into())
    }

    pub fn is_assay(&self) -> bool {
        matches!(self, Self::Assay(_))
    }

    pub fn assay_uuid(&self) -> Option<&str> {
        match self {
            Self::Study => None,
            Self::Assay(uuid) => Some(uuid),
        }
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Study => f.write_str("study"),
            Self::Assay(uuid) => write!(f, "assay:{uuid}"),
        }
    }
}
