//! Semantic column types.
//!
//! The backend tags every field header with a `colType`. The tag decides which
//! validator, editor and renderer apply to the column and never changes within
//! one table snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic type tag of a column.
///
/// Unknown or missing tags are treated as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ColType {
    /// Node name (source, material, sample, process or data file name).
    Name,
    /// Ordered list of ontology term references.
    Ontology,
    /// Numeric value with a separately edited unit.
    Unit,
    /// Numeric value without unit.
    Numeric,
    /// Protocol reference.
    Protocol,
    /// Person with optional email annotation.
    Contact,
    /// Calendar date (`YYYY-MM-DD`).
    Date,
    /// Value restricted to a configured option list.
    Select,
    /// Links to external identifiers.
    ExternalLinks,
    /// Link to a file in the project storage.
    LinkFile,
    #[default]
    Text,
}

impl ColType {
    pub const ALL: [ColType; 11] = [
        ColType::Name,
        ColType::Ontology,
        ColType::Unit,
        ColType::Numeric,
        ColType::Protocol,
        ColType::Contact,
        ColType::Date,
        ColType::Select,
        ColType::ExternalLinks,
        ColType::LinkFile,
        ColType::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColType::Name => "NAME",
            ColType::Ontology => "ONTOLOGY",
            ColType::Unit => "UNIT",
            ColType::Numeric => "NUMERIC",
            ColType::Protocol => "PROTOCOL",
            ColType::Contact => "CONTACT",
            ColType::Date => "DATE",
            ColType::Select => "SELECT",
            ColType::ExternalLinks => "EXTERNAL_LINKS",
            ColType::LinkFile => "LINK_FILE",
            ColType::Text => "TEXT",
        }
    }

    /// Identity columns start a node and name the entity it represents.
    pub fn is_identity(&self) -> bool {
        matches!(self, ColType::Name | ColType::Protocol)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColType::Unit | ColType::Numeric)
    }
}

impl fmt::Display for ColType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        match normalized.as_str() {
            "NAME" => Ok(ColType::Name),
            "ONTOLOGY" => Ok(ColType::Ontology),
            "UNIT" => Ok(ColType::Unit),
            "NUMERIC" | "INTEGER" | "DOUBLE" => Ok(ColType::Numeric),
            "PROTOCOL" => Ok(ColType::Protocol),
            "CONTACT" => Ok(ColType::Contact),
            "DATE" => Ok(ColType::Date),
            "SELECT" => Ok(ColType::Select),
            "EXTERNAL_LINKS" => Ok(ColType::ExternalLinks),
            "LINK_FILE" => Ok(ColType::LinkFile),
            "TEXT" | "STRING" => Ok(ColType::Text),
            _ => Err(format!("Unknown column type: {s}")),
        }
    }
}

impl From<Option<String>> for ColType {
    fn from(value: Option<String>) -> Self {
        value
            .and_then(|tag| tag.parse().ok())
            .unwrap_or_default()
    }
}

impl From<ColType> for String {
    fn from(value: ColType) -> Self {
        value.as_str().to_string()
    }
}
