//! Cell value model.
//!
//! A cell carries its value plus the metadata the grid needs to edit it. The
//! value is a scalar string, a list of strings, or a list of ontology term
//! records. Empty strings and empty lists both render as [`EMPTY_MARKER`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::{ColType, IdentityToken};

/// Rendered form of an empty cell, distinct from `0`.
pub const EMPTY_MARKER: &str = "-";

/// Separator used when list values are rendered.
pub const LIST_SEPARATOR: &str = "; ";

/// One ontology term reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyTerm {
    pub name: String,
    #[serde(default)]
    pub accession: String,
    #[serde(default)]
    pub ontology_name: String,
}

impl OntologyTerm {
    pub fn new(
        name: impl Into<String>,
        ontology_name: impl Into<String>,
        accession: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            accession: accession.into(),
            ontology_name: ontology_name.into(),
        }
    }
}

/// Value stored in a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    List(Vec<String>),
    Terms(Vec<OntologyTerm>),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl CellValue {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a value from parsed list elements: none is empty, one stays scalar.
    pub fn from_items(mut items: Vec<String>) -> Self {
        match items.len() {
            0 => Self::empty(),
            1 => CellValue::Text(items.remove(0)),
            _ => CellValue::List(items),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
            CellValue::Terms(terms) => terms.is_empty(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, CellValue::List(_) | CellValue::Terms(_))
    }

    /// Plain string elements of the value; term lists yield term names.
    pub fn items(&self) -> Vec<&str> {
        match self {
            CellValue::Text(text) if text.is_empty() => Vec::new(),
            CellValue::Text(text) => vec![text.as_str()],
            CellValue::List(items) => items.iter().map(String::as_str).collect(),
            CellValue::Terms(terms) => terms.iter().map(|term| term.name.as_str()).collect(),
        }
    }

    pub fn terms(&self) -> &[OntologyTerm] {
        match self {
            CellValue::Terms(terms) => terms,
            _ => &[],
        }
    }

    /// Display form used by the grid and exports.
    pub fn display(&self) -> String {
        if self.is_empty() {
            return EMPTY_MARKER.to_string();
        }
        self.items().join(LIST_SEPARATOR)
    }
}

fn nullable_value<'de, D>(deserializer: D) -> Result<CellValue, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CellValue>::deserialize(deserializer)?.unwrap_or_default())
}

/// One table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default, deserialize_with = "nullable_value")]
    pub value: CellValue,
    /// Unit of a UNIT cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Identity token of the node owning this cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_token: Option<IdentityToken>,
    /// Referenced object (protocol or sample) of an object reference cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Lookup links rendered for the value, one per term for ontology cells.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub is_new_row: bool,
    /// Column type annotation added by the row builder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_type: Option<ColType>,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(value.into()),
            ..Self::default()
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_token(mut self, token: IdentityToken) -> Self {
        self.identity_token = Some(token);
        self
    }

    pub fn terms(terms: Vec<OntologyTerm>) -> Self {
        Self {
            value: CellValue::Terms(terms),
            ..Self::default()
        }
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// Display form including the unit, e.g. `90 day`.
    pub fn display(&self) -> String {
        let value = self.value.display();
        match self.unit.as_deref() {
            Some(unit) if !unit.is_empty() && self.has_value() => format!("{value} {unit}"),
            _ => value,
        }
    }
}
