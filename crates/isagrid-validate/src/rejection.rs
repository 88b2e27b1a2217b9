//! Edit rejection reasons.
//!
//! A rejection never reaches the backend: the grid keeps the prior value and
//! marks the editor invalid, showing `message()` to the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use isagrid_model::ColType;

/// Why a proposed cell value was not accepted.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Rejection {
    #[error("column is not editable")]
    NotEditable,

    #[error("name is required")]
    EmptyName,

    #[error("multiple values are not allowed in a name")]
    ListNotAllowed,

    #[error("value '{value}' does not match pattern '{pattern}'")]
    PatternMismatch { value: String, pattern: String },

    #[error("configured pattern '{pattern}' is invalid")]
    InvalidPattern { pattern: String },

    #[error("value '{value}' is not a number")]
    NotNumeric { value: String },

    #[error("value '{value}' is not an integer")]
    NotInteger { value: String },

    #[error("value {value} is outside the range [{min}, {max}]")]
    OutOfRange { value: String, min: f64, max: f64 },

    #[error("unit '{unit}' is not allowed")]
    InvalidUnit { unit: String },

    #[error("value '{value}' is not one of the allowed options")]
    NotAnOption { value: String },

    #[error("'{value}' is not a valid YYYY-MM-DD date")]
    InvalidDate { value: String },

    #[error("'{value}' is not a valid contact")]
    InvalidContact { value: String },

    #[error("'{value}' does not refer to an existing {kind}")]
    UnknownReference { value: String, kind: String },

    #[error("ontology terms are edited with the term list editor")]
    TermEditorRequired,

    #[error("ontology '{ontology}' is not allowed for this field")]
    OntologyNotAllowed { ontology: String },

    #[error("{col_type} columns do not accept {input} input")]
    UnsupportedInput { col_type: ColType, input: String },
}

impl Rejection {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::NotEditable => "not_editable",
            Rejection::EmptyName => "empty_name",
            Rejection::ListNotAllowed => "list_not_allowed",
            Rejection::PatternMismatch { .. } => "pattern_mismatch",
            Rejection::InvalidPattern { .. } => "invalid_pattern",
            Rejection::NotNumeric { .. } => "not_numeric",
            Rejection::NotInteger { .. } => "not_integer",
            Rejection::OutOfRange { .. } => "out_of_range",
            Rejection::InvalidUnit { .. } => "invalid_unit",
            Rejection::NotAnOption { .. } => "not_an_option",
            Rejection::InvalidDate { .. } => "invalid_date",
            Rejection::InvalidContact { .. } => "invalid_contact",
            Rejection::UnknownReference { .. } => "unknown_reference",
            Rejection::TermEditorRequired => "term_editor_required",
            Rejection::OntologyNotAllowed { .. } => "ontology_not_allowed",
            Rejection::UnsupportedInput { .. } => "unsupported_input",
        }
    }
}
