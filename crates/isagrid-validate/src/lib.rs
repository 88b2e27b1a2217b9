//! Edit validation for sample sheet grid cells.
//!
//! Validators are selected by column type through a closed handler table
//! ([`handler`]). Ontology cells are edited with the [`TermListEditor`] and
//! committed as term lists.

pub mod contact;
mod context;
mod engine;
pub mod handler;
mod rejection;
pub mod terms;
mod validators;

pub use contact::Contact;
pub use context::{EditInput, EditTarget, ValidationContext};
pub use engine::{apply_edit, validate_edit};
pub use handler::{ColumnHandler, EditorKind, editor_for, effective_col_type, handler, render};
pub use rejection::Rejection;
pub use terms::{EditorControls, TermEditError, TermInput, TermListEditor, TermRowControls};
pub use validators::{parse_date, parse_number, split_items};
