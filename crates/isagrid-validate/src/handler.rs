//! Column type handler table.
//!
//! Each [`ColType`] maps to exactly one [`ColumnHandler`] bundling its
//! validator, renderer and editor variant. The match in [`handler`] is
//! exhaustive, so a new column type does not compile until it has a handler.

use serde::{Deserialize, Serialize};

use isagrid_model::{Cell, CellValue, ColType, EditFormat, FieldEditConfig};

use crate::contact::Contact;
use crate::validators::{
    ValidateFn, validate_contact, validate_date, validate_name, validate_numeric,
    validate_ontology, validate_reference, validate_select, validate_string, validate_unit,
};

/// Editor variant a column opens on edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorKind {
    /// Free text input.
    Plain,
    /// Drop-down over the configured options.
    Select,
    /// Numeric input plus unit selector.
    Unit,
    /// Ontology term list editor.
    Ontology,
    /// Selector over existing protocols or samples.
    ObjectReference,
}

pub type RenderFn = fn(&Cell) -> String;

pub struct ColumnHandler {
    pub validate: ValidateFn,
    pub render: RenderFn,
    pub editor: EditorKind,
}

static NAME: ColumnHandler = ColumnHandler {
    validate: validate_name,
    render: render_plain,
    editor: EditorKind::Plain,
};

static ONTOLOGY: ColumnHandler = ColumnHandler {
    validate: validate_ontology,
    render: render_plain,
    editor: EditorKind::Ontology,
};

static UNIT: ColumnHandler = ColumnHandler {
    validate: validate_unit,
    render: render_plain,
    editor: EditorKind::Unit,
};

static NUMERIC: ColumnHandler = ColumnHandler {
    validate: validate_numeric,
    render: render_plain,
    editor: EditorKind::Plain,
};

static PROTOCOL: ColumnHandler = ColumnHandler {
    validate: validate_reference,
    render: render_plain,
    editor: EditorKind::ObjectReference,
};

static CONTACT: ColumnHandler = ColumnHandler {
    validate: validate_contact,
    render: render_contact,
    editor: EditorKind::Plain,
};

static DATE: ColumnHandler = ColumnHandler {
    validate: validate_date,
    render: render_plain,
    editor: EditorKind::Plain,
};

static SELECT: ColumnHandler = ColumnHandler {
    validate: validate_select,
    render: render_plain,
    editor: EditorKind::Select,
};

static STRING: ColumnHandler = ColumnHandler {
    validate: validate_string,
    render: render_plain,
    editor: EditorKind::Plain,
};

pub fn handler(col_type: ColType) -> &'static ColumnHandler {
    match col_type {
        ColType::Name => &NAME,
        ColType::Ontology => &ONTOLOGY,
        ColType::Unit => &UNIT,
        ColType::Numeric => &NUMERIC,
        ColType::Protocol => &PROTOCOL,
        ColType::Contact => &CONTACT,
        ColType::Date => &DATE,
        ColType::Select => &SELECT,
        ColType::ExternalLinks | ColType::LinkFile | ColType::Text => &STRING,
    }
}

/// Column type used for validation, letting the edit format refine plain text
/// columns (select lists, numbers, protocol references).
pub fn effective_col_type(col_type: ColType, config: Option<&FieldEditConfig>) -> ColType {
    if col_type != ColType::Text {
        return col_type;
    }
    match config.map(|config| config.format) {
        Some(EditFormat::Select) => ColType::Select,
        Some(EditFormat::Integer | EditFormat::Double) => ColType::Numeric,
        Some(EditFormat::Protocol) => ColType::Protocol,
        _ => col_type,
    }
}

/// Editor for a column, or `None` when it cannot be edited.
pub fn editor_for(
    col_type: ColType,
    config: Option<&FieldEditConfig>,
    sample_column: bool,
    editable: bool,
) -> Option<EditorKind> {
    if !editable {
        return None;
    }
    if sample_column {
        return Some(EditorKind::ObjectReference);
    }
    Some(handler(effective_col_type(col_type, config)).editor)
}

/// Render a cell with the handler of its column type.
pub fn render(col_type: ColType, cell: &Cell) -> String {
    (handler(col_type).render)(cell)
}

fn render_plain(cell: &Cell) -> String {
    cell.display()
}

fn render_contact(cell: &Cell) -> String {
    if cell.value.is_empty() {
        return cell.display();
    }
    let items = match &cell.value {
        CellValue::Terms(_) => return cell.display(),
        value => value.items(),
    };
    items
        .into_iter()
        .map(|item| Contact::parse(item).map_or_else(|| item.to_string(), |c| c.to_string()))
        .collect::<Vec<_>>()
        .join(isagrid_model::LIST_SEPARATOR)
}
