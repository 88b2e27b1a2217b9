pub mod cell;
pub mod col_type;
pub mod config;
pub mod error;
pub mod ids;
pub mod schema;
pub mod table;

pub use cell::{Cell, CellValue, EMPTY_MARKER, LIST_SEPARATOR, OntologyTerm};
pub use col_type::ColType;
pub use config::{
    AssayConfig, DisplayConfig, DisplayField, EditConfig, EditFormat, FieldEditConfig,
    FieldTarget, NamedField, NodeConfig, SheetConfig, StudyConfig, ValueRange,
};
pub use error::{ModelError, Result};
pub use ids::{GridId, IdentityToken};
pub use schema::{FieldSchema, ItemType, ObjectClass, ObjectRef, TopHeaderGroup};
pub use table::{NodeSpan, ShortcutLink, ShortcutSchema, Shortcuts, Table};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_and_empty_string_render_marker() {
        assert_eq!(CellValue::Text(String::new()).display(), EMPTY_MARKER);
        assert_eq!(CellValue::List(vec![]).display(), EMPTY_MARKER);
        assert_eq!(CellValue::Text("0".to_string()).display(), "0");
    }

    #[test]
    fn cell_display_includes_unit() {
        let cell = Cell::text("90").with_unit("day");
        assert_eq!(cell.display(), "90 day");
        let empty = Cell::text("").with_unit("day");
        assert_eq!(empty.display(), EMPTY_MARKER);
    }
}
