//! Sample sheet grid construction.
//!
//! [`build_columns`] derives the grouped column layout of a study or assay
//! table, [`build_rows`] the matching flat row records. Cell edits go through
//! [`commit_edit`]; row insertion and deletion through [`StudySession`].

pub mod columns;
pub mod context;
pub mod edit;
pub mod error;
pub mod lifecycle;
pub mod rows;
pub mod settings;

pub use columns::{
    ColumnDef, ColumnGroup, ColumnLayout, GroupKind, NodeSection, build_columns, column_width,
    field_targets, matching_edit_config, node_sections,
};
pub use context::{GridContext, GridMode};
pub use edit::{CellUpdate, commit_edit};
pub use error::{EditError, GridError, LifecycleError, Result};
pub use lifecycle::{DeleteVerdict, StudySession, UnsavedRowLock};
pub use rows::{
    NodeIdentities, RowRecord, build_rows, ontology_link, ontology_links, row_identities,
};
pub use settings::GridSettings;
