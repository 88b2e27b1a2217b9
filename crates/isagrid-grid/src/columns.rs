//! Column definition builder.
//!
//! Turns a table schema plus the display and edit configuration into grouped
//! column definitions:
//!
//! - a pinned row-number group,
//! - one group per top-header entry, with one leaf per schema field,
//! - at most one trailing synthetic group (study shortcuts, iRODS links or
//!   row edit controls).
//!
//! In an assay table the nodes up to and including the first `Sample` group
//! are the study section: they are configured from the study's documents and
//! hidden by default, except for their identity columns. Every later node is
//! the assay section and indexes the assay's documents from zero.

use serde::Serialize;
use tracing::{debug, warn};

use isagrid_model::{
    ColType, DisplayField, FieldEditConfig, FieldSchema, FieldTarget, NamedField, NodeSpan,
    SheetConfig, Table,
};
use isagrid_validate::{EditorKind, editor_for};

use crate::context::GridContext;
use crate::error::Result;
use crate::settings::GridSettings;

pub const ROW_NUM_FIELD: &str = "rowNum";
pub const ROW_EDIT_FIELD: &str = "rowEdit";
pub const IRODS_LINKS_FIELD: &str = "irodsLinks";
pub const SHORTCUT_FIELD_PREFIX: &str = "shortcuts.";

const SYNTHETIC_COL_WIDTH: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKind {
    RowNumber,
    Node,
    Shortcuts,
    IrodsLinks,
    RowEditControls,
}

/// Leaf column of the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub header_name: String,
    /// Row record key rendered in this column (`col3`, `rowNum`, ...).
    pub field: String,
    /// Schema column index; `None` for synthetic columns.
    pub col: Option<usize>,
    pub col_type: Option<ColType>,
    pub width: u32,
    pub min_width: u32,
    pub hide: bool,
    pub editable: bool,
    pub pinned: bool,
    /// Node index within the table.
    pub node_index: Option<usize>,
    /// Field index within the node.
    pub field_index: Option<usize>,
    pub assay_section: bool,
    /// Sample name column of an assay table.
    pub sample_column: bool,
    pub editor: Option<EditorKind>,
    /// Position of the field in the configuration documents.
    pub config_target: Option<FieldTarget>,
}

impl ColumnDef {
    fn synthetic(header_name: &str, field: impl Into<String>, width: u32) -> Self {
        Self {
            header_name: header_name.to_string(),
            field: field.into(),
            col: None,
            col_type: None,
            width,
            min_width: width,
            hide: false,
            editable: false,
            pinned: false,
            node_index: None,
            field_index: None,
            assay_section: false,
            sample_column: false,
            editor: None,
            config_target: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroup {
    pub header_name: String,
    pub colour: Option<String>,
    pub kind: GroupKind,
    pub node_index: Option<usize>,
    pub assay_section: bool,
    pub children: Vec<ColumnDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayout {
    pub groups: Vec<ColumnGroup>,
}

impl ColumnLayout {
    pub fn leaves(&self) -> impl Iterator<Item = &ColumnDef> {
        self.groups.iter().flat_map(|group| group.children.iter())
    }

    /// Leaf showing a schema column.
    pub fn leaf(&self, col: usize) -> Option<&ColumnDef> {
        self.leaves().find(|leaf| leaf.col == Some(col))
    }

    /// `hide` flag of every leaf, in layout order.
    pub fn hidden_flags(&self) -> Vec<bool> {
        self.leaves().map(|leaf| leaf.hide).collect()
    }

    pub fn visible_columns(&self) -> Vec<usize> {
        self.leaves()
            .filter(|leaf| !leaf.hide)
            .filter_map(|leaf| leaf.col)
            .collect()
    }

    pub fn trailing_group(&self) -> Option<GroupKind> {
        self.groups
            .last()
            .map(|group| group.kind)
            .filter(|kind| !matches!(kind, GroupKind::RowNumber | GroupKind::Node))
    }
}

/// Node of a table together with the configuration section it reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSection {
    pub node: NodeSpan,
    pub assay_section: bool,
    /// Node index inside the section's configuration documents.
    pub config_node_index: usize,
}

/// Split the table's nodes into study and assay sections.
pub fn node_sections(table: &Table, assay_mode: bool) -> Vec<NodeSection> {
    let nodes = table.nodes();
    let study_nodes = if assay_mode {
        nodes
            .iter()
            .position(|node| {
                node.groups
                    .first()
                    .and_then(|group| table.top_header.get(*group))
                    .is_some_and(|group| group.is_sample())
            })
            .map_or(0, |sample| sample + 1)
    } else {
        nodes.len()
    };
    nodes
        .into_iter()
        .map(|node| {
            let assay_section = node.index >= study_nodes;
            let config_node_index = if assay_section {
                node.index - study_nodes
            } else {
                node.index
            };
            NodeSection {
                node,
                assay_section,
                config_node_index,
            }
        })
        .collect()
}

/// Configuration position of every schema column.
pub fn field_targets(table: &Table, study: &str, assay: Option<&str>) -> Vec<FieldTarget> {
    let mut targets = Vec::with_capacity(table.column_count());
    for section in node_sections(table, assay.is_some()) {
        for col in section.node.columns.clone() {
            targets.push(FieldTarget {
                study: study.to_string(),
                assay: assay.filter(|_| section.assay_section).map(str::to_string),
                node_index: section.config_node_index,
                field_index: col - section.node.columns.start,
            });
        }
    }
    targets
}

/// Edit configuration entry that applies to a schema field.
///
/// Names must match, and unless the field is an identity column the field
/// types must match exactly as well.
pub fn matching_edit_config<'c>(
    config: &'c SheetConfig<FieldEditConfig>,
    target: &FieldTarget,
    field: &FieldSchema,
) -> Option<&'c FieldEditConfig> {
    config
        .matching_field(target, field.config_name())
        .filter(|entry| field.is_identity() || entry.field_type == field.field_type)
}

/// Width of a schema column and its minimum.
pub fn column_width(
    field: &FieldSchema,
    col: usize,
    col_last_visible: usize,
    settings: &GridSettings,
) -> (u32, u32) {
    let len = u32::try_from(field.max_value_len).unwrap_or(u32::MAX);
    let (min_width, calc) = if field.col_type == ColType::ExternalLinks {
        (settings.external_links_min_width, len.saturating_mul(120))
    } else {
        (
            settings.min_col_width,
            len.saturating_mul(10).saturating_add(25),
        )
    };
    let width = if col == col_last_visible {
        calc.max(min_width)
    } else {
        calc.max(min_width).min(settings.max_col_width.max(min_width))
    };
    (width, min_width)
}

pub fn build_columns(table: &Table, ctx: &GridContext<'_>) -> Result<ColumnLayout> {
    table.check_shape()?;
    let sections = node_sections(table, ctx.is_assay());
    warn_stale_config(ctx, &sections);

    let mut groups = vec![row_number_group(ctx.settings)];
    let group_starts: Vec<usize> = table
        .top_header
        .iter()
        .scan(0, |start, group| {
            let current = *start;
            *start += group.colspan;
            Some(current)
        })
        .collect();

    for section in &sections {
        for &group_idx in &section.node.groups {
            let header = &table.top_header[group_idx];
            let start = group_starts[group_idx];
            let children = (start..start + header.colspan)
                .map(|col| build_leaf(table, ctx, section, col))
                .collect();
            groups.push(ColumnGroup {
                header_name: header.value.clone(),
                colour: Some(header.colour.clone()).filter(|colour| !colour.is_empty()),
                kind: GroupKind::Node,
                node_index: Some(section.node.index),
                assay_section: section.assay_section,
                children,
            });
        }
    }

    if let Some(trailing) = trailing_group(table, ctx) {
        groups.push(trailing);
    }

    let layout = ColumnLayout { groups };
    debug!(
        groups = layout.groups.len(),
        visible = layout.visible_columns().len(),
        assay = ctx.is_assay(),
        edit = ctx.is_edit(),
        "built column layout"
    );
    Ok(layout)
}

fn row_number_group(settings: &GridSettings) -> ColumnGroup {
    let mut leaf = ColumnDef::synthetic("#", ROW_NUM_FIELD, settings.row_num_width);
    leaf.pinned = true;
    ColumnGroup {
        header_name: "Row".to_string(),
        colour: None,
        kind: GroupKind::RowNumber,
        node_index: None,
        assay_section: false,
        children: vec![leaf],
    }
}

fn build_leaf(
    table: &Table,
    ctx: &GridContext<'_>,
    section: &NodeSection,
    col: usize,
) -> ColumnDef {
    let field = &table.field_header[col];
    let field_index = col - section.node.columns.start;
    let target = FieldTarget {
        study: ctx.study_uuid.to_string(),
        assay: ctx
            .assay_uuid
            .filter(|_| section.assay_section)
            .map(str::to_string),
        node_index: section.config_node_index,
        field_index,
    };
    let sample_column = ctx.is_assay() && !section.assay_section && field.is_sample_name();
    let hide = resolve_hidden(table, ctx, section, col, &target);
    let (editable, config) = resolve_editable(ctx, section, field, &target, sample_column);
    let (width, min_width) = column_width(field, col, table.col_last_visible, ctx.settings);

    ColumnDef {
        header_name: field.value.clone(),
        field: format!("col{col}"),
        col: Some(col),
        col_type: Some(field.col_type),
        width,
        min_width,
        hide,
        editable,
        pinned: false,
        node_index: Some(section.node.index),
        field_index: Some(field_index),
        assay_section: section.assay_section,
        sample_column,
        editor: editor_for(field.col_type, config, sample_column, editable),
        config_target: Some(target),
    }
}

/// Explicit display entry > study-section default inside an assay table >
/// hide empty columns outside edit mode.
fn resolve_hidden(
    table: &Table,
    ctx: &GridContext<'_>,
    section: &NodeSection,
    col: usize,
    target: &FieldTarget,
) -> bool {
    let field = &table.field_header[col];
    if let Some(entry) = display_entry(ctx, target, field) {
        return !entry.visible;
    }
    if ctx.is_assay() && !section.assay_section {
        return !field.is_identity();
    }
    !ctx.is_edit() && !table.column_has_values(col)
}

fn display_entry<'c>(
    ctx: &GridContext<'c>,
    target: &FieldTarget,
    field: &FieldSchema,
) -> Option<&'c DisplayField> {
    let entry = ctx.display_config?.field(target)?;
    if entry.name() != field.config_name() {
        debug!(
            field = %field.config_name(),
            configured = %entry.name(),
            node = target.node_index,
            index = target.field_index,
            "ignoring display entry for a different field"
        );
        return None;
    }
    Some(entry)
}

fn resolve_editable<'c>(
    ctx: &GridContext<'c>,
    section: &NodeSection,
    field: &FieldSchema,
    target: &FieldTarget,
    sample_column: bool,
) -> (bool, Option<&'c FieldEditConfig>) {
    if !ctx.is_edit() {
        return (false, None);
    }
    let Some(config) = ctx
        .edit_config
        .and_then(|config| matching_edit_config(config, target, field))
    else {
        return (false, None);
    };
    // Study nodes shown in an assay table are edited in the study table.
    if ctx.is_assay() && !section.assay_section && !sample_column {
        return (false, Some(config));
    }
    (config.editable, Some(config))
}

fn trailing_group(table: &Table, ctx: &GridContext<'_>) -> Option<ColumnGroup> {
    if ctx.is_edit() {
        let mut leaf = ColumnDef::synthetic("Edit", ROW_EDIT_FIELD, SYNTHETIC_COL_WIDTH);
        leaf.pinned = true;
        return Some(synthetic_group("Edit", GroupKind::RowEditControls, vec![leaf]));
    }
    if ctx.is_assay() {
        if !ctx.settings.irods_links {
            return None;
        }
        let leaf = ColumnDef::synthetic("iRODS", IRODS_LINKS_FIELD, SYNTHETIC_COL_WIDTH);
        return Some(synthetic_group("Links", GroupKind::IrodsLinks, vec![leaf]));
    }
    let shortcuts = table
        .shortcuts
        .as_ref()
        .filter(|shortcuts| !shortcuts.data.is_empty())?;
    let children = shortcuts
        .schema
        .iter()
        .map(|(key, schema)| {
            ColumnDef::synthetic(
                &schema.title,
                format!("{SHORTCUT_FIELD_PREFIX}{key}"),
                SYNTHETIC_COL_WIDTH,
            )
        })
        .collect();
    Some(synthetic_group("Links", GroupKind::Shortcuts, children))
}

fn synthetic_group(header: &str, kind: GroupKind, children: Vec<ColumnDef>) -> ColumnGroup {
    ColumnGroup {
        header_name: header.to_string(),
        colour: None,
        kind,
        node_index: None,
        assay_section: false,
        children,
    }
}

/// Configuration entries for nodes the schema does not have are ignored.
fn warn_stale_config(ctx: &GridContext<'_>, sections: &[NodeSection]) {
    let study_nodes = sections.iter().filter(|s| !s.assay_section).count();
    let assay_nodes = sections.len() - study_nodes;
    let mut checks = vec![(None, study_nodes)];
    if let Some(assay) = ctx.assay_uuid {
        checks.push((Some(assay), assay_nodes));
    }
    for (assay, schema_nodes) in checks {
        let display_nodes = ctx
            .display_config
            .map_or(0, |config| config.node_count(ctx.study_uuid, assay));
        let edit_nodes = ctx
            .edit_config
            .map_or(0, |config| config.node_count(ctx.study_uuid, assay));
        for (kind, configured) in [("display", display_nodes), ("edit", edit_nodes)] {
            if configured > schema_nodes {
                warn!(
                    config = kind,
                    study = ctx.study_uuid,
                    assay = assay.unwrap_or("-"),
                    configured,
                    schema_nodes,
                    "ignoring configuration for nodes missing from the schema"
                );
            }
        }
    }
}
