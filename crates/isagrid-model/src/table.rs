#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{Cell, FieldSchema, ModelError, Result, TopHeaderGroup};

/// Column descriptor of one study shortcut link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutSchema {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Precomputed link of one shortcut in one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutLink {
    pub path: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Study-level shortcut data: one schema entry per shortcut, one map per row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcuts {
    #[serde(default)]
    pub schema: BTreeMap<String, ShortcutSchema>,
    #[serde(default)]
    pub data: Vec<BTreeMap<String, ShortcutLink>>,
}

/// Columns belonging to one node, possibly spread over several split groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpan {
    pub index: usize,
    /// Header of the group that started the node.
    pub header: String,
    /// Indices into `topHeader` of the groups forming the node.
    pub groups: Vec<usize>,
    pub columns: Range<usize>,
}

impl NodeSpan {
    pub fn contains(&self, col: usize) -> bool {
        self.columns.contains(&col)
    }
}

/// Schema and data payload of one study or assay grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub top_header: Vec<TopHeaderGroup>,
    pub field_header: Vec<FieldSchema>,
    #[serde(default)]
    pub table_data: Vec<Vec<Cell>>,
    #[serde(default)]
    pub col_last_visible: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<Shortcuts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irods_paths: Option<Vec<String>>,
}

impl Table {
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Table = serde_json::from_str(json)?;
        table.check_shape()?;
        Ok(table)
    }

    pub fn column_count(&self) -> usize {
        self.field_header.len()
    }

    pub fn row_count(&self) -> usize {
        self.table_data.len()
    }

    /// Verify that spans cover the field header and every row is aligned to it.
    pub fn check_shape(&self) -> Result<()> {
        let expected = self.field_header.len();
        let spanned: usize = self.top_header.iter().map(|group| group.colspan).sum();
        if spanned != expected {
            return Err(ModelError::SpanMismatch {
                expected,
                found: spanned,
            });
        }
        if let Some(first) = self.top_header.first()
            && first.split
        {
            return Err(ModelError::DanglingSplit { group: 0 });
        }
        for (row, cells) in self.table_data.iter().enumerate() {
            if cells.len() != expected {
                return Err(ModelError::ShapeMismatch {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        Ok(())
    }

    /// Node layout derived from the top header. Split groups extend the
    /// preceding node.
    pub fn nodes(&self) -> Vec<NodeSpan> {
        let mut nodes: Vec<NodeSpan> = Vec::new();
        let mut start = 0;
        for (group_idx, group) in self.top_header.iter().enumerate() {
            let end = start + group.colspan;
            match nodes.last_mut() {
                Some(node) if group.split => {
                    node.groups.push(group_idx);
                    node.columns.end = end;
                }
                _ => nodes.push(NodeSpan {
                    index: nodes.len(),
                    header: group.value.clone(),
                    groups: vec![group_idx],
                    columns: start..end,
                }),
            }
            start = end;
        }
        nodes
    }

    /// Node index owning a column.
    pub fn node_of(&self, col: usize) -> Option<usize> {
        self.nodes()
            .into_iter()
            .find(|node| node.contains(col))
            .map(|node| node.index)
    }

    /// True when any row has a value in the column.
    pub fn column_has_values(&self, col: usize) -> bool {
        self.table_data
            .iter()
            .filter_map(|row| row.get(col))
            .any(Cell::has_value)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.table_data.get(row).and_then(|cells| cells.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.table_data
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
    }
}
