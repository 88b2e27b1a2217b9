//! Backend collaborator interfaces.
//!
//! The grid core never performs I/O itself. Everything it needs from the
//! outside goes through these traits, implemented by the host application
//! (HTTP clients, fixtures, in-memory fakes).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use isagrid_grid::{CellUpdate, NodeIdentities};
use isagrid_model::{Cell, ColType, DisplayConfig, EditConfig, GridId, OntologyTerm, Table};

use crate::error::Result;
use crate::update::{ConfigSnapshot, ConfigUpdateBatch};

/// Schema and data of one grid as served by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPayload {
    #[serde(flatten)]
    pub table: Table,
    /// Present when the sheet was requested for editing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_config: Option<EditConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_config: Option<DisplayConfig>,
}

impl SheetPayload {
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: SheetPayload = serde_json::from_str(json)?;
        payload.table.check_shape()?;
        Ok(payload)
    }
}

pub trait SheetSource {
    fn fetch_sheet(&self, study: &str, assay: Option<&str>, edit: bool) -> Result<SheetPayload>;
}

pub trait ConfigBackend {
    fn update_config(&mut self, batch: &ConfigUpdateBatch) -> Result<()>;

    fn fetch_config(&self) -> Result<ConfigSnapshot>;
}

pub trait RowBackend {
    /// Persist one accepted cell value and return the server-normalized cell.
    fn update_cell(&mut self, grid: &GridId, update: &CellUpdate) -> Result<Cell>;

    /// Persist a new row, returning the server-issued token of each node.
    fn insert_row(&mut self, grid: &GridId, cells: &[Cell]) -> Result<NodeIdentities>;

    fn delete_row(&mut self, grid: &GridId, identities: &NodeIdentities) -> Result<()>;
}

pub trait TermSearch {
    /// Terms matching `query` in the given ontologies.
    fn search(&self, query: &str, ontologies: &[String]) -> Result<Vec<OntologyTerm>>;
}

/// Existence of linked files, with aggregate totals over the existing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    #[serde(default)]
    pub paths: BTreeMap<String, bool>,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub total_bytes: u64,
}

impl ProbeResult {
    pub fn exists(&self, path: &str) -> bool {
        self.paths.get(path).copied().unwrap_or(false)
    }
}

pub trait FileProbe {
    fn probe(&self, paths: &[String]) -> Result<ProbeResult>;
}

/// Search terms and keep only those from allowed ontologies.
pub fn search_allowed<S: TermSearch + ?Sized>(
    search: &S,
    query: &str,
    allowed: &[String],
) -> Result<Vec<OntologyTerm>> {
    let mut terms = search.search(query, allowed)?;
    terms.retain(|term| {
        allowed
            .iter()
            .any(|ontology| ontology.eq_ignore_ascii_case(&term.ontology_name))
    });
    Ok(terms)
}

/// File paths referenced by the LINK_FILE columns of a table.
pub fn linked_paths(table: &Table) -> Vec<String> {
    let mut paths: Vec<String> = link_file_columns(table)
        .flat_map(|col| {
            table
                .table_data
                .iter()
                .filter_map(move |row| row.get(col))
                .flat_map(|cell| cell.value.items())
                .map(str::to_string)
        })
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

/// Link LINK_FILE cells whose files exist and unlink the others.
///
/// Returns the number of cells that ended up linked.
pub fn apply_probe(table: &mut Table, result: &ProbeResult) -> usize {
    let columns: Vec<usize> = link_file_columns(table).collect();
    let mut linked = 0;
    for row in &mut table.table_data {
        for &col in &columns {
            let Some(cell) = row.get_mut(col) else {
                continue;
            };
            cell.links = cell
                .value
                .items()
                .into_iter()
                .filter(|path| result.exists(path))
                .map(str::to_string)
                .collect();
            if !cell.links.is_empty() {
                linked += 1;
            }
        }
    }
    linked
}

fn link_file_columns(table: &Table) -> impl Iterator<Item = usize> + '_ {
    table
        .field_header
        .iter()
        .enumerate()
        .filter(|(_, field)| field.col_type == ColType::LinkFile)
        .map(|(col, _)| col)
}
