//! Row data builder.
//!
//! Produces one flat record per table row, keyed by the leaf `field` names of
//! the column layout (`rowNum`, `col0`..`colN`, `shortcuts.<key>`,
//! `irodsLinks`).

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::ser::{Serialize, SerializeMap, Serializer};

use isagrid_model::{Cell, ColType, IdentityToken, OntologyTerm, ShortcutLink, Table};
use isagrid_validate::{Contact, render};

use crate::columns::{ColumnLayout, IRODS_LINKS_FIELD, ROW_NUM_FIELD, SHORTCUT_FIELD_PREFIX};
use crate::context::GridContext;
use crate::error::{GridError, Result};
use crate::settings::GridSettings;

/// Identity token of every node in one row, keyed by node index.
pub type NodeIdentities = BTreeMap<usize, IdentityToken>;

#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    /// 1-based.
    pub row_num: usize,
    pub cells: Vec<Cell>,
    pub identities: NodeIdentities,
    pub shortcuts: Option<BTreeMap<String, ShortcutLink>>,
    pub irods_path: Option<String>,
}

impl RowRecord {
    /// Export form of a cell, rendered by its column type handler.
    pub fn display(&self, col: usize) -> Option<String> {
        let cell = self.cells.get(col)?;
        Some(render(cell.col_type.unwrap_or_default(), cell))
    }

    pub fn identity(&self, node: usize) -> Option<&IdentityToken> {
        self.identities.get(&node)
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let shortcut_count = self.shortcuts.as_ref().map_or(0, BTreeMap::len);
        let mut map = serializer.serialize_map(Some(
            1 + self.cells.len() + shortcut_count + usize::from(self.irods_path.is_some()),
        ))?;
        map.serialize_entry(ROW_NUM_FIELD, &self.row_num)?;
        for (col, cell) in self.cells.iter().enumerate() {
            map.serialize_entry(&format!("col{col}"), cell)?;
        }
        if let Some(shortcuts) = &self.shortcuts {
            for (key, link) in shortcuts {
                map.serialize_entry(&format!("{SHORTCUT_FIELD_PREFIX}{key}"), link)?;
            }
        }
        if let Some(path) = &self.irods_path {
            map.serialize_entry(IRODS_LINKS_FIELD, path)?;
        }
        map.end()
    }
}

pub fn build_rows(
    table: &Table,
    layout: &ColumnLayout,
    ctx: &GridContext<'_>,
) -> Result<Vec<RowRecord>> {
    table.check_shape()?;
    // Layouts built from another table must not index past its columns.
    if let Some(col) = layout
        .leaves()
        .filter_map(|leaf| leaf.col)
        .find(|&col| col >= table.column_count())
    {
        return Err(GridError::ColumnOutOfRange { col });
    }
    let nodes = table.nodes();
    let merge_shortcuts = !ctx.is_edit() && !ctx.is_assay();
    let merge_irods = !ctx.is_edit() && ctx.is_assay() && ctx.settings.irods_links;

    let records = table
        .table_data
        .iter()
        .enumerate()
        .map(|(row, source)| {
            let mut cells = source.clone();
            let identities = row_identities(table, row);
            for node in &nodes {
                let Some(token) = identities.get(&node.index) else {
                    continue;
                };
                for cell in &mut cells[node.columns.clone()] {
                    cell.identity_token = Some(token.clone());
                }
            }

            for leaf in layout.leaves() {
                let Some(col) = leaf.col else { continue };
                let cell = &mut cells[col];
                let col_type = table.field_header[col].col_type;
                cell.col_type = Some(col_type);
                cell.editable = leaf.editable && (!leaf.sample_column || cell.is_new_row);
                match col_type {
                    ColType::Ontology => {
                        cell.links = ontology_links(cell.value.terms(), ctx.settings);
                    }
                    ColType::Contact => cell.links = contact_links(cell),
                    _ => {}
                }
            }

            RowRecord {
                row_num: row + 1,
                cells,
                identities,
                shortcuts: table
                    .shortcuts
                    .as_ref()
                    .filter(|_| merge_shortcuts)
                    .and_then(|shortcuts| shortcuts.data.get(row).cloned()),
                irods_path: table
                    .irods_paths
                    .as_ref()
                    .filter(|_| merge_irods)
                    .and_then(|paths| paths.get(row).cloned()),
            }
        })
        .collect();
    Ok(records)
}

/// Identity token of each node of a row, taken from the first cell of the
/// node that carries one.
pub fn row_identities(table: &Table, row: usize) -> NodeIdentities {
    let Some(cells) = table.table_data.get(row) else {
        return NodeIdentities::new();
    };
    table
        .nodes()
        .into_iter()
        .filter_map(|node| {
            let token = cells
                .get(node.columns)?
                .iter()
                .find_map(|cell| cell.identity_token.clone())?;
            Some((node.index, token))
        })
        .collect()
}

/// Lookup link of one ontology term, `None` when no URL template is set.
///
/// Accessions matching the skip list already are links and are used as-is.
pub fn ontology_link(term: &OntologyTerm, settings: &GridSettings) -> Option<String> {
    let template = settings.ontology_url_template.as_deref()?;
    if term.accession.is_empty() {
        return Some(String::new());
    }
    if settings
        .ontology_url_skip
        .iter()
        .any(|skip| term.accession.contains(skip.as_str()))
    {
        return Some(term.accession.clone());
    }
    let ontology_name = match term.ontology_name.as_str() {
        "HP" => "HPO",
        name => name,
    };
    Some(
        template
            .replace("{ontology_name}", ontology_name)
            .replace("{accession}", &encode_uri_component(&term.accession)),
    )
}

pub fn ontology_links(terms: &[OntologyTerm], settings: &GridSettings) -> Vec<String> {
    terms
        .iter()
        .filter_map(|term| ontology_link(term, settings))
        .collect()
}

fn contact_links(cell: &Cell) -> Vec<String> {
    cell.value
        .items()
        .into_iter()
        .filter_map(Contact::parse)
        .filter_map(|contact| contact.mailto())
        .collect()
}

/// Percent-encode everything except the URI-component unreserved set.
fn encode_uri_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(
            encode_uri_component("http://purl.obolibrary.org/obo/HP_0000118"),
            "http%3A%2F%2Fpurl.obolibrary.org%2Fobo%2FHP_0000118"
        );
        assert_eq!(encode_uri_component("a b&c"), "a%20b%26c");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }
}
