//! Grid settings.
//!
//! Loaded from a TOML file; every key is optional.
//!
//! ```toml
//! min_col_width = 100
//! max_col_width = 300
//! ontology_url_template = "https://bioportal.bioontology.org/ontologies/{ontology_name}/?p=classes&conceptid={accession}"
//! ontology_url_skip = ["bioontology.org", "WEBSITE"]
//! irods_links = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

pub const DEFAULT_ONTOLOGY_URL_TEMPLATE: &str =
    "https://bioportal.bioontology.org/ontologies/{ontology_name}/?p=classes&conceptid={accession}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub min_col_width: u32,
    pub max_col_width: u32,
    /// Minimum width of external link columns.
    pub external_links_min_width: u32,
    pub row_num_width: u32,
    /// Show iRODS collection links in assay tables.
    pub irods_links: bool,
    /// Lookup URL with `{ontology_name}` and `{accession}` placeholders.
    pub ontology_url_template: Option<String>,
    /// Accessions containing any of these are linked as-is.
    pub ontology_url_skip: Vec<String>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            min_col_width: 100,
            max_col_width: 300,
            external_links_min_width: 150,
            row_num_width: 60,
            irods_links: true,
            ontology_url_template: Some(DEFAULT_ONTOLOGY_URL_TEMPLATE.to_string()),
            ontology_url_skip: vec!["bioontology.org".to_string(), "WEBSITE".to_string()],
        }
    }
}

impl GridSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GridError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn without_ontology_links(mut self) -> Self {
        self.ontology_url_template = None;
        self
    }
}
