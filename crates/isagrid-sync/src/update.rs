//! Config update wire format.
//!
//! ```json
//! {"document": "edit",
//!  "updates": [{"action": "update", "study": "s1", "assay": null,
//!               "nodeIndex": 0, "fieldIndex": 2, "config": {..}}]}
//! ```

use serde::{Deserialize, Serialize};

use isagrid_model::{DisplayConfig, DisplayField, EditConfig, FieldEditConfig, FieldTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigAction {
    Update,
    Insert,
    Delete,
}

/// Configuration document an update applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigDocument {
    Edit,
    Display,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate<F> {
    pub action: ConfigAction,
    pub study: String,
    pub assay: Option<String>,
    pub node_index: usize,
    pub field_index: usize,
    /// New entry; absent for deletes.
    pub config: Option<F>,
}

impl<F> ConfigUpdate<F> {
    pub fn new(action: ConfigAction, target: &FieldTarget, config: Option<F>) -> Self {
        Self {
            action,
            study: target.study.clone(),
            assay: target.assay.clone(),
            node_index: target.node_index,
            field_index: target.field_index,
            config,
        }
    }

    pub fn target(&self) -> FieldTarget {
        FieldTarget {
            study: self.study.clone(),
            assay: self.assay.clone(),
            node_index: self.node_index,
            field_index: self.field_index,
        }
    }
}

/// Updates sent to the backend in one request. Succeeds or fails as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "document", content = "updates", rename_all = "lowercase")]
pub enum ConfigUpdateBatch {
    Edit(Vec<ConfigUpdate<FieldEditConfig>>),
    Display(Vec<ConfigUpdate<DisplayField>>),
}

impl ConfigUpdateBatch {
    pub fn document(&self) -> ConfigDocument {
        match self {
            ConfigUpdateBatch::Edit(_) => ConfigDocument::Edit,
            ConfigUpdateBatch::Display(_) => ConfigDocument::Display,
        }
    }

    pub fn targets(&self) -> Vec<FieldTarget> {
        match self {
            ConfigUpdateBatch::Edit(updates) => updates.iter().map(ConfigUpdate::target).collect(),
            ConfigUpdateBatch::Display(updates) => {
                updates.iter().map(ConfigUpdate::target).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ConfigUpdateBatch::Edit(updates) => updates.len(),
            ConfigUpdateBatch::Display(updates) => updates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Both configuration documents as fetched from the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub edit_config: EditConfig,
    #[serde(default)]
    pub display_config: DisplayConfig,
}
