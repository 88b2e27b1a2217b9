//! Display and edit configuration documents.
//!
//! Both documents share one layout: per study UUID a list of node entries, each
//! holding per-field entries, plus the same structure nested per assay UUID for
//! the assay-local nodes. Field entries are addressed by position, so a field
//! list may contain `null` holes.
//!
//! ```text
//! {"studies": {"<study>": {"nodes": [{"fields": [..]}],
//!                          "assays": {"<assay>": {"nodes": [..]}}}}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Entries that are matched to schema fields by name.
pub trait NamedField {
    fn name(&self) -> &str;
}

/// Position of a field inside a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTarget {
    pub study: String,
    #[serde(default)]
    pub assay: Option<String>,
    pub node_index: usize,
    pub field_index: usize,
}

impl FieldTarget {
    pub fn study(study: impl Into<String>, node_index: usize, field_index: usize) -> Self {
        Self {
            study: study.into(),
            assay: None,
            node_index,
            field_index,
        }
    }

    pub fn assay(
        study: impl Into<String>,
        assay: impl Into<String>,
        node_index: usize,
        field_index: usize,
    ) -> Self {
        Self {
            study: study.into(),
            assay: Some(assay.into()),
            node_index,
            field_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig<F> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default = "Vec::new")]
    pub fields: Vec<Option<F>>,
}

impl<F> Default for NodeConfig<F> {
    fn default() -> Self {
        Self {
            header: None,
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssayConfig<F> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<NodeConfig<F>>,
}

impl<F> Default for AssayConfig<F> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyConfig<F> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "Vec::new")]
    pub nodes: Vec<NodeConfig<F>>,
    #[serde(default = "BTreeMap::new")]
    pub assays: BTreeMap<String, AssayConfig<F>>,
}

impl<F> Default for StudyConfig<F> {
    fn default() -> Self {
        Self {
            name: None,
            nodes: Vec::new(),
            assays: BTreeMap::new(),
        }
    }
}

/// Configuration document keyed by study UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig<F> {
    #[serde(default = "BTreeMap::new")]
    pub studies: BTreeMap<String, StudyConfig<F>>,
}

impl<F> Default for SheetConfig<F> {
    fn default() -> Self {
        Self {
            studies: BTreeMap::new(),
        }
    }
}

impl<F> SheetConfig<F> {
    /// Node entries of a study, or of one of its assays.
    pub fn nodes(&self, study: &str, assay: Option<&str>) -> Option<&[NodeConfig<F>]> {
        let study = self.studies.get(study)?;
        match assay {
            None => Some(study.nodes.as_slice()),
            Some(assay) => study.assays.get(assay).map(|a| a.nodes.as_slice()),
        }
    }

    pub fn node_count(&self, study: &str, assay: Option<&str>) -> usize {
        self.nodes(study, assay).map_or(0, <[NodeConfig<F>]>::len)
    }

    pub fn field(&self, target: &FieldTarget) -> Option<&F> {
        self.nodes(&target.study, target.assay.as_deref())?
            .get(target.node_index)?
            .fields
            .get(target.field_index)?
            .as_ref()
    }

    pub fn field_mut(&mut self, target: &FieldTarget) -> Option<&mut F> {
        let study = self.studies.get_mut(&target.study)?;
        let nodes = match target.assay.as_deref() {
            None => &mut study.nodes,
            Some(assay) => &mut study.assays.get_mut(assay)?.nodes,
        };
        nodes
            .get_mut(target.node_index)?
            .fields
            .get_mut(target.field_index)?
            .as_mut()
    }

    /// Store an entry at its exact position, creating missing studies, assays,
    /// nodes and empty field slots.
    pub fn set_field(&mut self, target: &FieldTarget, field: F) {
        let study = self.studies.entry(target.study.clone()).or_default();
        let nodes = match target.assay.as_deref() {
            None => &mut study.nodes,
            Some(assay) => &mut study.assays.entry(assay.to_string()).or_default().nodes,
        };
        if nodes.len() <= target.node_index {
            nodes.resize_with(target.node_index + 1, NodeConfig::default);
        }
        let fields = &mut nodes[target.node_index].fields;
        if fields.len() <= target.field_index {
            fields.resize_with(target.field_index + 1, || None);
        }
        fields[target.field_index] = Some(field);
    }

    /// Clear an entry in place, returning it when present.
    ///
    /// Entries after it keep their indices.
    pub fn remove_field(&mut self, target: &FieldTarget) -> Option<F> {
        let study = self.studies.get_mut(&target.study)?;
        let nodes = match target.assay.as_deref() {
            None => &mut study.nodes,
            Some(assay) => &mut study.assays.get_mut(assay)?.nodes,
        };
        nodes
            .get_mut(target.node_index)?
            .fields
            .get_mut(target.field_index)?
            .take()
    }
}

impl<F: NamedField> SheetConfig<F> {
    /// Entry at a position, only if its name matches the schema field name.
    pub fn matching_field(&self, target: &FieldTarget, name: &str) -> Option<&F> {
        self.field(target).filter(|field| field.name() == name)
    }
}

/// Visibility entry of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayField {
    pub name: String,
    pub visible: bool,
}

impl NamedField for DisplayField {
    fn name(&self) -> &str {
        &self.name
    }
}

pub type DisplayConfig = SheetConfig<DisplayField>;

/// Edit format of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditFormat {
    #[default]
    String,
    Integer,
    Double,
    Select,
    Protocol,
}

/// Inclusive numeric bounds, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange(pub f64, pub f64);

impl ValueRange {
    pub fn min(&self) -> f64 {
        self.0
    }

    pub fn max(&self) -> f64 {
        self.1
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.0 && value <= self.1
    }
}

/// Edit contract of one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEditConfig {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub format: EditFormat,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, rename = "unit", skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_default: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ontologies: Vec<String>,
}

impl FieldEditConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            editable: true,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    pub fn with_format(mut self, format: EditFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(ValueRange(min, max));
        self
    }

    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = Some(regex.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_units<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.units = units.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ontologies<I, S>(mut self, ontologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ontologies = ontologies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn allows_ontology(&self, ontology_name: &str) -> bool {
        self.ontologies
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ontology_name))
    }
}

impl NamedField for FieldEditConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

pub type EditConfig = SheetConfig<FieldEditConfig>;
