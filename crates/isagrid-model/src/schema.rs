use serde::{Deserialize, Serialize};

use crate::ColType;

/// Entity class owning a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObjectClass {
    #[default]
    GenericMaterial,
    Process,
}

/// Material subtype of a `GenericMaterial` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Source,
    Material,
    Sample,
    Data,
}

/// Type contract of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Header label shown in the grid.
    pub value: String,
    /// Name used to match configuration entries; falls back to `value`.
    #[serde(default)]
    pub name: String,
    /// Field kind, e.g. `characteristics` or `parameter_values`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub obj_cls: ObjectClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(default)]
    pub col_type: ColType,
    #[serde(default)]
    pub max_value_len: usize,
    #[serde(default)]
    pub num_col: bool,
}

impl FieldSchema {
    pub fn new(value: impl Into<String>, col_type: ColType) -> Self {
        Self {
            value: value.into(),
            name: String::new(),
            field_type: None,
            obj_cls: ObjectClass::GenericMaterial,
            item_type: None,
            col_type,
            max_value_len: 0,
            num_col: false,
        }
    }

    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    pub fn with_item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    pub fn process(mut self) -> Self {
        self.obj_cls = ObjectClass::Process;
        self.item_type = None;
        self
    }

    pub fn with_max_len(mut self, max_value_len: usize) -> Self {
        self.max_value_len = max_value_len;
        self
    }

    pub fn config_name(&self) -> &str {
        if self.name.is_empty() {
            &self.value
        } else {
            &self.name
        }
    }

    pub fn is_identity(&self) -> bool {
        self.col_type.is_identity()
    }

    /// Name columns of materials must never be empty; process names may be.
    pub fn requires_name(&self) -> bool {
        self.col_type == ColType::Name && self.obj_cls == ObjectClass::GenericMaterial
    }

    pub fn is_sample_name(&self) -> bool {
        self.col_type == ColType::Name && self.item_type == Some(ItemType::Sample)
    }
}

/// Node-group descriptor from the table's top header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopHeaderGroup {
    pub value: String,
    #[serde(default)]
    pub colour: String,
    pub colspan: usize,
    /// Continues the previous group's node instead of starting a new one.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub split: bool,
}

impl TopHeaderGroup {
    pub fn new(value: impl Into<String>, colour: impl Into<String>, colspan: usize) -> Self {
        Self {
            value: value.into(),
            colour: colour.into(),
            colspan,
            split: false,
        }
    }

    pub fn split(mut self) -> Self {
        self.split = true;
        self
    }

    pub fn is_sample(&self) -> bool {
        self.value.eq_ignore_ascii_case("sample")
    }
}

/// Existing object a reference cell can point at (protocol or sample).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub uuid: String,
    pub name: String,
}

impl ObjectRef {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}
