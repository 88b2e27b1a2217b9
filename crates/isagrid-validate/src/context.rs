use isagrid_model::{FieldEditConfig, FieldSchema, ObjectRef, OntologyTerm};

/// Proposed change coming from a cell editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditInput {
    /// Free text from a plain editor; `;` separates list elements.
    Text(String),
    /// Numeric value and unit from the unit editor.
    Unit { value: String, unit: Option<String> },
    /// Unit selector changed while the value stays untouched.
    UnitOnly(Option<String>),
    /// Term list committed from the ontology term list editor.
    Terms(Vec<OntologyTerm>),
    /// Object picked from a reference selector, by UUID or name.
    Reference(String),
}

impl EditInput {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EditInput::Text(_) => "text",
            EditInput::Unit { .. } => "unit",
            EditInput::UnitOnly(_) => "unit selection",
            EditInput::Terms(_) => "term list",
            EditInput::Reference(_) => "reference",
        }
    }
}

/// Column the edit targets, resolved from the column layout.
#[derive(Debug, Clone, Copy)]
pub struct EditTarget<'a> {
    pub schema: &'a FieldSchema,
    pub config: Option<&'a FieldEditConfig>,
    pub editable: bool,
    /// Sample name column of an assay table, edited by picking a sample.
    pub sample_column: bool,
}

impl<'a> EditTarget<'a> {
    pub fn new(schema: &'a FieldSchema, config: Option<&'a FieldEditConfig>) -> Self {
        Self {
            schema,
            config,
            editable: true,
            sample_column: false,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn sample_column(mut self) -> Self {
        self.sample_column = true;
        self
    }
}

/// Lookups needed by reference validators.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    pub protocols: &'a [ObjectRef],
    pub samples: &'a [ObjectRef],
    /// The edited row is the unsaved new row.
    pub new_row: bool,
}

impl<'a> ValidationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_protocols(mut self, protocols: &'a [ObjectRef]) -> Self {
        self.protocols = protocols;
        self
    }

    pub fn with_samples(mut self, samples: &'a [ObjectRef]) -> Self {
        self.samples = samples;
        self
    }

    pub fn for_new_row(mut self, new_row: bool) -> Self {
        self.new_row = new_row;
        self
    }
}
