//! Grid context.
//!
//! Everything a builder or validator needs about the surrounding session is
//! passed in explicitly through [`GridContext`]; nothing is read from global
//! state.

use isagrid_model::{DisplayConfig, EditConfig, ObjectRef};
use isagrid_validate::ValidationContext;

use crate::settings::GridSettings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GridMode {
    #[default]
    View,
    Edit,
}

#[derive(Debug, Clone, Copy)]
pub struct GridContext<'a> {
    pub mode: GridMode,
    pub study_uuid: &'a str,
    /// Set when the grid shows an assay table.
    pub assay_uuid: Option<&'a str>,
    pub display_config: Option<&'a DisplayConfig>,
    /// Present only in edit mode.
    pub edit_config: Option<&'a EditConfig>,
    pub settings: &'a GridSettings,
    pub protocols: &'a [ObjectRef],
    pub samples: &'a [ObjectRef],
}

impl<'a> GridContext<'a> {
    pub fn view(study_uuid: &'a str, settings: &'a GridSettings) -> Self {
        Self {
            mode: GridMode::View,
            study_uuid,
            assay_uuid: None,
            display_config: None,
            edit_config: None,
            settings,
            protocols: &[],
            samples: &[],
        }
    }

    /// Switch to edit mode with the study's edit configuration.
    pub fn edit(mut self, edit_config: &'a EditConfig) -> Self {
        self.mode = GridMode::Edit;
        self.edit_config = Some(edit_config);
        self
    }

    pub fn for_assay(mut self, assay_uuid: &'a str) -> Self {
        self.assay_uuid = Some(assay_uuid);
        self
    }

    pub fn with_display(mut self, display_config: &'a DisplayConfig) -> Self {
        self.display_config = Some(display_config);
        self
    }

    pub fn with_protocols(mut self, protocols: &'a [ObjectRef]) -> Self {
        self.protocols = protocols;
        self
    }

    pub fn with_samples(mut self, samples: &'a [ObjectRef]) -> Self {
        self.samples = samples;
        self
    }

    pub fn is_edit(&self) -> bool {
        self.mode == GridMode::Edit
    }

    pub fn is_assay(&self) -> bool {
        self.assay_uuid.is_some()
    }

    pub fn validation_context(&self, new_row: bool) -> ValidationContext<'a> {
        ValidationContext::new()
            .with_protocols(self.protocols)
            .with_samples(self.samples)
            .for_new_row(new_row)
    }
}
