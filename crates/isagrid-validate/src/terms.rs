//! Ontology term list editor.
//!
//! Edits the ordered term list of one ontology cell. While a term is being
//! edited in place, every other list mutation is disabled, as are the term
//! search controls except the search input itself.

use serde::Serialize;
use thiserror::Error;

use isagrid_model::OntologyTerm;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermEditError {
    #[error("another term is being edited")]
    EditInProgress,
    #[error("no term is being edited")]
    NotEditing,
    #[error("term index {index} is out of range")]
    IndexOutOfRange { index: usize },
    #[error("term name is required")]
    EmptyName,
    #[error("ontology '{ontology}' is not allowed for this field")]
    OntologyNotAllowed { ontology: String },
    #[error("accession '{accession}' is not a URL")]
    InvalidAccession { accession: String },
}

/// Free-text term entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermInput {
    pub name: String,
    pub ontology_name: String,
    pub accession: String,
}

impl TermInput {
    pub fn new(
        name: impl Into<String>,
        ontology_name: impl Into<String>,
        accession: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ontology_name: ontology_name.into(),
            accession: accession.into(),
        }
    }
}

/// Enabled state of the controls of one list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRowControls {
    pub move_up: bool,
    pub move_down: bool,
    pub delete: bool,
    pub edit: bool,
}

/// Enabled state of every editor control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorControls {
    pub rows: Vec<TermRowControls>,
    pub insert: bool,
    pub search_input: bool,
    pub search_ontology_select: bool,
    pub search_results: bool,
    pub commit: bool,
}

#[derive(Debug, Clone)]
pub struct TermListEditor {
    original: Vec<OntologyTerm>,
    terms: Vec<OntologyTerm>,
    allowed_ontologies: Vec<String>,
    editing: Option<usize>,
}

impl TermListEditor {
    /// Open the editor on a cell's term list.
    pub fn open(terms: Vec<OntologyTerm>, allowed_ontologies: Vec<String>) -> Self {
        Self {
            original: terms.clone(),
            terms,
            allowed_ontologies,
            editing: None,
        }
    }

    pub fn terms(&self) -> &[OntologyTerm] {
        &self.terms
    }

    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    pub fn is_dirty(&self) -> bool {
        self.terms != self.original
    }

    /// Commit is possible only when the list changed since the editor opened.
    pub fn can_commit(&self) -> bool {
        self.editing.is_none() && self.is_dirty()
    }

    /// Hand the edited list over for validation; `None` when nothing changed.
    pub fn commit(self) -> Option<Vec<OntologyTerm>> {
        self.can_commit().then_some(self.terms)
    }

    pub fn is_allowed(&self, ontology_name: &str) -> bool {
        self.allowed_ontologies
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ontology_name))
    }

    pub fn can_move_up(&self, index: usize) -> bool {
        self.editing.is_none() && index > 0 && index < self.terms.len()
    }

    pub fn can_move_down(&self, index: usize) -> bool {
        self.editing.is_none() && index + 1 < self.terms.len()
    }

    /// Whether a free-text entry would be accepted right now.
    pub fn can_insert(&self, input: &TermInput) -> bool {
        self.editing.is_none() && self.check_input(input).is_ok()
    }

    pub fn controls(&self) -> EditorControls {
        let idle = self.editing.is_none();
        let rows = (0..self.terms.len())
            .map(|index| TermRowControls {
                move_up: self.can_move_up(index),
                move_down: self.can_move_down(index),
                delete: idle,
                edit: idle,
            })
            .collect();
        EditorControls {
            rows,
            insert: idle,
            search_input: true,
            search_ontology_select: idle,
            search_results: idle,
            commit: self.can_commit(),
        }
    }

    /// Swap a term with its predecessor; a no-op for the first term.
    pub fn move_up(&mut self, index: usize) -> Result<(), TermEditError> {
        self.ensure_idle()?;
        self.ensure_index(index)?;
        if index > 0 {
            self.terms.swap(index - 1, index);
        }
        Ok(())
    }

    /// Swap a term with its successor; a no-op for the last term.
    pub fn move_down(&mut self, index: usize) -> Result<(), TermEditError> {
        self.ensure_idle()?;
        self.ensure_index(index)?;
        if index + 1 < self.terms.len() {
            self.terms.swap(index, index + 1);
        }
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<OntologyTerm, TermEditError> {
        self.ensure_idle()?;
        self.ensure_index(index)?;
        Ok(self.terms.remove(index))
    }

    /// Append a free-text term.
    pub fn insert(&mut self, input: TermInput) -> Result<(), TermEditError> {
        self.ensure_idle()?;
        let term = self.check_input(&input)?;
        self.terms.push(term);
        Ok(())
    }

    /// Append a term picked from the search results.
    ///
    /// Only the ontology allow-list applies; service accessions are kept as
    /// returned, CURIEs included.
    pub fn insert_search_result(&mut self, term: OntologyTerm) -> Result<(), TermEditError> {
        self.ensure_idle()?;
        if !self.is_allowed(&term.ontology_name) {
            return Err(TermEditError::OntologyNotAllowed {
                ontology: term.ontology_name,
            });
        }
        self.terms.push(term);
        Ok(())
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<&OntologyTerm, TermEditError> {
        self.ensure_idle()?;
        self.ensure_index(index)?;
        self.editing = Some(index);
        Ok(&self.terms[index])
    }

    /// Leave edit mode, updating the term when its values changed.
    ///
    /// Returns whether the list was modified.
    pub fn finish_edit(&mut self, input: TermInput) -> Result<bool, TermEditError> {
        let index = self.editing.ok_or(TermEditError::NotEditing)?;
        let term = self.check_input(&input)?;
        self.editing = None;
        if self.terms[index] == term {
            return Ok(false);
        }
        self.terms[index] = term;
        Ok(true)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    fn check_input(&self, input: &TermInput) -> Result<OntologyTerm, TermEditError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(TermEditError::EmptyName);
        }
        let ontology_name = input.ontology_name.trim();
        if !self.is_allowed(ontology_name) {
            return Err(TermEditError::OntologyNotAllowed {
                ontology: ontology_name.to_string(),
            });
        }
        let accession = input.accession.trim();
        if !accession.is_empty()
            && !(accession.starts_with("http://") || accession.starts_with("https://"))
        {
            return Err(TermEditError::InvalidAccession {
                accession: accession.to_string(),
            });
        }
        Ok(OntologyTerm::new(name, ontology_name, accession))
    }

    fn ensure_idle(&self) -> Result<(), TermEditError> {
        if self.editing.is_some() {
            return Err(TermEditError::EditInProgress);
        }
        Ok(())
    }

    fn ensure_index(&self, index: usize) -> Result<(), TermEditError> {
        if index >= self.terms.len() {
            return Err(TermEditError::IndexOutOfRange { index });
        }
        Ok(())
    }
}
