//! Per-column-type validators.
//!
//! Every validator takes the proposed input and the current cell and returns
//! the replacement cell. Metadata of the current cell (identity token, unit,
//! new-row flag) is carried over unless the edit replaces it.

use chrono::NaiveDate;
use regex::Regex;

use isagrid_model::{Cell, CellValue, EMPTY_MARKER, EditFormat, ObjectRef};

use crate::contact::Contact;
use crate::context::{EditInput, EditTarget, ValidationContext};
use crate::rejection::Rejection;

pub type ValidateFn = fn(
    &EditInput,
    &Cell,
    &EditTarget<'_>,
    &ValidationContext<'_>,
) -> Result<Cell, Rejection>;

pub(crate) fn validate_name(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    _ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    let raw = text_input(input, target)?;
    let value = normalize_empty(raw);
    if value.contains(';') {
        return Err(Rejection::ListNotAllowed);
    }
    if value.is_empty() {
        if target.schema.requires_name() {
            return Err(Rejection::EmptyName);
        }
        return Ok(replace_value(current, CellValue::empty()));
    }
    check_pattern(target, value)?;
    Ok(replace_value(current, CellValue::Text(value.to_string())))
}

/// Plain string columns (text, external links, file links).
pub(crate) fn validate_string(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    _ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    let items = split_items(text_input(input, target)?);
    for item in &items {
        check_pattern(target, item)?;
    }
    Ok(replace_value(current, CellValue::from_items(items)))
}

pub(crate) fn validate_contact(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    _ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    let mut contacts = Vec::new();
    for item in split_items(text_input(input, target)?) {
        check_pattern(target, &item)?;
        let contact = Contact::parse(&item).ok_or(Rejection::InvalidContact { value: item })?;
        contacts.push(contact.to_string());
    }
    Ok(replace_value(current, CellValue::from_items(contacts)))
}

pub(crate) fn validate_date(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    _ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    let items = split_items(text_input(input, target)?);
    for item in &items {
        if parse_date(item).is_none() {
            return Err(Rejection::InvalidDate {
                value: item.clone(),
            });
        }
        check_pattern(target, item)?;
    }
    Ok(replace_value(current, CellValue::from_items(items)))
}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(idx, byte)| idx == 4 || idx == 7 || byte.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub(crate) fn validate_numeric(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    _ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    let items = split_items(text_input(input, target)?);
    check_numbers(target, &items)?;
    Ok(replace_value(current, CellValue::from_items(items)))
}

pub(crate) fn validate_unit(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    _ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    let (raw, unit) = match input {
        EditInput::Text(value) => (value.as_str(), current.unit.clone()),
        EditInput::Unit { value, unit } => (value.as_str(), unit.clone()),
        EditInput::UnitOnly(unit) => {
            let unit = check_unit(target, unit.as_deref())?;
            let mut cell = current.clone();
            cell.unit = unit;
            return Ok(cell);
        }
        other => return Err(unsupported(target, other)),
    };
    let items = split_items(raw);
    check_numbers(target, &items)?;
    let unit = check_unit(target, unit.as_deref())?;
    let mut cell = replace_value(current, CellValue::from_items(items));
    cell.unit = unit;
    Ok(cell)
}

pub(crate) fn validate_select(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    _ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    let value = normalize_empty(text_input(input, target)?);
    if value.is_empty() {
        return Ok(replace_value(current, CellValue::empty()));
    }
    let allowed = target
        .config
        .is_some_and(|config| config.options.iter().any(|option| option == value));
    if !allowed {
        return Err(Rejection::NotAnOption {
            value: value.to_string(),
        });
    }
    Ok(replace_value(current, CellValue::Text(value.to_string())))
}

/// Protocol columns, and the sample column of an assay's new row.
pub(crate) fn validate_reference(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    let raw = match input {
        EditInput::Reference(value) | EditInput::Text(value) => value.as_str(),
        other => return Err(unsupported(target, other)),
    };
    let (candidates, kind) = if target.sample_column {
        if !ctx.new_row {
            return Err(Rejection::NotEditable);
        }
        (ctx.samples, "sample")
    } else {
        (ctx.protocols, "protocol")
    };
    let wanted = normalize_empty(raw);
    if wanted.is_empty() && !target.schema.requires_name() && !target.sample_column {
        let mut cell = replace_value(current, CellValue::empty());
        cell.reference = None;
        return Ok(cell);
    }
    let object = resolve_reference(candidates, wanted).ok_or(Rejection::UnknownReference {
        value: wanted.to_string(),
        kind: kind.to_string(),
    })?;
    let mut cell = replace_value(current, CellValue::Text(object.name.clone()));
    cell.reference = Some(object.uuid.clone());
    Ok(cell)
}

fn resolve_reference<'a>(candidates: &'a [ObjectRef], wanted: &str) -> Option<&'a ObjectRef> {
    candidates
        .iter()
        .find(|object| object.uuid == wanted)
        .or_else(|| candidates.iter().find(|object| object.name == wanted))
}

pub(crate) fn validate_ontology(
    input: &EditInput,
    current: &Cell,
    target: &EditTarget<'_>,
    _ctx: &ValidationContext<'_>,
) -> Result<Cell, Rejection> {
    let terms = match input {
        EditInput::Terms(terms) => terms,
        EditInput::Text(_) => return Err(Rejection::TermEditorRequired),
        other => return Err(unsupported(target, other)),
    };
    if let Some(config) = target.config {
        for term in terms {
            if !config.allows_ontology(&term.ontology_name) {
                return Err(Rejection::OntologyNotAllowed {
                    ontology: term.ontology_name.clone(),
                });
            }
        }
    }
    let mut cell = replace_value(current, CellValue::Terms(terms.clone()));
    cell.links.clear();
    Ok(cell)
}

fn text_input<'i>(input: &'i EditInput, target: &EditTarget<'_>) -> Result<&'i str, Rejection> {
    match input {
        EditInput::Text(value) => Ok(value),
        other => Err(unsupported(target, other)),
    }
}

fn unsupported(target: &EditTarget<'_>, input: &EditInput) -> Rejection {
    Rejection::UnsupportedInput {
        col_type: target.schema.col_type,
        input: input.kind().to_string(),
    }
}

/// Trim input and map the literal empty marker to an empty string.
fn normalize_empty(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed == EMPTY_MARKER { "" } else { trimmed }
}

/// Split `;`-delimited input into trimmed, non-empty elements.
pub fn split_items(raw: &str) -> Vec<String> {
    let raw = normalize_empty(raw);
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn replace_value(current: &Cell, value: CellValue) -> Cell {
    Cell {
        value,
        ..current.clone()
    }
}

fn check_pattern(target: &EditTarget<'_>, value: &str) -> Result<(), Rejection> {
    let Some(pattern) = target
        .config
        .and_then(|config| config.regex.as_deref())
        .filter(|pattern| !pattern.is_empty())
    else {
        return Ok(());
    };
    let regex = Regex::new(pattern).map_err(|_| Rejection::InvalidPattern {
        pattern: pattern.to_string(),
    })?;
    if regex.is_match(value) {
        Ok(())
    } else {
        Err(Rejection::PatternMismatch {
            value: value.to_string(),
            pattern: pattern.to_string(),
        })
    }
}

/// Every element must parse (as an integer for integer fields) and fall
/// within the inclusive range; one failure rejects the whole edit.
fn check_numbers(target: &EditTarget<'_>, items: &[String]) -> Result<(), Rejection> {
    let integer = target
        .config
        .is_some_and(|config| config.format == EditFormat::Integer);
    let range = target.config.and_then(|config| config.range);
    for item in items {
        let number = parse_number(item).ok_or_else(|| Rejection::NotNumeric {
            value: item.clone(),
        })?;
        if integer && item.parse::<i64>().is_err() {
            return Err(Rejection::NotInteger {
                value: item.clone(),
            });
        }
        if let Some(range) = range
            && !range.contains(number)
        {
            return Err(Rejection::OutOfRange {
                value: item.clone(),
                min: range.min(),
                max: range.max(),
            });
        }
        check_pattern(target, item)?;
    }
    Ok(())
}

/// Parse a finite decimal number; rejects `NaN`, `inf` and friends.
pub fn parse_number(value: &str) -> Option<f64> {
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'));
    if !valid_chars {
        return None;
    }
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn check_unit(target: &EditTarget<'_>, unit: Option<&str>) -> Result<Option<String>, Rejection> {
    let Some(unit) = unit.map(str::trim).filter(|unit| !unit.is_empty()) else {
        return Ok(None);
    };
    let units = target.config.map(|config| config.units.as_slice()).unwrap_or(&[]);
    if !units.iter().any(|allowed| allowed == unit) {
        return Err(Rejection::InvalidUnit {
            unit: unit.to_string(),
        });
    }
    Ok(Some(unit.to_string()))
}
