//! Tests for cell edit validation.

use proptest::prelude::*;

use isagrid_model::{
    Cell, CellValue, ColType, EditFormat, FieldEditConfig, FieldSchema, ItemType, ObjectRef,
    OntologyTerm,
};
use isagrid_validate::{
    EditInput, EditTarget, EditorKind, Rejection, ValidationContext, apply_edit, editor_for,
    effective_col_type, parse_date, render, split_items, validate_edit,
};

fn ctx() -> ValidationContext<'static> {
    ValidationContext::new()
}

// =========================================================================
// UNIT columns
// =========================================================================

fn age_config() -> FieldEditConfig {
    FieldEditConfig::new("Age")
        .with_format(EditFormat::Double)
        .with_range(0.0, 150.0)
        .with_units(["day", "year"])
}

#[test]
fn unit_out_of_range_keeps_prior_value() {
    let schema = FieldSchema::new("Age", ColType::Unit);
    let config = age_config();
    let target = EditTarget::new(&schema, Some(&config));
    let mut cell = Cell::text("90").with_unit("day");

    let rejected = apply_edit(
        &mut cell,
        &EditInput::Unit {
            value: "170".to_string(),
            unit: Some("day".to_string()),
        },
        &target,
        &ctx(),
    );
    assert!(matches!(rejected, Err(Rejection::OutOfRange { .. })));
    assert_eq!(cell.display(), "90 day");
}

#[test]
fn unit_list_input_becomes_list() {
    let schema = FieldSchema::new("Age", ColType::Unit);
    let config = age_config();
    let target = EditTarget::new(&schema, Some(&config));
    let mut cell = Cell::text("90").with_unit("day");

    apply_edit(
        &mut cell,
        &EditInput::Unit {
            value: "100;101".to_string(),
            unit: Some("day".to_string()),
        },
        &target,
        &ctx(),
    )
    .expect("list accepted");
    assert!(cell.value.is_list());
    insta::assert_snapshot!(cell.value.display(), @"100; 101");
}

#[test]
fn unit_only_change_keeps_value() {
    let schema = FieldSchema::new("Age", ColType::Unit);
    let config = age_config();
    let target = EditTarget::new(&schema, Some(&config));
    let mut cell = Cell::text("90").with_unit("day");

    apply_edit(
        &mut cell,
        &EditInput::UnitOnly(Some("year".to_string())),
        &target,
        &ctx(),
    )
    .expect("unit change accepted");
    assert_eq!(cell.display(), "90 year");

    let rejected = apply_edit(
        &mut cell,
        &EditInput::UnitOnly(Some("fortnight".to_string())),
        &target,
        &ctx(),
    );
    assert_eq!(
        rejected,
        Err(Rejection::InvalidUnit {
            unit: "fortnight".to_string()
        })
    );
    assert_eq!(cell.display(), "90 year");

    apply_edit(&mut cell, &EditInput::UnitOnly(None), &target, &ctx())
        .expect("no unit accepted");
    assert_eq!(cell.display(), "90");
}

#[test]
fn units_are_rejected_when_none_are_configured() {
    let schema = FieldSchema::new("Age", ColType::Unit);
    let config = FieldEditConfig::new("Age").with_format(EditFormat::Double);
    let target = EditTarget::new(&schema, Some(&config));
    let mut cell = Cell::text("90");

    let rejected = apply_edit(
        &mut cell,
        &EditInput::Unit {
            value: "91".to_string(),
            unit: Some("day".to_string()),
        },
        &target,
        &ctx(),
    );
    assert_eq!(
        rejected,
        Err(Rejection::InvalidUnit {
            unit: "day".to_string()
        })
    );
    assert_eq!(cell.display(), "90");

    apply_edit(
        &mut cell,
        &EditInput::Unit {
            value: "91".to_string(),
            unit: None,
        },
        &target,
        &ctx(),
    )
    .expect("value without unit accepted");
    assert_eq!(cell.display(), "91");
}

#[test]
fn one_bad_list_element_rejects_the_edit() {
    let schema = FieldSchema::new("Age", ColType::Unit);
    let config = age_config();
    let target = EditTarget::new(&schema, Some(&config));
    let current = Cell::text("90").with_unit("day");
    let result = validate_edit(&EditInput::text("10; abc; 12"), &current, &target, &ctx());
    assert_eq!(
        result,
        Err(Rejection::NotNumeric {
            value: "abc".to_string()
        })
    );
}

// =========================================================================
// Numeric ranges
// =========================================================================

proptest! {
    #[test]
    fn numeric_commits_iff_within_range(value in -50i32..250) {
        let schema = FieldSchema::new("Count", ColType::Numeric);
        let config = FieldEditConfig::new("Count")
            .with_format(EditFormat::Integer)
            .with_range(0.0, 150.0);
        let target = EditTarget::new(&schema, Some(&config));
        let result = validate_edit(
            &EditInput::text(value.to_string()),
            &Cell::default(),
            &target,
            &ctx(),
        );
        prop_assert_eq!(result.is_ok(), (0..=150).contains(&value));
    }

    #[test]
    fn fractional_bounds_are_inclusive(lo in -1000.0f64..1000.0, width in 0.0f64..500.0) {
        let hi = lo + width;
        let schema = FieldSchema::new("Dose", ColType::Numeric);
        let config = FieldEditConfig::new("Dose").with_range(lo, hi);
        let target = EditTarget::new(&schema, Some(&config));
        for bound in [lo, hi] {
            let result = validate_edit(
                &EditInput::text(bound.to_string()),
                &Cell::default(),
                &target,
                &ctx(),
            );
            prop_assert!(result.is_ok(), "bound {} rejected", bound);
        }
    }
}

#[test]
fn integer_format_rejects_fractions() {
    let schema = FieldSchema::new("Count", ColType::Numeric);
    let config = FieldEditConfig::new("Count").with_format(EditFormat::Integer);
    let target = EditTarget::new(&schema, Some(&config));
    let result = validate_edit(&EditInput::text("1.5"), &Cell::default(), &target, &ctx());
    assert_eq!(
        result,
        Err(Rejection::NotInteger {
            value: "1.5".to_string()
        })
    );
    for bad in ["NaN", "inf", "ten"] {
        let result = validate_edit(&EditInput::text(bad), &Cell::default(), &target, &ctx());
        assert!(matches!(result, Err(Rejection::NotNumeric { .. })), "{bad}");
    }
}

#[test]
fn text_column_with_numeric_format_validates_numbers() {
    let config = FieldEditConfig::new("Volume").with_format(EditFormat::Double);
    assert_eq!(
        effective_col_type(ColType::Text, Some(&config)),
        ColType::Numeric
    );
    assert_eq!(
        effective_col_type(ColType::Ontology, Some(&config)),
        ColType::Ontology
    );
    let schema = FieldSchema::new("Volume", ColType::Text);
    let target = EditTarget::new(&schema, Some(&config));
    let result = validate_edit(&EditInput::text("many"), &Cell::default(), &target, &ctx());
    assert!(matches!(result, Err(Rejection::NotNumeric { .. })));
}

// =========================================================================
// DATE columns
// =========================================================================

#[test]
fn invalid_dates_keep_prior_value() {
    let schema = FieldSchema::new("Collection date", ColType::Date);
    let target = EditTarget::new(&schema, None);
    let mut cell = Cell::text("2018-01-02");
    for bad in ["2018-13-02", "2018-02-32", "2018-02-30", "18-02-02", "2018-2-2"] {
        let result = apply_edit(&mut cell, &EditInput::text(bad), &target, &ctx());
        assert!(
            matches!(result, Err(Rejection::InvalidDate { .. })),
            "{bad} accepted"
        );
        assert_eq!(cell.display(), "2018-01-02");
    }
    apply_edit(&mut cell, &EditInput::text("2020-02-29"), &target, &ctx()).expect("leap day");
    assert_eq!(cell.display(), "2020-02-29");
}

proptest! {
    #[test]
    fn dates_commit_iff_calendar_valid(year in 1900i32..2100, month in 0u32..15, day in 0u32..34) {
        let value = format!("{year:04}-{month:02}-{day:02}");
        let valid = chrono::NaiveDate::from_ymd_opt(year, month, day).is_some();
        prop_assert_eq!(parse_date(&value).is_some(), valid);
    }
}

// =========================================================================
// SELECT columns
// =========================================================================

#[test]
fn select_accepts_options_and_empty_marker() {
    let schema = FieldSchema::new("Sex", ColType::Select);
    let config = FieldEditConfig::new("Sex").with_options(["female", "male"]);
    let target = EditTarget::new(&schema, Some(&config));
    let mut cell = Cell::text("female");

    let rejected = apply_edit(&mut cell, &EditInput::text("other"), &target, &ctx());
    assert_eq!(
        rejected,
        Err(Rejection::NotAnOption {
            value: "other".to_string()
        })
    );
    assert_eq!(cell.display(), "female");

    apply_edit(&mut cell, &EditInput::text("-"), &target, &ctx()).expect("empty marker");
    assert!(!cell.has_value());
    assert_eq!(render(ColType::Select, &cell), "-");

    apply_edit(&mut cell, &EditInput::text("male"), &target, &ctx()).expect("option");
    assert_eq!(cell.display(), "male");
}

// =========================================================================
// TEXT, NAME and CONTACT columns
// =========================================================================

#[test]
fn text_list_input_becomes_list() {
    let schema = FieldSchema::new("Instrument", ColType::Text);
    let target = EditTarget::new(&schema, None);
    let mut cell = Cell::text("scalpel");
    apply_edit(
        &mut cell,
        &EditInput::text("scalpel type A;scalpel type B"),
        &target,
        &ctx(),
    )
    .expect("text accepted");
    assert_eq!(
        cell.value,
        CellValue::List(vec![
            "scalpel type A".to_string(),
            "scalpel type B".to_string()
        ])
    );
    insta::assert_snapshot!(cell.display(), @"scalpel type A; scalpel type B");
}

#[test]
fn text_regex_applies_to_every_element() {
    let schema = FieldSchema::new("Barcode", ColType::Text);
    let config = FieldEditConfig::new("Barcode").with_regex("^[A-Z]{2}[0-9]+$");
    let target = EditTarget::new(&schema, Some(&config));
    assert!(validate_edit(&EditInput::text("AB1; CD22"), &Cell::default(), &target, &ctx()).is_ok());
    let result = validate_edit(&EditInput::text("AB1; cd22"), &Cell::default(), &target, &ctx());
    assert!(matches!(result, Err(Rejection::PatternMismatch { .. })));

    let broken = FieldEditConfig::new("Barcode").with_regex("([");
    let target = EditTarget::new(&schema, Some(&broken));
    let result = validate_edit(&EditInput::text("AB1"), &Cell::default(), &target, &ctx());
    assert!(matches!(result, Err(Rejection::InvalidPattern { .. })));
}

#[test]
fn material_names_are_required() {
    let source = FieldSchema::new("Name", ColType::Name);
    let target = EditTarget::new(&source, None);
    let current = Cell::text("s0");
    assert_eq!(
        validate_edit(&EditInput::text("  "), &current, &target, &ctx()),
        Err(Rejection::EmptyName)
    );
    assert_eq!(
        validate_edit(&EditInput::text("a;b"), &current, &target, &ctx()),
        Err(Rejection::ListNotAllowed)
    );

    let process = FieldSchema::new("Name", ColType::Name).process();
    let target = EditTarget::new(&process, None);
    let accepted = validate_edit(&EditInput::text(""), &current, &target, &ctx())
        .expect("process names may be empty");
    assert!(!accepted.has_value());
}

#[test]
fn contacts_normalize_annotation() {
    let schema = FieldSchema::new("Performer", ColType::Contact);
    let target = EditTarget::new(&schema, None);
    let accepted = validate_edit(
        &EditInput::text("Jane Doe [jane@example.org]; John"),
        &Cell::default(),
        &target,
        &ctx(),
    )
    .expect("contacts accepted");
    insta::assert_snapshot!(
        render(ColType::Contact, &accepted),
        @"Jane Doe <jane@example.org>; John"
    );
    let result = validate_edit(
        &EditInput::text("Jane Doe <not an email>"),
        &Cell::default(),
        &target,
        &ctx(),
    );
    assert!(matches!(result, Err(Rejection::InvalidContact { .. })));
}

#[test]
fn split_items_trims_and_drops_empty_elements() {
    assert_eq!(split_items(" a ;; b ; "), vec!["a", "b"]);
    assert!(split_items("-").is_empty());
    assert!(split_items("").is_empty());
}

// =========================================================================
// References, ontologies and editability
// =========================================================================

#[test]
fn protocol_reference_resolves_by_name_or_uuid() {
    let protocols = vec![
        ObjectRef::new("p-1", "sampling"),
        ObjectRef::new("p-2", "extraction"),
    ];
    let validation = ValidationContext::new().with_protocols(&protocols);
    let schema = FieldSchema::new("Protocol", ColType::Protocol).process();
    let target = EditTarget::new(&schema, None);
    let current = Cell::text("sampling");

    let by_name = validate_edit(
        &EditInput::Reference("extraction".to_string()),
        &current,
        &target,
        &validation,
    )
    .expect("by name");
    assert_eq!(by_name.reference.as_deref(), Some("p-2"));
    assert_eq!(by_name.display(), "extraction");

    let by_uuid = validate_edit(
        &EditInput::Reference("p-1".to_string()),
        &current,
        &target,
        &validation,
    )
    .expect("by uuid");
    assert_eq!(by_uuid.display(), "sampling");

    let unknown = validate_edit(
        &EditInput::Reference("freezing".to_string()),
        &current,
        &target,
        &validation,
    );
    assert!(matches!(unknown, Err(Rejection::UnknownReference { .. })));
}

#[test]
fn sample_column_accepts_samples_only_for_new_rows() {
    let samples = vec![ObjectRef::new("smp-1", "sample-1")];
    let schema = FieldSchema::new("Name", ColType::Name).with_item_type(ItemType::Sample);
    let target = EditTarget::new(&schema, None).sample_column();
    let input = EditInput::Reference("sample-1".to_string());

    let existing = ValidationContext::new().with_samples(&samples);
    assert_eq!(
        validate_edit(&input, &Cell::default(), &target, &existing),
        Err(Rejection::NotEditable)
    );

    let new_row = existing.for_new_row(true);
    let accepted = validate_edit(&input, &Cell::default(), &target, &new_row).expect("new row");
    assert_eq!(accepted.reference.as_deref(), Some("smp-1"));
}

#[test]
fn ontology_cells_take_term_lists_only() {
    let schema = FieldSchema::new("Organism", ColType::Ontology);
    let config = FieldEditConfig::new("Organism").with_ontologies(["NCBITAXON"]);
    let target = EditTarget::new(&schema, Some(&config));
    let current = Cell::terms(vec![]);

    assert_eq!(
        validate_edit(&EditInput::text("Homo sapiens"), &current, &target, &ctx()),
        Err(Rejection::TermEditorRequired)
    );
    let outside = EditInput::Terms(vec![OntologyTerm::new("blood", "UBERON", "")]);
    assert_eq!(
        validate_edit(&outside, &current, &target, &ctx()),
        Err(Rejection::OntologyNotAllowed {
            ontology: "UBERON".to_string()
        })
    );
    let inside = EditInput::Terms(vec![OntologyTerm::new("Homo sapiens", "NCBITAXON", "")]);
    let accepted = validate_edit(&inside, &current, &target, &ctx()).expect("allowed term");
    assert_eq!(accepted.display(), "Homo sapiens");
}

#[test]
fn read_only_columns_reject_every_edit() {
    let schema = FieldSchema::new("Notes", ColType::Text);
    let target = EditTarget::new(&schema, None).read_only();
    let mut cell = Cell::text("kept");
    let result = apply_edit(&mut cell, &EditInput::text("changed"), &target, &ctx());
    assert_eq!(result, Err(Rejection::NotEditable));
    assert_eq!(cell.display(), "kept");
    assert_eq!(Rejection::NotEditable.code(), "not_editable");
}

#[test]
fn editors_follow_column_type() {
    let select = FieldEditConfig::new("Sex").with_format(EditFormat::Select);
    assert_eq!(
        editor_for(ColType::Text, Some(&select), false, true),
        Some(EditorKind::Select)
    );
    assert_eq!(
        editor_for(ColType::Unit, None, false, true),
        Some(EditorKind::Unit)
    );
    assert_eq!(
        editor_for(ColType::Ontology, None, false, true),
        Some(EditorKind::Ontology)
    );
    assert_eq!(
        editor_for(ColType::Name, None, true, true),
        Some(EditorKind::ObjectReference)
    );
    assert_eq!(editor_for(ColType::Name, None, false, false), None);
}
