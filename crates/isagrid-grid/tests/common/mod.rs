//! Shared fixtures: one study with four node groups and one linked assay.

#![allow(dead_code)]

use isagrid_model::{
    Cell, ColType, EditConfig, EditFormat, FieldEditConfig, FieldSchema,
    FieldTarget, IdentityToken, ItemType, OntologyTerm, Table, TopHeaderGroup,
};

pub const STUDY: &str = "s1";
pub const ASSAY: &str = "a1";

pub fn token(value: &str) -> IdentityToken {
    IdentityToken::new(value).expect("token")
}

/// Source (Name, Organism) + split Characteristics (Age, Notes), Process
/// (Protocol, Performer), Sample (Name, Collection date). Notes and Performer
/// are empty in every row.
pub fn study_table() -> Table {
    let row = |source: &str, sample: &str, n: usize| {
        vec![
            Cell::text(source).with_token(token(&format!("src-{n}"))),
            Cell::terms(vec![OntologyTerm::new(
                "Homo sapiens",
                "NCBITAXON",
                "http://purl.obolibrary.org/obo/NCBITaxon_9606",
            )]),
            Cell::text("90").with_unit("day"),
            Cell::text(""),
            Cell::text("sampling").with_token(token(&format!("proc-{n}"))),
            Cell::text(""),
            Cell::text(sample).with_token(token(&format!("smp-{n}"))),
            Cell::text("2018-01-02"),
        ]
    };
    Table {
        top_header: vec![
            TopHeaderGroup::new("Source", "#f5f5f5", 2),
            TopHeaderGroup::new("Characteristics", "#f5f5f5", 2).split(),
            TopHeaderGroup::new("Process", "#e0e0e0", 2),
            TopHeaderGroup::new("Sample", "#fafafa", 2),
        ],
        field_header: vec![
            FieldSchema::new("Name", ColType::Name)
                .with_item_type(ItemType::Source)
                .with_max_len(8),
            FieldSchema::new("Organism", ColType::Ontology).with_type("characteristics"),
            FieldSchema::new("Age", ColType::Unit)
                .with_type("characteristics")
                .with_max_len(40),
            FieldSchema::new("Notes", ColType::Text).with_type("comment"),
            FieldSchema::new("Protocol", ColType::Protocol).process(),
            FieldSchema::new("Performer", ColType::Contact).process(),
            FieldSchema::new("Name", ColType::Name).with_item_type(ItemType::Sample),
            FieldSchema::new("Collection date", ColType::Date).with_type("characteristics"),
        ],
        table_data: vec![row("source-1", "sample-1", 1), row("source-2", "sample-2", 2)],
        col_last_visible: 7,
        shortcuts: None,
        irods_paths: None,
    }
}

/// Source, Process, Sample (the study section, repeating the study's node
/// chain), then Process (Protocol, Instrument) and Data File (Name, File).
/// Both rows use the first study sample.
pub fn assay_table() -> Table {
    let row = |n: usize| {
        vec![
            Cell::text("source-1").with_token(token("src-1")),
            Cell::text("sampling").with_token(token("proc-1")),
            Cell::text("sample-1").with_token(token("smp-1")),
            Cell::text("sequencing").with_token(token(&format!("ap-{n}"))),
            Cell::text("HiSeq"),
            Cell::text(format!("reads-{n}.fq")).with_token(token(&format!("df-{n}"))),
            Cell::text(format!("reads-{n}.fq")),
        ]
    };
    Table {
        top_header: vec![
            TopHeaderGroup::new("Source", "", 1),
            TopHeaderGroup::new("Process", "", 1),
            TopHeaderGroup::new("Sample", "", 1),
            TopHeaderGroup::new("Process", "", 2),
            TopHeaderGroup::new("Data File", "", 2),
        ],
        field_header: vec![
            FieldSchema::new("Name", ColType::Name).with_item_type(ItemType::Source),
            FieldSchema::new("Protocol", ColType::Protocol).process(),
            FieldSchema::new("Name", ColType::Name).with_item_type(ItemType::Sample),
            FieldSchema::new("Protocol", ColType::Protocol).process(),
            FieldSchema::new("Instrument", ColType::Text).with_type("parameter_values"),
            FieldSchema::new("Name", ColType::Name).with_item_type(ItemType::Data),
            FieldSchema::new("File", ColType::LinkFile).with_type("comment"),
        ],
        table_data: vec![row(1), row(2)],
        col_last_visible: 6,
        shortcuts: None,
        irods_paths: Some(vec!["/zone/a1/row1".to_string(), "/zone/a1/row2".to_string()]),
    }
}

pub fn edit_config() -> EditConfig {
    let mut config = EditConfig::default();
    let study = |node, field| FieldTarget::study(STUDY, node, field);
    let assay = |node, field| FieldTarget::assay(STUDY, ASSAY, node, field);

    config.set_field(&study(0, 0), FieldEditConfig::new("Name"));
    config.set_field(
        &study(0, 1),
        FieldEditConfig::new("Organism")
            .with_type("characteristics")
            .with_ontologies(["NCBITAXON"]),
    );
    let mut age = FieldEditConfig::new("Age")
        .with_type("characteristics")
        .with_format(EditFormat::Double)
        .with_range(0.0, 150.0)
        .with_units(["day", "year"]);
    age.unit_default = Some("day".to_string());
    config.set_field(&study(0, 2), age);
    config.set_field(
        &study(0, 3),
        FieldEditConfig::new("Notes").with_type("comment"),
    );
    config.set_field(&study(1, 0), FieldEditConfig::new("Protocol"));
    config.set_field(&study(1, 1), FieldEditConfig::new("Performer").read_only());
    config.set_field(
        &study(2, 0),
        FieldEditConfig::new("Name").with_default("sample-"),
    );
    config.set_field(
        &study(2, 1),
        FieldEditConfig::new("Collection date").with_type("characteristics"),
    );

    config.set_field(&assay(0, 0), FieldEditConfig::new("Protocol"));
    config.set_field(
        &assay(0, 1),
        FieldEditConfig::new("Instrument")
            .with_type("parameter_values")
            .with_format(EditFormat::Select)
            .with_options(["HiSeq", "NovaSeq"]),
    );
    config.set_field(&assay(1, 0), FieldEditConfig::new("Name"));
    config.set_field(
        &assay(1, 1),
        FieldEditConfig::new("File").with_type("comment"),
    );
    config
}
