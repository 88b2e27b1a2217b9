//! Tests for grid settings loading.

use std::io::Write;

use isagrid_grid::{GridError, GridSettings};

#[test]
fn missing_keys_take_defaults() {
    let settings = GridSettings::from_toml_str("max_col_width = 400\nirods_links = false\n")
        .expect("parse settings");
    assert_eq!(settings.max_col_width, 400);
    assert_eq!(settings.min_col_width, 100);
    assert!(!settings.irods_links);
    assert!(settings.ontology_url_template.is_some());
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "ontology_url_skip = [\"example.org\"]").expect("write");
    writeln!(file, "external_links_min_width = 180").expect("write");
    let settings = GridSettings::load_from(file.path()).expect("load settings");
    assert_eq!(settings.ontology_url_skip, vec!["example.org"]);
    assert_eq!(settings.external_links_min_width, 180);
}

#[test]
fn reports_bad_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("grid.toml");
    assert!(matches!(
        GridSettings::load_from(&missing),
        Err(GridError::SettingsIo { .. })
    ));
    assert!(matches!(
        GridSettings::from_toml_str("min_col_width = \"wide\""),
        Err(GridError::Settings(_))
    ));
}
