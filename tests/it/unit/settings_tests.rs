//! Unit tests for settings files.

use lexiscatter::settings::{ExplorerSettings, SettingsError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_defaults_match_page_contract() {
    let settings = ExplorerSettings::default();
    assert_eq!(settings.resource_path, "language_analysis_masterframe25OCT.csv");
    assert_eq!(settings.container_id, "chart-container");
    assert_eq!(settings.canvas_id, "datasetChart");
    assert_eq!(settings.container_padding, 60.0);
    assert_eq!(settings.columns.similarity, "levenshtein_similarity");
    assert_eq!(settings.columns.complexity, "complexity_overall_complexity");
    assert_eq!(settings.timing.max_container_polls, 50);
}

#[test]
fn test_load_from_file_overrides_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{
            "resource_path": "data/words.tsv",
            "columns": { "complexity": "difficulty" },
            "timing": { "settle_delay_ms": 0, "max_container_polls": 5 }
        }"#,
    )
    .unwrap();

    let settings = ExplorerSettings::load(Some(&path)).unwrap();
    assert_eq!(settings.resource_path, "data/words.tsv");
    assert_eq!(settings.columns.complexity, "difficulty");
    assert_eq!(settings.columns.similarity, "levenshtein_similarity");
    assert_eq!(settings.timing.settle_delay_ms, 0);
    assert_eq!(settings.timing.max_container_polls, 5);
    assert_eq!(settings.timing.resize_debounce_ms, 250);
}

#[test]
fn test_explicit_path_must_exist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = ExplorerSettings::load(Some(&path)).unwrap_err();
    assert!(matches!(err, SettingsError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_invalid_json_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ resource_path: 1 }").unwrap();

    let err = ExplorerSettings::load_from(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Json { .. }));
    assert!(err.to_string().starts_with("invalid settings"));
}

#[test]
fn test_settings_round_trip_through_json() {
    let mut settings = ExplorerSettings::default();
    settings.timing.orientation_delay_ms = 750;
    let json = serde_json::to_string(&settings).unwrap();
    let back: ExplorerSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(back, settings);
}
