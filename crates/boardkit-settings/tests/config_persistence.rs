use boardkit_settings::{EditorConfig, SettingsError};
use std::fs;

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = EditorConfig::default();
    config.canvas.max_zoom = 20.0;
    config.interaction.rotation_smoothing = 0.75;
    config.style.text.font = "Fira Code".to_string();

    config.save_to_file(&path).unwrap();
    let loaded = EditorConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = EditorConfig::default();
    config.canvas.animate_zoom = false;
    config.canvas.zoom_animation_duration_ms = 300;

    config.save_to_file(&path).unwrap();
    let loaded = EditorConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "[canvas]\ngrid_size = 25.0\n").unwrap();

    let loaded = EditorConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.canvas.grid_size, 25.0);
    assert_eq!(loaded.canvas.max_zoom, 10.0);
    assert_eq!(loaded.interaction.max_undo_stack_size, 100);
}

#[test]
fn test_invalid_values_are_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{ "canvas": { "grid_size": 0.0 } }"#).unwrap();

    let err = EditorConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Config(_)));
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let err = EditorConfig::default().save_to_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Config(_)));
}

#[test]
fn test_missing_file_reports_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EditorConfig::load_from_file(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}
