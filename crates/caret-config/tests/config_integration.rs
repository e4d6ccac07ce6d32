use caret_config::EditorConfig;

#[test]
fn test_load_creates_default_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caret.json");
    assert!(!path.exists());

    let config = EditorConfig::load_or_create(&path);
    assert!(path.exists());
    assert_eq!(config, EditorConfig::default());

    // File should contain valid JSON
    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert!(parsed.is_object());
}

#[test]
fn test_load_creates_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("caret.json");

    EditorConfig::load_or_create(&path);
    assert!(path.exists());
}

#[test]
fn test_load_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caret.json");
    let json = r#"{
        "tab_size": 2,
        "page_size": 10,
        "wrapping_column": 40,
        "word_separators": ".,"
    }"#;
    std::fs::write(&path, json).unwrap();

    let config = EditorConfig::load_or_create(&path);
    assert_eq!(config.tab_size, 2);
    assert_eq!(config.page_size, 10);
    assert_eq!(config.wrapping_column, Some(40));
    assert_eq!(config.word_separators, ".,");
}

#[test]
fn test_broken_json_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caret.json");
    std::fs::write(&path, "{ this is not valid json }}}").unwrap();

    let config = EditorConfig::load_or_create(&path);
    assert_eq!(config, EditorConfig::default());

    // The broken file is left untouched
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "{ this is not valid json }}}");
}

#[test]
fn test_loaded_config_is_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caret.json");
    std::fs::write(&path, r#"{"tab_size": 0, "page_size": 0, "wrapping_column": 0}"#).unwrap();

    let config = EditorConfig::load_or_create(&path);
    assert_eq!(config.tab_size, 1);
    assert_eq!(config.page_size, 1);
    assert!(config.wrapping_column.is_none());
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caret.json");
    let mut config = EditorConfig::default();
    config.tab_size = 8;
    config.select_all_toggles_editable_range = false;
    config.save(&path).unwrap();

    let loaded = EditorConfig::load_or_create(&path);
    assert_eq!(loaded, config);
}
