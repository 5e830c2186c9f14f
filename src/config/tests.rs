use crate::config::Settings;
use std::fs;
use std::path::Path;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_defaults_when_no_file() {
    let settings = Settings::load_from(None, &no_env);

    assert_eq!(settings.default_model, "gpt-4o");
    assert!(settings.openai_api_key.is_empty());
    assert!(settings.notion_database_id.is_empty());
}

#[test]
fn test_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"default_model": "claude-3-5-sonnet-20241022", "openai_api_key": "sk-file"}"#,
    )
    .unwrap();

    let settings = Settings::load_from(Some(&path), &no_env);

    assert_eq!(settings.default_model, "claude-3-5-sonnet-20241022");
    assert_eq!(settings.openai_api_key, "sk-file");
    // Fields absent from the file keep their defaults
    assert!(settings.anthropic_api_key.is_empty());
}

#[test]
fn test_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"default_model": "gpt-4-turbo", "imgbb_api_key": "from-file"}"#).unwrap();

    let env = |key: &str| match key {
        "STUDYMATE_DEFAULT_MODEL" => Some("gemini-1.5-pro".to_string()),
        "STUDYMATE_NOTION_API_KEY" => Some("secret_env".to_string()),
        _ => None,
    };

    let settings = Settings::load_from(Some(&path), &env);

    assert_eq!(settings.default_model, "gemini-1.5-pro");
    assert_eq!(settings.notion_api_key, "secret_env");
    // File layer still wins over defaults where env is silent
    assert_eq!(settings.imgbb_api_key, "from-file");
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json at all").unwrap();

    let settings = Settings::load_from(Some(&path), &no_env);

    assert_eq!(settings, Settings::default());
}

#[test]
fn test_empty_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "").unwrap();

    let settings = Settings::load_from(Some(&path), &no_env);

    assert_eq!(settings, Settings::default());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let settings = Settings::load_from(Some(Path::new("/nonexistent/config.json")), &no_env);

    assert_eq!(settings, Settings::default());
}

#[test]
fn test_unknown_keys_in_file_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"default_model": "o1-mini", "legacy_imgur_client_id": "abc"}"#,
    )
    .unwrap();

    let settings = Settings::load_from(Some(&path), &no_env);

    assert_eq!(settings.default_model, "o1-mini");
}
