use chat_widget::config::AppConfig;
use chat_widget::dom::InputControl;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("CHAT_WIDGET_TRANSPORT__ENDPOINT");
        env::remove_var("CHAT_WIDGET_DOM__MAX_INPUT_HEIGHT");
        env::remove_var("CHAT_ENDPOINT");
        env::remove_var("PREFERS_DARK");
        env::remove_var("PREFERENCES_FILE");
        env::remove_var("INPUT_KIND");
        env::remove_var("CONFIG_FILE");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["chat-widget"]).expect("defaults should load");
    assert_eq!(config.transport.endpoint, "http://127.0.0.1:5000/");
    assert_eq!(config.transport.requested_with, "XMLHttpRequest");
    assert_eq!(config.dom.panel_id, "chat-box");
    assert_eq!(config.dom.form_id, "chat-form");
    assert_eq!(config.dom.field_name, "query");
    assert_eq!(config.dom.max_input_height, 200);
    assert!(!config.theme.platform_prefers_dark);
    assert!(config.theme.preferences_file.is_none());
    assert_eq!(config.input_control().unwrap(), InputControl::AutoGrowing);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_WIDGET_TRANSPORT__ENDPOINT", "http://localhost:9090/");
        env::set_var("CHAT_WIDGET_DOM__MAX_INPUT_HEIGHT", "320");
    }

    let config = AppConfig::load_from_args(["chat-widget"]).expect("Failed to load config");
    assert_eq!(config.transport.endpoint, "http://localhost:9090/");
    assert_eq!(config.dom.max_input_height, 320);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_wins_over_env() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_WIDGET_TRANSPORT__ENDPOINT", "http://localhost:9090/");
    }

    let config = AppConfig::load_from_args([
        "chat-widget",
        "--endpoint",
        "http://localhost:7070/",
        "--prefers-dark",
        "true",
    ])
    .expect("Failed to load config");
    assert_eq!(config.transport.endpoint, "http://localhost:7070/");
    assert!(config.theme.platform_prefers_dark);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("widget.yaml");
    fs::write(
        &file_path,
        r#"
dom:
  panel_id: messages
  field_name: prompt
terminal:
  input_kind: input
"#,
    )
    .expect("Failed to write temp config");

    let path = file_path.to_string_lossy().to_string();
    let config =
        AppConfig::load_from_args(["chat-widget", "--config", path.as_str()]).expect("Failed to load config from file");

    let settings = config.widget_settings();
    assert_eq!(settings.selectors.panel_id, "messages");
    assert_eq!(settings.selectors.form_id, "chat-form");
    assert_eq!(settings.selectors.field_name, "prompt");
    assert_eq!(config.input_control().unwrap(), InputControl::Simple);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["chat-widget", "--config", "does-not-exist.yaml"]);
    assert!(result.is_err());
}
