use chat_widget::dom::{DocumentRoot, InputControl};
use chat_widget::headless::HeadlessPage;
use chat_widget::theme::{
    DARK_CLASS, FilePreferences, PreferenceError, PreferenceStore, STORAGE_KEY, ThemeMode,
    init_theme,
};
use std::fs;

#[test]
fn test_stored_dark_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, r#"{"theme":"dark","volume":3}"#).unwrap();

    let store = FilePreferences::load(&path).unwrap();
    assert_eq!(store.get(STORAGE_KEY).as_deref(), Some("dark"));
    assert_eq!(store.get("volume"), None);

    let mut page = HeadlessPage::new(InputControl::Simple);
    assert_eq!(init_theme(&store, false, &mut page), ThemeMode::Dark);
    assert!(page.has_class(DARK_CLASS));
}

#[test]
fn test_missing_file_defers_to_platform() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilePreferences::load(dir.path().join("absent.json")).unwrap();

    let mut dark_platform = HeadlessPage::new(InputControl::Simple);
    assert_eq!(init_theme(&store, true, &mut dark_platform), ThemeMode::Dark);

    let mut light_platform = HeadlessPage::new(InputControl::Simple);
    light_platform.add_class(DARK_CLASS);
    assert_eq!(init_theme(&store, false, &mut light_platform), ThemeMode::Light);
    assert!(!light_platform.has_class(DARK_CLASS));
}

#[test]
fn test_empty_stored_value_defers_to_platform() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, r#"{"theme":""}"#).unwrap();

    let store = FilePreferences::load(&path).unwrap();
    let mut page = HeadlessPage::new(InputControl::Simple);
    assert_eq!(init_theme(&store, true, &mut page), ThemeMode::Dark);
    assert!(page.has_class(DARK_CLASS));
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, "theme=dark").unwrap();

    let err = FilePreferences::load(&path).unwrap_err();
    assert!(matches!(err, PreferenceError::Parse { .. }));
}

#[test]
fn test_preferences_file_is_never_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, r#"{"theme":"light"}"#).unwrap();

    let store = FilePreferences::load(&path).unwrap();
    let mut page = HeadlessPage::new(InputControl::Simple);
    assert_eq!(init_theme(&store, true, &mut page), ThemeMode::Light);

    assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"theme":"light"}"#);
}
