use std::path::PathBuf;
use std::time::Duration;

use tempfile::tempdir;
use viewership_dashboard::api::DEFAULT_BASE_URL;
use viewership_dashboard::settings::Settings;

#[test]
fn missing_or_empty_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert_eq!(Settings::load(missing.to_str().unwrap()).unwrap(), Settings::default());

    let empty = dir.path().join("empty.json");
    std::fs::write(&empty, "  \n").unwrap();
    let s = Settings::load(empty.to_str().unwrap()).unwrap();
    assert_eq!(s.api_base_url, DEFAULT_BASE_URL);
    assert_eq!(s.export_dir, PathBuf::from("exports"));
}

#[test]
fn partial_file_fills_remaining_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"api_base_url": "http://stats.local:9000", "debug_logging": true, "request_timeout_secs": 0}"#,
    )
    .unwrap();
    let s = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(s.api_base_url, "http://stats.local:9000");
    assert!(s.debug_logging);
    assert_eq!(s.grid_columns, 4);
    assert_eq!(s.window_size, Some((1440, 900)));
    assert_eq!(s.request_timeout(), Duration::from_secs(1));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(Settings::load(path.to_str().unwrap()).is_err());
}

#[test]
fn save_then_load_keeps_window_size() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_str().unwrap();
    let settings = Settings {
        window_size: Some((1280, 720)),
        font_path: Some(PathBuf::from("fonts/NanumGothic.ttf")),
        ..Settings::default()
    };
    settings.save(path).unwrap();
    assert_eq!(Settings::load(path).unwrap(), settings);
}
