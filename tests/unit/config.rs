use super::*;
use crate::testing::temp_dir;

#[test]
fn defaults_apply_to_missing_fields() {
    let cfg = SessionConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, SessionConfig::default());
    assert_eq!((cfg.width, cfg.height), (800, 600));
    assert_eq!(cfg.frame_rate, 60.0);
    assert_eq!(cfg.volume, 1.0);
}

#[test]
fn parses_archives_and_startup_project() {
    let cfg = SessionConfig::from_json_str(
        r#"{
            "width": 1024,
            "archives": [
                {"location": "Common.zip"},
                {"location": "https://host/Tunes.assets.zip", "cache": true}
            ],
            "startup_project": "LostControls"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.width, 1024);
    assert_eq!(cfg.height, 600);
    assert_eq!(cfg.archives.len(), 2);
    assert!(cfg.archives[1].cache);
    assert_eq!(cfg.startup_project.as_deref(), Some("LostControls"));
}

#[test]
fn rejects_invalid_values() {
    for json in [
        r#"{"width": 0}"#,
        r#"{"height": 70000}"#,
        r#"{"frame_rate": 0}"#,
        r#"{"volume": 1.5}"#,
    ] {
        let err = SessionConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, SketchError::Validation(_)), "{json}: {err}");
    }
}

#[test]
fn rejects_unknown_fields_and_bad_json() {
    assert!(matches!(
        SessionConfig::from_json_str(r#"{"widht": 10}"#).unwrap_err(),
        SketchError::Serde(_)
    ));
    assert!(matches!(
        SessionConfig::from_json_str("nope").unwrap_err(),
        SketchError::Serde(_)
    ));
}

#[test]
fn relative_paths_resolve_against_config_dir() {
    let dir = temp_dir("config");
    let path = dir.join("session.json");
    std::fs::write(
        &path,
        r#"{
            "font": "fonts/Sans.ttf",
            "storage_path": "data.json",
            "archives": [
                {"location": "Common.zip"},
                {"location": "https://host/a.zip"}
            ]
        }"#,
    )
    .unwrap();

    let cfg = SessionConfig::from_path(&path).unwrap();
    assert_eq!(cfg.font, Some(dir.join("fonts/Sans.ttf")));
    assert_eq!(cfg.storage_path, Some(dir.join("data.json")));
    assert_eq!(cfg.cache_dir, None);
    assert_eq!(
        cfg.archives[0].location,
        dir.join("Common.zip").to_string_lossy()
    );
    assert_eq!(cfg.archives[1].location, "https://host/a.zip");
}

#[test]
fn missing_file_is_an_error() {
    assert!(SessionConfig::from_path(Path::new("no/such/config.json")).is_err());
}
