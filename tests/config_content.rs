use atoll_engine::config::{AppConfig, AppConfigOverrides};
use atoll_engine::content::ContentStore;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn config_file_round_trips_with_partial_fields() {
    let mut temp = NamedTempFile::new().expect("temp config");
    write!(
        temp,
        r#"{{"window":{{"title":"Archipelago","width":1600,"height":1000,"vsync":false}},"scene":{{"motion_seed":99}}}}"#
    )
    .expect("write config");

    let cfg = AppConfig::load(temp.path()).expect("load config");
    assert_eq!(cfg.window.title, "Archipelago");
    assert_eq!(cfg.window.width, 1600);
    assert!(!cfg.window.vsync);
    assert_eq!(cfg.scene.motion_seed, Some(99));
    // Unspecified sections keep their defaults.
    assert_eq!(cfg.camera.orbit_radius, 78.0);
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let cfg = AppConfig::load_or_default("/definitely/not/here.json");
    assert_eq!(cfg.window.width, 1280);
    assert_eq!(cfg.window.title, "Atoll Engine");
}

#[test]
fn cli_overrides_win_over_the_file() {
    let mut temp = NamedTempFile::new().expect("temp config");
    write!(temp, r#"{{"window":{{"title":"File","width":800,"height":600,"vsync":true}}}}"#)
        .expect("write config");

    let mut cfg = AppConfig::load(temp.path()).expect("load config");
    cfg.apply_overrides(&AppConfigOverrides {
        width: Some(2560),
        vsync: Some(false),
        ..Default::default()
    });
    assert_eq!(cfg.window.width, 2560);
    assert_eq!(cfg.window.height, 600, "unoverridden fields keep the file value");
    assert!(!cfg.window.vsync);
}

#[test]
fn content_file_loads_and_serves_panels() {
    let mut temp = NamedTempFile::new().expect("temp content");
    write!(
        temp,
        r#"{{"reef":{{"title":"The Reef","body_markup":"<p>coral</p>"}},"lagoon":{{"title":"Lagoon","body_markup":"<p>still water</p>"}}}}"#
    )
    .expect("write content");

    let store = ContentStore::load(temp.path()).expect("load content");
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("reef").expect("reef panel").title, "The Reef");
    assert!(store.get("abyss").is_none());
}

#[test]
fn malformed_content_file_is_a_contextual_error() {
    let mut temp = NamedTempFile::new().expect("temp content");
    write!(temp, "not json at all").expect("write garbage");
    let err = ContentStore::load(temp.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse content file"));
}
