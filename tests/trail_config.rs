use kestrel_trail::{DegenerateRotation, TrailConfig, TrailConfigOverrides};
use std::fs;

#[test]
fn config_loads_from_json_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("trail.json");
    fs::write(
        &path,
        r#"{ "width": 0.75, "aspect_ratio_parameter": "_Tiling", "degenerate_rotation": "previous" }"#,
    )
    .expect("write config");

    let cfg = TrailConfig::load(&path).expect("load config");
    assert!((cfg.width - 0.75).abs() < f32::EPSILON);
    assert_eq!(cfg.aspect_ratio_parameter, "_Tiling");
    assert_eq!(cfg.degenerate_rotation, DegenerateRotation::Previous);
}

#[test]
fn invalid_width_in_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("trail.json");
    fs::write(&path, r#"{ "width": -0.5 }"#).expect("write config");

    let err = TrailConfig::load(&path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Invalid trail config file"), "unexpected error: {message}");
    assert!(message.contains("greater than zero"), "unexpected error: {message}");
}

#[test]
fn unreadable_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.json");
    assert_eq!(TrailConfig::load_or_default(&missing), TrailConfig::default());

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "{ width: ").expect("write config");
    assert_eq!(TrailConfig::load_or_default(&garbage), TrailConfig::default());
}

#[test]
fn overrides_apply_on_top_of_loaded_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("trail.json");
    fs::write(&path, r#"{ "width": 0.4 }"#).expect("write config");

    let mut cfg = TrailConfig::load(&path).expect("load config");
    let overrides = TrailConfigOverrides { width: Some(0.9), aspect_ratio_parameter: Some("_Repeat".to_string()) };
    cfg.apply_overrides(&overrides);
    assert_eq!(overrides.applied_fields(), vec!["width", "aspect_ratio_parameter"]);
    assert!((cfg.width - 0.9).abs() < f32::EPSILON);
    assert_eq!(cfg.aspect_ratio_parameter, "_Repeat");
    assert!(cfg.validate().is_ok());
}

#[test]
fn config_round_trips_through_serde() {
    let cfg = TrailConfig { degenerate_rotation: DegenerateRotation::Previous, ..TrailConfig::with_width(1.25) };
    let json = serde_json::to_string(&cfg).expect("serialize");
    assert!(json.contains("\"previous\""));
    assert_eq!(TrailConfig::from_json_str(&json).expect("parse"), cfg);
}
