use super::*;

use std::{collections::HashMap, io::Write};

use shared::geometry::Vec2;

#[test]
fn defaults_map_to_core_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.tuning().expect("tuning"), Tuning::default());
    assert_eq!(settings.layout().expect("layout"), LayoutConfig::default());
}

#[test]
fn reads_partial_toml_and_keeps_remaining_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
pinch_threshold = 0.93
settle_timeout_ms = 50
initial_viewport = "bottom_right"

[buttons]
pan = 1

[viewports.top_left]
center_percent = [20.0, 20.0]
swipe_direction = [-1.0, 1.0, 0.0]
bounding_box = {{ left = 0.0, right = 40.0, top = 0.0, bottom = 40.0 }}
"#
    )
    .expect("write");

    let settings = load_settings(Some(file.path())).expect("settings");
    let tuning = settings.tuning().expect("tuning");
    assert_eq!(tuning.pinch_threshold, 0.93);
    assert_eq!(tuning.settle_timeout, Duration::from_millis(50));
    assert_eq!(tuning.initial_viewport, Quadrant::BottomRight);
    assert_eq!(tuning.buttons.pan, ButtonCode(1));
    assert_eq!(tuning.buttons.zoom, ButtonCode(3));
    assert_eq!(tuning.swipe_speed_threshold, 12.0);

    let layout = settings.layout().expect("layout");
    assert_eq!(
        layout.geometry(Quadrant::TopLeft).center_percent,
        Vec2::new(20.0, 20.0)
    );
    assert_eq!(
        layout.geometry(Quadrant::TopRight),
        LayoutConfig::default().geometry(Quadrant::TopRight)
    );
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.toml");
    let err = load_settings(Some(&missing)).expect_err("missing file");
    assert!(err.to_string().contains("failed to read settings file"));
}

#[test]
fn env_overrides_win_and_bad_values_are_ignored() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("GESTUREDESK__SWIPE_SPEED_THRESHOLD", "10.5"),
        ("GESTUREDESK__FULLSCREEN_KEY", "not-a-number"),
        ("GESTUREDESK__INITIAL_VIEWPORT", "TOP_RIGHT"),
    ]);
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    let tuning = settings.tuning().expect("tuning");
    assert_eq!(tuning.swipe_speed_threshold, 10.5);
    assert_eq!(tuning.fullscreen_key, KeyCode(70));
    assert_eq!(tuning.initial_viewport, Quadrant::TopRight);
}

#[test]
fn rejects_unknown_initial_viewport_and_bad_layout() {
    let settings = Settings {
        initial_viewport: "CENTER".into(),
        ..Settings::default()
    };
    assert!(settings.tuning().is_err());

    let mut settings = Settings::default();
    let mut geometry = *LayoutConfig::default().geometry(Quadrant::BottomLeft);
    geometry.center_percent = Vec2::new(90.0, 90.0);
    settings.viewports.bottom_left = Some(geometry);
    assert!(settings.layout().is_err());
}

#[test]
fn window_target_defaults_to_display_and_reads_env() {
    assert_eq!(
        Settings::default().window_target().expect("target"),
        WindowTarget::Display
    );

    let env: HashMap<&str, &str> = HashMap::from([("GESTUREDESK__WINDOW", "0x3a00004")]);
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));
    assert_eq!(
        settings.window_target().expect("target"),
        WindowTarget::Window(0x3a00004)
    );

    settings.window = Some("left pane".into());
    assert!(settings.window_target().is_err());
}
