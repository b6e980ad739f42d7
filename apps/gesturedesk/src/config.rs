use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use gesture_core::{Buttons, LayoutConfig, Tuning, ViewportGeometry};
use injection::WindowTarget;
use serde::Deserialize;
use shared::domain::{ButtonCode, KeyCode, Quadrant};

pub const DEFAULT_CONFIG_FILE: &str = "gesturedesk.toml";
const ENV_PREFIX: &str = "GESTUREDESK__";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ButtonSettings {
    pub pinch: u8,
    pub pan: u8,
    pub zoom: u8,
    pub focus: u8,
}

impl Default for ButtonSettings {
    fn default() -> Self {
        let buttons = Buttons::default();
        Self {
            pinch: buttons.pinch.0,
            pan: buttons.pan.0,
            zoom: buttons.zoom.0,
            focus: buttons.focus.0,
        }
    }
}

/// Per-quadrant geometry overrides; missing entries keep the default layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub top_left: Option<ViewportGeometry>,
    pub top_right: Option<ViewportGeometry>,
    pub bottom_left: Option<ViewportGeometry>,
    pub bottom_right: Option<ViewportGeometry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pinch_threshold: f64,
    pub swipe_speed_threshold: f64,
    pub palm_forward_threshold: f64,
    pub screen_to_hand_scale: f64,
    pub hand_to_zoom_scale: f64,
    pub settle_timeout_ms: u64,
    pub fullscreen_key: u32,
    pub initial_viewport: String,
    pub xdotool_program: String,
    /// `display`, `select`, or an X11 window id (decimal or `0x` hex).
    pub window: Option<String>,
    pub buttons: ButtonSettings,
    pub viewports: ViewportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let tuning = Tuning::default();
        Self {
            pinch_threshold: tuning.pinch_threshold,
            swipe_speed_threshold: tuning.swipe_speed_threshold,
            palm_forward_threshold: tuning.palm_forward_threshold,
            screen_to_hand_scale: tuning.screen_to_hand_scale,
            hand_to_zoom_scale: tuning.hand_to_zoom_scale,
            settle_timeout_ms: tuning.settle_timeout.as_millis() as u64,
            fullscreen_key: tuning.fullscreen_key.0,
            initial_viewport: tuning.initial_viewport.as_str().into(),
            xdotool_program: injection::DEFAULT_XDOTOOL.into(),
            window: None,
            buttons: ButtonSettings::default(),
            viewports: ViewportSettings::default(),
        }
    }
}

impl Settings {
    pub fn tuning(&self) -> anyhow::Result<Tuning> {
        if self.pinch_threshold <= 0.0 || self.pinch_threshold > 1.0 {
            bail!(
                "pinch_threshold must be in (0, 1], got {}",
                self.pinch_threshold
            );
        }
        if self.swipe_speed_threshold <= 0.0 {
            bail!("swipe_speed_threshold must be positive");
        }
        let initial_viewport: Quadrant = self
            .initial_viewport
            .parse()
            .context("invalid initial_viewport")?;

        Ok(Tuning {
            pinch_threshold: self.pinch_threshold,
            swipe_speed_threshold: self.swipe_speed_threshold,
            palm_forward_threshold: self.palm_forward_threshold,
            screen_to_hand_scale: self.screen_to_hand_scale,
            hand_to_zoom_scale: self.hand_to_zoom_scale,
            settle_timeout: Duration::from_millis(self.settle_timeout_ms),
            fullscreen_key: KeyCode(self.fullscreen_key),
            buttons: Buttons {
                pinch: ButtonCode(self.buttons.pinch),
                pan: ButtonCode(self.buttons.pan),
                zoom: ButtonCode(self.buttons.zoom),
                focus: ButtonCode(self.buttons.focus),
            },
            initial_viewport,
        })
    }

    pub fn window_target(&self) -> anyhow::Result<WindowTarget> {
        match self.window.as_deref() {
            None => Ok(WindowTarget::Display),
            Some(raw) => raw.parse().context("invalid window"),
        }
    }

    pub fn layout(&self) -> anyhow::Result<LayoutConfig> {
        let mut layout = LayoutConfig::default();
        let overrides = [
            (Quadrant::TopLeft, self.viewports.top_left),
            (Quadrant::TopRight, self.viewports.top_right),
            (Quadrant::BottomLeft, self.viewports.bottom_left),
            (Quadrant::BottomRight, self.viewports.bottom_right),
        ];
        for (quadrant, geometry) in overrides {
            if let Some(geometry) = geometry {
                layout.set_geometry(quadrant, geometry);
            }
        }
        layout.validate()?;
        Ok(layout)
    }
}

/// Reads `path` (or `gesturedesk.toml` when present), then applies
/// `GESTUREDESK__*` environment overrides. An explicitly named file that
/// cannot be read is an error; a missing default file is not.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_settings_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

/// Values that do not parse are ignored.
pub(crate) fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

    if let Some(v) = var("PINCH_THRESHOLD").and_then(|v| v.parse().ok()) {
        settings.pinch_threshold = v;
    }
    if let Some(v) = var("SWIPE_SPEED_THRESHOLD").and_then(|v| v.parse().ok()) {
        settings.swipe_speed_threshold = v;
    }
    if let Some(v) = var("SCREEN_TO_HAND_SCALE").and_then(|v| v.parse().ok()) {
        settings.screen_to_hand_scale = v;
    }
    if let Some(v) = var("SETTLE_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        settings.settle_timeout_ms = v;
    }
    if let Some(v) = var("FULLSCREEN_KEY").and_then(|v| v.parse().ok()) {
        settings.fullscreen_key = v;
    }
    if let Some(v) = var("INITIAL_VIEWPORT") {
        settings.initial_viewport = v;
    }
    if let Some(v) = var("XDOTOOL") {
        settings.xdotool_program = v;
    }
    if let Some(v) = var("WINDOW") {
        settings.window = Some(v);
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
