use std::time::Duration;

use serde::Deserialize;
use shared::{
    domain::{BoundingBox, ButtonCode, KeyCode, Quadrant},
    geometry::{Vec2, Vec3},
};

use crate::ControllerError;

pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.96;
pub const DEFAULT_SWIPE_SPEED_THRESHOLD: f64 = 12.0;
pub const DEFAULT_PALM_FORWARD_THRESHOLD: f64 = -0.55;
pub const DEFAULT_SCREEN_TO_HAND_SCALE: f64 = 2.0;
pub const DEFAULT_HAND_TO_ZOOM_SCALE: f64 = 1.0;
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_millis(20);
/// Character code of `F`, the usual fullscreen toggle.
pub const DEFAULT_FULLSCREEN_KEY: KeyCode = KeyCode(70);

/// Mouse buttons used per gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buttons {
    pub pinch: ButtonCode,
    pub pan: ButtonCode,
    pub zoom: ButtonCode,
    /// Confirming click that hands input focus to a newly selected viewport.
    pub focus: ButtonCode,
}

impl Default for Buttons {
    fn default() -> Self {
        Self {
            pinch: ButtonCode(1),
            pan: ButtonCode(2),
            zoom: ButtonCode(3),
            focus: ButtonCode(3),
        }
    }
}

/// Thresholds and scale factors shared by classification and dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub pinch_threshold: f64,
    /// Tracking units per frame; compared squared against displacement.
    pub swipe_speed_threshold: f64,
    pub palm_forward_threshold: f64,
    pub screen_to_hand_scale: f64,
    pub hand_to_zoom_scale: f64,
    pub settle_timeout: Duration,
    pub fullscreen_key: KeyCode,
    pub buttons: Buttons,
    pub initial_viewport: Quadrant,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            swipe_speed_threshold: DEFAULT_SWIPE_SPEED_THRESHOLD,
            palm_forward_threshold: DEFAULT_PALM_FORWARD_THRESHOLD,
            screen_to_hand_scale: DEFAULT_SCREEN_TO_HAND_SCALE,
            hand_to_zoom_scale: DEFAULT_HAND_TO_ZOOM_SCALE,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
            fullscreen_key: DEFAULT_FULLSCREEN_KEY,
            buttons: Buttons::default(),
            initial_viewport: Quadrant::TopLeft,
        }
    }
}

impl Tuning {
    pub fn swipe_speed_threshold_squared(&self) -> f64 {
        self.swipe_speed_threshold * self.swipe_speed_threshold
    }
}

/// Fixed geometry of one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ViewportGeometry {
    /// `[x%, y%]` anchor on the target surface.
    pub center_percent: Vec2,
    /// Only its direction matters; it is normalized before scoring.
    pub swipe_direction: Vec3,
    /// Absent for the free (unbounded) viewport.
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

impl ViewportGeometry {
    fn validate(&self, quadrant: Quadrant) -> Result<(), ControllerError> {
        let invalid = |reason: &str| ControllerError::InvalidLayout {
            quadrant,
            reason: reason.to_string(),
        };

        if self.swipe_direction.norm_squared() == 0.0 {
            return Err(invalid("swipe direction must be non-zero"));
        }
        let Some(bounds) = self.bounding_box else {
            return Ok(());
        };
        if bounds.left > bounds.right || bounds.top > bounds.bottom {
            return Err(invalid("bounding box edges are inverted"));
        }
        let center = self.center_percent;
        if center.x < bounds.left
            || center.x > bounds.right
            || center.y < bounds.top
            || center.y > bounds.bottom
        {
            return Err(invalid("center lies outside its bounding box"));
        }
        Ok(())
    }
}

/// Geometry of all four viewports, indexed by `Quadrant::index`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    viewports: [ViewportGeometry; 4],
}

impl LayoutConfig {
    pub fn new(viewports: [ViewportGeometry; 4]) -> Self {
        Self { viewports }
    }

    pub fn geometry(&self, quadrant: Quadrant) -> &ViewportGeometry {
        &self.viewports[quadrant.index()]
    }

    pub fn set_geometry(&mut self, quadrant: Quadrant, geometry: ViewportGeometry) {
        self.viewports[quadrant.index()] = geometry;
    }

    pub fn validate(&self) -> Result<(), ControllerError> {
        for quadrant in Quadrant::ALL {
            self.geometry(quadrant).validate(quadrant)?;
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let bounded = |cx: f64, cy: f64, sx: f64, sy: f64, bounds: [f64; 4]| ViewportGeometry {
            center_percent: Vec2::new(cx, cy),
            swipe_direction: Vec3::new(sx, sy, 0.0),
            bounding_box: Some(BoundingBox {
                left: bounds[0],
                right: bounds[1],
                top: bounds[2],
                bottom: bounds[3],
            }),
        };
        Self::new([
            bounded(25.0, 25.0, -1.0, 1.0, [5.0, 45.0, 5.0, 45.0]),
            bounded(75.0, 25.0, 1.0, 1.0, [55.0, 95.0, 5.0, 45.0]),
            bounded(25.0, 75.0, -1.0, -1.0, [5.0, 45.0, 55.0, 95.0]),
            ViewportGeometry {
                center_percent: Vec2::new(75.0, 75.0),
                swipe_direction: Vec3::new(1.0, -1.0, 0.0),
                bounding_box: None,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid_and_has_one_free_viewport() {
        let layout = LayoutConfig::default();
        layout.validate().expect("valid");
        let free: Vec<_> = Quadrant::ALL
            .into_iter()
            .filter(|q| layout.geometry(*q).bounding_box.is_none())
            .collect();
        assert_eq!(free, vec![Quadrant::BottomRight]);
    }

    #[test]
    fn rejects_center_outside_bounding_box() {
        let mut layout = LayoutConfig::default();
        let mut geometry = *layout.geometry(Quadrant::TopRight);
        geometry.center_percent = Vec2::new(10.0, 25.0);
        layout.set_geometry(Quadrant::TopRight, geometry);

        let err = layout.validate().expect_err("invalid");
        assert!(matches!(
            err,
            ControllerError::InvalidLayout {
                quadrant: Quadrant::TopRight,
                ..
            }
        ));
    }
}
