use std::sync::Arc;

use injection::InjectionPort;
use shared::{
    domain::{Axis, ButtonCode, FramePair, Quadrant},
    geometry::{direction, Vec2, Vec3},
};
use tracing::{debug, info};

use crate::{
    classifier::{Gesture, GestureClassifier, GestureKind},
    tuning::{LayoutConfig, Tuning},
    viewport::{OffsetChange, Viewport},
    ControllerError,
};

/// One edge of the linked-corners graph: a committed offset change on
/// `source_axis` of `source` is copied onto `target_axis` of `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetLink {
    pub source: Quadrant,
    pub source_axis: Axis,
    pub target: Quadrant,
    pub target_axis: Axis,
    pub negate: bool,
}

const fn link(
    source: Quadrant,
    source_axis: Axis,
    target: Quadrant,
    target_axis: Axis,
    negate: bool,
) -> OffsetLink {
    OffsetLink {
        source,
        source_axis,
        target,
        target_axis,
        negate,
    }
}

/// Propagation is one hop: targets are written with `set_offset`, which
/// notifies nobody.
pub const OFFSET_COUPLINGS: [OffsetLink; 6] = [
    link(Quadrant::TopLeft, Axis::X, Quadrant::BottomLeft, Axis::Y, true),
    link(Quadrant::TopLeft, Axis::Y, Quadrant::TopRight, Axis::Y, false),
    link(Quadrant::TopRight, Axis::X, Quadrant::BottomLeft, Axis::X, false),
    link(Quadrant::TopRight, Axis::Y, Quadrant::TopLeft, Axis::Y, false),
    link(Quadrant::BottomLeft, Axis::X, Quadrant::TopRight, Axis::X, false),
    link(Quadrant::BottomLeft, Axis::Y, Quadrant::TopLeft, Axis::X, true),
];

/// Owns the four viewports, the shared fullscreen flag and the current focus.
pub struct ViewportController {
    viewports: [Viewport; 4],
    current: Quadrant,
    fullscreen: bool,
    classifier: GestureClassifier,
    tuning: Tuning,
    port: Arc<dyn InjectionPort>,
}

impl ViewportController {
    /// Builds the viewports and focuses `tuning.initial_viewport`, including
    /// its confirming click. Fails before any injection when the port cannot
    /// synthesize the fullscreen key.
    pub async fn new(
        port: Arc<dyn InjectionPort>,
        tuning: Tuning,
        layout: &LayoutConfig,
    ) -> Result<Self, ControllerError> {
        layout.validate()?;
        port.check_key(tuning.fullscreen_key).await?;
        let viewports = Quadrant::ALL.map(|quadrant| {
            Viewport::new(
                quadrant,
                *layout.geometry(quadrant),
                &tuning,
                Arc::clone(&port),
            )
        });
        let initial = tuning.initial_viewport;
        let mut controller = Self {
            viewports,
            current: initial,
            fullscreen: false,
            classifier: GestureClassifier::new(&tuning),
            tuning,
            port,
        };
        controller.set_viewport(initial).await?;
        Ok(controller)
    }

    pub fn current_viewport(&self) -> Quadrant {
        self.current
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn viewport(&self, quadrant: Quadrant) -> &Viewport {
        &self.viewports[quadrant.index()]
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    fn active(&self) -> &Viewport {
        self.viewport(self.current)
    }

    /// Classifies the pair and dispatches the winning gesture. Returns the
    /// kind that fired, or `None` when nothing matched.
    pub async fn process(
        &mut self,
        pair: FramePair<'_>,
    ) -> Result<Option<GestureKind>, ControllerError> {
        let gesture = self.classifier.classify(pair);
        self.dispatch(gesture).await
    }

    pub async fn dispatch(
        &mut self,
        gesture: Gesture,
    ) -> Result<Option<GestureKind>, ControllerError> {
        if gesture != Gesture::NoGesture {
            debug!(?gesture, viewport = %self.current, "dispatching gesture");
        }
        match gesture {
            Gesture::OneHandPinchDrag(delta) => self.pinch(delta).await?,
            Gesture::TwoHandPinchZoom(stretch) => self.zoom(stretch).await?,
            Gesture::OneHandLShapePan(delta) => self.pan(delta).await?,
            Gesture::OneHandSwipeSwitch(displacement) => {
                self.switch_viewport(displacement).await?;
            }
            Gesture::TwoHandFullscreenStretch(stretch) => {
                self.full_screen(stretch).await?;
            }
            Gesture::NoGesture => {}
        }
        Ok(gesture.kind())
    }

    /// Moves the pointer to `quadrant`, clicks to give it focus and only then
    /// commits it as current. A failed injection leaves the focus unchanged.
    pub async fn set_viewport(&mut self, quadrant: Quadrant) -> Result<(), ControllerError> {
        self.viewport(quadrant)
            .move_cursor_to_offset(self.fullscreen)
            .await?;
        self.port.click(self.tuning.buttons.focus).await?;
        let previous = std::mem::replace(&mut self.current, quadrant);
        info!(from = %previous, to = %quadrant, "viewport focused");
        Ok(())
    }

    /// Best-scoring viewport for a swipe: highest dot product between the
    /// normalized displacement and each normalized swipe direction. Ties go
    /// to the earlier quadrant in enumeration order.
    pub fn compute_next_viewport(&self, displacement: Vec3) -> Quadrant {
        let heading = direction(&displacement);
        let mut best = (Quadrant::ALL[0], f64::NEG_INFINITY);
        for viewport in &self.viewports {
            let score = heading.dot(&direction(&viewport.swipe_direction()));
            if score > best.1 {
                best = (viewport.label(), score);
            }
        }
        best.0
    }

    /// Returns whether the focus changed. Swipes are ignored while
    /// fullscreen: the maximized view stays the focused one.
    pub async fn switch_viewport(&mut self, displacement: Vec3) -> Result<bool, ControllerError> {
        if self.fullscreen {
            debug!(viewport = %self.current, "swipe ignored while fullscreen");
            return Ok(false);
        }
        if displacement.norm_squared() < self.tuning.swipe_speed_threshold_squared() {
            return Ok(false);
        }
        let next = self.compute_next_viewport(displacement);
        if next == self.current {
            return Ok(false);
        }
        self.set_viewport(next).await?;
        Ok(true)
    }

    pub async fn pinch(&mut self, delta: Vec2) -> Result<(), ControllerError> {
        let button = self.tuning.buttons.pinch;
        if self.active().bounding_box().is_some() {
            let scaled = self.active().scale_pinch(delta);
            return self.click_relative_bounded(self.current, scaled, button).await;
        }
        self.active()
            .pinch_drag(delta, button, self.fullscreen)
            .await?;
        Ok(())
    }

    pub async fn pan(&self, delta: Vec2) -> Result<(), ControllerError> {
        self.active()
            .pan(delta, self.tuning.buttons.pan, self.fullscreen)
            .await?;
        Ok(())
    }

    pub async fn zoom(&self, stretch: f64) -> Result<(), ControllerError> {
        self.active()
            .zoom(stretch, self.tuning.buttons.zoom, self.fullscreen)
            .await?;
        Ok(())
    }

    /// Clamps the offset of a bounded viewport, notifies the coupled
    /// viewports, then moves there and clicks. `delta` is in pixels.
    pub async fn click_relative_bounded(
        &mut self,
        quadrant: Quadrant,
        delta: Vec2,
        button: ButtonCode,
    ) -> Result<(), ControllerError> {
        let Some((position, change)) = self.viewports[quadrant.index()].clamp_relative(delta)
        else {
            return Err(ControllerError::Unbounded(quadrant));
        };
        self.propagate_offset(quadrant, change);
        self.viewport(quadrant).click_at(position, button).await?;
        Ok(())
    }

    fn propagate_offset(&mut self, source: Quadrant, change: OffsetChange) {
        if change.is_empty() {
            return;
        }
        for link in OFFSET_COUPLINGS.iter().filter(|link| link.source == source) {
            let value = match link.source_axis {
                Axis::X => change.x,
                Axis::Y => change.y,
            };
            let Some(value) = value else {
                continue;
            };
            let value = if link.negate { -value } else { value };
            let target = &mut self.viewports[link.target.index()];
            match link.target_axis {
                Axis::X => target.set_offset(Some(value), None),
                Axis::Y => target.set_offset(None, Some(value)),
            }
            debug!(%source, target = %link.target, value, "offset coupled");
        }
    }

    /// Stretching apart enters fullscreen, pulling together leaves it. The
    /// flag flips only after the toggle key went through. Returns whether
    /// the flag changed.
    pub async fn full_screen(&mut self, stretch: f64) -> Result<bool, ControllerError> {
        if stretch.abs() < self.tuning.swipe_speed_threshold {
            return Ok(false);
        }
        let enter = stretch > 0.0;
        if enter == self.fullscreen {
            return Ok(false);
        }

        self.port.key_press(self.tuning.fullscreen_key).await?;
        self.fullscreen = enter;
        info!(fullscreen = enter, viewport = %self.current, "fullscreen toggled");
        self.active().move_cursor_to_offset(self.fullscreen).await?;
        Ok(true)
    }

    /// Waits for pending drag releases on every viewport.
    pub async fn settle(&self) {
        for viewport in &self.viewports {
            viewport.settle().await;
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
