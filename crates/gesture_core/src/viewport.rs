use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use injection::InjectionPort;
use shared::{
    domain::{BoundingBox, ButtonCode, Dimensions, Quadrant},
    error::InjectionError,
    geometry::{Vec2, Vec3},
};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, warn};

use crate::tuning::{Tuning, ViewportGeometry};

/// Offset axes that actually changed on a bounded commit, with their new
/// values. Unchanged axes are `None` and notify nobody.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetChange {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl OffsetChange {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
struct Motion {
    screen_to_hand_scale: f64,
    hand_to_zoom_scale: f64,
    settle_timeout: Duration,
}

/// One quadrant of the target surface with its own cursor offset.
pub struct Viewport {
    label: Quadrant,
    geometry: ViewportGeometry,
    dimensions: Dimensions,
    offset: Vec2,
    pan_locked: Arc<AtomicBool>,
    zoom_locked: Arc<AtomicBool>,
    pending_releases: Mutex<Vec<JoinHandle<()>>>,
    motion: Motion,
    port: Arc<dyn InjectionPort>,
}

impl Viewport {
    pub fn new(
        label: Quadrant,
        geometry: ViewportGeometry,
        tuning: &Tuning,
        port: Arc<dyn InjectionPort>,
    ) -> Self {
        Self {
            label,
            geometry,
            dimensions: port.dimensions(),
            offset: Vec2::zeros(),
            pan_locked: Arc::new(AtomicBool::new(false)),
            zoom_locked: Arc::new(AtomicBool::new(false)),
            pending_releases: Mutex::new(Vec::new()),
            motion: Motion {
                screen_to_hand_scale: tuning.screen_to_hand_scale,
                hand_to_zoom_scale: tuning.hand_to_zoom_scale,
                settle_timeout: tuning.settle_timeout,
            },
            port,
        }
    }

    pub fn label(&self) -> Quadrant {
        self.label
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn swipe_direction(&self) -> Vec3 {
        self.geometry.swipe_direction
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.geometry.bounding_box
    }

    pub fn is_pan_locked(&self) -> bool {
        self.pan_locked.load(Ordering::Acquire)
    }

    pub fn is_zoom_locked(&self) -> bool {
        self.zoom_locked.load(Ordering::Acquire)
    }

    fn center(&self) -> Vec2 {
        self.dimensions.percent_to_pixels(self.geometry.center_percent)
    }

    /// Where the pointer goes for this viewport: the surface center while
    /// fullscreen, otherwise the anchor plus the live offset.
    pub fn resolve_screen_position(&self, fullscreen: bool) -> Vec2 {
        if fullscreen {
            return self.dimensions.center();
        }
        self.center() + self.offset
    }

    /// Overwrites only the supplied axes. Never clamps.
    pub fn set_offset(&mut self, x: Option<f64>, y: Option<f64>) {
        if let Some(x) = x {
            self.offset.x = x;
        }
        if let Some(y) = y {
            self.offset.y = y;
        }
    }

    pub async fn move_cursor_to_offset(&self, fullscreen: bool) -> Result<(), InjectionError> {
        let position = self.resolve_screen_position(fullscreen);
        self.port.move_to(position.x, position.y).await
    }

    pub async fn pan(
        &self,
        delta: Vec2,
        button: ButtonCode,
        fullscreen: bool,
    ) -> Result<(), InjectionError> {
        let scaled = delta * self.motion.screen_to_hand_scale;
        self.drag_with_lock(&self.pan_locked, scaled, button, fullscreen)
            .await
    }

    /// Vertical-only drag driven by the hands' stretch.
    pub async fn zoom(
        &self,
        delta_y: f64,
        button: ButtonCode,
        fullscreen: bool,
    ) -> Result<(), InjectionError> {
        let scaled = Vec2::new(0.0, delta_y * self.motion.hand_to_zoom_scale);
        self.drag_with_lock(&self.zoom_locked, scaled, button, fullscreen)
            .await
    }

    /// While `lock` is held the button is already down, so motion passes
    /// straight through. Otherwise press, move, take the lock and schedule
    /// the release.
    async fn drag_with_lock(
        &self,
        lock: &Arc<AtomicBool>,
        scaled: Vec2,
        button: ButtonCode,
        fullscreen: bool,
    ) -> Result<(), InjectionError> {
        if lock.load(Ordering::Acquire) {
            return self.port.move_relative(scaled.x, scaled.y).await;
        }

        self.move_cursor_to_offset(fullscreen).await?;
        self.port.mouse_down(button).await?;
        self.port.move_relative(scaled.x, scaled.y).await?;
        lock.store(true, Ordering::Release);
        debug!(viewport = %self.label, %button, "drag started");
        self.schedule_release(Arc::clone(lock), button).await;
        Ok(())
    }

    /// The spawned task is the only writer that clears `lock`.
    async fn schedule_release(&self, lock: Arc<AtomicBool>, button: ButtonCode) {
        let port = Arc::clone(&self.port);
        let settle = self.motion.settle_timeout;
        let label = self.label;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            let released = match port.mouse_up(button).await {
                Ok(()) => port.click(button).await,
                Err(error) => Err(error),
            };
            lock.store(false, Ordering::Release);
            match released {
                Ok(()) => debug!(viewport = %label, %button, "drag released"),
                Err(error) => warn!(viewport = %label, %button, %error, "drag release failed"),
            }
        });

        let mut pending = self.pending_releases.lock().await;
        pending.retain(|task| !task.is_finished());
        pending.push(handle);
    }

    /// Waits for every scheduled release to run.
    pub async fn settle(&self) {
        let pending = std::mem::take(&mut *self.pending_releases.lock().await);
        for task in pending {
            if let Err(error) = task.await {
                warn!(viewport = %self.label, %error, "release task aborted");
            }
        }
    }

    /// Discrete press, move, release, click. Used by the free viewport.
    pub async fn pinch_drag(
        &self,
        delta: Vec2,
        button: ButtonCode,
        fullscreen: bool,
    ) -> Result<(), InjectionError> {
        let scaled = self.scale_pinch(delta);
        self.move_cursor_to_offset(fullscreen).await?;
        self.port.mouse_down(button).await?;
        self.port.move_relative(scaled.x, scaled.y).await?;
        self.port.mouse_up(button).await?;
        self.port.click(button).await
    }

    /// Scales a pinch delta to surface pixels.
    pub fn scale_pinch(&self, delta: Vec2) -> Vec2 {
        delta * self.motion.screen_to_hand_scale
    }

    /// Moves the offset by `delta` pixels, clamping the resulting position
    /// into the bounding box before committing. Returns the clamped position
    /// and the axes that changed, or `None` for the free viewport.
    pub fn clamp_relative(&mut self, delta: Vec2) -> Option<(Vec2, OffsetChange)> {
        let bounds = self.geometry.bounding_box?;
        let center = self.center();
        let candidate = center + self.offset + delta;
        let clamped = bounds.clamp(candidate, self.dimensions);
        let offset = clamped - center;

        let change = OffsetChange {
            x: (offset.x != self.offset.x).then_some(offset.x),
            y: (offset.y != self.offset.y).then_some(offset.y),
        };
        self.offset = offset;
        Some((clamped, change))
    }

    pub async fn click_at(&self, position: Vec2, button: ButtonCode) -> Result<(), InjectionError> {
        self.port.move_to(position.x, position.y).await?;
        self.port.click(button).await
    }
}

#[cfg(test)]
#[path = "tests/viewport_tests.rs"]
mod tests;
