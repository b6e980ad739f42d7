//! The input-injection boundary: pointer and keyboard primitives that the
//! gesture core drives, plus the adapters that implement them.

use async_trait::async_trait;
use shared::{
    domain::{ButtonCode, Dimensions, KeyCode},
    error::InjectionError,
};

mod guarded;
mod recording;
mod xdotool;

pub use guarded::GuardedPort;
pub use recording::{InjectionCall, RecordingPort};
pub use xdotool::{WindowTarget, XdotoolPort, DEFAULT_PROGRAM as DEFAULT_XDOTOOL};

pub type InjectionResult = Result<(), InjectionError>;

/// Pointer/keyboard synthesis on a target surface.
///
/// Every operation completes before its future resolves, so chaining with
/// `.await` preserves call order on the surface.
#[async_trait]
pub trait InjectionPort: Send + Sync {
    /// Pixel geometry of the target surface, fixed after startup.
    fn dimensions(&self) -> Dimensions;
    /// Whether `key` can be synthesized at all. Lets callers reject an
    /// unusable key binding at startup instead of on first use.
    async fn check_key(&self, _key: KeyCode) -> InjectionResult {
        Ok(())
    }
    async fn move_to(&self, x: f64, y: f64) -> InjectionResult;
    async fn move_relative(&self, dx: f64, dy: f64) -> InjectionResult;
    async fn mouse_down(&self, button: ButtonCode) -> InjectionResult;
    async fn mouse_up(&self, button: ButtonCode) -> InjectionResult;
    /// Press and release.
    async fn click(&self, button: ButtonCode) -> InjectionResult;
    async fn key_down(&self, key: KeyCode) -> InjectionResult;
    async fn key_up(&self, key: KeyCode) -> InjectionResult;
    /// Press and release.
    async fn key_press(&self, key: KeyCode) -> InjectionResult;
}
