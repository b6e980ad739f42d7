//! Turns tracked hand frames into pointer and keyboard input for a
//! four-quadrant desktop layout.
//!
//! Each frame pair is classified into at most one [`Gesture`] and dispatched
//! to the [`ViewportController`], which drives an [`InjectionPort`].

use shared::{
    domain::{FramePair, Quadrant},
    error::InjectionError,
};
use thiserror::Error;

pub mod classifier;
pub mod controller;
pub mod predicates;
pub mod tuning;
pub mod viewport;

pub use classifier::{Gesture, GestureClassifier, GestureKind, GESTURE_PRIORITY};
pub use controller::{OffsetLink, ViewportController, OFFSET_COUPLINGS};
pub use injection::InjectionPort;
pub use tuning::{Buttons, LayoutConfig, Tuning, ViewportGeometry};
pub use viewport::{OffsetChange, Viewport};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Injection(#[from] InjectionError),
    #[error("viewport {quadrant} has an invalid layout: {reason}")]
    InvalidLayout { quadrant: Quadrant, reason: String },
    #[error("viewport {0} has no bounding box")]
    Unbounded(Quadrant),
}

/// Entry point for the frame source: one classification-and-dispatch cycle.
/// `Ok(None)` means no gesture matched and nothing was injected.
pub async fn process_frame_pair(
    controller: &mut ViewportController,
    pair: FramePair<'_>,
) -> Result<Option<GestureKind>, ControllerError> {
    controller.process(pair).await
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
