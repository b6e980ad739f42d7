use shared::{
    domain::{FramePair, Hand},
    geometry::{to_screen_plane, Vec2, Vec3},
};

use crate::{
    predicates::{
        displacement, is_l_shape, is_open_palm, is_pinched, is_swipe_pose, palm_facing_forward,
        squared_velocity, stretch_delta, HandSlot,
    },
    tuning::Tuning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    OneHandPinchDrag,
    TwoHandPinchZoom,
    OneHandLShapePan,
    OneHandSwipeSwitch,
    TwoHandFullscreenStretch,
}

impl GestureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GestureKind::OneHandPinchDrag => "one_hand_pinch_drag",
            GestureKind::TwoHandPinchZoom => "two_hand_pinch_zoom",
            GestureKind::OneHandLShapePan => "one_hand_l_shape_pan",
            GestureKind::OneHandSwipeSwitch => "one_hand_swipe_switch",
            GestureKind::TwoHandFullscreenStretch => "two_hand_fullscreen_stretch",
        }
    }
}

/// Evaluation order; the first matching kind wins because the underlying
/// pose sets overlap (an L-shape that is also pinched is a pinch).
pub const GESTURE_PRIORITY: [GestureKind; 5] = [
    GestureKind::OneHandPinchDrag,
    GestureKind::TwoHandPinchZoom,
    GestureKind::OneHandLShapePan,
    GestureKind::OneHandSwipeSwitch,
    GestureKind::TwoHandFullscreenStretch,
];

/// A classified frame pair with its continuous payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Screen-plane displacement of the first hand (Y already flipped).
    OneHandPinchDrag(Vec2),
    /// Stretch delta between the two hands.
    TwoHandPinchZoom(f64),
    /// Screen-plane displacement of the first hand (Y already flipped).
    OneHandLShapePan(Vec2),
    /// Raw tracking-space displacement, scored against swipe directions.
    OneHandSwipeSwitch(Vec3),
    /// Stretch delta; its sign picks entering or leaving fullscreen.
    TwoHandFullscreenStretch(f64),
    NoGesture,
}

impl Gesture {
    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            Gesture::OneHandPinchDrag(_) => Some(GestureKind::OneHandPinchDrag),
            Gesture::TwoHandPinchZoom(_) => Some(GestureKind::TwoHandPinchZoom),
            Gesture::OneHandLShapePan(_) => Some(GestureKind::OneHandLShapePan),
            Gesture::OneHandSwipeSwitch(_) => Some(GestureKind::OneHandSwipeSwitch),
            Gesture::TwoHandFullscreenStretch(_) => Some(GestureKind::TwoHandFullscreenStretch),
            Gesture::NoGesture => None,
        }
    }
}

/// Stateless, synchronous classifier over frame pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureClassifier {
    pinch_threshold: f64,
    swipe_speed_threshold_squared: f64,
    palm_forward_threshold: f64,
}

impl GestureClassifier {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pinch_threshold: tuning.pinch_threshold,
            swipe_speed_threshold_squared: tuning.swipe_speed_threshold_squared(),
            palm_forward_threshold: tuning.palm_forward_threshold,
        }
    }

    /// Palm orientation under the configured threshold. Not part of any
    /// gesture rule; exposed for frame sources that filter on it.
    pub fn palm_facing_forward(&self, hand: Option<&Hand>) -> bool {
        palm_facing_forward(hand, self.palm_forward_threshold)
    }

    pub fn classify(&self, pair: FramePair<'_>) -> Gesture {
        let Some(kind) = GESTURE_PRIORITY
            .into_iter()
            .find(|kind| self.matches(*kind, pair))
        else {
            return Gesture::NoGesture;
        };
        // The matched kind owns the frame pair even when its payload cannot
        // be computed (hand absent from the prior frame).
        self.payload(kind, pair).unwrap_or(Gesture::NoGesture)
    }

    pub fn matches(&self, kind: GestureKind, pair: FramePair<'_>) -> bool {
        let first = pair.current.first_hand();
        let second = pair.current.second_hand();
        match kind {
            GestureKind::OneHandPinchDrag => {
                is_pinched(first, self.pinch_threshold)
                    && !is_pinched(second, self.pinch_threshold)
            }
            GestureKind::TwoHandPinchZoom => {
                is_pinched(first, self.pinch_threshold) && is_pinched(second, self.pinch_threshold)
            }
            GestureKind::OneHandLShapePan => {
                is_l_shape(first) && !is_pinched(first, self.pinch_threshold)
            }
            GestureKind::OneHandSwipeSwitch => {
                is_swipe_pose(first)
                    && squared_velocity(pair, HandSlot::First)
                        .is_some_and(|speed| speed > self.swipe_speed_threshold_squared)
            }
            GestureKind::TwoHandFullscreenStretch => is_open_palm(first) && is_open_palm(second),
        }
    }

    fn payload(&self, kind: GestureKind, pair: FramePair<'_>) -> Option<Gesture> {
        let gesture = match kind {
            GestureKind::OneHandPinchDrag => Gesture::OneHandPinchDrag(to_screen_plane(&displacement(
                pair,
                HandSlot::First,
            )?)),
            GestureKind::TwoHandPinchZoom => Gesture::TwoHandPinchZoom(stretch_delta(pair)?),
            GestureKind::OneHandLShapePan => Gesture::OneHandLShapePan(to_screen_plane(&displacement(
                pair,
                HandSlot::First,
            )?)),
            GestureKind::OneHandSwipeSwitch => {
                Gesture::OneHandSwipeSwitch(displacement(pair, HandSlot::First)?)
            }
            GestureKind::TwoHandFullscreenStretch => {
                Gesture::TwoHandFullscreenStretch(stretch_delta(pair)?)
            }
        };
        Some(gesture)
    }
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
