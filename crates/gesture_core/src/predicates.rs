//! Pose predicates over a single hand and motion quantities over a frame pair.
//!
//! Every predicate takes `Option<&Hand>` and treats an absent hand as a plain
//! `false`, so callers never special-case missing hands.

use shared::{
    domain::{Finger, Frame, FramePair, Hand},
    geometry::Vec3,
};

/// Which tracked hand of a frame a quantity refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandSlot {
    First,
    Second,
}

impl HandSlot {
    pub fn pick(self, frame: &Frame) -> Option<&Hand> {
        match self {
            HandSlot::First => frame.first_hand(),
            HandSlot::Second => frame.second_hand(),
        }
    }
}

pub fn is_pinched(hand: Option<&Hand>, threshold: f64) -> bool {
    hand.is_some_and(|hand| hand.pinch_strength >= threshold)
}

pub fn is_extended(finger: Finger, hand: Option<&Hand>) -> bool {
    hand.is_some_and(|hand| hand.fingers.is_extended(finger))
}

/// Extension pattern in thumb, index, middle, ring, pinky order.
fn has_finger_pattern(hand: Option<&Hand>, pattern: [bool; 5]) -> bool {
    hand.is_some_and(|hand| {
        Finger::ALL
            .into_iter()
            .zip(pattern)
            .all(|(finger, extended)| hand.fingers.is_extended(finger) == extended)
    })
}

pub fn is_l_shape(hand: Option<&Hand>) -> bool {
    has_finger_pattern(hand, [true, true, false, false, false])
}

pub fn is_open_palm(hand: Option<&Hand>) -> bool {
    has_finger_pattern(hand, [true, true, true, true, true])
}

/// Thumb, index and middle out; ring and pinky curled.
pub fn is_swipe_pose(hand: Option<&Hand>) -> bool {
    has_finger_pattern(hand, [true, true, true, false, false])
}

/// Palm turned toward the sensor: depth component of the normal at or
/// below `threshold` (a negative number).
pub fn palm_facing_forward(hand: Option<&Hand>, threshold: f64) -> bool {
    hand.is_some_and(|hand| hand.palm_normal.z <= threshold)
}

/// Translation of the hand in `slot` of the current frame since the prior
/// frame. `None` when the hand is absent now or was not tracked before.
pub fn displacement(pair: FramePair<'_>, slot: HandSlot) -> Option<Vec3> {
    slot.pick(pair.current)?.translation_since(pair.previous)
}

pub fn inter_hand_distance(first: &Hand, second: &Hand) -> f64 {
    (first.palm_position - second.palm_position).norm()
}

fn frame_hand_distance(frame: &Frame) -> Option<f64> {
    Some(inter_hand_distance(
        frame.first_hand()?,
        frame.second_hand()?,
    ))
}

/// Current inter-hand distance minus the prior one; positive when the hands
/// move apart. Requires two hands in both frames.
pub fn stretch_delta(pair: FramePair<'_>) -> Option<f64> {
    Some(frame_hand_distance(pair.current)? - frame_hand_distance(pair.previous)?)
}

/// Squared per-frame speed of the hand in `slot`; absent hands yield `None`.
pub fn squared_velocity(pair: FramePair<'_>, slot: HandSlot) -> Option<f64> {
    displacement(pair, slot).map(|d| d.norm_squared())
}

#[cfg(test)]
#[path = "tests/predicates_tests.rs"]
mod tests;
