use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::geometry::{Vec2, Vec3};

macro_rules! code_newtype {
    ($name:ident, $repr:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub $repr);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

code_newtype!(HandId, i64);
code_newtype!(ButtonCode, u8);
code_newtype!(KeyCode, u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];
}

/// Per-finger extension flags as reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerExtension {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerExtension {
    pub fn is_extended(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub id: HandId,
    pub pinch_strength: f64,
    pub fingers: FingerExtension,
    pub palm_position: Vec3,
    pub palm_normal: Vec3,
}

impl Hand {
    /// Translation of this hand relative to its own pose in `prior`.
    /// `None` when the hand was not tracked in that frame.
    pub fn translation_since(&self, prior: &Frame) -> Option<Vec3> {
        prior
            .hand_by_id(self.id)
            .map(|then| self.palm_position - then.palm_position)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl Frame {
    pub fn first_hand(&self) -> Option<&Hand> {
        self.hands.first()
    }

    pub fn second_hand(&self) -> Option<&Hand> {
        self.hands.get(1)
    }

    pub fn hand_by_id(&self, id: HandId) -> Option<&Hand> {
        self.hands.iter().find(|hand| hand.id == id)
    }
}

/// The atomic classification unit: the previous frame and the current one.
#[derive(Debug, Clone, Copy)]
pub struct FramePair<'a> {
    pub previous: &'a Frame,
    pub current: &'a Frame,
}

impl<'a> FramePair<'a> {
    pub fn new(previous: &'a Frame, current: &'a Frame) -> Self {
        Self { previous, current }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Enumeration order; also the tie-break order for swipe scoring.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quadrant::TopLeft => "TOP_LEFT",
            Quadrant::TopRight => "TOP_RIGHT",
            Quadrant::BottomLeft => "BOTTOM_LEFT",
            Quadrant::BottomRight => "BOTTOM_RIGHT",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown viewport '{0}'")]
pub struct UnknownQuadrant(pub String);

impl FromStr for Quadrant {
    type Err = UnknownQuadrant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Quadrant::ALL
            .into_iter()
            .find(|quadrant| quadrant.as_str() == normalized)
            .ok_or_else(|| UnknownQuadrant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Pixel geometry of the target surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Converts a `[x%, y%]` surface anchor into pixels.
    pub fn percent_to_pixels(&self, percent: Vec2) -> Vec2 {
        Vec2::new(
            percent.x * self.width / 100.0,
            percent.y * self.height / 100.0,
        )
    }
}

/// Percent-of-surface rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl BoundingBox {
    /// Clamps a pixel position into the box, one axis at a time.
    pub fn clamp(&self, position: Vec2, dimensions: Dimensions) -> Vec2 {
        let left = self.left * dimensions.width / 100.0;
        let right = self.right * dimensions.width / 100.0;
        let top = self.top * dimensions.height / 100.0;
        let bottom = self.bottom * dimensions.height / 100.0;
        Vec2::new(
            position.x.max(left).min(right),
            position.y.max(top).min(bottom),
        )
    }

    pub fn contains(&self, position: Vec2, dimensions: Dimensions) -> bool {
        self.clamp(position, dimensions) == position
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
