use std::sync::Arc;

use injection::{InjectionPort, RecordingPort};
use shared::{
    domain::{Dimensions, FingerExtension, Frame, Hand, HandId},
    geometry::Vec3,
};

use crate::{LayoutConfig, Tuning, ViewportController};

pub(crate) fn dims() -> Dimensions {
    Dimensions::new(1000.0, 800.0)
}

pub(crate) struct HandBuilder(Hand);

pub(crate) fn hand(id: i64) -> HandBuilder {
    HandBuilder(Hand {
        id: HandId(id),
        pinch_strength: 0.0,
        fingers: FingerExtension::default(),
        palm_position: Vec3::new(0.0, 200.0, 0.0),
        palm_normal: Vec3::new(0.0, -1.0, 0.0),
    })
}

impl HandBuilder {
    pub(crate) fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.0.palm_position = Vec3::new(x, y, z);
        self
    }

    pub(crate) fn pinch(mut self, strength: f64) -> Self {
        self.0.pinch_strength = strength;
        self
    }

    pub(crate) fn pinched(self) -> Self {
        self.pinch(1.0)
    }

    pub(crate) fn normal(mut self, x: f64, y: f64, z: f64) -> Self {
        self.0.palm_normal = Vec3::new(x, y, z);
        self
    }

    /// Thumb, index, middle, ring, pinky.
    pub(crate) fn fingers(mut self, pattern: [bool; 5]) -> Self {
        let [thumb, index, middle, ring, pinky] = pattern;
        self.0.fingers = FingerExtension {
            thumb,
            index,
            middle,
            ring,
            pinky,
        };
        self
    }

    pub(crate) fn l_shape(self) -> Self {
        self.fingers([true, true, false, false, false])
    }

    pub(crate) fn open_palm(self) -> Self {
        self.fingers([true; 5])
    }

    pub(crate) fn swipe_pose(self) -> Self {
        self.fingers([true, true, true, false, false])
    }

    pub(crate) fn build(self) -> Hand {
        self.0
    }
}

pub(crate) fn frame(hands: Vec<Hand>) -> Frame {
    Frame { id: None, hands }
}

pub(crate) fn recording_port() -> Arc<RecordingPort> {
    Arc::new(RecordingPort::new(dims()))
}

pub(crate) async fn controller_on(port: &Arc<RecordingPort>) -> ViewportController {
    controller_with(port, Tuning::default()).await
}

pub(crate) async fn controller_with(
    port: &Arc<RecordingPort>,
    tuning: Tuning,
) -> ViewportController {
    let dyn_port: Arc<dyn InjectionPort> = port.clone();
    let controller = ViewportController::new(dyn_port, tuning, &LayoutConfig::default())
        .await
        .expect("controller");
    port.clear().await;
    controller
}
