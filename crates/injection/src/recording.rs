use std::collections::HashSet;

use async_trait::async_trait;
use shared::{
    domain::{ButtonCode, Dimensions, KeyCode},
    error::{InjectionError, InjectionOp},
    geometry::Vec2,
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{InjectionPort, InjectionResult};

#[derive(Debug, Clone, PartialEq)]
pub enum InjectionCall {
    Move { x: f64, y: f64 },
    MoveRelative { dx: f64, dy: f64 },
    MouseDown(ButtonCode),
    MouseUp(ButtonCode),
    Click(ButtonCode),
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    KeyPress(KeyCode),
}

impl InjectionCall {
    pub fn op(&self) -> InjectionOp {
        match self {
            InjectionCall::Move { .. } => InjectionOp::Move,
            InjectionCall::MoveRelative { .. } => InjectionOp::MoveRelative,
            InjectionCall::MouseDown(_) => InjectionOp::MouseDown,
            InjectionCall::MouseUp(_) => InjectionOp::MouseUp,
            InjectionCall::Click(_) => InjectionOp::Click,
            InjectionCall::KeyDown(_) => InjectionOp::KeyDown,
            InjectionCall::KeyUp(_) => InjectionOp::KeyUp,
            InjectionCall::KeyPress(_) => InjectionOp::KeyPress,
        }
    }
}

struct RecordingState {
    calls: Vec<InjectionCall>,
    pointer: Vec2,
    fail_on: HashSet<InjectionOp>,
    unsupported_keys: HashSet<KeyCode>,
}

impl Default for RecordingState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            pointer: Vec2::zeros(),
            fail_on: HashSet::new(),
            unsupported_keys: HashSet::new(),
        }
    }
}

/// In-memory port: records every successful call in order and tracks a
/// virtual pointer. Drives `--dry-run` and the test suites.
pub struct RecordingPort {
    dimensions: Dimensions,
    state: Mutex<RecordingState>,
}

impl RecordingPort {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            state: Mutex::new(RecordingState::default()),
        }
    }

    /// Every call of `op` is rejected and left out of the log.
    pub fn failing_on(mut self, op: InjectionOp) -> Self {
        self.state.get_mut().fail_on.insert(op);
        self
    }

    /// `key` fails `check_key` with `Unsupported`.
    pub fn without_key(mut self, key: KeyCode) -> Self {
        self.state.get_mut().unsupported_keys.insert(key);
        self
    }

    /// Starts rejecting `op` from now on.
    pub async fn fail_on(&self, op: InjectionOp) {
        self.state.lock().await.fail_on.insert(op);
    }

    pub async fn recover(&self) {
        self.state.lock().await.fail_on.clear();
    }

    pub async fn calls(&self) -> Vec<InjectionCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn clear(&self) {
        self.state.lock().await.calls.clear();
    }

    pub async fn pointer(&self) -> Vec2 {
        self.state.lock().await.pointer
    }

    async fn record(&self, call: InjectionCall) -> InjectionResult {
        let op = call.op();
        let mut state = self.state.lock().await;
        if state.fail_on.contains(&op) {
            return Err(InjectionError::rejected(op, "configured to fail"));
        }

        debug!(op = op.as_str(), ?call, "recorded injection");
        match call {
            InjectionCall::Move { x, y } => state.pointer = Vec2::new(x.round(), y.round()),
            InjectionCall::MoveRelative { dx, dy } => {
                state.pointer += Vec2::new(dx.round(), dy.round())
            }
            _ => {}
        }
        state.calls.push(call);
        Ok(())
    }
}

#[async_trait]
impl InjectionPort for RecordingPort {
    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    async fn check_key(&self, key: KeyCode) -> InjectionResult {
        if self.state.lock().await.unsupported_keys.contains(&key) {
            return Err(InjectionError::Unsupported(key.0));
        }
        Ok(())
    }

    async fn move_to(&self, x: f64, y: f64) -> InjectionResult {
        self.record(InjectionCall::Move { x, y }).await
    }

    async fn move_relative(&self, dx: f64, dy: f64) -> InjectionResult {
        self.record(InjectionCall::MoveRelative { dx, dy }).await
    }

    async fn mouse_down(&self, button: ButtonCode) -> InjectionResult {
        self.record(InjectionCall::MouseDown(button)).await
    }

    async fn mouse_up(&self, button: ButtonCode) -> InjectionResult {
        self.record(InjectionCall::MouseUp(button)).await
    }

    async fn click(&self, button: ButtonCode) -> InjectionResult {
        self.record(InjectionCall::Click(button)).await
    }

    async fn key_down(&self, key: KeyCode) -> InjectionResult {
        self.record(InjectionCall::KeyDown(key)).await
    }

    async fn key_up(&self, key: KeyCode) -> InjectionResult {
        self.record(InjectionCall::KeyUp(key)).await
    }

    async fn key_press(&self, key: KeyCode) -> InjectionResult {
        self.record(InjectionCall::KeyPress(key)).await
    }
}

#[cfg(test)]
#[path = "tests/recording_tests.rs"]
mod tests;
