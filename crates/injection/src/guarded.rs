use std::collections::BTreeSet;

use async_trait::async_trait;
use shared::domain::{ButtonCode, Dimensions, KeyCode};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{InjectionPort, InjectionResult};

#[derive(Default)]
struct Held {
    buttons: BTreeSet<u8>,
    keys: BTreeSet<u32>,
}

/// Tracks buttons and keys that are logically held down so they can be
/// released if the process stops in the middle of a gesture.
pub struct GuardedPort<P> {
    inner: P,
    held: Mutex<Held>,
}

impl<P: InjectionPort> GuardedPort<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            held: Mutex::new(Held::default()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub async fn held_buttons(&self) -> Vec<ButtonCode> {
        self.held
            .lock()
            .await
            .buttons
            .iter()
            .copied()
            .map(ButtonCode)
            .collect()
    }

    /// Releases everything still held. Failures are logged and the remaining
    /// releases are still attempted; returns how many releases succeeded.
    pub async fn release_all(&self) -> usize {
        let mut held = self.held.lock().await;
        let mut released = 0;

        for button in std::mem::take(&mut held.buttons) {
            match self.inner.mouse_up(ButtonCode(button)).await {
                Ok(()) => released += 1,
                Err(error) => warn!(button, %error, "failed to release held button"),
            }
        }
        for key in std::mem::take(&mut held.keys) {
            match self.inner.key_up(KeyCode(key)).await {
                Ok(()) => released += 1,
                Err(error) => warn!(key, %error, "failed to release held key"),
            }
        }

        if released > 0 {
            info!(released, "released held inputs");
        }
        released
    }
}

#[async_trait]
impl<P: InjectionPort> InjectionPort for GuardedPort<P> {
    fn dimensions(&self) -> Dimensions {
        self.inner.dimensions()
    }

    async fn check_key(&self, key: KeyCode) -> InjectionResult {
        self.inner.check_key(key).await
    }

    async fn move_to(&self, x: f64, y: f64) -> InjectionResult {
        self.inner.move_to(x, y).await
    }

    async fn move_relative(&self, dx: f64, dy: f64) -> InjectionResult {
        self.inner.move_relative(dx, dy).await
    }

    async fn mouse_down(&self, button: ButtonCode) -> InjectionResult {
        self.inner.mouse_down(button).await?;
        self.held.lock().await.buttons.insert(button.0);
        Ok(())
    }

    async fn mouse_up(&self, button: ButtonCode) -> InjectionResult {
        self.inner.mouse_up(button).await?;
        self.held.lock().await.buttons.remove(&button.0);
        Ok(())
    }

    async fn click(&self, button: ButtonCode) -> InjectionResult {
        self.inner.click(button).await
    }

    async fn key_down(&self, key: KeyCode) -> InjectionResult {
        self.inner.key_down(key).await?;
        self.held.lock().await.keys.insert(key.0);
        Ok(())
    }

    async fn key_up(&self, key: KeyCode) -> InjectionResult {
        self.inner.key_up(key).await?;
        self.held.lock().await.keys.remove(&key.0);
        Ok(())
    }

    async fn key_press(&self, key: KeyCode) -> InjectionResult {
        self.inner.key_press(key).await
    }
}

#[cfg(test)]
#[path = "tests/guarded_tests.rs"]
mod tests;
