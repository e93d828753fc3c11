//! Stop signal handed to the replay loops at spawn time

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Raises the stop signal. Cheap to clone; every clone drives the same signal.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

/// Observes the stop signal
#[derive(Debug, Clone)]
pub struct StopToken {
    rx: watch::Receiver<bool>,
}

impl StopHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Ask every loop holding a token to stop at its next iteration
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// New token observing this handle
    pub fn token(&self) -> StopToken {
        StopToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StopToken {
    /// True once stop was raised or every handle was dropped
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the token is stopped
    pub async fn stopped(&mut self) {
        // Err means the handle is gone, which counts as stopped
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }

    /// Sleep for `delay` unless stopped first. Returns true if stopped.
    pub async fn sleep(&mut self, delay: Duration) -> bool {
        let interrupted = tokio::select! {
            _ = tokio::time::sleep(delay) => false,
            _ = self.stopped() => true,
        };
        interrupted || self.is_stopped()
    }
}
