//! Deterministic teardown for the periodic monitor tasks.

use tokio::sync::watch;

/// Receiving side of the shutdown signal, cloned into every periodic task.
#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// Sending side of the shutdown signal.
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Create a linked trigger/listener pair.
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl ShutdownTrigger {
    /// Signal every listener to stop.
    pub fn trigger(self) {
        let _ = self.tx.send(true);
    }
}

impl Shutdown {
    /// Resolve once shutdown has been triggered.
    pub async fn cancelled(&mut self) {
        while !*self.rx.borrow() {
            if self.rx.changed().await.is_err() {
                break;
            }
        }
    }

    /// Whether shutdown has been triggered.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_wakes_listeners() {
        let (trigger, mut shutdown) = shutdown_channel();
        assert!(!shutdown.is_cancelled());

        trigger.trigger();
        shutdown.cancelled().await;
        assert!(shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn dropped_trigger_also_releases_listeners() {
        let (trigger, mut shutdown) = shutdown_channel();
        drop(trigger);
        // changed() errors once the sender is gone; cancelled must return.
        shutdown.cancelled().await;
    }
}
