//! Deferred in-app bridge invocation
//!
//! Some in-app browsers inject the payment bridge object after the page has
//! already started checkout. The session controller must not busy-poll for
//! it; instead the host signals readiness once and any number of waiters
//! wake up. A `watch` channel carries the ready flag so late subscribers
//! observe a signal that fired before they started waiting.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Ready-signal for the in-app payment bridge
///
/// Create one per page load, hand [`BridgeGate::notify_ready`] to the host
/// integration, and let payment sessions wait on it.
#[derive(Debug, Clone)]
pub struct BridgeGate {
    tx: watch::Sender<bool>,
}

impl BridgeGate {
    /// Create a gate in the not-ready state
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Create a gate that is already open (bridge object present at load)
    pub fn ready() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx }
    }

    /// Signal that the bridge object has been injected; idempotent
    pub fn notify_ready(&self) {
        self.tx.send_replace(true);
    }

    /// Check readiness without waiting
    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the bridge is ready or the session is cancelled
    ///
    /// Returns `true` when the bridge became ready, `false` when cancelled
    /// first. Never busy-polls: wakes only on the signal or cancellation.
    pub async fn wait_ready(&self, cancel: &CancellationToken) -> bool {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow() {
                return true;
            }
            tokio::select! {
                _ = cancel.cancelled() => return false,
                changed = rx.changed() => {
                    if changed.is_err() {
                        // sender dropped without signalling
                        return false;
                    }
                }
            }
        }
    }
}

impl Default for BridgeGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ready_gate_returns_immediately() {
        let gate = BridgeGate::ready();
        let cancel = CancellationToken::new();
        assert!(gate.wait_ready(&cancel).await);
    }

    #[tokio::test]
    async fn test_notify_wakes_waiter() {
        let gate = BridgeGate::new();
        let cancel = CancellationToken::new();

        let waiter = {
            let gate = gate.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { gate.wait_ready(&cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!gate.is_ready());
        gate.notify_ready();

        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_cancellation_unblocks_waiter() {
        let gate = BridgeGate::new();
        let cancel = CancellationToken::new();

        let waiter = {
            let gate = gate.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { gate.wait_ready(&cancel).await })
        };

        cancel.cancel();
        assert!(!waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_notify_is_idempotent() {
        let gate = BridgeGate::new();
        gate.notify_ready();
        gate.notify_ready();
        assert!(gate.is_ready());
    }
}
