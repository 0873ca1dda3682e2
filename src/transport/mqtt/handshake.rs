//! One-shot handshake latch
//!
//! The event loop task owns a [`HandshakeSignal`] and resolves it when the
//! CONNACK (or a failure) arrives; the caller of `establish` owns the matching
//! [`HandshakeWaiter`] and blocks on it with a timeout. Only the first terminal
//! transition is kept, later signals are ignored.

use super::connection::ConnectError;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    Pending,
    Succeeded,
    Failed(ConnectError),
}

impl HandshakeState {
    pub fn is_pending(&self) -> bool {
        matches!(self, HandshakeState::Pending)
    }

    fn outcome(&self) -> Option<Result<(), ConnectError>> {
        match self {
            HandshakeState::Pending => None,
            HandshakeState::Succeeded => Some(Ok(())),
            HandshakeState::Failed(error) => Some(Err(error.clone())),
        }
    }
}

/// Writer half, held by the background event loop task
#[derive(Debug)]
pub struct HandshakeSignal {
    tx: watch::Sender<HandshakeState>,
}

/// Reader half, consumed by the single waiter
#[derive(Debug)]
pub struct HandshakeWaiter {
    rx: watch::Receiver<HandshakeState>,
}

/// Create a pending latch
pub fn handshake_latch() -> (HandshakeSignal, HandshakeWaiter) {
    let (tx, rx) = watch::channel(HandshakeState::Pending);
    (HandshakeSignal { tx }, HandshakeWaiter { rx })
}

impl HandshakeSignal {
    /// Returns false if the latch was already resolved
    pub fn succeed(&self) -> bool {
        self.resolve(HandshakeState::Succeeded)
    }

    /// Returns false if the latch was already resolved
    pub fn fail(&self, error: ConnectError) -> bool {
        self.resolve(HandshakeState::Failed(error))
    }

    pub fn is_resolved(&self) -> bool {
        !self.tx.borrow().is_pending()
    }

    fn resolve(&self, terminal: HandshakeState) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_pending() {
                *state = terminal;
                true
            } else {
                false
            }
        })
    }
}

impl HandshakeWaiter {
    /// Wait until the latch resolves or `timeout` elapses
    ///
    /// A signal dropped while still pending means the event loop died before
    /// reaching the broker.
    pub async fn wait(mut self, timeout: Duration) -> Result<(), ConnectError> {
        let resolved = tokio::time::timeout(timeout, async {
            match self.rx.wait_for(|state| !state.is_pending()).await {
                Ok(state) => state.outcome(),
                Err(_) => None,
            }
        })
        .await;

        match resolved {
            Ok(Some(outcome)) => outcome,
            Ok(None) => Err(ConnectError::Unreachable(
                "event loop stopped before CONNACK".to_string(),
            )),
            Err(_) => Err(ConnectError::Timeout(timeout)),
        }
    }
}
