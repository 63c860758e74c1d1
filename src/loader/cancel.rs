// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cancellation for in-flight loads.
//!
//! The guard belongs to whoever owns the view; dropping it, or calling
//! `cancel`, cancels every token cloned from the pair.

use tokio::sync::watch;

/// Owner side; cancels on `cancel()` or drop
#[derive(Debug)]
pub struct CancelGuard {
    tx: watch::Sender<bool>,
}

/// Observer side, cheap to clone
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Create a linked guard and token
pub fn cancellation() -> (CancelGuard, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelGuard { tx }, CancelToken { rx })
}

impl CancelGuard {
    pub fn cancel(&self) {
        // No receivers left means nobody is loading
        let _ = self.tx.send(true);
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the guard cancels or is dropped
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
