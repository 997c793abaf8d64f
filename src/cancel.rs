//! Cooperative cancellation for in-flight instrument operations.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::error::{Error, Result};

/// A cloneable cancellation flag.
///
/// Every clone observes the same flag, so a token handed to another thread can stop
/// an operation running on this one. Once cancelled a token stays cancelled; install
/// a fresh one to carry on issuing commands.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token which has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Return [`Error::Canceled`] if cancellation has been requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Canceled)
        } else {
            Ok(())
        }
    }
}
