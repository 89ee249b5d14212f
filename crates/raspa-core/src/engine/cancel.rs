//! Cancellation of the wait between status polls.
//!
//! A [`CancellationToken`] is shared between the thread running a workflow and whoever
//! may want to stop it (a signal handler, another thread). Cancelling wakes a thread that
//! is currently waiting instead of letting it sleep out the rest of its interval.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Something the polling loop can wait on between status checks.
pub trait Pause {
    /// Blocks for `interval`. Returns `false` if the wait was cut short by cancellation.
    fn pause(&self, interval: Duration) -> bool;

    fn is_cancelled(&self) -> bool;
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Cloneable handle; every clone observes the same cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !*cancelled {
            debug!("Cancellation requested.");
            *cancelled = true;
        }
        self.inner.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Pause for CancellationToken {
    fn pause(&self, interval: Duration) -> bool {
        let deadline = Instant::now() + interval;
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Loop to absorb spurious wake-ups.
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            let (guard, _) = self
                .inner
                .wake
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            cancelled = guard;
        }
        false
    }

    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}
