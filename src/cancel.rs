//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::util::{PatchMatchError, PatchMatchResult};

/// Cloneable cancellation flag polled by the solver at level and row
/// boundaries.
///
/// All clones share one flag, so a token handed to another thread can stop
/// a run already in progress. Cancellation is cooperative: pixels already
/// committed to an in-place field stay, everything in flight is dropped and
/// the interrupted call returns [`PatchMatchError::Cancelled`].
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; safe to call from any thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> PatchMatchResult<()> {
        if self.is_cancelled() {
            Err(PatchMatchError::Cancelled)
        } else {
            Ok(())
        }
    }
}
