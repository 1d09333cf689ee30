//! Cooperative cancellation shared between a signal handler and the batch

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// Clones observe the same flag. The signal handler calls [`Interrupt::trigger`];
/// the pipeline polls [`Interrupt::is_set`] before each service call and
/// between documents.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    presses: Arc<AtomicUsize>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cancellation request and return how many have arrived
    pub fn trigger(&self) -> usize {
        self.presses.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_set(&self) -> bool {
        self.presses.load(Ordering::SeqCst) > 0
    }
}
