//! Capture mutual-exclusion flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// Guards against overlapping report round-trips.
///
/// `capturing` is only ever set through [`try_begin`](Self::try_begin), and
/// the returned guard clears it on drop, so every exit path (success, error,
/// panic, cancellation) leaves it false.
#[derive(Debug, Default)]
pub struct CaptureState {
    capturing: AtomicBool,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    /// Claims the flag, or `None` if a report is already in flight.
    pub fn try_begin(&self) -> Option<CaptureGuard<'_>> {
        self.capturing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| CaptureGuard { state: self })
    }
}

/// Holds `capturing = true` for its lifetime.
#[derive(Debug)]
pub struct CaptureGuard<'a> {
    state: &'a CaptureState,
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.state.capturing.store(false, Ordering::SeqCst);
    }
}
