// Single-flight guard for operations that must not overlap

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds a busy flag for its lifetime; the flag is cleared when the guard is
/// dropped, including when the owning future is cancelled.
pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    /// Set the flag, or return `None` when it is already set
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
