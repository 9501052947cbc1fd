//! The shared active/inactive flag.

use core::sync::atomic::{AtomicBool, Ordering};

/// Single source of truth for whether lights and tone are on.
///
/// Anyone may read it; only [`OutputController`](crate::controller::OutputController)
/// writes it, and only from inside its critical section.
pub struct ActiveState {
    active: AtomicBool,
}

impl ActiveState {
    /// Starts inactive.
    pub const fn new() -> Self {
        ActiveState {
            active: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Store `active`, returning the previous value.
    #[inline]
    pub(crate) fn replace(&self, active: bool) -> bool {
        self.active.swap(active, Ordering::AcqRel)
    }
}

impl Default for ActiveState {
    fn default() -> Self {
        Self::new()
    }
}
