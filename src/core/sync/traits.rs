/*!
 * Synchronization Traits
 *
 * Seams between the shutdown token and the queues that wait on it.
 */

/// Result of a broadcast wake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Woke N parked waiters (N >= 1)
    Woken(usize),
    /// Nobody was parked
    NoWaiters,
}

impl WakeResult {
    pub(crate) fn from_count(count: usize) -> Self {
        if count == 0 {
            WakeResult::NoWaiters
        } else {
            WakeResult::Woken(count)
        }
    }

    /// Check if any waiters were woken
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }

    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }
}

/// Something that parks threads and must release them when shutdown fires
///
/// Implementations must be:
/// - **Thread-safe**: called from whichever thread triggers shutdown
/// - **Race-free**: a waiter that checked the flag before the trigger must
///   still be woken, so implementations synchronize with their own lock
///   before broadcasting
pub trait ShutdownListener: Send + Sync {
    /// Wake every thread parked on this listener
    fn on_shutdown(&self) -> WakeResult;

    /// Name for diagnostics
    fn name(&self) -> &'static str;
}
