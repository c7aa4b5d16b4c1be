/*!
 * Shutdown Flag
 *
 * Cooperative cancellation token shared by the owning application, every
 * queue built from it and every thread that waits on those queues.
 *
 * The flag starts untriggered and can only move to triggered. Queues register
 * themselves as weak listeners so that triggering wakes parked waiters right
 * away instead of leaving them asleep until their timeout.
 */

use super::traits::ShutdownListener;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

#[derive(Default)]
struct Inner {
    triggered: AtomicBool,
    listeners: Mutex<Vec<Weak<dyn ShutdownListener>>>,
}

/// Shared shutdown signal
///
/// Cloning is cheap and yields a handle to the same flag.
///
/// # Examples
///
/// ```
/// use handoff_queue::{BlockingQueue, ShutdownFlag};
/// use std::time::Duration;
///
/// let shutdown = ShutdownFlag::new();
/// let queue = BlockingQueue::<u32>::new(shutdown.clone());
///
/// queue.push(7);
/// shutdown.trigger();
///
/// // Shutdown takes priority over pending items
/// assert!(queue.try_pop(Duration::from_millis(10)).is_shutting_down());
/// ```
#[derive(Clone, Default)]
pub struct ShutdownFlag {
    inner: Arc<Inner>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether shutdown has been requested
    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::Acquire)
    }

    /// Request shutdown and wake every waiter on every live queue bound to
    /// this flag
    ///
    /// Returns `true` only for the call that flipped the flag; later calls are
    /// no-ops.
    pub fn trigger(&self) -> bool {
        if self.inner.triggered.swap(true, Ordering::AcqRel) {
            return false;
        }

        // Upgrade outside the listener callbacks so a queue lock is never
        // taken while the registry lock is held.
        let live: Vec<Arc<dyn ShutdownListener>> = {
            let mut listeners = self.inner.listeners.lock();
            listeners.retain(|l| l.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };

        info!(listeners = live.len(), "Shutdown triggered");

        for listener in &live {
            let woken = listener.on_shutdown();
            debug!(
                listener = listener.name(),
                woken = woken.count(),
                "Released waiters for shutdown"
            );
        }

        true
    }

    /// Number of live queues bound to this flag
    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .iter()
            .filter(|l| l.strong_count() > 0)
            .count()
    }

    pub(crate) fn register(&self, listener: Weak<dyn ShutdownListener>) {
        let mut listeners = self.inner.listeners.lock();
        listeners.retain(|l| l.strong_count() > 0);
        listeners.push(listener);
    }
}

impl fmt::Debug for ShutdownFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownFlag")
            .field("triggered", &self.is_triggered())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::WakeResult;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl ShutdownListener for Counting {
        fn on_shutdown(&self) -> WakeResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            WakeResult::NoWaiters
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn test_starts_untriggered() {
        let flag = ShutdownFlag::new();
        assert!(!flag.is_triggered());
        assert!(!flag.clone().is_triggered());
    }

    #[test]
    fn test_trigger_is_shared_and_idempotent() {
        let flag = ShutdownFlag::new();
        let other = flag.clone();

        assert!(other.trigger());
        assert!(flag.is_triggered());
        assert!(!flag.trigger());
        assert!(other.is_triggered());
    }

    #[test]
    fn test_trigger_notifies_listeners_once() {
        let flag = ShutdownFlag::new();
        let listener = Arc::new(Counting::default());
        let weak: Weak<dyn ShutdownListener> = Arc::downgrade(&listener) as Weak<dyn ShutdownListener>;
        flag.register(weak);

        flag.trigger();
        flag.trigger();

        assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_listeners_are_pruned() {
        let flag = ShutdownFlag::new();
        let kept = Arc::new(Counting::default());

        {
            let dropped = Arc::new(Counting::default());
            flag.register(Arc::downgrade(&dropped) as Weak<dyn ShutdownListener>);
            flag.register(Arc::downgrade(&kept) as Weak<dyn ShutdownListener>);
            assert_eq!(flag.listener_count(), 2);
        }

        assert_eq!(flag.listener_count(), 1);
        flag.trigger();
        assert_eq!(kept.calls.load(Ordering::SeqCst), 1);
    }
}
