/*!
 * Condvar Wait Cell
 *
 * One lock, one condition variable and a wait-with-predicate combinator.
 * Both queue flavours are thin wrappers that decide what "take an item"
 * means; the deadline loop, shutdown ordering and waiter bookkeeping live
 * here.
 */

use super::config::ShutdownPolicy;
use super::shutdown::ShutdownFlag;
use super::traits::{ShutdownListener, WakeResult};
use super::wait::PopOutcome;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// State guarded by the cell lock
pub(crate) struct Slot<S> {
    pub items: S,
    /// Threads currently parked in `wait_for`
    pub waiters: usize,
    pub pushed: u64,
    pub delivered: u64,
}

/// Lock + condvar pair shared between pushers and poppers
pub(crate) struct WaitCell<S> {
    slot: Mutex<Slot<S>>,
    condvar: Condvar,
}

impl<S> WaitCell<S> {
    pub fn new(items: S) -> Self {
        Self {
            slot: Mutex::new(Slot {
                items,
                waiters: 0,
                pushed: 0,
                delivered: 0,
            }),
            condvar: Condvar::new(),
        }
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, Slot<S>> {
        self.slot.lock()
    }

    /// Wake every parked waiter
    pub fn notify_all(&self) -> WakeResult {
        WakeResult::from_count(self.condvar.notify_all())
    }

    /// Mutate the state under the lock, then broadcast
    ///
    /// The broadcast happens after the lock is released so woken waiters do
    /// not immediately block on it again.
    pub fn update_and_notify<F>(&self, f: F) -> WakeResult
    where
        F: FnOnce(&mut Slot<S>),
    {
        {
            let mut slot = self.slot.lock();
            f(&mut slot);
        }
        self.notify_all()
    }

    /// Block until `take` yields a value, shutdown is observed or `timeout`
    /// elapses
    ///
    /// `take` both tests and removes under the lock, so a value it returns is
    /// delivered exactly once. Evaluation order on every wake is shutdown
    /// first, then `take`. Once the deadline has passed the predicate gets one
    /// last evaluation before `TimedOut` is reported.
    ///
    /// A timeout too large to express as a deadline waits without one.
    pub fn wait_for<R, F>(
        &self,
        shutdown: &ShutdownFlag,
        policy: ShutdownPolicy,
        timeout: Duration,
        mut take: F,
    ) -> PopOutcome<R>
    where
        F: FnMut(&mut S) -> Option<R>,
    {
        let deadline = Instant::now().checked_add(timeout);
        let mut slot = self.slot.lock();
        let mut expired = false;

        loop {
            if shutdown.is_triggered() {
                if policy == ShutdownPolicy::Drain {
                    if let Some(value) = take(&mut slot.items) {
                        slot.delivered += 1;
                        return PopOutcome::Delivered(value);
                    }
                }
                return PopOutcome::ShuttingDown;
            }

            if let Some(value) = take(&mut slot.items) {
                slot.delivered += 1;
                return PopOutcome::Delivered(value);
            }

            if expired {
                return PopOutcome::TimedOut;
            }

            slot.waiters += 1;
            expired = match deadline {
                Some(deadline) => self.condvar.wait_until(&mut slot, deadline).timed_out(),
                None => {
                    self.condvar.wait(&mut slot);
                    false
                }
            };
            slot.waiters -= 1;
        }
    }
}

impl<S: Send> ShutdownListener for WaitCell<S> {
    fn on_shutdown(&self) -> WakeResult {
        // Taking the lock orders us after any waiter that already checked the
        // flag: it is either parked (and gets the broadcast) or has not
        // checked yet (and will see the flag).
        drop(self.slot.lock());
        self.notify_all()
    }

    fn name(&self) -> &'static str {
        "condvar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::thread;

    fn pop_front(items: &mut VecDeque<u64>) -> Option<u64> {
        items.pop_front()
    }

    #[test]
    fn test_immediate_take_skips_waiting() {
        let cell = WaitCell::new(VecDeque::from(vec![1u64]));
        let flag = ShutdownFlag::new();

        let outcome = cell.wait_for(&flag, ShutdownPolicy::Abandon, Duration::ZERO, pop_front);
        assert_eq!(outcome, PopOutcome::Delivered(1));
        assert_eq!(cell.lock().delivered, 1);
    }

    #[test]
    fn test_timeout() {
        let cell = WaitCell::new(VecDeque::<u64>::new());
        let flag = ShutdownFlag::new();
        let start = Instant::now();

        let outcome = cell.wait_for(
            &flag,
            ShutdownPolicy::Abandon,
            Duration::from_millis(50),
            pop_front,
        );

        assert!(outcome.is_timed_out());
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(cell.lock().waiters, 0);
    }

    #[test]
    fn test_update_wakes_waiter() {
        let cell = Arc::new(WaitCell::new(VecDeque::<u64>::new()));
        let flag = ShutdownFlag::new();

        let cell_clone = cell.clone();
        let flag_clone = flag.clone();
        let handle = thread::spawn(move || {
            cell_clone.wait_for(
                &flag_clone,
                ShutdownPolicy::Abandon,
                Duration::from_secs(5),
                pop_front,
            )
        });

        // Give thread time to park
        thread::sleep(Duration::from_millis(50));
        cell.update_and_notify(|slot| slot.items.push_back(9));

        assert_eq!(handle.join().unwrap(), PopOutcome::Delivered(9));
    }

    #[test]
    fn test_drain_policy_takes_present_item() {
        let cell = WaitCell::new(VecDeque::from(vec![4u64]));
        let flag = ShutdownFlag::new();
        flag.trigger();

        let abandon = cell.wait_for(&flag, ShutdownPolicy::Abandon, Duration::ZERO, pop_front);
        assert!(abandon.is_shutting_down());

        let drain = cell.wait_for(&flag, ShutdownPolicy::Drain, Duration::ZERO, pop_front);
        assert_eq!(drain, PopOutcome::Delivered(4));

        let empty = cell.wait_for(&flag, ShutdownPolicy::Drain, Duration::from_secs(5), pop_front);
        assert!(empty.is_shutting_down());
    }

    #[test]
    fn test_huge_timeout_does_not_overflow() {
        let cell = WaitCell::new(VecDeque::from(vec![8u64]));
        let flag = ShutdownFlag::new();

        let outcome = cell.wait_for(&flag, ShutdownPolicy::Abandon, Duration::MAX, pop_front);
        assert_eq!(outcome, PopOutcome::Delivered(8));
    }
}
