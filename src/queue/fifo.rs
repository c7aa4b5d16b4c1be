/*!
 * FIFO Queue
 * First-in-first-out blocking queue with bounded waits
 */

use super::types::{snapshot, QueueStats};
use crate::core::sync::{
    PopOutcome, QueueConfig, ShutdownFlag, ShutdownListener, ShutdownPolicy, WaitCell,
};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, trace};

/// Unbounded FIFO queue shared by any number of producers and consumers
///
/// # Examples
///
/// ```
/// use handoff_queue::{BlockingQueue, PopOutcome, ShutdownFlag};
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let shutdown = ShutdownFlag::new();
/// let queue = Arc::new(BlockingQueue::new(shutdown.clone()));
///
/// let producer = {
///     let queue = queue.clone();
///     thread::spawn(move || queue.push("job"))
/// };
///
/// assert_eq!(queue.try_pop(Duration::from_secs(1)), PopOutcome::Delivered("job"));
/// producer.join().unwrap();
/// ```
pub struct BlockingQueue<T> {
    cell: Arc<WaitCell<VecDeque<T>>>,
    shutdown: ShutdownFlag,
    policy: ShutdownPolicy,
}

impl<T: Send + 'static> BlockingQueue<T> {
    /// Create a queue bound to `shutdown` with the default (abandon) policy
    pub fn new(shutdown: ShutdownFlag) -> Self {
        Self::with_config(shutdown, QueueConfig::default())
    }

    pub fn with_config(shutdown: ShutdownFlag, config: QueueConfig) -> Self {
        let cell = Arc::new(WaitCell::new(VecDeque::with_capacity(
            config.initial_capacity,
        )));
        let listener: Weak<dyn ShutdownListener> = Arc::downgrade(&cell) as Weak<dyn ShutdownListener>;
        shutdown.register(listener);

        Self {
            cell,
            shutdown,
            policy: config.shutdown_policy,
        }
    }

    /// Append `item` at the tail and wake all waiters
    pub fn push(&self, item: T) {
        let woken = self.cell.update_and_notify(|slot| {
            slot.items.push_back(item);
            slot.pushed += 1;
        });
        trace!(woken = woken.count(), "Pushed item");
    }

    /// Remove the head, waiting up to `timeout` for one to arrive
    ///
    /// Returns `ShuttingDown` as soon as the shutdown flag is seen, even if
    /// items are pending (unless the queue was built with
    /// `ShutdownPolicy::Drain`).
    pub fn try_pop(&self, timeout: Duration) -> PopOutcome<T> {
        let outcome = self
            .cell
            .wait_for(&self.shutdown, self.policy, timeout, VecDeque::pop_front);

        match &outcome {
            PopOutcome::Delivered(_) => trace!("Delivered item"),
            PopOutcome::TimedOut => debug!(timeout_ms = timeout.as_millis() as u64, "Pop timed out"),
            PopOutcome::ShuttingDown => debug!("Pop refused, shutting down"),
        }
        outcome
    }

    /// Number of pending items
    pub fn len(&self) -> usize {
        self.cell.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.lock().items.is_empty()
    }

    pub fn stats(&self) -> QueueStats {
        snapshot(&self.cell, self.shutdown.is_triggered())
    }

    /// Remove every pending item in FIFO order, ignoring shutdown
    pub fn drain(&self) -> Vec<T> {
        let items: Vec<T> = self.cell.lock().items.drain(..).collect();
        debug!(count = items.len(), "Drained queue");
        items
    }

    /// The flag this queue stops on
    pub fn shutdown_flag(&self) -> &ShutdownFlag {
        &self.shutdown
    }
}

impl<T> Drop for BlockingQueue<T> {
    fn drop(&mut self) {
        let woken = self.cell.notify_all();
        debug!(woken = woken.count(), "Dropping blocking queue");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_fifo_order() {
        let queue = BlockingQueue::new(ShutdownFlag::new());
        for i in 0..5 {
            queue.push(i);
        }

        for i in 0..5 {
            assert_eq!(queue.try_pop(Duration::ZERO), PopOutcome::Delivered(i));
        }
        assert!(queue.try_pop(Duration::ZERO).is_timed_out());
    }

    #[test]
    fn test_len_and_empty() {
        let queue = BlockingQueue::new(ShutdownFlag::new());
        assert!(queue.is_empty());

        queue.push("a");
        queue.push("b");
        assert_eq!(queue.len(), 2);
        assert!(!queue.is_empty());

        let _ = queue.try_pop(Duration::ZERO);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_timeout_on_empty() {
        let queue = BlockingQueue::<u32>::new(ShutdownFlag::new());
        let start = Instant::now();

        let outcome = queue.try_pop(Duration::from_millis(50));

        assert!(outcome.is_timed_out());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_shutdown_abandons_pending() {
        let shutdown = ShutdownFlag::new();
        let queue = BlockingQueue::new(shutdown.clone());
        queue.push(1);
        shutdown.trigger();

        assert!(queue.try_pop(Duration::from_secs(1)).is_shutting_down());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_drain_policy_delivers_pending() {
        let shutdown = ShutdownFlag::new();
        let queue = BlockingQueue::with_config(shutdown.clone(), QueueConfig::drain_on_shutdown());
        queue.push(1);
        queue.push(2);
        shutdown.trigger();

        assert_eq!(queue.try_pop(Duration::from_secs(1)), PopOutcome::Delivered(1));
        assert_eq!(queue.try_pop(Duration::from_secs(1)), PopOutcome::Delivered(2));

        let start = Instant::now();
        assert!(queue.try_pop(Duration::from_secs(5)).is_shutting_down());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_stats_and_drain() {
        let shutdown = ShutdownFlag::new();
        let queue = BlockingQueue::new(shutdown.clone());
        for i in 0..4 {
            queue.push(i);
        }
        let _ = queue.try_pop(Duration::ZERO);

        let stats = queue.stats();
        assert_eq!(stats.length, 3);
        assert_eq!(stats.pushed, 4);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.waiters, 0);
        assert!(!stats.shutdown);

        shutdown.trigger();
        assert_eq!(queue.drain(), vec![1, 2, 3]);
        assert!(queue.is_empty());
        assert!(queue.stats().shutdown);
    }

    #[test]
    fn test_waiter_is_counted() {
        let queue = Arc::new(BlockingQueue::<u8>::new(ShutdownFlag::new()));
        let queue_clone = queue.clone();

        let handle = thread::spawn(move || queue_clone.try_pop(Duration::from_secs(5)));

        // Give thread time to park
        thread::sleep(Duration::from_millis(50));
        assert_eq!(queue.stats().waiters, 1);

        queue.push(3);
        assert_eq!(handle.join().unwrap(), PopOutcome::Delivered(3));
        assert_eq!(queue.stats().waiters, 0);
    }

    #[test]
    fn test_dropped_queue_unregisters() {
        let shutdown = ShutdownFlag::new();
        {
            let _queue = BlockingQueue::<u8>::new(shutdown.clone());
            assert_eq!(shutdown.listener_count(), 1);
        }
        assert_eq!(shutdown.listener_count(), 0);
    }
}
