/*!
 * Keyed Queue
 * Blocking queue of (key, value) pairs with selective consumption by key
 */

use super::types::{snapshot, QueueStats};
use crate::core::sync::{
    PopOutcome, QueueConfig, ShutdownFlag, ShutdownListener, ShutdownPolicy, WaitCell,
};
use std::borrow::Borrow;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, trace};

/// Unbounded queue of keyed messages
///
/// Consumers bound to different keys can share one queue: a pop only ever
/// removes the first pair whose key matches, and pairs for other keys keep
/// their place and relative order. Within one key, delivery is FIFO.
///
/// Each pop scans the pending pairs linearly, which suits queues holding a
/// handful of pending items per key.
///
/// # Examples
///
/// ```
/// use handoff_queue::{KeyedBlockingQueue, PopOutcome, ShutdownFlag};
/// use std::time::Duration;
///
/// let queue = KeyedBlockingQueue::new(ShutdownFlag::new());
/// queue.push("a", 1);
/// queue.push("b", 2);
///
/// assert_eq!(queue.try_pop(Duration::ZERO, "b"), PopOutcome::Delivered(2));
/// assert_eq!(queue.try_pop(Duration::ZERO, "a"), PopOutcome::Delivered(1));
/// ```
pub struct KeyedBlockingQueue<K, V> {
    cell: Arc<WaitCell<VecDeque<(K, V)>>>,
    shutdown: ShutdownFlag,
    policy: ShutdownPolicy,
}

impl<K, V> KeyedBlockingQueue<K, V>
where
    K: Eq + Send + 'static,
    V: Send + 'static,
{
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

    /// Append `(key, value)` at the tail and wake all waiters
    pub fn push(&self, key: K, value: V) {
        let woken = self.cell.update_and_notify(|slot| {
            slot.items.push_back((key, value));
            slot.pushed += 1;
        });
        trace!(woken = woken.count(), "Pushed keyed item");
    }

    /// Remove the first pair matching `key`, waiting up to `timeout` for one
    ///
    /// Non-matching pairs are never consumed or reordered. Waiting on a key
    /// nobody pushes simply ends in `TimedOut` or `ShuttingDown`.
    pub fn try_pop<Q>(&self, timeout: Duration, key: &Q) -> PopOutcome<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let outcome = self.cell.wait_for(&self.shutdown, self.policy, timeout, |items| {
            let index = items.iter().position(|(k, _)| k.borrow() == key)?;
            items.remove(index).map(|(_, value)| value)
        });

        match &outcome {
            PopOutcome::Delivered(_) => trace!("Delivered keyed item"),
            PopOutcome::TimedOut => {
                debug!(timeout_ms = timeout.as_millis() as u64, "Keyed pop timed out")
            }
            PopOutcome::ShuttingDown => debug!("Keyed pop refused, shutting down"),
        }
        outcome
    }

    /// Number of pending pairs, all keys included
    pub fn len(&self) -> usize {
        self.cell.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.lock().items.is_empty()
    }

    /// Number of pending pairs for one key
    pub fn pending_for<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.cell
            .lock()
            .items
            .iter()
            .filter(|(k, _)| k.borrow() == key)
            .count()
    }

    pub fn stats(&self) -> QueueStats {
        snapshot(&self.cell, self.shutdown.is_triggered())
    }

    /// Remove every pending pair in push order, ignoring shutdown
    pub fn drain(&self) -> Vec<(K, V)> {
        let items: Vec<(K, V)> = self.cell.lock().items.drain(..).collect();
        debug!(count = items.len(), "Drained keyed queue");
        items
    }

    /// The flag this queue stops on
    pub fn shutdown_flag(&self) -> &ShutdownFlag {
        &self.shutdown
    }
}

impl<K, V> Drop for KeyedBlockingQueue<K, V> {
    fn drop(&mut self) {
        let woken = self.cell.notify_all();
        debug!(woken = woken.count(), "Dropping keyed queue");
    }
}
