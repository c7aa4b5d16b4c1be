/*!
 * Handoff Queue Library
 * Blocking hand-off queues for producer/consumer threads
 *
 * - `BlockingQueue<T>`: unbounded FIFO with bounded-wait pops
 * - `KeyedBlockingQueue<K, V>`: pops only the first pair matching a key
 * - `ShutdownFlag`: shared token that stops every queue bound to it
 */

pub mod core;
pub mod monitoring;
pub mod queue;

// Re-exports
pub use crate::core::{
    PopOutcome, QueueConfig, QueueError, QueueResult, ShutdownFlag, ShutdownPolicy,
};
pub use monitoring::init_tracing;
pub use queue::{BlockingQueue, KeyedBlockingQueue, QueueStats};
