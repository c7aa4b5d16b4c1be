/*!
 * Queue Module
 * Blocking hand-off queues between producer and consumer threads
 *
 * - `BlockingQueue<T>`: FIFO, pop the head
 * - `KeyedBlockingQueue<K, V>`: pop the first pair matching a key, leave the
 *   rest in place
 *
 * Both are unbounded, wake every waiter on push and stop delivering once
 * their `ShutdownFlag` fires.
 */

pub mod fifo;
pub mod keyed;
pub mod types;

// Re-export public API
pub use fifo::BlockingQueue;
pub use keyed::KeyedBlockingQueue;
pub use types::QueueStats;
