/*!
 * Core Module
 * Synchronization primitives and error handling shared by the queues
 */

pub mod errors;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use sync::{PopOutcome, QueueConfig, ShutdownFlag, ShutdownListener, ShutdownPolicy, WakeResult};
