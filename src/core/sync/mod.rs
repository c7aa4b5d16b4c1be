/*!
 * Synchronization Primitives
 *
 * Wait/notify building blocks for the blocking queues:
 * - `ShutdownFlag`: shared cancellation token, triggered once, never reset
 * - `WaitCell`: mutex + condvar with a wait-with-predicate combinator
 * - `QueueConfig`: construction-time policy (abandon vs drain on shutdown)
 *
 * # Architecture
 *
 * Every wake is a broadcast followed by a re-check under the lock. With keyed
 * selection a woken waiter may find nothing for its key and has to park
 * again without swallowing the wake meant for someone else.
 */

mod condvar;
mod config;
mod shutdown;
mod traits;
mod wait;

pub use config::{QueueConfig, ShutdownPolicy};
pub use shutdown::ShutdownFlag;
pub use traits::{ShutdownListener, WakeResult};
pub use wait::PopOutcome;

pub(crate) use condvar::WaitCell;
