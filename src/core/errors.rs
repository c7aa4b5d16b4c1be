/*!
 * Error Types
 * Queue error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Why a pop delivered nothing
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("No item arrived within {timeout:?}")]
    #[diagnostic(
        code(queue::timed_out),
        help("The queue was quiet. Retry unless shutdown has been requested.")
    )]
    TimedOut { timeout: Duration },

    #[error("Queue is shutting down")]
    #[diagnostic(
        code(queue::shutting_down),
        help("The shutdown flag was triggered. Stop consuming and exit the worker loop.")
    )]
    ShuttingDown,
}

impl QueueError {
    /// Whether retrying the pop can make sense
    pub fn is_retryable(&self) -> bool {
        matches!(self, QueueError::TimedOut { .. })
    }
}

pub type QueueResult<T> = std::result::Result<T, QueueError>;
