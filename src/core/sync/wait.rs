/*!
 * Pop Outcomes
 *
 * The three ways a bounded wait on a queue can end.
 */

use crate::core::errors::{QueueError, QueueResult};
use std::time::Duration;

/// Result of a blocking pop
///
/// Unlike a bare `Option`, callers can tell a quiet queue (retry) apart from
/// shutdown (exit).
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a popped item is dropped if the outcome is ignored"]
pub enum PopOutcome<T> {
    /// An item was removed from the queue and moved to the caller
    Delivered(T),
    /// The timeout elapsed with nothing to deliver
    TimedOut,
    /// The shutdown flag was observed
    ShuttingDown,
}

impl<T> PopOutcome<T> {
    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self, PopOutcome::Delivered(_))
    }

    #[inline]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, PopOutcome::TimedOut)
    }

    #[inline]
    pub fn is_shutting_down(&self) -> bool {
        matches!(self, PopOutcome::ShuttingDown)
    }

    /// Collapse to "value or nothing"
    pub fn into_option(self) -> Option<T> {
        match self {
            PopOutcome::Delivered(item) => Some(item),
            PopOutcome::TimedOut | PopOutcome::ShuttingDown => None,
        }
    }

    /// Convert into a `Result`, recording the timeout that expired
    pub fn into_result(self, timeout: Duration) -> QueueResult<T> {
        match self {
            PopOutcome::Delivered(item) => Ok(item),
            PopOutcome::TimedOut => Err(QueueError::TimedOut { timeout }),
            PopOutcome::ShuttingDown => Err(QueueError::ShuttingDown),
        }
    }

    pub fn map<U, F>(self, f: F) -> PopOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            PopOutcome::Delivered(item) => PopOutcome::Delivered(f(item)),
            PopOutcome::TimedOut => PopOutcome::TimedOut,
            PopOutcome::ShuttingDown => PopOutcome::ShuttingDown,
        }
    }
}

impl<T> From<PopOutcome<T>> for Option<T> {
    fn from(outcome: PopOutcome<T>) -> Self {
        outcome.into_option()
    }
}
