/*!
 * Queue Configuration
 *
 * Construction-time configuration for blocking queues
 */

use serde::{Deserialize, Serialize};

/// What a waiter does with pending items once shutdown has been observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Shutdown wins: pending items are left in the queue and never delivered
    #[default]
    Abandon,
    /// Items already present (and matching) are still handed out, but nobody
    /// waits for new ones
    Drain,
}

/// Queue configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Behaviour of `try_pop` after shutdown
    pub shutdown_policy: ShutdownPolicy,
    /// Slots reserved up front in the backing storage
    pub initial_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::abandon_on_shutdown()
    }
}

impl QueueConfig {
    /// Stop delivering as soon as shutdown is seen (default)
    pub const fn abandon_on_shutdown() -> Self {
        Self {
            shutdown_policy: ShutdownPolicy::Abandon,
            initial_capacity: 0,
        }
    }

    /// Keep handing out already-queued items after shutdown
    pub const fn drain_on_shutdown() -> Self {
        Self {
            shutdown_policy: ShutdownPolicy::Drain,
            initial_capacity: 0,
        }
    }

    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
