/*!
 * Queue Types
 * Common types shared by the FIFO and keyed queues
 */

use crate::core::sync::WaitCell;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Point-in-time queue statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Items currently pending
    pub length: usize,
    /// Threads parked in `try_pop`
    pub waiters: usize,
    /// Items pushed since construction
    pub pushed: u64,
    /// Items handed out by `try_pop`
    pub delivered: u64,
    /// Whether the bound shutdown flag has been triggered
    pub shutdown: bool,
}

pub(super) fn snapshot<T>(cell: &WaitCell<VecDeque<T>>, shutdown: bool) -> QueueStats {
    let slot = cell.lock();
    QueueStats {
        length: slot.items.len(),
        waiters: slot.waiters,
        pushed: slot.pushed,
        delivered: slot.delivered,
        shutdown,
    }
}
