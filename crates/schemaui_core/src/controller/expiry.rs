//! Deadline queue for transient messages.

use crate::model::message::MessageId;
use crate::settings::MessageExpiry;
use std::collections::VecDeque;

/// Pending message deadlines, ordered by arming time.
///
/// Deadlines are `now + ttl` with a fixed ttl and a monotonic clock, so the
/// queue stays sorted by deadline without explicit ordering.
#[derive(Debug, Default)]
pub(crate) struct MessageTimers {
    pending: VecDeque<(u64, MessageId)>,
}

impl MessageTimers {
    pub(crate) fn arm(&mut self, id: MessageId, deadline_ms: u64, policy: MessageExpiry) {
        if policy == MessageExpiry::LatestOnly {
            self.pending.clear();
        }
        self.pending.push_back((deadline_ms, id));
    }

    /// Removes and returns every message id whose deadline is at or before
    /// `now_ms`.
    pub(crate) fn take_due(&mut self, now_ms: u64) -> Vec<MessageId> {
        let mut due = Vec::new();
        while let Some(&(deadline, id)) = self.pending.front() {
            if deadline > now_ms {
                break;
            }
            self.pending.pop_front();
            due.push(id);
        }
        due
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }
}
