use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::libs::typing::TypingTarget;

/// Deferred mutations the engine can queue against itself. Each carries just
/// enough identity for the dispatcher to re-check liveness when it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Possible simulated counterpart reply to a sent message.
    AutoReply { room_id: String, prompt: String },
    /// Kick off a simulated peer typing burst in a room.
    TypingPulse { room_id: String, exclude_user: String },
    /// End of a simulated peer typing burst.
    PeerTypingStop { user_id: String, room_id: String },
    /// Auto-expiry of a typing indicator that was never cleared. Carries its
    /// own timer id so a fired-but-stale expiry can tell it was re-armed.
    TypingExpiry {
        user_id: String,
        target: TypingTarget,
        timer: TimerId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct TimerEntry {
    fire_at: DateTime<Utc>,
    seq: u64,
    id: TimerId,
    task: Task,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the earliest deadline first; seq
        // breaks ties in scheduling order.
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Single-threaded timer wheel standing in for the original's setTimeout
/// chains. Nothing fires on its own: the owner drains due tasks from its own
/// call path, so a task never runs in parallel with a direct operation.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: BinaryHeap<TimerEntry>,
    cancelled: HashSet<TimerId>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: DateTime<Utc>, delay: Duration, task: Task) -> TimerId {
        self.schedule_with(now, delay, |_| task)
    }

    /// Schedule a task that needs to know its own timer id (expiry tasks
    /// embed it to detect re-arming).
    pub fn schedule_with(
        &mut self,
        now: DateTime<Utc>,
        delay: Duration,
        make_task: impl FnOnce(TimerId) -> Task,
    ) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = TimerId(seq);
        let fire_at =
            now + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());
        self.entries.push(TimerEntry {
            fire_at,
            seq,
            id,
            task: make_task(id),
        });
        id
    }

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    pub fn cancel(&mut self, id: TimerId) {
        self.cancelled.insert(id);
    }

    /// Remove and return every task due at `now`, in firing order. Cancelled
    /// entries are dropped on the way out.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> Vec<Task> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.peek() {
            if entry.fire_at > now {
                break;
            }
            let Some(entry) = self.entries.pop() else {
                break;
            };
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            due.push(entry.task);
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
