use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;

use crate::libs::models::{TypingIndicator, User};
use crate::libs::random::RandomSource;
use crate::libs::scheduler::{Task, TimerId, TimerQueue};

/// Where an indicator points: a group room or the receiving side of a direct
/// conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypingTarget {
    Room(String),
    Direct(String),
}

pub const TYPING_EXPIRY: Duration = Duration::from_millis(3000);
pub const PEER_TYPING_MIN_MS: u64 = 2000;
pub const PEER_TYPING_MAX_MS: u64 = 3000;

type TypingKey = (String, TypingTarget);

/// Ephemeral "who is typing where" registry. Each occupant key holds at most
/// one pending expiry timer; re-marking replaces the timer instead of
/// stacking a second one.
#[derive(Debug, Default)]
pub struct TypingTracker {
    indicators: Vec<TypingIndicator>,
    timers: HashMap<TypingKey, TimerId>,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert an active indicator for `(user_id, target)` and re-arm its
    /// 3 s expiry.
    pub fn mark_typing(
        &mut self,
        timers: &mut TimerQueue,
        now: DateTime<Utc>,
        user_id: &str,
        target: TypingTarget,
    ) {
        self.remove_indicator(user_id, &target);

        let (chat_room_id, receiver_id) = match &target {
            TypingTarget::Room(id) => (Some(id.clone()), None),
            TypingTarget::Direct(id) => (None, Some(id.clone())),
        };
        self.indicators.push(TypingIndicator {
            user_id: user_id.to_string(),
            chat_room_id,
            receiver_id,
            timestamp: now,
        });

        let key = (user_id.to_string(), target.clone());
        let timer = timers.schedule_with(now, TYPING_EXPIRY, |id| Task::TypingExpiry {
            user_id: user_id.to_string(),
            target,
            timer: id,
        });
        if let Some(stale) = self.timers.insert(key, timer) {
            timers.cancel(stale);
        }
    }

    /// Remove the indicator and cancel its timer. Safe to call when nothing
    /// is active (an expiry racing an explicit clear lands here).
    pub fn clear_typing(&mut self, timers: &mut TimerQueue, user_id: &str, target: &TypingTarget) {
        self.remove_indicator(user_id, target);
        if let Some(timer) = self.timers.remove(&(user_id.to_string(), target.clone())) {
            timers.cancel(timer);
        }
    }

    /// The 3 s expiry firing for a key. A no-op when the key was cleared or
    /// re-armed in the meantime (the stored timer no longer matches).
    pub fn expire(&mut self, user_id: &str, target: &TypingTarget, timer: TimerId) {
        let key = (user_id.to_string(), target.clone());
        if self.timers.get(&key) != Some(&timer) {
            return;
        }
        self.remove_indicator(user_id, target);
        self.timers.remove(&key);
    }

    /// Active indicators for a target, excluding the given user so the UI
    /// never shows the viewer their own typing.
    pub fn typing_users(
        &self,
        target: Option<&TypingTarget>,
        excluding_user_id: &str,
    ) -> Vec<TypingIndicator> {
        let Some(target) = target else {
            return Vec::new();
        };
        self.indicators
            .iter()
            .filter(|t| t.user_id != excluding_user_id)
            .filter(|t| match target {
                TypingTarget::Room(id) => t.chat_room_id.as_deref() == Some(id.as_str()),
                TypingTarget::Direct(id) => t.receiver_id.as_deref() == Some(id.as_str()),
            })
            .cloned()
            .collect()
    }

    /// Pick a random online user other than `exclude_user_id` and show them
    /// typing in the room for a random 2-3 s burst. No-op when nobody else
    /// is online.
    pub fn simulate_peer_typing(
        &mut self,
        timers: &mut TimerQueue,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
        room_id: &str,
        exclude_user_id: &str,
        online_users: &[User],
    ) {
        let candidates: Vec<&User> = online_users
            .iter()
            .filter(|u| u.id != exclude_user_id)
            .collect();
        if candidates.is_empty() {
            return;
        }

        let peer = candidates[rng.pick(candidates.len())];
        debug!("simulating peer typing: {} in {}", peer.username, room_id);
        self.mark_typing(timers, now, &peer.id, TypingTarget::Room(room_id.to_string()));

        let burst = rng.delay_ms(PEER_TYPING_MIN_MS, PEER_TYPING_MAX_MS);
        timers.schedule(
            now,
            Duration::from_millis(burst),
            Task::PeerTypingStop {
                user_id: peer.id.clone(),
                room_id: room_id.to_string(),
            },
        );
    }

    fn remove_indicator(&mut self, user_id: &str, target: &TypingTarget) {
        self.indicators.retain(|t| {
            if t.user_id != user_id {
                return true;
            }
            match target {
                TypingTarget::Room(id) => t.chat_room_id.as_deref() != Some(id.as_str()),
                TypingTarget::Direct(id) => t.receiver_id.as_deref() != Some(id.as_str()),
            }
        });
    }
}
