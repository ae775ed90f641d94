use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info};
use uuid::Uuid;

use crate::libs::identity::{IdentityStore, ProfileUpdate};
use crate::libs::models::{
    display_name, ChatRoom, DeliveryStatus, Message, MessageKind, Reaction, RoomKind, Theme,
    TypingIndicator, User,
};
use crate::libs::persist::{
    self, KvStore, MemoryKvStore, KEY_CHAT_ROOMS, KEY_CURRENT_USER, KEY_MESSAGES, KEY_THEME,
};
use crate::libs::random::{RandomSource, ThreadRandom};
use crate::libs::responder;
use crate::libs::scheduler::{Task, TimerQueue};
use crate::libs::seed::{self, DEFAULT_RESPONDER};
use crate::libs::typing::{TypingTarget, TypingTracker};
use crate::ChatError;

/// Chance that a sent message provokes a simulated counterpart reply at all.
/// Independent of the responder's own suppression gate; the two are chained
/// on purpose.
pub const REPLY_PROBABILITY: f64 = 0.4;
pub const REPLY_DELAY_MIN_MS: u64 = 1000;
pub const REPLY_DELAY_MAX_MS: u64 = 3000;
pub const TYPING_PULSE_DELAY: Duration = Duration::from_millis(500);

/// Rooms and their message logs. Message order within a room is append
/// order, which is also chronological order since appends are synchronous.
#[derive(Debug, Default)]
pub struct ChatStore {
    rooms: Vec<ChatRoom>,
    messages: HashMap<String, Vec<Message>>,
}

impl ChatStore {
    pub fn new(rooms: Vec<ChatRoom>, messages: HashMap<String, Vec<Message>>) -> Self {
        Self { rooms, messages }
    }

    pub fn rooms(&self) -> &[ChatRoom] {
        &self.rooms
    }

    pub fn room(&self, room_id: &str) -> Option<&ChatRoom> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    fn room_mut(&mut self, room_id: &str) -> Option<&mut ChatRoom> {
        self.rooms.iter_mut().find(|r| r.id == room_id)
    }

    pub fn messages(&self, room_id: &str) -> &[Message] {
        self.messages.get(room_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_messages(&self) -> &HashMap<String, Vec<Message>> {
        &self.messages
    }

    /// Append to a room's log and refresh the room's last-message pointer.
    /// `unread_delta` is 0 for the sender's own messages and 1 for simulated
    /// counterpart traffic.
    fn append_message(&mut self, room_id: &str, message: Message, unread_delta: u32) {
        self.messages
            .entry(room_id.to_string())
            .or_default()
            .push(message.clone());
        if let Some(room) = self.room_mut(room_id) {
            room.last_message = Some(message);
            if unread_delta == 0 {
                room.unread_count = 0;
            } else {
                room.unread_count += unread_delta;
            }
        }
    }

    /// Message ids are globally unique, so a reaction target is looked up
    /// across every room's log.
    fn find_message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages
            .values_mut()
            .flat_map(|log| log.iter_mut())
            .find(|m| m.id == message_id)
    }

    /// Zero the unread counter and advance everything not sent by
    /// `reader_id` to Read. Idempotent; statuses never regress.
    fn mark_as_read(&mut self, room_id: &str, reader_id: Option<&str>) {
        if let Some(room) = self.room_mut(room_id) {
            room.unread_count = 0;
        }
        if let Some(log) = self.messages.get_mut(room_id) {
            for message in log.iter_mut() {
                if Some(message.sender_id.as_str()) != reader_id {
                    message.advance_status(DeliveryStatus::Read);
                }
            }
            let last = log.last().cloned();
            if let Some(room) = self.room_mut(room_id) {
                if last.is_some() {
                    room.last_message = last;
                }
            }
        }
    }

    /// Rooms ordered by most recent message, message-less rooms last, seed
    /// order preserved among ties (the sort is stable).
    pub fn rooms_by_activity(&self) -> Vec<ChatRoom> {
        let mut rooms = self.rooms.clone();
        rooms.sort_by(|a, b| {
            let a_last = self.messages.get(&a.id).and_then(|log| log.last());
            let b_last = self.messages.get(&b.id).and_then(|log| log.last());
            match (a_last, b_last) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => b.timestamp.cmp(&a.timestamp),
            }
        });
        rooms
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub current_user: Option<User>,
    pub users: Vec<User>,
    pub chat_rooms: Vec<ChatRoom>,
    pub messages: HashMap<String, Vec<Message>>,
    pub active_room: Option<String>,
    pub typing_indicators: Vec<TypingIndicator>,
    pub theme: Theme,
}

/// The engine: identity, rooms and messages, typing state, theme, and the
/// timer queue that simulates a live counterpart. One instance owns all chat
/// state for the app's lifetime; the presentation layer holds it by handle
/// and issues commands into it.
pub struct ChatApp {
    identity: IdentityStore,
    typing: TypingTracker,
    store: ChatStore,
    timers: TimerQueue,
    rng: Box<dyn RandomSource>,
    kv: Box<dyn KvStore>,
    theme: Theme,
    active_room: Option<String>,
}

impl ChatApp {
    pub fn new() -> Self {
        Self::with_parts(Box::new(MemoryKvStore::new()), Box::new(ThreadRandom::new()))
    }

    /// Build against an explicit persistence store and randomness source.
    /// Persisted rooms/messages/session/theme are loaded when present and
    /// well-formed; anything absent or corrupt falls back to the seed data.
    pub fn with_parts(kv: Box<dyn KvStore>, rng: Box<dyn RandomSource>) -> Self {
        let rooms = persist::load_or(kv.as_ref(), KEY_CHAT_ROOMS, seed::seed_rooms);
        let messages = persist::load_or(kv.as_ref(), KEY_MESSAGES, seed::seed_messages);
        let theme = persist::load_or(kv.as_ref(), KEY_THEME, || Theme::Light);
        let stored_user: Option<User> = persist::load_or(kv.as_ref(), KEY_CURRENT_USER, || None);

        let mut identity = IdentityStore::new(seed::seed_users());
        if let Some(user) = stored_user {
            identity.restore_session(user);
        }

        Self {
            identity,
            typing: TypingTracker::new(),
            store: ChatStore::new(rooms, messages),
            timers: TimerQueue::new(),
            rng,
            kv,
            theme,
            active_room: None,
        }
    }

    // ── Session ────────────────────────────────────────────────────────

    pub fn login(&mut self, username: &str, avatar: Option<String>) -> User {
        let user = self.identity.login(username, avatar);
        persist::save(self.kv.as_mut(), KEY_CURRENT_USER, &Some(user.clone()));
        user
    }

    pub fn logout(&mut self) -> Result<(), ChatError> {
        self.identity.logout()?;
        self.active_room = None;
        self.kv.remove(KEY_CURRENT_USER);
        Ok(())
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User, ChatError> {
        let user = self.identity.update_profile(update)?;
        persist::save(self.kv.as_mut(), KEY_CURRENT_USER, &Some(user.clone()));
        Ok(user)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.identity.current_user()
    }

    pub fn users(&self) -> &[User] {
        self.identity.users()
    }

    // ── Theme ──────────────────────────────────────────────────────────

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Pure flip between light and dark, persisted, no other side effects.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        persist::save(self.kv.as_mut(), KEY_THEME, &self.theme);
        self.theme
    }

    // ── Messaging ──────────────────────────────────────────────────────

    /// Send into the active room. Strict variant: reports why a command was
    /// not accepted instead of absorbing it.
    pub fn try_send_message(
        &mut self,
        content: &str,
        kind: MessageKind,
    ) -> Result<Message, ChatError> {
        let sender = self
            .identity
            .current_user()
            .cloned()
            .ok_or(ChatError::NoActiveSession)?;
        let room_id = self
            .active_room
            .clone()
            .ok_or_else(|| ChatError::InvalidInput("no active room".to_string()))?;
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatError::InvalidInput("empty message".to_string()));
        }
        let room = self
            .store
            .room(&room_id)
            .ok_or_else(|| ChatError::InvalidInput(format!("unknown room {}", room_id)))?;

        // Exactly one of the two targets, decided by the room's kind.
        let (chat_room_id, receiver_id) = match room.kind {
            RoomKind::Group => (Some(room_id.clone()), None),
            RoomKind::Direct => (
                None,
                room.counterpart_of(&sender.id).map(str::to_string),
            ),
        };

        let now = Utc::now();
        let message = Message {
            id: Uuid::now_v7().to_string(),
            content: content.to_string(),
            sender_id: sender.id.clone(),
            receiver_id,
            chat_room_id,
            timestamp: now,
            kind,
            reactions: Vec::new(),
            status: DeliveryStatus::Sent,
            reply_to: None,
        };

        // The sender has nothing unread in a room they just wrote to.
        self.store.append_message(&room_id, message.clone(), 0);
        self.persist_chat_state();

        let reply_delay = self.rng.delay_ms(REPLY_DELAY_MIN_MS, REPLY_DELAY_MAX_MS);
        self.timers.schedule(
            now,
            Duration::from_millis(reply_delay),
            Task::AutoReply {
                room_id: room_id.clone(),
                prompt: content.to_string(),
            },
        );
        self.timers.schedule(
            now,
            TYPING_PULSE_DELAY,
            Task::TypingPulse {
                room_id,
                exclude_user: sender.id,
            },
        );

        info!("message {} sent by {}", message.id, message.sender_id);
        Ok(message)
    }

    /// Absorbing variant: invalid commands are no-ops, per the best-effort
    /// model of this engine.
    pub fn send_message(&mut self, content: &str, kind: MessageKind) -> Option<Message> {
        match self.try_send_message(content, kind) {
            Ok(message) => Some(message),
            Err(err) => {
                debug!("send absorbed: {}", err);
                None
            }
        }
    }

    pub fn mark_as_read(&mut self, room_id: &str) {
        let reader = self.identity.current_user_id().map(str::to_string);
        self.store.mark_as_read(room_id, reader.as_deref());
        self.persist_chat_state();
    }

    /// Toggle the current user's `(emoji, user)` reaction on a message.
    pub fn toggle_reaction(&mut self, message_id: &str, emoji: &str) -> Result<(), ChatError> {
        let user_id = self
            .identity
            .current_user_id()
            .map(str::to_string)
            .ok_or(ChatError::NoActiveSession)?;
        let message = self
            .store
            .find_message_mut(message_id)
            .ok_or_else(|| ChatError::MessageNotFound(message_id.to_string()))?;

        let existing = message
            .reactions
            .iter()
            .position(|r| r.emoji == emoji && r.user_id == user_id);
        match existing {
            Some(index) => {
                message.reactions.remove(index);
            }
            None => message.reactions.push(Reaction {
                emoji: emoji.to_string(),
                user_id,
                timestamp: Utc::now(),
            }),
        }
        self.persist_chat_state();
        Ok(())
    }

    /// Unconditionally drop the current user's `(emoji, user)` reaction.
    /// Unknown messages and absent reactions are absorbed.
    pub fn remove_reaction(&mut self, message_id: &str, emoji: &str) -> Result<(), ChatError> {
        let user_id = self
            .identity
            .current_user_id()
            .map(str::to_string)
            .ok_or(ChatError::NoActiveSession)?;
        if let Some(message) = self.store.find_message_mut(message_id) {
            message
                .reactions
                .retain(|r| !(r.emoji == emoji && r.user_id == user_id));
            self.persist_chat_state();
        }
        Ok(())
    }

    /// Point the session at a room (or none). Opening a room marks it read.
    pub fn set_active_room(&mut self, room_id: Option<String>) {
        self.active_room = room_id.clone();
        if let Some(room_id) = room_id {
            self.mark_as_read(&room_id);
        }
    }

    pub fn active_room(&self) -> Option<&str> {
        self.active_room.as_deref()
    }

    // ── Typing ─────────────────────────────────────────────────────────

    pub fn mark_typing(&mut self, user_id: &str, target: TypingTarget) {
        self.typing
            .mark_typing(&mut self.timers, Utc::now(), user_id, target);
    }

    pub fn clear_typing(&mut self, user_id: &str, target: &TypingTarget) {
        self.typing.clear_typing(&mut self.timers, user_id, target);
    }

    pub fn typing_users(
        &self,
        target: Option<&TypingTarget>,
        excluding_user_id: &str,
    ) -> Vec<TypingIndicator> {
        self.typing.typing_users(target, excluding_user_id)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn rooms_sorted_by_activity(&self) -> Vec<ChatRoom> {
        self.store.rooms_by_activity()
    }

    /// Case-insensitive substring match over computed display names. A blank
    /// query returns everything, in activity order.
    pub fn search_rooms(&self, query: &str) -> Vec<ChatRoom> {
        let rooms = self.store.rooms_by_activity();
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return rooms;
        }
        let current_id = self.identity.current_user_id().unwrap_or("");
        rooms
            .into_iter()
            .filter(|room| {
                display_name(room, current_id, self.identity.users())
                    .to_lowercase()
                    .contains(&query)
            })
            .collect()
    }

    pub fn messages(&self, room_id: &str) -> &[Message] {
        self.store.messages(room_id)
    }

    pub fn room(&self, room_id: &str) -> Option<&ChatRoom> {
        self.store.room(room_id)
    }

    pub fn pending_tasks(&self) -> usize {
        self.timers.pending()
    }

    /// Everything the presentation layer renders from, cloned. Typing
    /// indicators are scoped to the active room and never include the
    /// viewer's own.
    pub fn snapshot(&self) -> Snapshot {
        let current_user = self.identity.current_user().cloned();
        let current_id = current_user.as_ref().map(|u| u.id.clone());
        let target = self.active_typing_target();
        Snapshot {
            typing_indicators: self
                .typing
                .typing_users(target.as_ref(), current_id.as_deref().unwrap_or("")),
            current_user,
            users: self.identity.users().to_vec(),
            chat_rooms: self.store.rooms_by_activity(),
            messages: self.store.all_messages().clone(),
            active_room: self.active_room.clone(),
            theme: self.theme,
        }
    }

    /// Typing query target for the active room: the room itself for groups,
    /// the viewer's receiving side for direct chats.
    fn active_typing_target(&self) -> Option<TypingTarget> {
        let room_id = self.active_room.as_deref()?;
        let room = self.store.room(room_id)?;
        match room.kind {
            RoomKind::Group => Some(TypingTarget::Room(room.id.clone())),
            RoomKind::Direct => self
                .identity
                .current_user_id()
                .map(|id| TypingTarget::Direct(id.to_string())),
        }
    }

    // ── Deferred simulation ────────────────────────────────────────────

    /// Drive the timer queue up to `now`, dispatching every due task in
    /// firing order. Tasks a dispatched task schedules for later stay
    /// queued; nothing here runs concurrently with anything else.
    pub fn run_pending(&mut self, now: DateTime<Utc>) {
        loop {
            let due = self.timers.drain_due(now);
            if due.is_empty() {
                break;
            }
            for task in due {
                self.dispatch(task, now);
            }
        }
    }

    fn dispatch(&mut self, task: Task, now: DateTime<Utc>) {
        match task {
            Task::AutoReply { room_id, prompt } => self.dispatch_auto_reply(&room_id, &prompt, now),
            Task::TypingPulse {
                room_id,
                exclude_user,
            } => {
                // Liveness: the room and session may be gone by now.
                if !self.identity.is_authenticated() || self.store.room(&room_id).is_none() {
                    debug!("typing pulse dropped for {}", room_id);
                    return;
                }
                let online = self.identity.online_users();
                self.typing.simulate_peer_typing(
                    &mut self.timers,
                    self.rng.as_mut(),
                    now,
                    &room_id,
                    &exclude_user,
                    &online,
                );
            }
            Task::PeerTypingStop { user_id, room_id } => {
                self.typing
                    .clear_typing(&mut self.timers, &user_id, &TypingTarget::Room(room_id));
            }
            Task::TypingExpiry {
                user_id,
                target,
                timer,
            } => self.typing.expire(&user_id, &target, timer),
        }
    }

    fn dispatch_auto_reply(&mut self, room_id: &str, prompt: &str, now: DateTime<Utc>) {
        // Liveness first: the session may have ended or the room vanished
        // while the timer was pending.
        let Some(current) = self.identity.current_user().cloned() else {
            debug!("auto-reply dropped, session ended");
            return;
        };
        let Some(room) = self.store.room(room_id) else {
            debug!("auto-reply dropped, room {} gone", room_id);
            return;
        };

        if !self.rng.chance(REPLY_PROBABILITY) {
            return;
        }
        let Some(reply) = responder::generate_auto_response(prompt, self.rng.as_mut()) else {
            return;
        };

        let (sender_id, receiver_id, chat_room_id) = match room.kind {
            RoomKind::Direct => {
                let counterpart = room
                    .counterpart_of(&current.id)
                    .unwrap_or(DEFAULT_RESPONDER)
                    .to_string();
                (counterpart, Some(current.id.clone()), None)
            }
            RoomKind::Group => (
                DEFAULT_RESPONDER.to_string(),
                None,
                Some(room_id.to_string()),
            ),
        };

        let message = Message {
            id: Uuid::now_v7().to_string(),
            content: reply,
            sender_id,
            receiver_id,
            chat_room_id,
            timestamp: now,
            kind: MessageKind::Text,
            reactions: Vec::new(),
            status: DeliveryStatus::Delivered,
            reply_to: None,
        };
        debug!("auto-reply {} into {}", message.id, room_id);
        self.store.append_message(room_id, message, 1);
        self.persist_chat_state();
    }

    fn persist_chat_state(&mut self) {
        persist::save(self.kv.as_mut(), KEY_CHAT_ROOMS, &self.store.rooms);
        persist::save(self.kv.as_mut(), KEY_MESSAGES, &self.store.messages);
    }
}

impl Default for ChatApp {
    fn default() -> Self {
        Self::new()
    }
}
