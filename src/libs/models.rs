use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Online,
    Away,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub avatar: String,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Source of truth for direct-vs-group. Room ids from the seed data still
/// carry a historical "direct-" prefix, but nothing derives the kind from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Group,
    Direct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: RoomKind,
    pub participants: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
    pub unread_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ChatRoom {
    /// For direct rooms, the participant on the other side of the given user.
    pub fn counterpart_of(&self, user_id: &str) -> Option<&str> {
        if self.kind != RoomKind::Direct {
            return None;
        }
        self.participants
            .iter()
            .find(|p| p.as_str() != user_id)
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    File,
    Emoji,
}

/// Delivery states in their transition order. Per-message status only ever
/// moves forward in this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sending,
    Sent,
    Delivered,
    Read,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_room_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl Message {
    /// Advance delivery status, never regressing an already-later state.
    pub fn advance_status(&mut self, status: DeliveryStatus) {
        if status > self.status {
            self.status = status;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingIndicator {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

const PREVIEW_MAX_LEN: usize = 50;

/// Sidebar preview text for a room's last message.
pub fn last_message_preview(message: &Message) -> String {
    match message.kind {
        MessageKind::Image => "📷 Photo".to_string(),
        MessageKind::File => "📁 File".to_string(),
        MessageKind::Emoji => message.content.clone(),
        MessageKind::Text => {
            if message.content.chars().count() > PREVIEW_MAX_LEN {
                let truncated: String = message.content.chars().take(PREVIEW_MAX_LEN).collect();
                format!("{}...", truncated)
            } else {
                message.content.clone()
            }
        }
    }
}

/// Group rooms show their own name; direct rooms show the counterpart's
/// username.
pub fn display_name(room: &ChatRoom, current_user_id: &str, users: &[User]) -> String {
    match room.kind {
        RoomKind::Group => room.name.clone(),
        RoomKind::Direct => room
            .counterpart_of(current_user_id)
            .and_then(|other_id| users.iter().find(|u| u.id == other_id))
            .map(|u| u.username.clone())
            .unwrap_or_else(|| "Unknown User".to_string()),
    }
}

pub fn total_unread(rooms: &[ChatRoom]) -> u32 {
    rooms.iter().map(|r| r.unread_count).sum()
}
