use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

use crate::libs::models::{
    ChatRoom, DeliveryStatus, Message, MessageKind, Reaction, RoomKind, User, UserStatus,
};

/// Counterpart identity for simulated replies in group rooms.
pub const DEFAULT_RESPONDER: &str = "user2";

/// Reference instant the seed history hangs off. Captured once so repeated
/// seed reads agree with each other.
static SEEDED_AT: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

fn ago(minutes: i64) -> DateTime<Utc> {
    *SEEDED_AT - Duration::minutes(minutes)
}

fn avatar(text: &str) -> Option<String> {
    Some(format!("https://placehold.co/100x100?text={}", text))
}

pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "user1".into(),
            username: "Alex Chen".into(),
            avatar: "https://placehold.co/100x100?text=Alex+Chen+professional+headshot".into(),
            status: UserStatus::Online,
            last_seen: None,
            bio: Some("Frontend Developer | React Enthusiast".into()),
        },
        User {
            id: "user2".into(),
            username: "Sarah Wilson".into(),
            avatar: "https://placehold.co/100x100?text=Sarah+Wilson+professional+portrait".into(),
            status: UserStatus::Away,
            last_seen: None,
            bio: Some("UX Designer | Coffee Lover".into()),
        },
        User {
            id: "user3".into(),
            username: "Mike Johnson".into(),
            avatar: "https://placehold.co/100x100?text=Mike+Johnson+casual+profile+photo".into(),
            status: UserStatus::Online,
            last_seen: None,
            bio: Some("Backend Engineer | Python & Node.js".into()),
        },
        User {
            id: "user4".into(),
            username: "Emma Davis".into(),
            avatar: "https://placehold.co/100x100?text=Emma+Davis+creative+headshot".into(),
            status: UserStatus::Offline,
            last_seen: Some(ago(30)),
            bio: Some("Product Manager | Tech Startup".into()),
        },
        User {
            id: "user5".into(),
            username: "David Kim".into(),
            avatar: "https://placehold.co/100x100?text=David+Kim+software+engineer".into(),
            status: UserStatus::Online,
            last_seen: None,
            bio: Some("Full Stack Developer | Open Source Contributor".into()),
        },
    ]
}

pub fn seed_rooms() -> Vec<ChatRoom> {
    vec![
        ChatRoom {
            id: "general".into(),
            name: "General".into(),
            description: Some("General discussion for everyone".into()),
            kind: RoomKind::Group,
            participants: vec![
                "user1".into(),
                "user2".into(),
                "user3".into(),
                "user4".into(),
                "user5".into(),
            ],
            last_message: None,
            unread_count: 2,
            created_at: ago(7 * 24 * 60),
            avatar: avatar("General+Chat+Room"),
        },
        ChatRoom {
            id: "tech-talk".into(),
            name: "Tech Talk".into(),
            description: Some("Discuss latest in technology".into()),
            kind: RoomKind::Group,
            participants: vec!["user1".into(), "user3".into(), "user5".into()],
            last_message: None,
            unread_count: 0,
            created_at: ago(5 * 24 * 60),
            avatar: avatar("Tech+Talk+Group"),
        },
        ChatRoom {
            id: "random".into(),
            name: "Random".into(),
            description: Some("Random conversations and fun".into()),
            kind: RoomKind::Group,
            participants: vec!["user2".into(), "user4".into(), "user5".into()],
            last_message: None,
            unread_count: 1,
            created_at: ago(3 * 24 * 60),
            avatar: avatar("Random+Chat"),
        },
        ChatRoom {
            id: "direct-user2".into(),
            name: "Sarah Wilson".into(),
            description: None,
            kind: RoomKind::Direct,
            participants: vec!["user1".into(), "user2".into()],
            last_message: None,
            unread_count: 3,
            created_at: ago(2 * 24 * 60),
            avatar: None,
        },
        ChatRoom {
            id: "direct-user3".into(),
            name: "Mike Johnson".into(),
            description: None,
            kind: RoomKind::Direct,
            participants: vec!["user1".into(), "user3".into()],
            last_message: None,
            unread_count: 0,
            created_at: ago(24 * 60),
            avatar: None,
        },
    ]
}

fn group_message(
    id: &str,
    room: &str,
    sender: &str,
    content: &str,
    minutes_ago: i64,
    status: DeliveryStatus,
) -> Message {
    Message {
        id: id.into(),
        content: content.into(),
        sender_id: sender.into(),
        receiver_id: None,
        chat_room_id: Some(room.into()),
        timestamp: ago(minutes_ago),
        kind: MessageKind::Text,
        reactions: Vec::new(),
        status,
        reply_to: None,
    }
}

fn direct_message(
    id: &str,
    sender: &str,
    receiver: &str,
    content: &str,
    minutes_ago: i64,
    status: DeliveryStatus,
) -> Message {
    Message {
        id: id.into(),
        content: content.into(),
        sender_id: sender.into(),
        receiver_id: Some(receiver.into()),
        chat_room_id: None,
        timestamp: ago(minutes_ago),
        kind: MessageKind::Text,
        reactions: Vec::new(),
        status,
        reply_to: None,
    }
}

pub fn seed_messages() -> HashMap<String, Vec<Message>> {
    let mut celebrated = group_message(
        "msg2",
        "general",
        "user3",
        "Doing great! Just finished a big project. Feeling accomplished! 🎉",
        90,
        DeliveryStatus::Read,
    );
    celebrated.reactions = vec![
        Reaction {
            emoji: "🎉".into(),
            user_id: "user1".into(),
            timestamp: ago(84),
        },
        Reaction {
            emoji: "👏".into(),
            user_id: "user2".into(),
            timestamp: ago(78),
        },
    ];

    let mut messages = HashMap::new();
    messages.insert(
        "general".to_string(),
        vec![
            group_message(
                "msg1",
                "general",
                "user2",
                "Hey everyone! How's everyone doing today?",
                120,
                DeliveryStatus::Read,
            ),
            celebrated,
            group_message(
                "msg3",
                "general",
                "user4",
                "Congrats Mike! What kind of project was it?",
                60,
                DeliveryStatus::Read,
            ),
            group_message(
                "msg4",
                "general",
                "user3",
                "It was a React dashboard with real-time analytics. Took me 3 weeks but finally deployed! 🚀",
                45,
                DeliveryStatus::Read,
            ),
            group_message(
                "msg5",
                "general",
                "user1",
                "That sounds amazing! Would love to see it sometime.",
                30,
                DeliveryStatus::Delivered,
            ),
        ],
    );
    messages.insert(
        "tech-talk".to_string(),
        vec![
            group_message(
                "tech1",
                "tech-talk",
                "user1",
                "Anyone tried the new Next.js 15 features yet?",
                180,
                DeliveryStatus::Read,
            ),
            group_message(
                "tech2",
                "tech-talk",
                "user5",
                "Yes! The new caching system is incredible. Performance improvements are noticeable.",
                150,
                DeliveryStatus::Read,
            ),
            group_message(
                "tech3",
                "tech-talk",
                "user3",
                "I'm still learning React 19. The new hooks are confusing me a bit 😅",
                120,
                DeliveryStatus::Read,
            ),
        ],
    );
    messages.insert(
        "random".to_string(),
        vec![
            group_message(
                "random1",
                "random",
                "user2",
                "Just had the best coffee ever ☕",
                240,
                DeliveryStatus::Read,
            ),
            group_message(
                "random2",
                "random",
                "user4",
                "What kind? I'm always looking for new coffee recommendations!",
                210,
                DeliveryStatus::Read,
            ),
            group_message(
                "random3",
                "random",
                "user2",
                "It was a Colombian single-origin from a local roaster. Amazing floral notes!",
                180,
                DeliveryStatus::Read,
            ),
        ],
    );
    messages.insert(
        "direct-user2".to_string(),
        vec![
            direct_message(
                "dm1",
                "user2",
                "user1",
                "Hey Alex! Ready for the team meeting tomorrow?",
                60,
                DeliveryStatus::Delivered,
            ),
            direct_message(
                "dm2",
                "user1",
                "user2",
                "Yeah, I've prepared all the mockups you requested. They look great!",
                45,
                DeliveryStatus::Read,
            ),
            direct_message(
                "dm3",
                "user2",
                "user1",
                "Perfect! Can't wait to see them. You always deliver amazing work 🎨",
                30,
                DeliveryStatus::Sent,
            ),
        ],
    );
    messages.insert(
        "direct-user3".to_string(),
        vec![
            direct_message(
                "dm_mike1",
                "user1",
                "user3",
                "Thanks for the code review earlier!",
                120,
                DeliveryStatus::Read,
            ),
            direct_message(
                "dm_mike2",
                "user3",
                "user1",
                "No problem! Your code was really clean. Just a few minor suggestions.",
                90,
                DeliveryStatus::Read,
            ),
        ],
    );
    messages
}
