mod common;

use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use sim_chat_lib::libs::chat::ChatStore;
use sim_chat_lib::{
    ChatError, ChatRoom, DeliveryStatus, Message, MessageKind, RoomKind, UserStatus,
};

use crate::common::seeded_app;

#[test]
fn group_send_sets_room_id_only() {
    let mut app = seeded_app();
    app.login("Alex Chen", None);
    app.set_active_room(Some("general".to_string()));

    let message = app
        .send_message("Morning all", MessageKind::Text)
        .expect("send into a group room should succeed");

    assert_eq!(message.chat_room_id.as_deref(), Some("general"));
    assert_eq!(message.receiver_id, None);
    assert_eq!(message.status, DeliveryStatus::Sent);
}

#[test]
fn direct_send_sets_receiver_only() {
    let mut app = seeded_app();
    app.login("Alex Chen", None);
    app.set_active_room(Some("direct-user2".to_string()));

    let message = app
        .send_message("Lunch?", MessageKind::Text)
        .expect("send into a direct room should succeed");

    assert_eq!(message.receiver_id.as_deref(), Some("user2"));
    assert_eq!(message.chat_room_id, None);
}

#[test]
fn login_and_send_scenario() {
    let mut app = seeded_app();

    let alex = app.login("Alex", None);
    assert_eq!(alex.status, UserStatus::Online);
    assert!(!alex.id.is_empty());

    app.set_active_room(Some("general".to_string()));
    let message = app
        .send_message("Hello", MessageKind::Text)
        .expect("send should succeed");

    assert_eq!(message.status, DeliveryStatus::Sent);
    assert!(!message.id.is_empty());

    let general = app.room("general").expect("seeded room");
    assert_eq!(
        general.last_message.as_ref().map(|m| m.id.as_str()),
        Some(message.id.as_str())
    );
    assert_eq!(general.unread_count, 0);
}

#[test]
fn send_is_absorbed_without_session_room_or_content() {
    let mut app = seeded_app();

    // No session yet.
    assert!(app.send_message("hi", MessageKind::Text).is_none());

    app.login("Alex Chen", None);
    // No active room.
    assert!(app.send_message("hi", MessageKind::Text).is_none());

    app.set_active_room(Some("general".to_string()));
    // Whitespace only.
    assert!(app.send_message("   \n\t", MessageKind::Text).is_none());

    // Unknown room: no auto-creation.
    app.set_active_room(Some("does-not-exist".to_string()));
    assert!(app.send_message("hi", MessageKind::Text).is_none());
    assert!(app.room("does-not-exist").is_none());
}

#[test]
fn try_send_reports_why() {
    let mut app = seeded_app();
    assert_eq!(
        app.try_send_message("hi", MessageKind::Text),
        Err(ChatError::NoActiveSession)
    );

    app.login("Alex Chen", None);
    app.set_active_room(Some("general".to_string()));
    assert!(matches!(
        app.try_send_message("   ", MessageKind::Text),
        Err(ChatError::InvalidInput(_))
    ));
}

#[test]
fn sent_content_is_trimmed() {
    let mut app = seeded_app();
    app.login("Alex Chen", None);
    app.set_active_room(Some("general".to_string()));

    let message = app
        .send_message("  hello world  ", MessageKind::Text)
        .expect("send should succeed");
    assert_eq!(message.content, "hello world");
}

#[test]
fn toggle_reaction_is_its_own_inverse() {
    let mut app = seeded_app();
    app.login("Mike Johnson", None);

    let before = app.messages("general").to_vec();
    app.toggle_reaction("msg1", "🎉").expect("first toggle");
    app.toggle_reaction("msg1", "🎉").expect("second toggle");
    let after = app.messages("general").to_vec();

    assert_eq!(before, after);
}

#[test]
fn toggle_reaction_adds_then_removes() {
    let mut app = seeded_app();
    let user = app.login("Alex Chen", None);

    app.toggle_reaction("msg3", "🎉").expect("toggle on");
    let message = app
        .messages("general")
        .iter()
        .find(|m| m.id == "msg3")
        .cloned()
        .expect("seeded message");
    assert!(message
        .reactions
        .iter()
        .any(|r| r.emoji == "🎉" && r.user_id == user.id));

    app.toggle_reaction("msg3", "🎉").expect("toggle off");
    let message = app
        .messages("general")
        .iter()
        .find(|m| m.id == "msg3")
        .cloned()
        .expect("seeded message");
    assert!(message.reactions.is_empty());
}

#[test]
fn reaction_errors() {
    let mut app = seeded_app();
    assert_eq!(
        app.toggle_reaction("msg1", "🎉"),
        Err(ChatError::NoActiveSession)
    );

    app.login("Alex Chen", None);
    assert_eq!(
        app.toggle_reaction("no-such-message", "🎉"),
        Err(ChatError::MessageNotFound("no-such-message".to_string()))
    );
}

#[test]
fn remove_reaction_is_idempotent() {
    let mut app = seeded_app();
    // user1 has a seeded 🎉 reaction on msg2.
    app.login("Alex Chen", None);

    app.remove_reaction("msg2", "🎉").expect("first remove");
    let msg2 = app
        .messages("general")
        .iter()
        .find(|m| m.id == "msg2")
        .cloned()
        .expect("seeded message");
    assert!(!msg2
        .reactions
        .iter()
        .any(|r| r.emoji == "🎉" && r.user_id == "user1"));
    // user2's 👏 reaction is untouched.
    assert!(msg2.reactions.iter().any(|r| r.user_id == "user2"));

    app.remove_reaction("msg2", "🎉").expect("second remove");
    // Unknown message is absorbed, not an error.
    app.remove_reaction("no-such-message", "🎉")
        .expect("missing target absorbed");
}

#[test]
fn mark_as_read_is_idempotent_and_monotonic() {
    let mut app = seeded_app();
    app.login("Alex Chen", None);

    app.mark_as_read("general");
    let once: Vec<Message> = app.messages("general").to_vec();
    let unread_once = app.room("general").map(|r| r.unread_count);

    app.mark_as_read("general");
    assert_eq!(app.messages("general").to_vec(), once);
    assert_eq!(app.room("general").map(|r| r.unread_count), unread_once);
    assert_eq!(unread_once, Some(0));

    for message in &once {
        if message.sender_id != "user1" {
            assert_eq!(message.status, DeliveryStatus::Read);
        } else {
            // The reader's own messages keep their delivery state.
            assert!(message.status <= DeliveryStatus::Read);
        }
    }
}

#[test]
fn opening_a_room_marks_it_read() {
    let mut app = seeded_app();
    app.login("Alex Chen", None);
    assert!(app.room("direct-user2").map(|r| r.unread_count) > Some(0));

    app.set_active_room(Some("direct-user2".to_string()));
    assert_eq!(app.room("direct-user2").map(|r| r.unread_count), Some(0));
    assert_eq!(app.active_room(), Some("direct-user2"));

    app.set_active_room(None);
    assert_eq!(app.active_room(), None);
}

#[test]
fn rooms_sorted_by_activity_is_total_and_stable() {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let room = |id: &str| ChatRoom {
        id: id.to_string(),
        name: id.to_uppercase(),
        description: None,
        kind: RoomKind::Group,
        participants: vec!["user1".to_string()],
        last_message: None,
        unread_count: 0,
        created_at: base,
        avatar: None,
    };
    let message = |id: &str, room_id: &str, minutes: i64| Message {
        id: id.to_string(),
        content: "x".to_string(),
        sender_id: "user1".to_string(),
        receiver_id: None,
        chat_room_id: Some(room_id.to_string()),
        timestamp: base + Duration::minutes(minutes),
        kind: MessageKind::Text,
        reactions: Vec::new(),
        status: DeliveryStatus::Sent,
        reply_to: None,
    };

    let mut messages = HashMap::new();
    messages.insert("a".to_string(), vec![message("m1", "a", 10)]);
    messages.insert("c".to_string(), vec![message("m2", "c", 20)]);
    let store = ChatStore::new(vec![room("a"), room("b"), room("c")], messages);

    let ordered: Vec<String> = store.rooms_by_activity().into_iter().map(|r| r.id).collect();
    assert_eq!(ordered, vec!["c", "a", "b"]);

    // Two message-less rooms keep their relative order.
    let store = ChatStore::new(
        vec![room("b"), room("d"), room("a")],
        HashMap::new(),
    );
    let ordered: Vec<String> = store.rooms_by_activity().into_iter().map(|r| r.id).collect();
    assert_eq!(ordered, vec!["b", "d", "a"]);
}

#[test]
fn display_helpers() {
    let app = seeded_app();
    let users = app.users().to_vec();

    let direct = app.room("direct-user2").expect("seeded room");
    assert_eq!(
        sim_chat_lib::libs::models::display_name(direct, "user1", &users),
        "Sarah Wilson"
    );
    let general = app.room("general").expect("seeded room");
    assert_eq!(
        sim_chat_lib::libs::models::display_name(general, "user1", &users),
        "General"
    );

    let long = Message {
        id: "m".to_string(),
        content: "x".repeat(60),
        sender_id: "user1".to_string(),
        receiver_id: None,
        chat_room_id: Some("general".to_string()),
        timestamp: Utc::now(),
        kind: MessageKind::Text,
        reactions: Vec::new(),
        status: DeliveryStatus::Sent,
        reply_to: None,
    };
    let preview = sim_chat_lib::libs::models::last_message_preview(&long);
    assert_eq!(preview, format!("{}...", "x".repeat(50)));

    // Seeded unread counts: general 2, random 1, direct-user2 3.
    let rooms = app.rooms_sorted_by_activity();
    assert_eq!(sim_chat_lib::libs::models::total_unread(&rooms), 6);
}

#[test]
fn search_rooms_matches_display_names() {
    let mut app = seeded_app();
    app.login("Alex Chen", None);

    let hits: Vec<String> = app.search_rooms("sarah").into_iter().map(|r| r.id).collect();
    assert_eq!(hits, vec!["direct-user2"]);

    let hits: Vec<String> = app.search_rooms("GEN").into_iter().map(|r| r.id).collect();
    assert_eq!(hits, vec!["general"]);

    assert_eq!(app.search_rooms("").len(), 5);
    assert!(app.search_rooms("zzz").is_empty());
}
