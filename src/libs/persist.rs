use std::collections::HashMap;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Storage keys, unchanged from the app this engine backs so existing data
/// keeps loading.
pub const KEY_MESSAGES: &str = "chatApp_messages";
pub const KEY_CHAT_ROOMS: &str = "chatApp_chatRooms";
pub const KEY_CURRENT_USER: &str = "chatApp_currentUser";
pub const KEY_THEME: &str = "chatApp_theme";

/// String-keyed JSON store standing in for browser local storage. The engine
/// reads each key once at startup and writes back after every mutation that
/// changes rooms, messages, the session user or the theme.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn remove(&mut self, key: &str);
}

/// In-memory implementation, the only one this crate ships.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: HashMap<String, Value>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Load a typed value from the store. Absent keys and malformed values both
/// fall back to `default` — a corrupt store must never stop startup.
pub fn load_or<T: DeserializeOwned>(store: &dyn KvStore, key: &str, default: impl FnOnce() -> T) -> T {
    match store.get(key) {
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("discarding corrupt value under {}: {}", key, err);
                default()
            }
        },
        None => default(),
    }
}

/// Serialize and store a value. Serialization of our own models does not
/// fail; a failure is logged and the previous value kept.
pub fn save<T: Serialize>(store: &mut dyn KvStore, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(json) => store.set(key, json),
        Err(err) => warn!("failed to serialize {}: {}", key, err),
    }
}
