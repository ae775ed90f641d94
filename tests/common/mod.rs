#![allow(dead_code)] // not every test binary uses every helper

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::Value;
use sim_chat_lib::{ChatApp, KvStore, MemoryKvStore, RandomSource, SeededRandom};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fully scripted randomness: `chance` answers come from a queue (false once
/// exhausted), `pick` likewise (0 once exhausted), delays always land on the
/// minimum. Lets a test force or starve the reply gates without guessing
/// what a seeded generator would produce.
pub struct ScriptedRandom {
    chances: VecDeque<bool>,
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(chances: &[bool], picks: &[usize]) -> Self {
        Self {
            chances: chances.iter().copied().collect(),
            picks: picks.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }

    fn delay_ms(&mut self, min_ms: u64, _max_ms: u64) -> u64 {
        min_ms
    }
}

/// Clonable in-memory store so a test can keep a handle on the data an app
/// instance persists and hand the same data to a second instance.
#[derive(Clone, Default)]
pub struct SharedKvStore {
    entries: Rc<RefCell<HashMap<String, Value>>>,
}

impl SharedKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for SharedKvStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.borrow_mut().insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// App over fresh seed data with reproducible randomness.
pub fn seeded_app() -> ChatApp {
    init_logging();
    ChatApp::with_parts(
        Box::new(MemoryKvStore::new()),
        Box::new(SeededRandom::from_seed(7)),
    )
}

/// App whose random draws are fully under the test's control.
pub fn scripted_app(chances: &[bool], picks: &[usize]) -> ChatApp {
    init_logging();
    ChatApp::with_parts(
        Box::new(MemoryKvStore::new()),
        Box::new(ScriptedRandom::new(chances, picks)),
    )
}
