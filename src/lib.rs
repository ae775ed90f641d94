//! In-memory simulated chat engine: identity and session, chat rooms with
//! delivery-status transitions, reaction toggling, typing-indicator
//! lifecycle, and canned auto-responses. No network, no real concurrency;
//! "live" counterpart activity is deferred tasks on an owned timer queue
//! that the embedding drives from its own tick.

pub mod libs;

use thiserror::Error;

pub use crate::libs::chat::{ChatApp, ChatStore, Snapshot};
pub use crate::libs::identity::{IdentityStore, ProfileUpdate};
pub use crate::libs::models::{
    ChatRoom, DeliveryStatus, Message, MessageKind, Reaction, RoomKind, Theme, TypingIndicator,
    User, UserStatus,
};
pub use crate::libs::persist::{KvStore, MemoryKvStore};
pub use crate::libs::random::{RandomSource, SeededRandom, ThreadRandom};
pub use crate::libs::typing::{TypingTarget, TypingTracker};

/// Why a command was not accepted. Nothing here is fatal: the absorbing
/// entry points log and drop invalid commands instead of surfacing these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// An identity-dependent operation ran without a logged-in user.
    #[error("no active session")]
    NoActiveSession,
    /// A reaction target id resolved to no message in any room.
    #[error("message not found: {0}")]
    MessageNotFound(String),
    /// The command itself was malformed (blank content, unknown room).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
