pub mod chat;
pub mod identity;
pub mod models;
pub mod persist;
pub mod random;
pub mod responder;
pub mod scheduler;
pub mod seed;
pub mod typing;
