//! Minimal client for OpenAI compatible chat completion APIs.
mod chat;
mod core;

pub use self::chat::chat;
pub use self::core::*;
