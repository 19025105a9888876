// src/chat/mod.rs

pub mod store;
pub mod types;

pub use store::ChatStore;
pub use types::{ChannelType, ChatChannel, ChatMessage, CreateChannelRequest, SendMessageRequest};
