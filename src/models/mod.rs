//! Data model for chat-archive API responses
//!
//! Every entity here is a read-only snapshot deserialized from the backend;
//! nothing in this layer creates, mutates, or deletes records.

mod conversation;
mod media;
mod message;
mod settings;
mod user;

pub use conversation::{Conversation, ConversationList};
pub use media::{FileKind, MediaAsset, MediaRender};
pub use message::{Message, MessageContent, MessageList};
pub use settings::{Settings, SshKeyInfo};
pub use user::{User, UserList};

use serde::Deserialize;

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}
