//! Conversation models

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::message::Message;
use super::user::User;

/// Archived conversation (1:1 or group).
#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub participants: Vec<User>,
    /// Most recent message, used for list previews.
    #[serde(default)]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message_count: Option<u64>,
    /// Inlined messages when fetched with `include_messages`.
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

impl Conversation {
    /// Display name: explicit name, else participant names joined.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        if self.participants.is_empty() {
            return format!("conversation {}", self.id);
        }
        self.participants
            .iter()
            .map(|p| p.name().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Response of `GET /api/conversations`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_explicit_name() {
        let conv = Conversation {
            id: 7,
            name: Some("Ski Trip".to_string()),
            is_group: true,
            participants: vec![],
            last_message: None,
            last_message_at: None,
            message_count: None,
            messages: None,
        };
        assert_eq!(conv.display_name(), "Ski Trip");
    }

    #[test]
    fn test_display_name_falls_back_to_participants() {
        let conv = Conversation {
            id: 7,
            name: None,
            is_group: false,
            participants: vec![
                User {
                    id: 1,
                    display_name: Some("Ann".to_string()),
                    username: None,
                    bitmoji_url: None,
                },
                User {
                    id: 2,
                    display_name: None,
                    username: Some("bob99".to_string()),
                    bitmoji_url: None,
                },
            ],
            last_message: None,
            last_message_at: None,
            message_count: None,
            messages: None,
        };
        assert_eq!(conv.display_name(), "Ann, bob99");
    }

    #[test]
    fn test_display_name_without_any_names() {
        let conv = Conversation {
            id: 42,
            name: None,
            is_group: false,
            participants: vec![],
            last_message: None,
            last_message_at: None,
            message_count: None,
            messages: None,
        };
        assert_eq!(conv.display_name(), "conversation 42");
    }
}
