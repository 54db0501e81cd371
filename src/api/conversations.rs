//! Conversation endpoints

use super::client::ArchiveClient;
use super::error::ApiError;
use crate::models::{Conversation, ConversationList};

impl ArchiveClient {
    /// `GET /api/conversations?limit&offset&exclude_ads`
    pub async fn list_conversations(
        &self,
        limit: u32,
        offset: u32,
        exclude_ads: bool,
    ) -> Result<ConversationList, ApiError> {
        let path = format!(
            "/api/conversations?limit={}&offset={}&exclude_ads={}",
            limit, offset, exclude_ads
        );
        self.get_json(&path).await
    }

    /// `GET /api/conversations/{id}`, optionally inlining recent messages.
    pub async fn get_conversation(
        &self,
        id: i64,
        include_messages: bool,
        message_limit: u32,
    ) -> Result<Conversation, ApiError> {
        let path = format!(
            "/api/conversations/{}?include_messages={}&message_limit={}",
            id, include_messages, message_limit
        );
        self.get_json(&path).await
    }
}
