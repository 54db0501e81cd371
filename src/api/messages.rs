//! Message and media endpoints

use chrono::{DateTime, SecondsFormat, Utc};

use super::client::ArchiveClient;
use super::error::ApiError;
use crate::models::{MediaAsset, Message, MessageList};

/// Optional filters for `GET /api/messages`. Absent fields are omitted
/// from the query string entirely.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub conversation_id: Option<i64>,
    pub sender_id: Option<i64>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub content_type: Option<i64>,
    pub has_media: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl MessageFilter {
    /// Query string including the leading `?`, or empty when no filter set.
    pub fn query(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(v) = self.conversation_id {
            params.push(format!("conversation_id={}", v));
        }
        if let Some(v) = self.sender_id {
            params.push(format!("sender_id={}", v));
        }
        if let Some(v) = self.since {
            params.push(format!("since={}", v.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(v) = self.until {
            params.push(format!("until={}", v.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(v) = self.content_type {
            params.push(format!("content_type={}", v));
        }
        if let Some(v) = self.has_media {
            params.push(format!("has_media={}", v));
        }
        if let Some(v) = self.limit {
            params.push(format!("limit={}", v));
        }
        if let Some(v) = self.offset {
            params.push(format!("offset={}", v));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

impl ArchiveClient {
    /// `GET /api/messages` with any combination of filters.
    pub async fn list_messages(&self, filter: &MessageFilter) -> Result<MessageList, ApiError> {
        let path = format!("/api/messages{}", filter.query());
        self.get_json(&path).await
    }

    /// `GET /api/messages/{id}`
    pub async fn get_message(&self, id: i64) -> Result<Message, ApiError> {
        self.get_json(&format!("/api/messages/{}", id)).await
    }

    /// Direct URL of a media file. Pure string building; the client never
    /// fetches the file itself (players and browsers do).
    pub fn media_file_url(&self, media_id: i64) -> String {
        self.url(&format!("/api/media/{}/file", media_id))
    }

    /// `GET /api/media/by-cache/{cache_id}` — resolve unprocessed media.
    pub async fn resolve_media_by_cache(&self, cache_id: &str) -> Result<MediaAsset, ApiError> {
        self.get_json(&format!("/api/media/by-cache/{}", cache_id))
            .await
    }
}
