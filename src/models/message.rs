//! Message models and content classification

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::media::MediaAsset;
use super::user::User;

/// Archived chat message.
///
/// `content_type` is the backend's integer discriminant: 0 = media, 1 = text,
/// 2 = mixed, 4 = special video/audio case, anything else = unknown.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    #[serde(default)]
    pub sender: Option<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub content_type: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub media: Option<MediaAsset>,
    /// Opaque fallback reference when no resolved media asset exists.
    #[serde(default)]
    pub cache_id: Option<String>,
    /// False when the ingester could not fully parse the source record.
    #[serde(default = "default_true")]
    pub parsing_successful: bool,
}

fn default_true() -> bool {
    true
}

/// Renderable content of a message, derived once from the raw record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageContent<'a> {
    Text(&'a str),
    Media(&'a MediaAsset),
    Mixed {
        text: Option<&'a str>,
        media: Option<&'a MediaAsset>,
    },
    /// Media known to exist but not yet resolved to an asset record.
    CacheOnly(&'a str),
    Unavailable,
}

impl Message {
    /// Classify this message into its renderable content.
    ///
    /// Total over all field combinations: anything that does not match a
    /// known shape degrades to `Unavailable`, never an error. The branch
    /// order is load-bearing and mirrors the backend's encoding.
    pub fn content(&self) -> MessageContent<'_> {
        let text = self.text.as_deref().filter(|t| !t.is_empty());
        match self.content_type {
            1 if text.is_some() => MessageContent::Text(text.unwrap_or_default()),
            0 if self.media.is_some() => match self.media.as_ref() {
                Some(asset) => MessageContent::Media(asset),
                None => MessageContent::Unavailable,
            },
            2 => MessageContent::Mixed {
                text,
                media: self.media.as_ref(),
            },
            4 if self.media.is_some() => match self.media.as_ref() {
                Some(asset) => MessageContent::Media(asset),
                None => MessageContent::Unavailable,
            },
            _ => match self.cache_id.as_deref().filter(|c| !c.is_empty()) {
                Some(cache_id) if self.media.is_none() => MessageContent::CacheOnly(cache_id),
                _ => MessageContent::Unavailable,
            },
        }
    }

    /// Sender id, when the sender was resolved.
    pub fn sender_id(&self) -> Option<i64> {
        self.sender.as_ref().map(|u| u.id)
    }
}

/// Response of `GET /api/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileKind;

    fn message(content_type: i64) -> Message {
        Message {
            id: 1,
            conversation_id: 10,
            sender: None,
            created_at: None,
            content_type,
            text: None,
            media: None,
            cache_id: None,
            parsing_successful: true,
        }
    }

    fn asset() -> MediaAsset {
        MediaAsset {
            id: 5,
            file_type: FileKind::Image,
            mime_type: Some("image/jpeg".to_string()),
            original_filename: Some("photo.jpg".to_string()),
            file_size: Some(1024),
        }
    }

    #[test]
    fn test_text_message() {
        let mut msg = message(1);
        msg.text = Some("hello".to_string());
        assert_eq!(msg.content(), MessageContent::Text("hello"));
    }

    #[test]
    fn test_text_type_without_text_falls_through() {
        let msg = message(1);
        assert_eq!(msg.content(), MessageContent::Unavailable);
    }

    #[test]
    fn test_media_message() {
        let mut msg = message(0);
        msg.media = Some(asset());
        assert!(matches!(msg.content(), MessageContent::Media(a) if a.id == 5));
    }

    #[test]
    fn test_mixed_carries_both_parts() {
        let mut msg = message(2);
        msg.text = Some("caption".to_string());
        msg.media = Some(asset());
        match msg.content() {
            MessageContent::Mixed { text, media } => {
                assert_eq!(text, Some("caption"));
                assert!(media.is_some());
            }
            other => panic!("expected Mixed, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_with_missing_parts_is_still_mixed() {
        let msg = message(2);
        assert!(matches!(
            msg.content(),
            MessageContent::Mixed { text: None, media: None }
        ));
    }

    #[test]
    fn test_type_4_with_media() {
        let mut msg = message(4);
        msg.media = Some(asset());
        assert!(matches!(msg.content(), MessageContent::Media(_)));
    }

    #[test]
    fn test_cache_only_fallback() {
        let mut msg = message(0);
        msg.cache_id = Some("abc-123".to_string());
        assert_eq!(msg.content(), MessageContent::CacheOnly("abc-123"));
    }

    #[test]
    fn test_empty_message_is_unavailable() {
        assert_eq!(message(0).content(), MessageContent::Unavailable);
        assert_eq!(message(99).content(), MessageContent::Unavailable);
    }
}
