//! Media asset models and render classification

use serde::Deserialize;

/// Coarse file classification assigned by the backend ingester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Audio,
    #[serde(other)]
    Other,
}

/// A resolved, metadata-bearing reference to a stored file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaAsset {
    pub id: i64,
    pub file_type: FileKind,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Which player/card a media asset should be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaRender {
    Image,
    Video,
    Audio,
    File,
}

impl MediaAsset {
    /// Pick the render path for this asset within its owning message.
    ///
    /// Voice notes sometimes arrive mislabeled as `video/mp4` with the
    /// special content type 4; those are routed to the audio player. The
    /// check is deliberately narrow (exact mime, mime test before the
    /// content-type test) and must not be widened to all type-4 videos.
    pub fn render_kind(&self, message_content_type: i64) -> MediaRender {
        match self.file_type {
            FileKind::Image => MediaRender::Image,
            FileKind::Video => {
                let mime = self.mime_type.as_deref().unwrap_or("");
                if mime.starts_with("audio/") {
                    MediaRender::Audio
                } else if mime == "video/mp4" && message_content_type == 4 {
                    MediaRender::Audio
                } else {
                    MediaRender::Video
                }
            }
            FileKind::Audio => MediaRender::Audio,
            FileKind::Other => MediaRender::File,
        }
    }

    /// Label for file cards: original filename, else the type name.
    pub fn display_name(&self) -> &str {
        self.original_filename
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(match self.file_type {
                FileKind::Image => "image",
                FileKind::Video => "video",
                FileKind::Audio => "audio",
                FileKind::Other => "file",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(file_type: FileKind, mime: &str) -> MediaAsset {
        MediaAsset {
            id: 1,
            file_type,
            mime_type: Some(mime.to_string()),
            original_filename: None,
            file_size: None,
        }
    }

    #[test]
    fn test_plain_video_stays_video() {
        let a = asset(FileKind::Video, "video/mp4");
        assert_eq!(a.render_kind(0), MediaRender::Video);
        assert_eq!(a.render_kind(2), MediaRender::Video);
    }

    #[test]
    fn test_mp4_with_type_4_is_audio() {
        let a = asset(FileKind::Video, "video/mp4");
        assert_eq!(a.render_kind(4), MediaRender::Audio);
    }

    #[test]
    fn test_non_mp4_video_with_type_4_stays_video() {
        let a = asset(FileKind::Video, "video/webm");
        assert_eq!(a.render_kind(4), MediaRender::Video);
    }

    #[test]
    fn test_video_with_audio_mime_is_audio() {
        let a = asset(FileKind::Video, "audio/aac");
        assert_eq!(a.render_kind(0), MediaRender::Audio);
    }

    #[test]
    fn test_other_kinds() {
        assert_eq!(asset(FileKind::Image, "image/png").render_kind(4), MediaRender::Image);
        assert_eq!(asset(FileKind::Audio, "audio/mpeg").render_kind(0), MediaRender::Audio);
        assert_eq!(
            asset(FileKind::Other, "application/pdf").render_kind(0),
            MediaRender::File
        );
    }

    #[test]
    fn test_display_name_fallback() {
        let mut a = asset(FileKind::Other, "application/zip");
        assert_eq!(a.display_name(), "file");
        a.original_filename = Some("backup.zip".to_string());
        assert_eq!(a.display_name(), "backup.zip");
    }
}
