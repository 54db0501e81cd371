//! Settings and SSH-key endpoints

use super::client::{encode_query_value, ArchiveClient};
use super::error::ApiError;
use crate::models::{Settings, SshKeyInfo};

impl ArchiveClient {
    /// `GET /api/settings/`
    pub async fn get_settings(&self) -> Result<Settings, ApiError> {
        self.get_json("/api/settings/").await
    }

    /// `PUT /api/settings/` — full replacement, wrapped in the
    /// `{"settings": {...}}` envelope the backend expects.
    pub async fn put_settings(&self, settings: &Settings) -> Result<Settings, ApiError> {
        let body = serde_json::json!({ "settings": settings });
        self.put_json("/api/settings/", &body).await
    }

    /// `POST /api/settings/initialize` — create defaults server-side.
    pub async fn initialize_settings(&self) -> Result<Settings, ApiError> {
        self.post_json("/api/settings/initialize", None).await
    }

    /// `GET /api/settings/raw?category?` — untyped settings rows.
    pub async fn raw_settings(
        &self,
        category: Option<&str>,
    ) -> Result<serde_json::Value, ApiError> {
        let mut path = "/api/settings/raw".to_string();
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            path.push_str(&format!("?category={}", encode_query_value(category)));
        }
        self.get_json(&path).await
    }

    /// `POST /api/settings/ssh-key/upload` (multipart form field `file`).
    pub async fn upload_ssh_key(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<SshKeyInfo, ApiError> {
        self.upload("/api/settings/ssh-key/upload", filename, bytes)
            .await
    }

    /// `GET /api/settings/ssh-key/info`
    pub async fn ssh_key_info(&self) -> Result<SshKeyInfo, ApiError> {
        self.get_json("/api/settings/ssh-key/info").await
    }

    /// `DELETE /api/settings/ssh-key`
    pub async fn delete_ssh_key(&self) -> Result<(), ApiError> {
        self.delete("/api/settings/ssh-key").await
    }
}
