//! User endpoints

use super::client::{encode_query_value, ArchiveClient};
use super::error::ApiError;
use crate::models::{User, UserList};

impl ArchiveClient {
    /// `GET /api/users?search?&limit&offset`
    pub async fn list_users(
        &self,
        search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<UserList, ApiError> {
        let mut path = format!("/api/users?limit={}&offset={}", limit, offset);
        if let Some(term) = search.filter(|s| !s.is_empty()) {
            path.push_str(&format!("&search={}", encode_query_value(term)));
        }
        self.get_json(&path).await
    }

    /// `GET /api/users/{id}`
    pub async fn get_user(&self, id: i64) -> Result<User, ApiError> {
        self.get_json(&format!("/api/users/{}", id)).await
    }

    /// `GET /api/users/current` — the archive owner.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get_json("/api/users/current").await
    }
}
