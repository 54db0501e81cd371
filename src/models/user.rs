//! User-related models

use serde::Deserialize;

/// Archived user profile.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Avatar image reference served by the backend.
    #[serde(default)]
    pub bitmoji_url: Option<String>,
}

impl User {
    /// Best available name: display name, then username, then a placeholder.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.username.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("(unknown)")
    }
}

/// Response of `GET /api/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub total: Option<u64>,
}
