//! Server settings models
//!
//! Settings are owned by the backend; this client treats them as a flat
//! field bag and passes them through mostly untouched. Unknown fields are
//! preserved via the flattened `extra` map so a round-trip `get` + `put`
//! never drops server-side additions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full settings record as returned by `GET /api/settings/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    // SSH connection to the ingestion source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_data_path: Option<String>,

    // Ingestion behavior
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_interval_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_sync_on_startup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_media: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_ads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    // Notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_on_new_messages: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_on_sync_errors: Option<bool>,

    // ntfy provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntfy_server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntfy_topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntfy_token: Option<String>,

    // APNs provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apns_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apns_team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apns_bundle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apns_key_path: Option<String>,

    /// Fields this client does not know about yet.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response of `GET /api/settings/ssh-key/info`.
#[derive(Debug, Clone, Deserialize)]
pub struct SshKeyInfo {
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_round_trip() {
        let raw = r#"{"ssh_host":"vault.local","future_flag":true}"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.ssh_host.as_deref(), Some("vault.local"));
        assert_eq!(
            settings.extra.get("future_flag"),
            Some(&serde_json::Value::Bool(true))
        );

        let out = serde_json::to_value(&settings).unwrap();
        assert_eq!(out["future_flag"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_absent_fields_not_serialized() {
        let out = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(out, serde_json::json!({}));
    }
}
