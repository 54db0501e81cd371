//! HTTP client for the chat-archive backend
//!
//! Wraps reqwest::Client with one shared request path so every endpoint
//! wrapper reports failures through the same [`ApiError`]. No retries, no
//! caching, no request coalescing: each call is an independent operation.

use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::HealthStatus;

/// Client bound to one backend base URL, resolved once at startup.
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ArchiveClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArchiveClient {
    /// Build a client for the given base URL (e.g. `http://127.0.0.1:8080`).
    /// A trailing slash is stripped so paths can always start with `/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/api/health").await
    }

    /// Reachability probe for an image or media reference: GET, discard
    /// the body. One-shot; callers decide what a failure means.
    pub async fn probe_url(&self, url: &str) -> Result<(), ApiError> {
        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            self.url(url)
        };
        tracing::debug!("probe {}", url);
        let resp = self.http.get(&url).send().await.map_err(ApiError::from)?;
        check_response(resp).await?;
        Ok(())
    }

    /// GET a JSON resource.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(ApiError::from)?;
        let resp = check_response(resp).await?;
        resp.json().await.map_err(ApiError::from)
    }

    /// POST with an optional JSON body, expecting a JSON response.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let mut req = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(ApiError::from)?;
        let resp = check_response(resp).await?;
        resp.json().await.map_err(ApiError::from)
    }

    /// PUT a JSON body, expecting a JSON response.
    pub(crate) async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("PUT {}", url);
        let resp = self
            .http
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)?;
        let resp = check_response(resp).await?;
        resp.json().await.map_err(ApiError::from)
    }

    /// DELETE a resource, ignoring any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        tracing::debug!("DELETE {}", url);
        let resp = self
            .http
            .delete(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(ApiError::from)?;
        check_response(resp).await?;
        Ok(())
    }

    /// POST a file as a multipart form (field name `file`).
    ///
    /// Bypasses JSON encoding but keeps the shared error contract; on
    /// failure the server's JSON `detail` field is surfaced when present.
    pub(crate) async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("POST {} (multipart, {} bytes)", url, bytes.len());
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from));
            let message =
                detail.unwrap_or_else(|| format!("upload failed ({})", status.as_u16()));
            return Err(ApiError::status(status.as_u16(), message));
        }
        resp.json().await.map_err(ApiError::from)
    }
}

/// Map a non-2xx response to a status-coded error.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let reason = status.canonical_reason().unwrap_or("request failed");
    let body = resp.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        reason.to_string()
    } else {
        body
    };
    Err(ApiError::status(status.as_u16(), message))
}

/// Minimal query-value escaping for user-supplied strings.
pub(crate) fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            ' ' => out.push_str("%20"),
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '+' => out.push_str("%2B"),
            '#' => out.push_str("%23"),
            '=' => out.push_str("%3D"),
            '?' => out.push_str("%3F"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slashes_stripped() {
        let client = ArchiveClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/health"), "http://localhost:8080/api/health");

        let client = ArchiveClient::new("http://localhost:8080///");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_encode_query_value() {
        assert_eq!(encode_query_value("plain"), "plain");
        assert_eq!(encode_query_value("two words"), "two%20words");
        assert_eq!(encode_query_value("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_query_value("100%"), "100%25");
    }
}
