//! Response snapshots stored in the versioned cache.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::request::InterceptedRequest;

/// An immutable copy of a response, captured at insertion time.
///
/// Entries are never updated in place; a fresh fetch inserts a new snapshot
/// that replaces the prior one for the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Identity this snapshot is stored under (hash of method + URL).
    pub identity: String,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    /// Response headers serialized as a JSON array of (name, value) pairs.
    pub headers_json: Option<String>,
    pub body: Vec<u8>,
    /// RFC 3339 capture timestamp.
    pub stored_at: String,
}

impl Snapshot {
    /// Whether the captured status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parsed response headers; empty when none were captured.
    pub fn headers(&self) -> Vec<(String, String)> {
        self.headers_json
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default()
    }

    /// Synthesized 503 response for requests that fail offline with no
    /// cache entry. Never stored.
    pub fn service_unavailable(request: &InterceptedRequest) -> Self {
        Self {
            identity: request.identity(),
            method: request.method.clone(),
            url: request.url.to_string(),
            status: 503,
            content_type: Some("text/plain; charset=utf-8".to_string()),
            headers_json: None,
            body: b"You are offline and this resource is not cached.".to_vec(),
            stored_at: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn request(url: &str) -> InterceptedRequest {
        InterceptedRequest::get(Url::parse(url).unwrap())
    }

    #[test]
    fn test_is_success_bounds() {
        let mut snapshot = Snapshot::service_unavailable(&request("https://example.com/"));
        assert!(!snapshot.is_success());

        snapshot.status = 200;
        assert!(snapshot.is_success());
        snapshot.status = 299;
        assert!(snapshot.is_success());
        snapshot.status = 300;
        assert!(!snapshot.is_success());
        snapshot.status = 199;
        assert!(!snapshot.is_success());
    }

    #[test]
    fn test_headers_roundtrip() {
        let mut snapshot = Snapshot::service_unavailable(&request("https://example.com/"));
        assert!(snapshot.headers().is_empty());

        snapshot.headers_json =
            Some(r#"[["content-type","text/html"],["cache-control","no-store"]]"#.to_string());
        let headers = snapshot.headers();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0], ("content-type".to_string(), "text/html".to_string()));
    }

    #[test]
    fn test_service_unavailable_shape() {
        let req = request("https://example.com/missing");
        let snapshot = Snapshot::service_unavailable(&req);

        assert_eq!(snapshot.status, 503);
        assert_eq!(snapshot.identity, req.identity());
        assert_eq!(snapshot.content_type.as_deref(), Some("text/plain; charset=utf-8"));
        assert!(!snapshot.body.is_empty());
    }
}
