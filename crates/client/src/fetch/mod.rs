//! Network capability: issue a request, capture a response snapshot.
//!
//! `issue` resolves with a snapshot for any answered request, whatever its
//! status; non-2xx answers are data, not errors. It fails only with
//! `NetworkUnavailable` when the network did not answer at all (DNS
//! failure, refused connection, timeout, offline).

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, header};
use std::time::Duration;

use netfirst_core::{Error, InterceptedRequest, Snapshot};

/// Network capability consumed by the lifecycle controller and the router.
#[async_trait]
pub trait Network: Send + Sync {
    async fn issue(&self, request: &InterceptedRequest) -> Result<Snapshot, Error>;
}

/// Configuration for the HTTP network client.
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// User agent string (default: "netfirst/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self { user_agent: "netfirst/0.1".to_string(), timeout: Duration::from_millis(20_000) }
    }
}

/// reqwest-backed implementation of [`Network`].
pub struct HttpNetwork {
    http: Client,
}

impl HttpNetwork {
    /// Create a new network client with the given configuration.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn issue(&self, request: &InterceptedRequest) -> Result<Snapshot, Error> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| Error::InvalidInput(format!("bad method {:?}: {e}", request.method)))?;

        let mut req = self.http.request(method, request.url.clone());
        if let Some(accept) = &request.accept {
            req = req.header(header::ACCEPT, accept.as_str());
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::NetworkUnavailable(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let headers_json = snapshot_headers(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::NetworkUnavailable(format!("failed to read response: {e}")))?
            .to_vec();

        tracing::debug!(url = %request.url, status, bytes = body.len(), "network answered");

        Ok(Snapshot {
            identity: request.identity(),
            method: request.method.clone(),
            url: request.url.to_string(),
            status,
            content_type,
            headers_json,
            body,
            stored_at: Utc::now().to_rfc3339(),
        })
    }
}

/// Serialize a header map as a JSON array of (name, value) pairs, dropping
/// values that are not valid UTF-8.
fn snapshot_headers(headers: &header::HeaderMap) -> Option<String> {
    let pairs: Vec<(String, String)> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    if pairs.is_empty() {
        return None;
    }

    serde_json::to_string(&pairs).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_config_default() {
        let config = NetConfig::default();
        assert_eq!(config.user_agent, "netfirst/0.1");
        assert_eq!(config.timeout, Duration::from_millis(20_000));
    }

    #[test]
    fn test_http_network_new() {
        let client = HttpNetwork::new(NetConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_snapshot_headers_empty() {
        assert!(snapshot_headers(&header::HeaderMap::new()).is_none());
    }

    #[test]
    fn test_snapshot_headers_pairs() {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/html".parse().unwrap());
        headers.insert(header::CACHE_CONTROL, "no-store".parse().unwrap());

        let json = snapshot_headers(&headers).unwrap();
        let pairs: Vec<(String, String)> = serde_json::from_str(&json).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("content-type".to_string(), "text/html".to_string())));
    }
}
