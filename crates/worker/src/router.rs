//! Fetch interception: classification and the network-first strategy.
//!
//! Classification is pure; the strategy wraps it in a thin asynchronous
//! adapter. For every intercepted request a response is produced, whatever
//! the state of the network and the cache.

use std::sync::Arc;

use netfirst_client::Network;
use netfirst_core::{AppConfig, CacheStorage, Error, InterceptedRequest, Snapshot};

/// Classification result for an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not ours: the request passes through to the network unmodified and
    /// the event is not claimed.
    Bypass,
    /// Apply the network-first strategy.
    Intercept,
}

/// Where a routed response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    /// Live network answer.
    Network,
    /// Snapshot from the current-version cache.
    Cache,
    /// The offline fallback document.
    OfflineFallback,
    /// Synthesized service-unavailable response.
    Synthesized,
}

/// Response produced by the router for an intercepted request.
#[derive(Debug, Clone)]
pub struct RoutedResponse {
    pub snapshot: Snapshot,
    pub source: ServedFrom,
}

/// Per-fetch decision procedure over the current-version cache store.
pub struct RequestRouter<S, N> {
    config: Arc<AppConfig>,
    store: Arc<S>,
    net: Arc<N>,
}

impl<S: CacheStorage, N: Network> RequestRouter<S, N> {
    pub fn new(config: Arc<AppConfig>, store: Arc<S>, net: Arc<N>) -> Self {
        Self { config, store, net }
    }

    /// Pure classification, no side effects: requests for excluded backend
    /// hosts and non-GET requests are not intercepted at all.
    pub fn classify(&self, request: &InterceptedRequest) -> Verdict {
        if !request.is_get() {
            return Verdict::Bypass;
        }

        let host = request.url.host_str().unwrap_or_default();
        if self.config.is_excluded_host(host) {
            return Verdict::Bypass;
        }

        Verdict::Intercept
    }

    /// Route one request. `None` means the event is not claimed and the
    /// request goes to the network untouched; `Some` always carries a
    /// response.
    pub async fn route(&self, request: &InterceptedRequest) -> Option<RoutedResponse> {
        match self.classify(request) {
            Verdict::Bypass => None,
            Verdict::Intercept => Some(self.network_first(request).await),
        }
    }

    /// Network first, cache fallback, offline page last resort.
    async fn network_first(&self, request: &InterceptedRequest) -> RoutedResponse {
        match self.net.issue(request).await {
            Ok(snapshot) => {
                if snapshot.is_success() {
                    // The caller's response never waits on a failed write;
                    // storage errors are logged and swallowed.
                    if let Err(e) = self.store.insert(&self.config.cache_version, &snapshot).await {
                        tracing::warn!(url = %request.url, error = %e, "runtime cache write failed");
                    }
                }
                RoutedResponse { snapshot, source: ServedFrom::Network }
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "network failed, serving from cache");
                self.from_cache(request).await
            }
        }
    }

    async fn from_cache(&self, request: &InterceptedRequest) -> RoutedResponse {
        let store = self.config.cache_version.as_str();

        match self.store.lookup(store, &request.identity()).await {
            Ok(Some(snapshot)) => return RoutedResponse { snapshot, source: ServedFrom::Cache },
            Ok(None) => {}
            Err(e) => tracing::warn!(url = %request.url, error = %e, "cache lookup failed"),
        }

        // The offline page is only for document requests; failing
        // subresources get the synthesized error below.
        if request.accepts_html() {
            match self.offline_fallback(store).await {
                Ok(Some(snapshot)) => return RoutedResponse { snapshot, source: ServedFrom::OfflineFallback },
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "offline fallback lookup failed"),
            }
        }

        RoutedResponse { snapshot: Snapshot::service_unavailable(request), source: ServedFrom::Synthesized }
    }

    async fn offline_fallback(&self, store: &str) -> Result<Option<Snapshot>, Error> {
        let url = self.config.offline_document_url()?;
        let identity = InterceptedRequest::get(url).identity();
        self.store.lookup(store, &identity).await
    }
}
