//! Intercepted request representation.

use url::Url;

use crate::cache::identity::compute_identity;

/// A request captured at interception time.
///
/// Transient, scoped to a single fetch event; carries just enough of the
/// original request to classify it and derive its cache identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptedRequest {
    pub method: String,
    pub url: Url,
    /// Value of the Accept header, if the request carried one.
    pub accept: Option<String>,
}

impl InterceptedRequest {
    /// A GET request for the given URL with no Accept header.
    pub fn get(url: Url) -> Self {
        Self { method: "GET".to_string(), url, accept: None }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Whether the request declares it expects an HTML document.
    pub fn accepts_html(&self) -> bool {
        self.accept.as_deref().is_some_and(|a| a.contains("text/html"))
    }

    /// Cache identity for this request.
    pub fn identity(&self) -> String {
        compute_identity(&self.method, self.url.as_str())
    }
}
