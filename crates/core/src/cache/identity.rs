//! Request identity derivation.

use sha2::{Digest, Sha256};

/// Compute the cache identity for a request: a SHA-256 over the method and
/// the full URL. Lookups are exact; there is no prefix or partial matching.
pub fn compute_identity(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_stability() {
        let a = compute_identity("GET", "https://example.com/");
        let b = compute_identity("GET", "https://example.com/");
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_method_sensitive() {
        let get = compute_identity("GET", "https://example.com/");
        let head = compute_identity("HEAD", "https://example.com/");
        assert_ne!(get, head);
    }

    #[test]
    fn test_identity_method_case_insensitive() {
        let upper = compute_identity("GET", "https://example.com/");
        let lower = compute_identity("get", "https://example.com/");
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_identity_url_sensitive() {
        let a = compute_identity("GET", "https://example.com/a");
        let b = compute_identity("GET", "https://example.com/b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_format() {
        let id = compute_identity("GET", "https://example.com/");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
