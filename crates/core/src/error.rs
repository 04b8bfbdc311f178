//! Unified error types for netfirst.

use tokio_rusqlite::rusqlite;

/// Unified error type shared by the cache store, the network client, and
/// the worker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A manifest asset could not be retrieved during install. Aborts the
    /// whole install step; the host's version-rollback handles recovery.
    #[error("INSTALL_FETCH_FAILED: {asset}: {reason}")]
    InstallFetch { asset: String, reason: String },

    /// A stale cache version could not be deleted during activation.
    /// Non-fatal; remaining deletions proceed.
    #[error("STALE_VERSION_DELETE_FAILED: {name}: {reason}")]
    StaleVersionDelete { name: String, reason: String },

    /// The network did not answer at all (DNS failure, refused connection,
    /// timeout, offline). Triggers the cache-fallback path.
    #[error("NETWORK_UNAVAILABLE: {0}")]
    NetworkUnavailable(String),

    /// No cache entry found for the given identity.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// A push payload could not be parsed as structured data.
    #[error("MALFORMED_PAYLOAD: {0}")]
    MalformedPayload(String),

    /// The host refused to display a notification.
    #[error("DISPLAY_FAILED: {0}")]
    DisplayFailed(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP-level failure while building or issuing a request.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_codes() {
        let err = Error::NetworkUnavailable("dns failure".to_string());
        assert!(err.to_string().contains("NETWORK_UNAVAILABLE"));
        assert!(err.to_string().contains("dns failure"));
    }

    #[test]
    fn test_install_fetch_display() {
        let err = Error::InstallFetch { asset: "./offline.html".to_string(), reason: "status 404".to_string() };
        let text = err.to_string();
        assert!(text.contains("INSTALL_FETCH_FAILED"));
        assert!(text.contains("./offline.html"));
        assert!(text.contains("status 404"));
    }
}
