//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values after they
//! have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_version`, `offline_url`, or `user_agent` is empty
    /// - `base_url` does not parse as an http(s) URL with a host
    /// - `precache_manifest` is empty
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_version.is_empty() {
            return Err(ConfigError::Invalid { field: "cache_version".into(), reason: "must not be empty".into() });
        }

        if self.offline_url.is_empty() {
            return Err(ConfigError::Invalid { field: "offline_url".into(), reason: "must not be empty".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        let base = self
            .base()
            .map_err(|e| ConfigError::Invalid { field: "base_url".into(), reason: e.to_string() })?;
        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(ConfigError::Invalid {
                field: "base_url".into(),
                reason: "must be an http(s) URL with a host".into(),
            });
        }

        if self.precache_manifest.is_empty() {
            return Err(ConfigError::Invalid {
                field: "precache_manifest".into(),
                reason: "must list at least one asset".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if let Ok(offline) = self.offline_document_url() {
            let covered = self
                .precache_manifest
                .iter()
                .filter_map(|path| self.resolve(path).ok())
                .any(|url| url == offline);
            if !covered {
                tracing::warn!(
                    offline = %offline,
                    "offline document is not in the precache manifest; \
                     it will only be available if cached at runtime"
                );
            }
        }

        Ok(())
    }
}
