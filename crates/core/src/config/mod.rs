//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (NETFIRST_*)
//! 2. TOML config file (if NETFIRST_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (NETFIRST_*)
/// 2. TOML config file (if NETFIRST_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name of the current cache version. At any moment at most one version
    /// is current; every other store name is stale and deleted at
    /// activation.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// Origin that relative manifest entries resolve against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Static asset manifest: ordered relative paths pre-cached at install.
    #[serde(default = "default_precache_manifest")]
    pub precache_manifest: Vec<String>,

    /// Path (relative to `base_url`) of the offline fallback document.
    #[serde(default = "default_offline_url")]
    pub offline_url: String,

    /// Backend hostnames whose requests bypass interception entirely.
    /// Matched as substrings of the request host.
    #[serde(default = "default_excluded_hosts")]
    pub excluded_hosts: Vec<String>,

    /// Path to the SQLite cache database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Defaults applied to push notifications with missing fields.
    #[serde(default)]
    pub notifications: NotificationDefaults,
}

/// Display defaults for push notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDefaults {
    /// Title used when the payload carries none.
    #[serde(default = "default_notification_title")]
    pub title: String,

    /// Body used when the payload carries none.
    #[serde(default = "default_notification_body")]
    pub fallback_body: String,

    #[serde(default = "default_notification_icon")]
    pub icon: String,

    #[serde(default = "default_notification_badge")]
    pub badge: String,

    #[serde(default = "default_vibration")]
    pub vibration: Vec<u32>,

    /// Target URL carried on the notification when the payload names none.
    #[serde(default = "default_target")]
    pub default_target: String,
}

fn default_cache_version() -> String {
    "yiu-attendance-v1".to_string()
}

fn default_base_url() -> String {
    "https://yiu-attendance.example/".to_string()
}

fn default_precache_manifest() -> Vec<String> {
    [
        "./",
        "./index.html",
        "./admin.html",
        "./offline.html",
        "./manifest.json",
        "./icons/icon-192.png",
        "./icons/icon-512.png",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_offline_url() -> String {
    "offline.html".to_string()
}

fn default_excluded_hosts() -> Vec<String> {
    vec!["script.google.com".to_string(), "script.googleusercontent.com".to_string()]
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./netfirst-cache.sqlite")
}

fn default_user_agent() -> String {
    "netfirst/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_notification_title() -> String {
    "YIU Attendance".to_string()
}

fn default_notification_body() -> String {
    "You have a new notification.".to_string()
}

fn default_notification_icon() -> String {
    "./icons/icon-192.png".to_string()
}

fn default_notification_badge() -> String {
    "./icons/icon-72.png".to_string()
}

fn default_vibration() -> Vec<u32> {
    vec![100, 50, 100]
}

fn default_target() -> String {
    "./".to_string()
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            title: default_notification_title(),
            fallback_body: default_notification_body(),
            icon: default_notification_icon(),
            badge: default_notification_badge(),
            vibration: default_vibration(),
            default_target: default_target(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_version: default_cache_version(),
            base_url: default_base_url(),
            precache_manifest: default_precache_manifest(),
            offline_url: default_offline_url(),
            excluded_hosts: default_excluded_hosts(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            notifications: NotificationDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parsed base URL.
    pub fn base(&self) -> Result<Url, Error> {
        Url::parse(&self.base_url).map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.base_url)))
    }

    /// Resolve a manifest-relative path against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, Error> {
        self.base()?
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))
    }

    /// Absolute URL of the offline fallback document.
    pub fn offline_document_url(&self) -> Result<Url, Error> {
        self.resolve(&self.offline_url)
    }

    /// Whether a request host matches one of the excluded backend
    /// hostnames (substring match, like the exclusion list entries
    /// `script.google.com` matching `script.google.com` subdomains).
    pub fn is_excluded_host(&self, host: &str) -> bool {
        self.excluded_hosts.iter().any(|h| host.contains(h.as_str()))
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `NETFIRST_`
    /// 2. TOML file from `NETFIRST_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or validation
    /// fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("NETFIRST_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("NETFIRST_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
