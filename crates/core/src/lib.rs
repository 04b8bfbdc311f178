//! Core types and shared functionality for netfirst.
//!
//! This crate provides:
//! - Versioned cache store with SQLite backend
//! - Request identity hashing
//! - Unified error types
//! - Layered configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod request;

pub use cache::{CacheDb, CacheStorage, Snapshot};
pub use config::AppConfig;
pub use error::Error;
pub use request::InterceptedRequest;
