//! Network client for netfirst.
//!
//! This crate provides the network capability trait and its reqwest-backed
//! implementation, used by the worker's lifecycle controller and router.

pub mod fetch;

pub use fetch::{HttpNetwork, NetConfig, Network};
