//! Host capabilities consumed by the worker.
//!
//! Each trait is the boundary to a facility the surrounding host provides:
//! lifecycle hand-off signals, notification display, and open window
//! clients. The worker never reaches past these seams.

use async_trait::async_trait;

use crate::notify::NotificationRecord;
use netfirst_core::Error;

/// Lifecycle hand-off signals.
#[async_trait]
pub trait HostControl: Send + Sync {
    /// Skip the wait-for-pages-to-close hand-off and become eligible for
    /// activation immediately after install.
    async fn skip_waiting(&self) -> Result<(), Error>;

    /// Take control of already-open pages without waiting for their next
    /// navigation.
    async fn claim_clients(&self) -> Result<(), Error>;
}

/// OS-level notification display.
#[async_trait]
pub trait NotificationDisplay: Send + Sync {
    async fn show(&self, title: &str, record: &NotificationRecord) -> Result<(), Error>;

    async fn dismiss(&self, tag: &str) -> Result<(), Error>;
}

/// An open window-type client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
}

/// Enumeration and control of open windows.
#[async_trait]
pub trait WindowClients: Send + Sync {
    /// Enumerate open window clients, optionally including ones not under
    /// this worker's control.
    async fn enumerate(&self, include_uncontrolled: bool) -> Result<Vec<WindowClient>, Error>;

    async fn focus(&self, id: &str) -> Result<(), Error>;

    async fn open_window(&self, url: &str) -> Result<(), Error>;

    /// Whether the host supports opening new windows at all.
    fn supports_open_window(&self) -> bool;
}
