//! The netfirst worker: request-interception agent with a network-first,
//! cache-fallback, offline-page-last-resort policy.
//!
//! The worker is wired to its surroundings through capability traits
//! (cache store, network, lifecycle hand-off signals, notification display,
//! window clients). Each host event maps to one asynchronous entry point:
//! install and activate on [`lifecycle::LifecycleController`], fetch on
//! [`router::RequestRouter`], push and notification-click on
//! [`notify::NotificationBridge`].

pub mod capabilities;
pub mod lifecycle;
pub mod notify;
pub mod router;

pub use capabilities::{HostControl, NotificationDisplay, WindowClient, WindowClients};
pub use lifecycle::{ActivateReport, InstallReport, LifecycleController, WorkerState};
pub use notify::{ClickOutcome, ClickedNotification, NotificationBridge, NotificationRecord, PushPayload};
pub use router::{RequestRouter, RoutedResponse, ServedFrom, Verdict};
