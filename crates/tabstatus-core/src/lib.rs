//! `tabstatus-core`: mirror the focused browser tab into a presence status.
//!
//! ```text
//! CredentialAcquirer ── once ──► Auth
//!                                 │
//! Observer (poll focused tab) ────┤  dedup, internal pages, enabled gate
//!                                 ▼
//! Publisher ── Sanitizer ──► PresenceApi (users.profile.set)
//! ```
//!
//! The browser itself is reached only through the [`host::BrowserHost`] and
//! [`host::PageInspector`] traits.

pub mod auth;
pub mod config;
pub mod error;
pub mod host;
pub mod io;
pub mod observer;
pub mod paths;
pub mod preferences;
pub mod publisher;
pub mod redaction;
pub mod sanitize;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{Acquisition, Auth, CredentialAcquirer, Workspace};
pub use error::{AuthError, HostError, ProbeError, PublishError, Result, TabStatusError};
pub use host::{BrowserHost, PageInspector, TabId, TabSnapshot};
pub use observer::{Observer, Tick};
pub use preferences::{FilePreferences, PreferenceStore, Preferences, SharedPreferences};
pub use publisher::{PresenceApi, PublishOutcome, Publisher, SlackClient, StatusUpdate};
pub use redaction::RedactionTable;
pub use sanitize::{sanitize, Sanitizer};
