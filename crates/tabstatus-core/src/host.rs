//! Capabilities the engine needs from the browser it observes.
//!
//! The engine never talks to a browser directly; it is generic over a host
//! that implements [`BrowserHost`] (cookies, tabs) and [`PageInspector`]
//! (read-only probes into a page's own state).

use crate::error::{HostError, ProbeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

// ---------------------------------------------------------------------------
// TabId
// ---------------------------------------------------------------------------

/// Opaque tab identifier. Only equality matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TabId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for TabId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

// ---------------------------------------------------------------------------
// TabSnapshot
// ---------------------------------------------------------------------------

/// What a tab looked like at the moment it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub url: String,
    /// Title as cached by the host; may lag the page's `document.title`.
    pub title: String,
}

/// URL schemes of browser-internal pages. Tabs on these are never mirrored.
pub const RESERVED_SCHEMES: &[&str] = &[
    "about",
    "brave",
    "chrome",
    "chrome-extension",
    "chrome-search",
    "chrome-untrusted",
    "devtools",
    "edge",
    "moz-extension",
    "opera",
    "view-source",
    "vivaldi",
];

impl TabSnapshot {
    /// `true` when the URL belongs to a browser-internal page.
    pub fn is_internal(&self) -> bool {
        let scheme = match self.url.split_once(':') {
            Some((scheme, _)) => scheme.to_ascii_lowercase(),
            None => return false,
        };
        RESERVED_SCHEMES.contains(&scheme.as_str())
    }
}

// ---------------------------------------------------------------------------
// Host traits
// ---------------------------------------------------------------------------

/// Cookie and tab access on the browser hosting the user's session.
pub trait BrowserHost: Send + Sync {
    /// Value of cookie `name` visible to `url`, if any.
    fn cookie(
        &self,
        url: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, HostError>> + Send;

    /// The active tab of the most recently focused window.
    fn focused_tab(&self) -> impl Future<Output = Result<Option<TabSnapshot>, HostError>> + Send;

    /// Current state of one tab, or `None` if it no longer exists.
    fn tab(&self, id: &TabId) -> impl Future<Output = Result<Option<TabSnapshot>, HostError>> + Send;

    /// Open `url` in a background tab that does not take focus.
    fn open_hidden(&self, url: &str) -> impl Future<Output = Result<TabId, HostError>> + Send;

    fn close(&self, id: &TabId) -> impl Future<Output = Result<(), HostError>> + Send;
}

/// Read-only probes into a page's own context.
pub trait PageInspector: Send + Sync {
    /// Raw value stored under `key` in the page's local storage.
    fn read_local_state(
        &self,
        page: &TabId,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, ProbeError>> + Send;

    /// The page's live `document.title`.
    fn read_title(
        &self,
        tab: &TabId,
    ) -> impl Future<Output = Result<Option<String>, ProbeError>> + Send;
}
