//! `tabstatus-cdp`: browser host over the Chrome DevTools Protocol.
//!
//! Implements [`tabstatus_core::BrowserHost`] and
//! [`tabstatus_core::PageInspector`] against any Chromium-based browser
//! started with `--remote-debugging-port`.
//!
//! ```text
//! CdpHost
//!     │
//!     ▼
//! CdpClient  ── HTTP ──► /json/version, /json/list, /json/close/{id}
//!            ── WS ────► Storage.getCookies, Target.createTarget,
//!                        Runtime.evaluate
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use tabstatus_cdp::{CdpClient, CdpHost};
//! use tabstatus_core::BrowserHost;
//!
//! let host = CdpHost::new(CdpClient::new("http://127.0.0.1:9222")?);
//! if let Some(tab) = host.focused_tab().await? {
//!     println!("{} ({})", tab.title, tab.url);
//! }
//! ```

pub mod client;
pub mod error;
pub mod host;
pub mod types;


pub use client::CdpClient;
pub use error::CdpError;
pub use host::CdpHost;
pub use types::{BrowserVersion, Cookie, TargetInfo};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, CdpError>;
