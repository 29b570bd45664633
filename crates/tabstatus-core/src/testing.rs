//! In-memory browser host and presence API used by unit tests.

use crate::auth::Auth;
use crate::error::{HostError, ProbeError, PublishError};
use crate::host::{BrowserHost, PageInspector, TabId, TabSnapshot};
use crate::publisher::{PresenceApi, StatusUpdate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct FakeHost {
    cookies: Mutex<HashMap<String, String>>,
    local_state: Mutex<Option<String>>,
    focused: Mutex<Option<TabId>>,
    tabs: Mutex<HashMap<TabId, TabSnapshot>>,
    probes: Mutex<HashMap<TabId, Result<Option<String>, ProbeError>>>,
    opened: Mutex<Vec<String>>,
    closed: Mutex<Vec<TabId>>,
    fail_close: AtomicBool,
    next_page: AtomicUsize,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cookie(&self, name: &str, value: &str) {
        self.cookies
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_local_state(&self, raw: &str) {
        *self.local_state.lock().unwrap() = Some(raw.to_string());
    }

    /// Register a tab and make it the focused one. `document.title` answers
    /// with the same title unless overridden with [`FakeHost::set_probe`].
    pub fn focus(&self, id: u64, url: &str, title: &str) {
        let tab = TabSnapshot {
            id: TabId::from(id),
            url: url.to_string(),
            title: title.to_string(),
        };
        self.probes
            .lock()
            .unwrap()
            .entry(tab.id.clone())
            .or_insert_with(|| Ok(Some(title.to_string())));
        *self.focused.lock().unwrap() = Some(tab.id.clone());
        self.tabs.lock().unwrap().insert(tab.id.clone(), tab);
    }

    pub fn unfocus(&self) {
        *self.focused.lock().unwrap() = None;
    }

    pub fn set_probe(&self, id: u64, result: Result<Option<String>, ProbeError>) {
        self.probes.lock().unwrap().insert(TabId::from(id), result);
    }

    pub fn fail_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<TabId> {
        self.closed.lock().unwrap().clone()
    }
}

impl BrowserHost for FakeHost {
    async fn cookie(&self, _url: &str, name: &str) -> Result<Option<String>, HostError> {
        Ok(self.cookies.lock().unwrap().get(name).cloned())
    }

    async fn focused_tab(&self) -> Result<Option<TabSnapshot>, HostError> {
        let focused = self.focused.lock().unwrap().clone();
        Ok(focused.and_then(|id| self.tabs.lock().unwrap().get(&id).cloned()))
    }

    async fn tab(&self, id: &TabId) -> Result<Option<TabSnapshot>, HostError> {
        Ok(self.tabs.lock().unwrap().get(id).cloned())
    }

    async fn open_hidden(&self, url: &str) -> Result<TabId, HostError> {
        self.opened.lock().unwrap().push(url.to_string());
        let n = self.next_page.fetch_add(1, Ordering::SeqCst);
        Ok(TabId::new(format!("hidden-{n}")))
    }

    async fn close(&self, id: &TabId) -> Result<(), HostError> {
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(HostError::new("tab already gone"));
        }
        self.closed.lock().unwrap().push(id.clone());
        Ok(())
    }
}

impl PageInspector for FakeHost {
    async fn read_local_state(&self, _page: &TabId, _key: &str) -> Result<Option<Vec<u8>>, ProbeError> {
        Ok(self
            .local_state
            .lock()
            .unwrap()
            .clone()
            .map(String::into_bytes))
    }

    async fn read_title(&self, tab: &TabId) -> Result<Option<String>, ProbeError> {
        self.probes
            .lock()
            .unwrap()
            .get(tab)
            .cloned()
            .unwrap_or_else(|| Err(ProbeError::TabGone(tab.to_string())))
    }
}

/// Records every status update instead of sending it.
#[derive(Default)]
pub(crate) struct RecordingApi {
    sent: Mutex<Vec<StatusUpdate>>,
    fail: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let api = Self::default();
        api.fail.store(true, Ordering::SeqCst);
        api
    }

    pub fn with_delay(delay: Duration) -> Self {
        let api = Self::default();
        *api.delay.lock().unwrap() = Some(delay);
        api
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.status_text.clone())
            .collect()
    }
}

impl PresenceApi for RecordingApi {
    async fn set_status(&self, _auth: &Auth, update: &StatusUpdate) -> Result<(), PublishError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::Status(500));
        }
        self.sent.lock().unwrap().push(update.clone());
        Ok(())
    }
}
