use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};
use tabstatus_core::{BrowserHost, HostError, PageInspector, ProbeError, TabId, TabSnapshot};
use tracing::debug;

use crate::client::CdpClient;
use crate::types::{CookiesResult, CreateTargetResult, TargetInfo};
use crate::CdpError;

// ─── CdpHost ──────────────────────────────────────────────────────────────

/// A desktop browser reached over its remote-debugging port.
///
/// The focused tab is taken to be the first `page` target of `/json/list`,
/// which Chromium orders by most recent activation. Pages this host opened
/// in the background are never reported as focused.
#[derive(Debug)]
pub struct CdpHost {
    client: CdpClient,
    hidden: Mutex<HashSet<String>>,
    settle_attempts: u32,
    settle_delay: Duration,
}

impl CdpHost {
    pub fn new(client: CdpClient) -> Self {
        Self {
            client,
            hidden: Mutex::new(HashSet::new()),
            settle_attempts: 20,
            settle_delay: Duration::from_millis(250),
        }
    }

    /// How long to wait for a freshly opened page to reach its origin before
    /// its storage can be read.
    pub fn settle(mut self, attempts: u32, delay: Duration) -> Self {
        self.settle_attempts = attempts.max(1);
        self.settle_delay = delay;
        self
    }

    pub fn client(&self) -> &CdpClient {
        &self.client
    }

    fn hidden_ids(&self) -> HashSet<String> {
        self.hidden
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}

fn snapshot(target: &TargetInfo) -> TabSnapshot {
    TabSnapshot {
        id: TabId::new(target.id.clone()),
        url: target.url.clone(),
        title: target.title.clone(),
    }
}

/// The most recently active page that is not one of our hidden pages.
pub(crate) fn pick_focused<'a>(
    targets: &'a [TargetInfo],
    hidden: &HashSet<String>,
) -> Option<&'a TargetInfo> {
    targets
        .iter()
        .find(|t| t.is_page() && !hidden.contains(&t.id))
}

/// Script reading `key` from local storage once the page has left
/// `about:blank`; `undefined` until then.
fn local_state_expression(key: &str) -> String {
    let key = Value::String(key.to_string());
    format!("location.href === 'about:blank' ? undefined : localStorage.getItem({key})")
}

impl BrowserHost for CdpHost {
    async fn cookie(&self, url: &str, name: &str) -> Result<Option<String>, HostError> {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or_else(|| HostError::new(format!("cookie url '{url}' has no host")))?;
        let raw = self
            .client
            .browser_call("Storage.getCookies", json!({}))
            .await?;
        let jar: CookiesResult = serde_json::from_value(raw).map_err(CdpError::from)?;
        Ok(jar
            .cookies
            .into_iter()
            .find(|c| c.name == name && c.applies_to(&host))
            .map(|c| c.value))
    }

    async fn focused_tab(&self) -> Result<Option<TabSnapshot>, HostError> {
        let targets = self.client.targets().await?;
        Ok(pick_focused(&targets, &self.hidden_ids()).map(snapshot))
    }

    async fn tab(&self, id: &TabId) -> Result<Option<TabSnapshot>, HostError> {
        let targets = self.client.targets().await?;
        Ok(targets
            .iter()
            .find(|t| t.id == id.as_str())
            .map(snapshot))
    }

    async fn open_hidden(&self, url: &str) -> Result<TabId, HostError> {
        let raw = self
            .client
            .browser_call(
                "Target.createTarget",
                json!({ "url": url, "background": true }),
            )
            .await?;
        let created: CreateTargetResult = serde_json::from_value(raw).map_err(CdpError::from)?;
        if let Ok(mut hidden) = self.hidden.lock() {
            hidden.insert(created.target_id.clone());
        }
        Ok(TabId::new(created.target_id))
    }

    async fn close(&self, id: &TabId) -> Result<(), HostError> {
        let result = self.client.close_target(id.as_str()).await;
        if let Ok(mut hidden) = self.hidden.lock() {
            hidden.remove(id.as_str());
        }
        Ok(result?)
    }
}

impl PageInspector for CdpHost {
    async fn read_local_state(&self, page: &TabId, key: &str) -> Result<Option<Vec<u8>>, ProbeError> {
        let expression = local_state_expression(key);
        for attempt in 1..=self.settle_attempts {
            match self.client.evaluate(page.as_str(), &expression).await {
                Ok(Some(Value::String(s))) => return Ok(Some(s.into_bytes())),
                Ok(Some(_)) => return Ok(None),
                // Still navigating, or storage not reachable yet.
                Ok(None) | Err(CdpError::Evaluation(_)) => {
                    debug!(page = %page, attempt, "page not settled yet");
                }
                Err(e) => return Err(e.into()),
            }
            tokio::time::sleep(self.settle_delay).await;
        }
        Ok(None)
    }

    async fn read_title(&self, tab: &TabId) -> Result<Option<String>, ProbeError> {
        match self.client.evaluate(tab.as_str(), "document.title").await? {
            Some(Value::String(title)) => Ok(Some(title)),
            _ => Ok(None),
        }
    }
}
