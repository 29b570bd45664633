use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::types::{BrowserVersion, Command, EvaluateResult, Incoming, TargetInfo};
use crate::{CdpError, Result};

// ─── CdpClient ────────────────────────────────────────────────────────────

/// Thin Chrome DevTools Protocol client.
///
/// Discovery goes over the HTTP endpoints (`/json/version`, `/json/list`,
/// `/json/close/{id}`). Commands open a short-lived WebSocket to the target,
/// send one request, and wait for the reply with the matching `id`; events
/// arriving in between are dropped.
#[derive(Debug)]
pub struct CdpClient {
    http: reqwest::Client,
    endpoint: Url,
    next_id: AtomicU64,
    timeout: Duration,
}

impl CdpClient {
    /// `endpoint` is the browser's remote-debugging address, e.g.
    /// `http://127.0.0.1:9222`.
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: Url::parse(endpoint)?,
            next_id: AtomicU64::new(1),
            timeout: Duration::from_secs(5),
        })
    }

    /// Upper bound for connecting plus waiting for one reply.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    // ── HTTP discovery ───────────────────────────────────────────────────

    pub async fn version(&self) -> Result<BrowserVersion> {
        let url = self.endpoint.join("json/version")?;
        Ok(self.http.get(url).send().await?.error_for_status()?.json().await?)
    }

    /// Every target, most recently activated first.
    pub async fn targets(&self) -> Result<Vec<TargetInfo>> {
        let url = self.endpoint.join("json/list")?;
        Ok(self.http.get(url).send().await?.error_for_status()?.json().await?)
    }

    pub async fn close_target(&self, target_id: &str) -> Result<()> {
        let url = self.endpoint.join(&format!("json/close/{target_id}"))?;
        self.http.get(url).send().await?.error_for_status()?;
        Ok(())
    }

    /// WebSocket URL of a page target.
    pub fn page_ws_url(&self, target_id: &str) -> String {
        let host = self.endpoint.host_str().unwrap_or("127.0.0.1");
        let port = self
            .endpoint
            .port_or_known_default()
            .map(|p| format!(":{p}"))
            .unwrap_or_default();
        let scheme = if self.endpoint.scheme() == "https" { "wss" } else { "ws" };
        format!("{scheme}://{host}{port}/devtools/page/{target_id}")
    }

    // ── Commands ─────────────────────────────────────────────────────────

    /// Send one command over `ws_url` and return its `result`.
    pub async fn call(&self, ws_url: &str, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tokio::time::timeout(self.timeout, exchange(ws_url, id, method, params))
            .await
            .map_err(|_| CdpError::Timeout(method.to_string()))?
    }

    /// Send a command to the browser-level target.
    pub async fn browser_call(&self, method: &str, params: Value) -> Result<Value> {
        let version = self.version().await?;
        self.call(&version.web_socket_debugger_url, method, params)
            .await
    }

    /// Evaluate `expression` in a page. `Ok(None)` means it was `undefined`;
    /// JavaScript `null` comes back as `Some(Value::Null)`.
    pub async fn evaluate(&self, target_id: &str, expression: &str) -> Result<Option<Value>> {
        let raw = self
            .call(
                &self.page_ws_url(target_id),
                "Runtime.evaluate",
                json!({ "expression": expression, "returnByValue": true }),
            )
            .await?;
        let evaluated: EvaluateResult = serde_json::from_value(raw)?;
        if let Some(details) = evaluated.exception_details {
            return Err(CdpError::Evaluation(details.message()));
        }
        if evaluated.result.is_undefined() {
            return Ok(None);
        }
        Ok(Some(evaluated.result.value.unwrap_or(Value::Null)))
    }
}

async fn exchange(ws_url: &str, id: u64, method: &str, params: Value) -> Result<Value> {
    let (mut ws, _) = connect_async(ws_url).await?;
    let frame = serde_json::to_string(&Command { id, method, params })?;
    ws.send(Message::Text(frame)).await?;

    let mut reply = Err(CdpError::Closed(method.to_string()));
    while let Some(msg) = ws.next().await {
        match msg? {
            Message::Text(text) => {
                if let Some(r) = match_reply(&text, id, method) {
                    reply = r;
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    let _ = ws.close(None).await;
    reply
}

/// If `text` is the reply to command `id`, its outcome. Events, replies to
/// other commands and unparsable frames yield `None`.
pub(crate) fn match_reply(text: &str, id: u64, method: &str) -> Option<Result<Value>> {
    let incoming: Incoming = serde_json::from_str(text).ok()?;
    if incoming.id != Some(id) {
        return None;
    }
    if let Some(err) = incoming.error {
        return Some(Err(CdpError::Protocol {
            method: method.to_string(),
            code: err.code,
            message: err.message,
        }));
    }
    Some(Ok(incoming.result.unwrap_or(Value::Null)))
}
