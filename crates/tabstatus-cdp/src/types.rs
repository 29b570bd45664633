use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── HTTP discovery endpoints ─────────────────────────────────────────────

/// One entry of `GET /json/list`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub id: String,
    /// `page`, `background_page`, `service_worker`, `iframe`, …
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub web_socket_debugger_url: Option<String>,
}

impl TargetInfo {
    pub fn is_page(&self) -> bool {
        self.kind == "page"
    }
}

/// `GET /json/version`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser", default)]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

// ─── WebSocket framing ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct Command<'a> {
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

/// A command reply or an event. Events carry `method` and no `id`.
#[derive(Debug, Deserialize)]
pub(crate) struct Incoming {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ProtocolError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProtocolError {
    pub code: i64,
    pub message: String,
}

// ─── Command results ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default)]
    pub path: String,
}

impl Cookie {
    /// Whether a request to `host` would carry this cookie.
    pub fn applies_to(&self, host: &str) -> bool {
        let domain = self.domain.trim_start_matches('.');
        host == domain
            || host
                .strip_suffix(domain)
                .is_some_and(|rest| rest.ends_with('.'))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CookiesResult {
    #[serde(default)]
    pub cookies: Vec<Cookie>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTargetResult {
    pub target_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EvaluateResult {
    pub result: RemoteObject,
    #[serde(default)]
    pub exception_details: Option<ExceptionDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoteObject {
    #[serde(rename = "type")]
    pub kind: String,
    /// `null` and `undefined` both arrive without a usable value; `kind`
    /// tells them apart.
    #[serde(default)]
    pub value: Option<Value>,
}

impl RemoteObject {
    pub fn is_undefined(&self) -> bool {
        self.kind == "undefined"
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExceptionDetails {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub exception: Option<ExceptionObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExceptionObject {
    #[serde(default)]
    pub description: Option<String>,
}

impl ExceptionDetails {
    pub fn message(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_else(|| self.text.clone())
    }
}
