use crate::auth::Auth;
use crate::error::PublishError;
use crate::host::{BrowserHost, PageInspector, TabId};
use crate::sanitize::{Sanitizer, STATUS_PREFIX};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ─── StatusUpdate ─────────────────────────────────────────────────────────

/// The `profile` object sent to `users.profile.set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status_emoji: String,
    pub status_text: String,
}

// ─── PresenceApi ──────────────────────────────────────────────────────────

/// One remote status write.
pub trait PresenceApi: Send + Sync {
    fn set_status(
        &self,
        auth: &Auth,
        update: &StatusUpdate,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

impl<T: PresenceApi + ?Sized> PresenceApi for Arc<T> {
    async fn set_status(&self, auth: &Auth, update: &StatusUpdate) -> Result<(), PublishError> {
        (**self).set_status(auth, update).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

/// `users.profile.set` over HTTPS, authenticated the way the web client is.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    cookie_name: String,
}

impl SlackClient {
    /// `api_base` may contain `{team}`, replaced by the workspace domain.
    pub fn new(api_base: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            cookie_name: cookie_name.into(),
        }
    }

    pub fn endpoint(&self, team_domain: &str) -> String {
        let base = self.api_base.replace("{team}", team_domain);
        format!("{}/api/users.profile.set", base.trim_end_matches('/'))
    }
}

impl PresenceApi for SlackClient {
    async fn set_status(&self, auth: &Auth, update: &StatusUpdate) -> Result<(), PublishError> {
        let profile = serde_json::to_string(update)?;
        let cookie = format!(
            "{}={}",
            self.cookie_name,
            encode_component(auth.session_cookie())
        );

        let resp = self
            .http
            .post(self.endpoint(auth.team_domain()))
            .header(reqwest::header::COOKIE, cookie)
            .form(&[("token", auth.access_token()), ("profile", profile.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PublishError::Status(status.as_u16()));
        }

        // Only `ok` is inspected; a non-JSON 2xx body counts as success.
        let body = resp.text().await?;
        if let Ok(reply) = serde_json::from_str::<ApiReply>(&body) {
            if reply.ok == Some(false) {
                return Err(PublishError::Api(
                    reply.error.unwrap_or_else(|| "unknown error".into()),
                ));
            }
        }
        Ok(())
    }
}

/// Percent-encode like JavaScript's `encodeURIComponent`.
fn encode_component(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

// ─── Publisher ────────────────────────────────────────────────────────────

/// What a single publish attempt ended with. Informational only.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Published(String),
    /// The tab could not be read (closed, protected, no title).
    Skipped(String),
    Failed(String),
}

/// Turns a tab into a sanitized status and sends it.
pub struct Publisher<H, A> {
    host: Arc<H>,
    api: A,
    sanitizer: Sanitizer,
    emoji: String,
    max_len: usize,
}

impl<H, A> Publisher<H, A>
where
    H: BrowserHost + PageInspector,
    A: PresenceApi,
{
    pub fn new(host: Arc<H>, api: A, sanitizer: Sanitizer) -> Self {
        Self {
            host,
            api,
            sanitizer,
            emoji: ":globe_with_meridians:".to_string(),
            max_len: 100,
        }
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Build the status for `tab_id` and send it once.
    ///
    /// Never fails: every error is logged and reported as the outcome.
    pub async fn publish(&self, tab_id: &TabId, auth: &Auth) -> PublishOutcome {
        let tab = match self.host.tab(tab_id).await {
            Ok(Some(tab)) => tab,
            Ok(None) => return skipped(tab_id, "tab closed"),
            Err(e) => return skipped(tab_id, &e.to_string()),
        };

        let probed = match self.host.read_title(tab_id).await {
            Ok(title) => title,
            Err(e) => return skipped(tab_id, &e.to_string()),
        };
        let title = probed
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(tab.title);
        if title.trim().is_empty() {
            return skipped(tab_id, "empty title");
        }

        let update = StatusUpdate {
            status_emoji: self.emoji.clone(),
            status_text: self.sanitizer.sanitize(
                &format!("{STATUS_PREFIX}{title}"),
                &tab.url,
                self.max_len,
            ),
        };

        match self.api.set_status(auth, &update).await {
            Ok(()) => {
                info!(tab = %tab_id, "updated status to {:?}", update.status_text);
                PublishOutcome::Published(update.status_text)
            }
            Err(e) => {
                let age = chrono::Utc::now() - auth.acquired_at();
                warn!(
                    tab = %tab_id,
                    credentials_age_min = age.num_minutes(),
                    "status update failed: {e}"
                );
                PublishOutcome::Failed(e.to_string())
            }
        }
    }
}

fn skipped(tab_id: &TabId, reason: &str) -> PublishOutcome {
    debug!(tab = %tab_id, "skipping publish: {reason}");
    PublishOutcome::Skipped(reason.to_string())
}

// ─── Tests ────────────────────────────────────────────────────────────────
