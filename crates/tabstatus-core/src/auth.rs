//! Session credential acquisition.
//!
//! The presence API is called with the same credentials the service's own web
//! client uses: a session cookie plus a client token that the web client keeps
//! in its local storage. Both are read from the user's already signed-in
//! browser; nothing is ever written to disk.

use crate::config::ServiceConfig;
use crate::error::AuthError;
use crate::host::{BrowserHost, PageInspector, TabId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Credentials for one workspace. Immutable; lives only in memory.
#[derive(Clone)]
pub struct Auth {
    session_cookie: String,
    access_token: String,
    team_domain: String,
    team_id: String,
    acquired_at: DateTime<Utc>,
}

impl Auth {
    /// Rejects empty values so a publish can never go out without credentials.
    pub fn new(
        session_cookie: impl Into<String>,
        access_token: impl Into<String>,
        team_domain: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let session_cookie = session_cookie.into();
        let access_token = access_token.into();
        let team_domain = team_domain.into();
        if session_cookie.trim().is_empty() {
            return Err(AuthError::NoSessionCookie);
        }
        if access_token.trim().is_empty() {
            return Err(AuthError::IncompleteWorkspace("empty access token".into()));
        }
        if team_domain.trim().is_empty() {
            return Err(AuthError::IncompleteWorkspace("empty team domain".into()));
        }
        Ok(Self {
            session_cookie,
            access_token,
            team_domain,
            team_id: String::new(),
            acquired_at: Utc::now(),
        })
    }

    fn with_team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = team_id.into();
        self
    }

    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn team_domain(&self) -> &str {
        &self.team_domain
    }

    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("session_cookie", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("team_domain", &self.team_domain)
            .field("team_id", &self.team_id)
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Workspace / client config
// ---------------------------------------------------------------------------

/// A workspace the signed-in user belongs to. Carries no secrets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub domain: String,
}

#[derive(Debug, Deserialize)]
struct LocalConfig {
    #[serde(default)]
    teams: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TeamEntry {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug)]
struct TeamRecord {
    id: String,
    entry: TeamEntry,
}

/// Parse the web client's config blob into its teams, in stored order.
fn parse_client_config(raw: &[u8]) -> Result<Vec<TeamRecord>, AuthError> {
    let config: LocalConfig = serde_json::from_slice(raw).map_err(|e| {
        debug!("client config is not valid JSON: {e}");
        AuthError::NoClientConfig
    })?;
    Ok(config
        .teams
        .into_iter()
        .map(|(id, value)| TeamRecord {
            entry: serde_json::from_value(value).unwrap_or_default(),
            id,
        })
        .collect())
}

/// The selected team when it exists, otherwise the first one.
fn choose_team<'a>(teams: &'a [TeamRecord], selected: Option<&str>) -> Option<&'a TeamRecord> {
    if let Some(id) = selected {
        if let Some(team) = teams.iter().find(|t| t.id == id) {
            return Some(team);
        }
        debug!(workspace = id, "selected workspace not in client config, using first");
    }
    teams.first()
}

fn summarize(teams: &[TeamRecord]) -> Vec<Workspace> {
    teams
        .iter()
        .map(|t| Workspace {
            id: t.id.clone(),
            name: t.entry.name.clone().unwrap_or_else(|| t.id.clone()),
            domain: t.entry.domain.clone().unwrap_or_default(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CredentialAcquirer
// ---------------------------------------------------------------------------

/// Result of one acquisition: the credentials plus every workspace seen.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub auth: Auth,
    pub workspaces: Vec<Workspace>,
}

#[derive(Debug, Clone)]
pub struct CredentialAcquirer {
    service: ServiceConfig,
    close_delay: Duration,
    selected_workspace: Option<String>,
}

impl CredentialAcquirer {
    pub fn new(service: ServiceConfig) -> Self {
        Self {
            service,
            close_delay: Duration::from_secs(1),
            selected_workspace: None,
        }
    }

    /// How long the hidden page is left open before it is closed.
    pub fn close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    pub fn prefer_workspace(mut self, id: Option<String>) -> Self {
        self.selected_workspace = id;
        self
    }

    pub async fn acquire<H>(&self, host: &Arc<H>) -> Result<Auth, AuthError>
    where
        H: BrowserHost + PageInspector + 'static,
    {
        Ok(self.acquire_with_workspaces(host).await?.auth)
    }

    /// Read the session cookie, scrape the client config from a hidden page,
    /// and build [`Auth`] for the chosen workspace.
    pub async fn acquire_with_workspaces<H>(&self, host: &Arc<H>) -> Result<Acquisition, AuthError>
    where
        H: BrowserHost + PageInspector + 'static,
    {
        let cookie = host
            .cookie(&self.service.origin, &self.service.session_cookie)
            .await?
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::NoSessionCookie)?;

        let page = host
            .open_hidden(&self.service.bootstrap_url())
            .await
            .map_err(AuthError::HiddenPage)?;
        debug!(page = %page, "opened hidden bootstrap page");

        let scraped = self.scrape(host.as_ref(), &page).await;
        schedule_close(Arc::clone(host), page, self.close_delay);
        let teams = scraped?;

        let team = choose_team(&teams, self.selected_workspace.as_deref())
            .ok_or(AuthError::NoWorkspace)?;
        let token = team
            .entry
            .token
            .clone()
            .ok_or_else(|| AuthError::IncompleteWorkspace(format!("{} has no token", team.id)))?;
        let domain = team
            .entry
            .domain
            .clone()
            .ok_or_else(|| AuthError::IncompleteWorkspace(format!("{} has no domain", team.id)))?;

        let auth = Auth::new(cookie, token, domain)?.with_team_id(team.id.clone());
        info!(
            workspace = auth.team_id(),
            domain = auth.team_domain(),
            "acquired session credentials"
        );
        Ok(Acquisition {
            auth,
            workspaces: summarize(&teams),
        })
    }

    async fn scrape<H: PageInspector>(
        &self,
        host: &H,
        page: &TabId,
    ) -> Result<Vec<TeamRecord>, AuthError> {
        let raw = host
            .read_local_state(page, &self.service.local_config_key)
            .await
            .map_err(|e| {
                debug!("reading client config failed: {e}");
                AuthError::NoClientConfig
            })?
            .ok_or(AuthError::NoClientConfig)?;
        parse_client_config(&raw)
    }
}

/// Close the hidden page after `delay`. Failures are only logged.
fn schedule_close<H>(host: Arc<H>, page: TabId, delay: Duration)
where
    H: BrowserHost + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = host.close(&page).await {
            debug!(page = %page, "closing hidden page failed: {e}");
        }
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
