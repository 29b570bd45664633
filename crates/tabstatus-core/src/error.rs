use thiserror::Error;

/// Failures of the browser host adapter (cookie store, tab registry).
#[derive(Debug, Clone, Error)]
#[error("browser host: {0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Credential acquisition failed. Fatal before the observer loop starts.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no session cookie")]
    NoSessionCookie,

    #[error("no client config")]
    NoClientConfig,

    #[error("no workspace")]
    NoWorkspace,

    #[error("incomplete workspace: {0}")]
    IncompleteWorkspace(String),

    #[error("failed to open hidden page: {0}")]
    HiddenPage(#[source] HostError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// A page-context probe was rejected (protected page, closed tab, dead target).
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("probe rejected: {0}")]
    Rejected(String),

    #[error("tab not found: {0}")]
    TabGone(String),
}

/// An outbound presence update failed. Logged, never retried.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("presence API returned HTTP {0}")]
    Status(u16),

    #[error("presence API rejected update: {0}")]
    Api(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TabStatusError {
    #[error("home directory not found: set HOME or TABSTATUS_HOME")]
    HomeNotFound,

    #[error("unknown preference key '{0}': expected enabled, authorized, or workspace")]
    UnknownPreference(String),

    #[error("invalid value '{value}' for preference '{key}'")]
    InvalidPreference { key: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TabStatusError>;
