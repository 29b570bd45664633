use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Where the presence service lives and how its web client stores credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// Web origin that owns the session cookie and the client config.
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Path opened in the hidden page so the client bundle fills its cache.
    #[serde(default = "default_bootstrap_path")]
    pub bootstrap_path: String,
    #[serde(default = "default_local_config_key")]
    pub local_config_key: String,
    /// API base URL. `{team}` is replaced by the workspace domain.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_origin() -> String {
    "https://app.slack.com".to_string()
}

fn default_session_cookie() -> String {
    "d".to_string()
}

fn default_bootstrap_path() -> String {
    "/404".to_string()
}

fn default_local_config_key() -> String {
    "localConfig_v2".to_string()
}

fn default_api_base() -> String {
    "https://{team}.slack.com".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            session_cookie: default_session_cookie(),
            bootstrap_path: default_bootstrap_path(),
            local_config_key: default_local_config_key(),
            api_base: default_api_base(),
        }
    }
}

impl ServiceConfig {
    /// Full URL of the hidden bootstrap page.
    pub fn bootstrap_url(&self) -> String {
        format!(
            "{}{}",
            self.origin.trim_end_matches('/'),
            self.bootstrap_path
        )
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// DevTools HTTP endpoint of the browser to observe.
    #[serde(default = "default_devtools_url")]
    pub devtools_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_status_len")]
    pub max_status_len: usize,
    #[serde(default = "default_status_emoji")]
    pub status_emoji: String,
    #[serde(default = "default_close_delay_ms")]
    pub hidden_page_close_delay_ms: u64,
    #[serde(default)]
    pub service: ServiceConfig,
    /// Extra host → label entries merged over the built-in redaction table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub redactions: BTreeMap<String, String>,
}

fn default_devtools_url() -> String {
    "http://127.0.0.1:9222".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_status_len() -> usize {
    100
}

fn default_status_emoji() -> String {
    ":globe_with_meridians:".to_string()
}

fn default_close_delay_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            devtools_url: default_devtools_url(),
            poll_interval_ms: default_poll_interval_ms(),
            max_status_len: default_max_status_len(),
            status_emoji: default_status_emoji(),
            hidden_page_close_delay_ms: default_close_delay_ms(),
            service: ServiceConfig::default(),
            redactions: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load `config.yaml` from `home`. A missing file yields the defaults.
    pub fn load(home: &Path) -> Result<Self> {
        let path = paths::config_path(home);
        match crate::io::read_optional(&path)? {
            Some(data) => Ok(serde_yaml::from_str(&data)?),
            None => Ok(Self::default()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn hidden_page_close_delay(&self) -> Duration {
        Duration::from_millis(self.hidden_page_close_delay_ms)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.poll_interval_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        } else if self.poll_interval_ms < 250 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "poll_interval_ms={} is very short; the browser will be probed constantly",
                    self.poll_interval_ms
                ),
            });
        }

        // Slack caps status_text at 100 characters.
        if self.max_status_len == 0 || self.max_status_len > 100 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "max_status_len={} is outside 1..=100",
                    self.max_status_len
                ),
            });
        }

        if url::Url::parse(&self.devtools_url).is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("devtools_url '{}' is not a valid URL", self.devtools_url),
            });
        }

        if url::Url::parse(&self.service.origin).is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("service.origin '{}' is not a valid URL", self.service.origin),
            });
        }

        if !self.service.bootstrap_path.starts_with('/') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "service.bootstrap_path '{}' should start with '/'",
                    self.service.bootstrap_path
                ),
            });
        }

        if self.service.session_cookie.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "service.session_cookie is empty".to_string(),
            });
        }

        for (host, label) in &self.redactions {
            if label.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("redaction for '{host}' has an empty label"),
                });
            }
            if host.contains('/') || host.contains(':') {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "redaction key '{host}' looks like a URL; use a bare host name"
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
