//! # Console Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PAOZINHO_API_URL=https://api.paozinho.com.br/                      │
//! │     PAOZINHO_AUTH_URL=https://auth.paozinho.com.br                     │
//! │     PAOZINHO_TIMEOUT_SECS=15                                           │
//! │     PAOZINHO_PAGE_SIZE=20                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/console/console.toml (Linux)                             │
//! │     ~/Library/Application Support/br.paozinho.console/console.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     localhost API, 30 s timeout, 10 rows per page, 1 centavo tolerance │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api.paozinho.com.br/"
//! timeout_secs = 30
//!
//! [auth]
//! url = "https://auth.paozinho.com.br"
//!
//! [ui]
//! page_size = 10
//!
//! [settlement]
//! tolerance_cents = 1
//! ```

use paozinho_core::reconciliation::ReconciliationPolicy;
use paozinho_core::Money;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ConsoleError, ConsoleResult};

// =============================================================================
// Sections
// =============================================================================

/// Remote REST API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every resource path is joined onto.
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:3000/api/".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Identity provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_auth_url")]
    pub url: String,
}

fn default_auth_url() -> String {
    "http://localhost:3000/auth".to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings { url: default_auth_url() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Rows per table page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    10
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            page_size: default_page_size(),
        }
    }
}

/// Settlement balancing.
///
/// The one-centavo default mirrors the rounding shown on screen; it is a
/// setting so the business can tighten it to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSettings {
    #[serde(default = "default_tolerance")]
    pub tolerance_cents: i64,
}

fn default_tolerance() -> i64 {
    1
}

impl Default for SettlementSettings {
    fn default() -> Self {
        SettlementSettings {
            tolerance_cents: default_tolerance(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub settlement: SettlementSettings,
}

impl ConsoleConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (console.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConsoleResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading console config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load console config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConsoleResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConsoleError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Console config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConsoleResult<()> {
        validate_http_url("api.base_url", &self.api.base_url)?;
        validate_http_url("auth.url", &self.auth.url)?;

        if self.api.timeout_secs == 0 {
            return Err(ConsoleError::Config("timeout_secs must be greater than 0".into()));
        }

        if self.ui.page_size == 0 {
            return Err(ConsoleError::Config("page_size must be greater than 0".into()));
        }

        if self.settlement.tolerance_cents < 0 {
            return Err(ConsoleError::Config("tolerance_cents must not be negative".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PAOZINHO_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(url) = lookup("PAOZINHO_AUTH_URL") {
            debug!(url = %url, "Overriding auth URL from environment");
            self.auth.url = url;
        }

        if let Some(secs) = lookup("PAOZINHO_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid PAOZINHO_TIMEOUT_SECS"),
            }
        }

        if let Some(size) = lookup("PAOZINHO_PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(s) => self.ui.page_size = s,
                Err(_) => warn!(value = %size, "Ignoring invalid PAOZINHO_PAGE_SIZE"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("br", "paozinho", "console")
            .map(|dirs| dirs.config_dir().join("console.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// API base URL with a trailing slash, so relative paths join under it.
    pub fn api_base_url(&self) -> ConsoleResult<Url> {
        with_trailing_slash(&self.api.base_url)
    }

    pub fn auth_url(&self) -> ConsoleResult<Url> {
        with_trailing_slash(&self.auth.url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn page_size(&self) -> usize {
        self.ui.page_size
    }

    pub fn reconciliation_policy(&self) -> ReconciliationPolicy {
        ReconciliationPolicy::with_tolerance(Money::from_cents(self.settlement.tolerance_cents))
    }
}

fn validate_http_url(name: &str, raw: &str) -> ConsoleResult<()> {
    let url = Url::parse(raw).map_err(|e| ConsoleError::Config(format!("{} is not a valid URL: {}", name, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConsoleError::Config(format!(
            "{} must start with http:// or https://, got: {}",
            name, raw
        )));
    }
    Ok(())
}

fn with_trailing_slash(raw: &str) -> ConsoleResult<Url> {
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{}/", raw))?)
    }
}
