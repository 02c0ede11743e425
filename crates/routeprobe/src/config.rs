// File: src/config.rs
// Purpose: Assertion settings parsed from routeprobe.toml

use anyhow::{Context, Result};
use http::Method;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Environment variable overriding [`Settings::base_url`]
pub const BASE_URL_ENV: &str = "ROUTEPROBE_BASE_URL";

/// Settings read once per process from `routeprobe.toml` and the environment
static CURRENT: Lazy<Settings> = Lazy::new(|| {
    Settings::load_default().unwrap_or_else(|e| {
        warn!(error = %e, "could not load routeprobe.toml, using defaults");
        Settings::default().with_env_overrides()
    })
});

/// Settings shared by every assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Origin prepended to app-relative urls in failure messages
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Verb used when an assertion does not name one
    #[serde(default = "default_method")]
    pub default_method: String,

    /// Report controllers by route name (`Customer`) rather than type name
    /// (`CustomerController`)
    #[serde(default = "default_true")]
    pub strip_controller_suffix: bool,
}

// Default values
fn default_base_url() -> String {
    "http://site.com".to_string()
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_method: default_method(),
            strip_controller_suffix: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default().with_env_overrides());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default().with_env_overrides());
        }

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?;

        Ok(settings.with_env_overrides())
    }

    /// Load settings from the default path (./routeprobe.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("routeprobe.toml")
    }

    /// Process-wide settings assertions start from
    pub fn current() -> Self {
        CURRENT.clone()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }
        self
    }

    /// The default verb as an HTTP method
    ///
    /// Falls back to GET when `default_method` is not a valid token.
    pub fn method(&self) -> Method {
        Method::from_bytes(self.default_method.trim().to_ascii_uppercase().as_bytes())
            .unwrap_or_else(|_| {
                warn!(method = %self.default_method, "invalid default method, using GET");
                Method::GET
            })
    }
}
