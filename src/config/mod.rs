//! Harness configuration
//!
//! Values are layered: built-in defaults, then a JSON config file, then `NBSORT_*`
//! environment variables, then command-line flags (applied by the binary).

pub mod validator;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::driver::webdriver::SessionOptions;
use crate::driver::BrowserKind;
use crate::error::{HarnessError, Result};
use crate::server::NotebookServerInfo;
use crate::wait::WaitConfig;

pub use validator::{ConfigValidator, ValidationError, ValidationResult};

pub const ENV_WEBDRIVER_URL: &str = "NBSORT_WEBDRIVER_URL";
pub const ENV_SERVER_URL: &str = "NBSORT_SERVER_URL";
pub const ENV_TOKEN: &str = "NBSORT_TOKEN";
pub const ENV_HEADLESS: &str = "NBSORT_HEADLESS";
pub const ENV_TIMEOUT_MS: &str = "NBSORT_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub webdriver_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub browser_args: Vec<String>,
    /// Running notebook server to test; one is launched when absent.
    pub server_url: Option<String>,
    pub token: Option<String>,
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub server_startup_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            // chromedriver's default port
            webdriver_url: "http://localhost:9515".to_string(),
            browser: BrowserKind::Chrome,
            headless: true,
            browser_args: Vec::new(),
            server_url: None,
            token: None,
            timeout_ms: 10_000,
            poll_interval_ms: 100,
            server_startup_ms: 30_000,
        }
    }
}

impl HarnessConfig {
    /// Platform config file location, e.g. `~/.config/nbsort/config.json` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "nbsort")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads `path` if given, else the default file if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(default) if default.is_file() => Self::from_file(&default),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HarnessError::io("read config", Some(path.display().to_string()), e)
        })?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| HarnessError::config(path.display().to_string(), e.to_string()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overrides fields from variables returned by `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_WEBDRIVER_URL) {
            self.webdriver_url = url;
        }
        if let Some(url) = lookup(ENV_SERVER_URL) {
            self.server_url = Some(url);
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(value) = lookup(ENV_HEADLESS) {
            self.headless = parse_bool(&value).ok_or_else(|| {
                HarnessError::config(ENV_HEADLESS, format!("not a boolean: {value}"))
            })?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = value.parse().map_err(|_| {
                HarnessError::config(
                    ENV_TIMEOUT_MS,
                    format!("not a number of milliseconds: {value}"),
                )
            })?;
        }
        Ok(())
    }

    /// Runs [`ConfigValidator`] and folds its findings into one error.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            HarnessError::config("configuration", message)
        })
    }

    pub fn wait_config(&self) -> WaitConfig {
        WaitConfig::new(
            Duration::from_millis(self.timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        )
    }

    pub fn startup_wait(&self) -> WaitConfig {
        WaitConfig::new(
            Duration::from_millis(self.server_startup_ms),
            Duration::from_millis(self.poll_interval_ms.max(250)),
        )
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            browser: self.browser,
            headless: self.headless,
            args: self.browser_args.clone(),
        }
    }

    pub fn server_info(&self) -> Option<NotebookServerInfo> {
        self.server_url
            .as_ref()
            .map(|url| NotebookServerInfo::new(url.clone(), self.token.clone()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
