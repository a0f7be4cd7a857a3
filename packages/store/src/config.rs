//! # Client configuration: `directory.toml`
//!
//! Defines the TOML file that tells the directory client where its remote
//! store and automation webhook live, and how often the polling change feed
//! runs.
//!
//! ## Structure
//!
//! ```toml
//! [store]
//! url = "https://your-project.supabase.co"
//! api_key = "your-anon-key-here"
//! table = "employees"
//!
//! [webhook]
//! url = "https://automation.example/webhook/send-mail"
//! triggered_from = "https://directory.example"   # optional
//!
//! [sync]
//! poll_interval_secs = 5   # 0 disables the polling feed
//! ```
//!
//! All structs derive `Default`, so a missing or empty file is equivalent to
//! the default configuration. [`DirectoryConfig::from_env`] builds the same
//! structure from `DIRECTORY_*` environment variables (a `.env` file is
//! honoured).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration stored in `directory.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Remote store connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project base URL, without the `/rest/v1` suffix.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "employees".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
        }
    }
}

/// Automation webhook.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: String,
    /// Origin tag sent as `triggered_from`. Resolved at runtime when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_from: Option<String>,
}

impl WebhookConfig {
    /// The origin tag for outgoing requests: the configured value, else the
    /// page origin in a browser, else `"unknown"`.
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.triggered_from {
            return origin.clone();
        }
        page_origin().unwrap_or_else(|| "unknown".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
    None
}

/// Change-feed configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Polling interval in seconds. 0 disables the polling feed.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u32,
}

fn default_poll_interval() -> u32 {
    5
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl DirectoryConfig {
    /// Create a config pointing at the given store.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            store: StoreConfig {
                url: url.into(),
                api_key: api_key.into(),
                table: default_table(),
            },
            ..Default::default()
        }
    }

    /// Builder method to set the webhook URL.
    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook.url = url.into();
        self
    }

    /// Builder method to set the polling interval.
    pub fn with_poll_interval(mut self, secs: u32) -> Self {
        self.sync.poll_interval_secs = secs;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "directory.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build from `DIRECTORY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("DIRECTORY_STORE_URL").ok_or(ConfigError::Missing("DIRECTORY_STORE_URL"))?;
        let api_key = lookup("DIRECTORY_STORE_API_KEY")
            .ok_or(ConfigError::Missing("DIRECTORY_STORE_API_KEY"))?;

        let mut config = Self::new(url, api_key);
        if let Some(table) = lookup("DIRECTORY_STORE_TABLE") {
            config.store.table = table;
        }
        if let Some(webhook) = lookup("DIRECTORY_WEBHOOK_URL") {
            config.webhook.url = webhook;
        }
        config.webhook.triggered_from = lookup("DIRECTORY_WEBHOOK_ORIGIN");
        if let Some(value) = lookup("DIRECTORY_POLL_INTERVAL_SECS") {
            config.sync.poll_interval_secs =
                value.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: "DIRECTORY_POLL_INTERVAL_SECS",
                    value,
                })?;
        }
        Ok(config)
    }
}
