//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::{Res, Void};

/// Default Webex REST API base URL.
fn default_webex_api_url() -> String {
    "https://webexapis.com/v1".to_string()
}

/// Default name of the registered webhook.
fn default_webhook_name() -> String {
    "Message Webhook".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10001
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

/// Default location of the persisted group store.
fn default_store_path() -> String {
    "./cache.db".to_string()
}

/// Default token the bot is addressed by.
fn default_bot_name() -> String {
    "Groupbot".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Configuration for the groupbot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Webex bot access token (`WEBEX_ACCESS_TOKEN`).
    pub webex_access_token: String,
    /// Webex REST API base URL (`WEBEX_API_URL`).
    #[serde(default = "default_webex_api_url")]
    pub webex_api_url: String,
    /// Public URL the platform should post webhook events to (`WEBHOOK_TARGET_URL`).
    pub webhook_target_url: String,
    /// Name given to the webhook on registration (`WEBHOOK_NAME`).
    #[serde(default = "default_webhook_name")]
    pub webhook_name: String,
    /// Address the webhook server binds to (`BIND_ADDRESS`).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Port the webhook server listens on (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Route that receives webhook events (`WEBHOOK_PATH`).
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Path of the JSON file the groups are persisted to (`STORE_PATH`).
    #[serde(default = "default_store_path")]
    pub store_path: String,
    /// The literal token messages must start with to address the bot (`BOT_NAME`).
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    /// Timeout for outbound API requests, in seconds (`REQUEST_TIMEOUT_SECS`).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("GROUPBOT").try_parsing(true));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks the loaded values for consistency.
    pub fn validate(&self) -> Void {
        if self.webex_access_token.trim().is_empty() {
            return Err(anyhow::anyhow!("Webex access token must be set."));
        }

        if !self.webhook_path.starts_with('/') {
            return Err(anyhow::anyhow!("Webhook path must start with `/`."));
        }

        if self.bot_name.is_empty() || !self.bot_name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow::anyhow!("Bot name must be a non-empty alphanumeric token."));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Request timeout must be greater than 0."));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_inner() -> ConfigInner {
        ConfigInner {
            webex_access_token: "token".to_string(),
            webex_api_url: default_webex_api_url(),
            webhook_target_url: "https://groupbot.example.com:10001/webhook".to_string(),
            webhook_name: default_webhook_name(),
            bind_address: default_bind_address(),
            port: default_port(),
            webhook_path: default_webhook_path(),
            store_path: default_store_path(),
            bot_name: default_bot_name(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    fn config(inner: ConfigInner) -> Config {
        Config { inner: Arc::new(inner) }
    }

    #[test]
    fn test_valid_config() {
        assert!(config(valid_inner()).validate().is_ok());
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let inner = ConfigInner {
            webex_access_token: "  ".to_string(),
            ..valid_inner()
        };

        assert!(config(inner).validate().is_err());
    }

    #[test]
    fn test_relative_webhook_path_is_rejected() {
        let inner = ConfigInner {
            webhook_path: "webhook".to_string(),
            ..valid_inner()
        };

        assert!(config(inner).validate().is_err());
    }

    #[test]
    fn test_bot_name_must_be_alphanumeric() {
        let inner = ConfigInner {
            bot_name: "Group bot".to_string(),
            ..valid_inner()
        };

        assert!(config(inner).validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let inner = ConfigInner {
            request_timeout_secs: 0,
            ..valid_inner()
        };

        assert!(config(inner).validate().is_err());
    }

    #[test]
    fn test_load_from_file_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "webex_access_token = \"abc\"\nwebhook_target_url = \"https://example.com/webhook\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.webex_access_token, "abc");
        assert_eq!(config.port, 10001);
        assert_eq!(config.webhook_path, "/webhook");
        assert_eq!(config.store_path, "./cache.db");
        assert_eq!(config.bot_name, "Groupbot");
    }
}
