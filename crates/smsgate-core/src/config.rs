//! Gateway configuration
//!
//! Loaded once at startup from a JSON file; immutable thereafter. The
//! modem block always exists (with defaults); each delivery sink is
//! enabled by the presence of its block.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::modem::{PollerConfig, SessionConfig, DEFAULT_BAUD_RATE};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Unable to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON or has wrong field types
    #[error("Unable to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field is missing or empty
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Modem transport and polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModemSettings {
    /// Serial device path
    pub device: String,

    /// Baud rate
    pub baud: u32,

    /// Deadline for one command/response round-trip, in seconds
    pub read_timeout_secs: u64,

    /// Seconds between poll cycles
    pub poll_interval_secs: u64,

    /// Delete messages from modem storage once delivered
    pub delete_after_read: bool,
}

impl Default for ModemSettings {
    fn default() -> Self {
        Self {
            device: "/dev/ttyUSB0".to_string(),
            baud: DEFAULT_BAUD_RATE,
            read_timeout_secs: 10,
            poll_interval_secs: 5,
            delete_after_read: true,
        }
    }
}

/// SMTP delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    /// Sending account, also the SMTP username
    pub account: String,

    /// SMTP password
    pub password: String,

    /// Destination addresses
    pub recipients: Vec<String>,

    /// SMTP submission host (STARTTLS on port 587)
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

/// HTTP relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Base URL of the relay server
    pub server_url: String,

    /// Value for the `X-API-Key` header
    pub api_key: String,

    /// Logical queue folder messages are enqueued under
    #[serde(default = "default_folder")]
    pub folder: String,
}

/// Redis publish settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    /// Redis host
    pub host: String,

    /// Redis port
    pub port: u16,

    /// Folder suffix of the publish channel (`sms:<folder>`)
    pub folder: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            folder: default_folder(),
        }
    }
}

fn default_folder() -> String {
    "incoming".to_string()
}

/// Top-level gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Modem transport and polling
    pub modem: ModemSettings,

    /// SMTP delivery; absent block disables the sink
    pub email: Option<EmailSettings>,

    /// HTTP relay; absent block disables the sink
    pub relay: Option<RelaySettings>,

    /// Redis publish; absent block disables the sink
    pub redis: Option<RedisSettings>,

    /// IMEI → phone number mapping used in email subjects
    pub imei_to_phone: HashMap<String, String>,
}

impl GatewayConfig {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields; errors name the offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.modem.device.is_empty() {
            return Err(ConfigError::Invalid("modem.device is required".to_string()));
        }

        if let Some(email) = &self.email {
            if email.account.is_empty() || email.password.is_empty() {
                return Err(ConfigError::Invalid(
                    "email.account and email.password are required".to_string(),
                ));
            }
            if email.recipients.is_empty() {
                return Err(ConfigError::Invalid(
                    "email.recipients must not be empty".to_string(),
                ));
            }
        }

        if let Some(relay) = &self.relay {
            if relay.server_url.is_empty() {
                return Err(ConfigError::Invalid(
                    "relay.server_url is required".to_string(),
                ));
            }
            if relay.api_key.is_empty() {
                return Err(ConfigError::Invalid("relay.api_key is required".to_string()));
            }
        }

        Ok(())
    }

    /// Session construction parameters derived from the modem block
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            device: self.modem.device.clone(),
            baud_rate: self.modem.baud,
            read_timeout: Duration::from_secs(self.modem.read_timeout_secs),
        }
    }

    /// Poller construction parameters derived from the modem block
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(self.modem.poll_interval_secs),
            delete_after_read: self.modem.delete_after_read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    #[test]
    fn test_defaults_for_empty_config() {
        let config: GatewayConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.modem.device, "/dev/ttyUSB0");
        assert_eq!(config.modem.baud, 115200);
        assert_eq!(config.modem.read_timeout_secs, 10);
        assert_eq!(config.modem.poll_interval_secs, 5);
        assert!(config.modem.delete_after_read);
        assert!(config.email.is_none());
        assert!(config.relay.is_none());
        assert!(config.redis.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "modem": {{"device": "/dev/ttyUSB3", "poll_interval_secs": 30}},
                "redis": {{"host": "redis.local"}}
            }}"#
        )
        .unwrap();

        let config = GatewayConfig::load(file.path()).unwrap();
        assert_eq!(config.modem.device, "/dev/ttyUSB3");
        assert_eq!(config.modem.poll_interval_secs, 30);
        // Unset modem fields still default
        assert_eq!(config.modem.baud, 115200);

        let redis = config.redis.unwrap();
        assert_eq!(redis.host, "redis.local");
        assert_eq!(redis.port, 6379);
        assert_eq!(redis.folder, "incoming");
    }

    #[test]
    fn test_empty_device_rejected() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{"modem": {"device": ""}}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("modem.device"));
    }

    #[test]
    fn test_email_requires_credentials() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{"email": {"account": "a@b.c", "password": "", "recipients": ["x@y.z"]}}"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("email.password"));
    }

    #[test]
    fn test_email_requires_recipients() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{"email": {"account": "a@b.c", "password": "secret", "recipients": []}}"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("email.recipients"));
    }

    #[test]
    fn test_relay_requires_url_and_key() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{"relay": {"server_url": "", "api_key": "k"}}"#,
        )
        .unwrap();
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("relay.server_url"));

        let config: GatewayConfig = serde_json::from_str(
            r#"{"relay": {"server_url": "https://relay.example", "api_key": ""}}"#,
        )
        .unwrap();
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("relay.api_key"));
    }

    #[test]
    fn test_derived_configs() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{"modem": {"read_timeout_secs": 3, "poll_interval_secs": 7, "delete_after_read": false}}"#,
        )
        .unwrap();

        let session = config.session_config();
        assert_eq!(session.read_timeout, Duration::from_secs(3));

        let poller = config.poller_config();
        assert_eq!(poller.interval, Duration::from_secs(7));
        assert!(!poller.delete_after_read);
    }
}
