//! Environment-driven configuration. All keys carry the `TOLBOR_` prefix.

use secrecy::SecretString;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const PREFIX: &str = "TOLBOR";

/// Configuration failures abort startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(String),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Service configuration
#[derive(Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Gateway base URL
    pub gateway_base_url: String,
    /// Gateway merchant username
    pub gateway_username: String,
    /// Gateway merchant password
    pub gateway_password: SecretString,
    /// Default invoice template code
    pub invoice_code: String,
    /// Secret for callback signature verification
    pub callback_secret: SecretString,
    /// Public base URL the gateway calls back on, no trailing slash
    pub callback_base_url: String,
    /// TTL for stored payment records; `None` keeps them for the process
    /// lifetime
    pub record_ttl: Option<Duration>,
    /// Callback signature timestamp tolerance
    pub signature_tolerance_secs: u64,
    /// Retry hint returned to pollers while no record exists
    pub retry_after_ms: u64,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            bind_addr: parsed_or("BIND_ADDR", "0.0.0.0:8080")?,
            gateway_base_url: required("GATEWAY_BASE_URL")?,
            gateway_username: required("GATEWAY_USERNAME")?,
            gateway_password: SecretString::new(required("GATEWAY_PASSWORD")?.into()),
            invoice_code: required("INVOICE_CODE")?,
            callback_secret: SecretString::new(required("CALLBACK_SECRET")?.into()),
            callback_base_url: required("CALLBACK_BASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            record_ttl: optional("RECORD_TTL_SECS")?
                .map(|secs: u64| Duration::from_secs(secs)),
            signature_tolerance_secs: parsed_or("SIGNATURE_TOLERANCE_SECS", "300")?,
            retry_after_ms: parsed_or("RETRY_AFTER_MS", "2000")?,
        };

        info!(
            bind_addr = %config.bind_addr,
            gateway = %config.gateway_base_url,
            record_ttl = ?config.record_ttl,
            "configuration loaded"
        );
        Ok(config)
    }

    /// URL the gateway invokes when a payment settles
    pub fn callback_url(&self) -> String {
        format!("{}/payments/callback", self.callback_base_url)
    }
}

fn key(name: &str) -> String {
    format!("{PREFIX}_{name}")
}

fn required(name: &str) -> Result<String, ConfigError> {
    env::var(key(name)).map_err(|_| ConfigError::Missing(key(name)))
}

fn optional<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key(name)) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key: key(name),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    let raw = env::var(key(name)).unwrap_or_else(|_| {
        info!("{} not set, using default: {default}", key(name));
        default.to_string()
    });
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key(name),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_var() {
        let result = required("NONEXISTENT_VAR_12345");
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_defaults_parse() {
        let addr: SocketAddr = parsed_or("NONEXISTENT_BIND_9", "0.0.0.0:8080").unwrap();
        assert_eq!(addr.port(), 8080);

        let tolerance: u64 = parsed_or("NONEXISTENT_TOL_9", "300").unwrap();
        assert_eq!(tolerance, 300);
    }

    #[test]
    fn test_optional_absent_is_none() {
        let ttl: Option<u64> = optional("NONEXISTENT_TTL_9").unwrap();
        assert!(ttl.is_none());
    }
}
