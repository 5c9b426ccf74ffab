//! Configuration
//!
//! Environment-driven configuration for the gateway core. The encryption
//! key and admin token are required; their absence or malformation is a
//! startup error, not something to limp past per-request.

use std::path::PathBuf;
use thiserror::Error;

use crate::crypto::{CryptoError, EncryptionKey};

/// Default listen port for the rate-limit query surface
pub const DEFAULT_LISTEN_PORT: u16 = 8080;

/// Default admission limit per window
pub const DEFAULT_RATE_LIMIT: u32 = 60;

/// Default admission window in milliseconds
pub const DEFAULT_RATE_WINDOW_MS: i64 = 60_000;

/// Fatal configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// The encryption key failed to decode
    #[error("Invalid encryption key: {0}")]
    InvalidKey(#[from] CryptoError),

    /// A variable was present but unparseable
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Process-wide credential encryption key (from base64)
    pub encryption_key: EncryptionKey,

    /// Bearer token guarding admin endpoints
    pub admin_token: String,

    /// Port for the HTTP surface
    pub listen_port: u16,

    /// Default admission limit per window
    pub rate_limit: u32,

    /// Default admission window in milliseconds
    pub rate_window_ms: i64,

    /// Directory for durable rate state; `None` keeps state in memory
    pub state_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `SEARCHGATE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Lets tests supply variables without mutating process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let key_b64 = lookup("SEARCHGATE_ENCRYPTION_KEY")
            .ok_or(ConfigError::MissingVar("SEARCHGATE_ENCRYPTION_KEY"))?;
        let encryption_key = EncryptionKey::from_base64(&key_b64)?;

        let admin_token = lookup("SEARCHGATE_ADMIN_TOKEN")
            .ok_or(ConfigError::MissingVar("SEARCHGATE_ADMIN_TOKEN"))?;

        let listen_port = parse_var(&lookup, "SEARCHGATE_LISTEN_PORT", DEFAULT_LISTEN_PORT)?;
        let rate_limit = parse_var(&lookup, "SEARCHGATE_RATE_LIMIT", DEFAULT_RATE_LIMIT)?;
        let rate_window_ms =
            parse_var(&lookup, "SEARCHGATE_RATE_WINDOW_MS", DEFAULT_RATE_WINDOW_MS)?;

        if rate_limit == 0 {
            return Err(ConfigError::InvalidValue {
                var: "SEARCHGATE_RATE_LIMIT",
                value: "0".to_string(),
            });
        }
        if rate_window_ms <= 0 {
            return Err(ConfigError::InvalidValue {
                var: "SEARCHGATE_RATE_WINDOW_MS",
                value: rate_window_ms.to_string(),
            });
        }

        let state_dir = lookup("SEARCHGATE_STATE_DIR").map(PathBuf::from);

        Ok(Self {
            encryption_key,
            admin_token,
            listen_port,
            rate_limit,
            rate_window_ms,
            state_dir,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid_key_b64() -> String {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine;
        BASE64.encode([7u8; 32])
    }

    fn vars(entries: &[(&str, String)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn load(map: &HashMap<String, String>) -> Result<Config, ConfigError> {
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_minimal_config_with_defaults() {
        let map = vars(&[
            ("SEARCHGATE_ENCRYPTION_KEY", valid_key_b64()),
            ("SEARCHGATE_ADMIN_TOKEN", "token".to_string()),
        ]);

        let config = load(&map).unwrap();
        assert_eq!(config.listen_port, DEFAULT_LISTEN_PORT);
        assert_eq!(config.rate_limit, DEFAULT_RATE_LIMIT);
        assert_eq!(config.rate_window_ms, DEFAULT_RATE_WINDOW_MS);
        assert!(config.state_dir.is_none());
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let map = vars(&[("SEARCHGATE_ADMIN_TOKEN", "token".to_string())]);
        assert!(matches!(
            load(&map),
            Err(ConfigError::MissingVar("SEARCHGATE_ENCRYPTION_KEY"))
        ));
    }

    #[test]
    fn test_malformed_key_is_fatal() {
        let map = vars(&[
            ("SEARCHGATE_ENCRYPTION_KEY", "too-short!".to_string()),
            ("SEARCHGATE_ADMIN_TOKEN", "token".to_string()),
        ]);
        assert!(matches!(load(&map), Err(ConfigError::InvalidKey(_))));
    }

    #[test]
    fn test_missing_admin_token_is_fatal() {
        let map = vars(&[("SEARCHGATE_ENCRYPTION_KEY", valid_key_b64())]);
        assert!(matches!(
            load(&map),
            Err(ConfigError::MissingVar("SEARCHGATE_ADMIN_TOKEN"))
        ));
    }

    #[test]
    fn test_overrides_applied() {
        let map = vars(&[
            ("SEARCHGATE_ENCRYPTION_KEY", valid_key_b64()),
            ("SEARCHGATE_ADMIN_TOKEN", "token".to_string()),
            ("SEARCHGATE_LISTEN_PORT", "9999".to_string()),
            ("SEARCHGATE_RATE_LIMIT", "5".to_string()),
            ("SEARCHGATE_RATE_WINDOW_MS", "1000".to_string()),
            ("SEARCHGATE_STATE_DIR", "/var/lib/searchgate".to_string()),
        ]);

        let config = load(&map).unwrap();
        assert_eq!(config.listen_port, 9999);
        assert_eq!(config.rate_limit, 5);
        assert_eq!(config.rate_window_ms, 1000);
        assert_eq!(
            config.state_dir,
            Some(PathBuf::from("/var/lib/searchgate"))
        );
    }

    #[test]
    fn test_rejects_zero_limit() {
        let map = vars(&[
            ("SEARCHGATE_ENCRYPTION_KEY", valid_key_b64()),
            ("SEARCHGATE_ADMIN_TOKEN", "token".to_string()),
            ("SEARCHGATE_RATE_LIMIT", "0".to_string()),
        ]);
        assert!(matches!(load(&map), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_rejects_unparseable_port() {
        let map = vars(&[
            ("SEARCHGATE_ENCRYPTION_KEY", valid_key_b64()),
            ("SEARCHGATE_ADMIN_TOKEN", "token".to_string()),
            ("SEARCHGATE_LISTEN_PORT", "not-a-port".to_string()),
        ]);
        assert!(matches!(load(&map), Err(ConfigError::InvalidValue { .. })));
    }
}
