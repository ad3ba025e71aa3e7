//! Service configuration loaded from `ESG_*` environment variables

use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("ESG_JWT_SECRET must be set to a non-empty value")]
    MissingJwtSecret,

    #[error("Unknown storage backend: {0} (expected \"postgres\" or \"memory\")")]
    UnknownStorage(String),
}

/// Where records and users are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::UnknownStorage(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawServerConfig {
    host: String,
    port: u16,
    jwt_secret: String,
    token_ttl_seconds: u64,
    storage: String,
}

/// HTTP service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// HMAC secret used to sign session tokens
    pub jwt_secret: String,
    /// Session token lifetime, also used as the cookie max-age
    pub token_ttl_seconds: u64,
    pub storage: StorageBackend,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ESG_HOST`: Bind address (default: 0.0.0.0)
    /// - `ESG_PORT`: Bind port (default: 3000)
    /// - `ESG_JWT_SECRET`: Token signing secret (required)
    /// - `ESG_TOKEN_TTL_SECONDS`: Token lifetime in seconds (default: 604800)
    /// - `ESG_STORAGE`: `postgres` or `memory` (default: postgres)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawServerConfig = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000_i64)?
            .set_default("jwt_secret", "")?
            .set_default("token_ttl_seconds", 604_800_i64)?
            .set_default("storage", "postgres")?
            .add_source(config::Environment::with_prefix("ESG"))
            .build()?
            .try_deserialize()?;

        if raw.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }

        Ok(ServerConfig {
            host: raw.host,
            port: raw.port,
            jwt_secret: raw.jwt_secret,
            token_ttl_seconds: raw.token_ttl_seconds,
            storage: raw.storage.parse()?,
        })
    }

    /// `host:port` to bind the listener on
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 5] = [
        "ESG_HOST",
        "ESG_PORT",
        "ESG_JWT_SECRET",
        "ESG_TOKEN_TTL_SECONDS",
        "ESG_STORAGE",
    ];

    fn clear() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_defaults_with_secret() {
        clear();
        unsafe {
            env::set_var("ESG_JWT_SECRET", "test-secret");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.token_ttl_seconds, 604_800);
        assert_eq!(config.storage, StorageBackend::Postgres);

        clear();
    }

    #[test]
    #[serial]
    fn test_overrides_from_env() {
        clear();
        unsafe {
            env::set_var("ESG_JWT_SECRET", "test-secret");
            env::set_var("ESG_HOST", "127.0.0.1");
            env::set_var("ESG_PORT", "8080");
            env::set_var("ESG_TOKEN_TTL_SECONDS", "60");
            env::set_var("ESG_STORAGE", "memory");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.token_ttl_seconds, 60);
        assert_eq!(config.storage, StorageBackend::Memory);

        clear();
    }

    #[test]
    #[serial]
    fn test_missing_secret_is_rejected() {
        clear();
        assert!(matches!(
            ServerConfig::from_env(),
            Err(ConfigError::MissingJwtSecret)
        ));
    }

    #[test]
    #[serial]
    fn test_unknown_storage_is_rejected() {
        clear();
        unsafe {
            env::set_var("ESG_JWT_SECRET", "test-secret");
            env::set_var("ESG_STORAGE", "redis");
        }

        assert!(matches!(
            ServerConfig::from_env(),
            Err(ConfigError::UnknownStorage(_))
        ));

        clear();
    }
}
