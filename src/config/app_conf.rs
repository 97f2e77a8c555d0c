use std::env;
use tracing::{debug, warn};

use crate::config::ConfigError;

/// Which record store backend the application wires at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// MongoDB, survives restarts.
    Durable,
    /// In-process map, lost on restart. Local development only.
    Ephemeral,
}

impl StorageBackend {
    pub fn mode_name(&self) -> &'static str {
        match self {
            StorageBackend::Durable => "production",
            StorageBackend::Ephemeral => "development",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    /// Include internal error detail in 5xx responses.
    pub debug: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("APP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue(format!("Invalid APP_PORT value: {}", raw)))?,
            Err(_) => 8080,
        };

        let dev_mode = parse_flag("DEV_MODE");
        let storage = if dev_mode {
            StorageBackend::Ephemeral
        } else {
            StorageBackend::Durable
        };
        let debug_mode = parse_flag("DEBUG");
        debug!(host = %host, port, ?storage, debug_mode, "Application configuration loaded");

        let config = AppConfig {
            host,
            port,
            storage,
            debug: debug_mode,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            storage: StorageBackend::Ephemeral,
            debug: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("APP_HOST cannot be empty".to_string()));
        }
        self.host
            .parse::<std::net::IpAddr>()
            .map_err(|_| ConfigError::InvalidValue(format!("APP_HOST is not an IP address: {}", self.host)))?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            storage: StorageBackend::Durable,
            debug: false,
        }
    }
}

fn parse_flag(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" | "" => false,
            other => {
                warn!("{} has unrecognized value '{}', treating as false", name, other);
                false
            }
        },
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageBackend::Durable);
        assert!(!config.debug);
    }

    #[test]
    fn test_test_config_uses_ephemeral_store() {
        let config = AppConfig::from_test_env();
        assert_eq!(config.storage, StorageBackend::Ephemeral);
        assert_eq!(config.storage.mode_name(), "development");
    }

    #[test]
    fn test_from_env_reads_flags() {
        env::set_var("DEV_MODE", "true");
        env::set_var("DEBUG", "1");
        let config = AppConfig::from_env().expect("flags parse");
        env::remove_var("DEV_MODE");
        env::remove_var("DEBUG");

        assert_eq!(config.storage, StorageBackend::Ephemeral);
        assert!(config.debug);
    }

    #[test]
    fn test_validate_rejects_non_ip_host() {
        let mut config = AppConfig::default();
        config.host = "not-an-ip".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let mut config = AppConfig::default();
        config.host = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
