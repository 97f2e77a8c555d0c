use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Email configuration for the operator notification channel.
///
/// The provider is reached over SMTP; its API key doubles as the SMTP password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP username for authentication
    pub smtp_username: String,
    /// Email provider API key, sent as the SMTP password
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// Whether to use TLS encryption
    pub use_tls: bool,
    /// Whether to use STARTTLS
    pub use_starttls: bool,
    /// From email address
    pub from_email: String,
    /// From name (display name)
    pub from_name: String,
    /// Fixed address receiving every submission notification
    pub operator_email: String,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl EmailConfig {
    /// Create EmailConfig from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading email configuration from environment variables");
        let defaults = EmailConfig::default();

        let api_key = env::var("EMAIL_API_KEY")
            .map_err(|_| {
                error!("EMAIL_API_KEY environment variable not found");
                ConfigError::EnvVarNotFound("EMAIL_API_KEY".to_string())
            })?;
        debug!("Email API key: [REDACTED]");

        let smtp_host = env::var("SMTP_HOST")
            .unwrap_or_else(|_| {
                warn!("SMTP_HOST not set, defaulting to {}", defaults.smtp_host);
                defaults.smtp_host.clone()
            });
        debug!("SMTP host: {}", smtp_host);

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                error!("Invalid SMTP_PORT value");
                ConfigError::InvalidValue("Invalid SMTP_PORT value".to_string())
            })?,
            Err(_) => {
                warn!("SMTP_PORT not set, defaulting to {}", defaults.smtp_port);
                defaults.smtp_port
            }
        };
        debug!("SMTP port: {}", smtp_port);

        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_else(|_| defaults.smtp_username.clone());
        debug!("SMTP username: {}", smtp_username);

        let use_tls = env::var("SMTP_USE_TLS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.use_tls);
        let use_starttls = env::var("SMTP_USE_STARTTLS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.use_starttls);
        debug!("SMTP use TLS: {}, STARTTLS: {}", use_tls, use_starttls);

        let from_email = env::var("SMTP_FROM_EMAIL").unwrap_or_else(|_| defaults.from_email.clone());
        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| defaults.from_name.clone());
        debug!("From: {} <{}>", from_name, from_email);

        let operator_email = env::var("OPERATOR_EMAIL")
            .unwrap_or_else(|_| {
                warn!("OPERATOR_EMAIL not set, defaulting to {}", defaults.operator_email);
                defaults.operator_email.clone()
            });

        let connection_timeout_secs = env::var("SMTP_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.connection_timeout_secs);
        debug!("Connection timeout: {} seconds", connection_timeout_secs);

        let config = EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            api_key,
            use_tls,
            use_starttls,
            from_email,
            from_name,
            operator_email,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("Email configuration loaded successfully");
        Ok(config)
    }

    /// Create EmailConfig for testing (points at a local MailHog-style catcher)
    pub fn from_test_env() -> Self {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: "test".to_string(),
            api_key: "test".to_string(),
            use_tls: false,
            use_starttls: false,
            from_email: "test@example.com".to_string(),
            from_name: "Test App".to_string(),
            operator_email: "operator@example.com".to_string(),
            connection_timeout_secs: 10,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp_host.is_empty() {
            error!("SMTP host is empty");
            return Err(ConfigError::ValidationError("SMTP host cannot be empty".to_string()));
        }

        if self.smtp_port == 0 {
            error!("SMTP port is 0");
            return Err(ConfigError::ValidationError("SMTP port cannot be 0".to_string()));
        }

        if self.smtp_username.is_empty() {
            error!("SMTP username is empty");
            return Err(ConfigError::ValidationError("SMTP username cannot be empty".to_string()));
        }

        if self.api_key.is_empty() {
            error!("Email API key is empty");
            return Err(ConfigError::ValidationError("Email API key cannot be empty".to_string()));
        }

        for (label, address) in [("From email", &self.from_email), ("Operator email", &self.operator_email)] {
            if address.is_empty() || !address.contains('@') {
                error!("{} is missing or malformed", label);
                return Err(ConfigError::ValidationError(format!("Invalid {} format", label.to_lowercase())));
            }
        }

        if self.connection_timeout_secs == 0 {
            error!("Connection timeout is 0");
            return Err(ConfigError::ValidationError("Connection timeout cannot be 0".to_string()));
        }

        Ok(())
    }

    /// Get SMTP server URL
    pub fn get_smtp_url(&self) -> String {
        format!("{}:{}", self.smtp_host, self.smtp_port)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig {
            smtp_host: "smtp.resend.com".to_string(),
            smtp_port: 587,
            smtp_username: "resend".to_string(),
            api_key: "".to_string(),
            use_tls: true,
            use_starttls: true,
            from_email: "noreply@onboarding.resend.dev".to_string(),
            from_name: "Batimove Website".to_string(),
            operator_email: "info@batimove.ch".to_string(),
            connection_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "smtp.resend.com");
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.operator_email, "info@batimove.ch");
        assert!(config.use_tls);
        assert!(config.use_starttls);
    }

    #[test]
    fn test_default_config_needs_api_key() {
        assert!(EmailConfig::default().validate().is_err());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = EmailConfig::from_test_env();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = EmailConfig::from_test_env();
        config.smtp_host = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = EmailConfig::from_test_env();
        config.smtp_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_operator_email() {
        let mut config = EmailConfig::from_test_env();
        config.operator_email = "operator".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = EmailConfig::from_test_env();
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("api_key").is_none());
    }

    #[test]
    fn test_get_smtp_url() {
        let config = EmailConfig::from_test_env();
        assert_eq!(config.get_smtp_url(), "localhost:1025");
    }
}
