use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;
use crate::model::submission::SubmissionKind;

pub const DEFAULT_QUOTE_COLLECTION: &str = "quotes";
pub const DEFAULT_MESSAGE_COLLECTION: &str = "messages";
pub const DEFAULT_BUSINESS_COLLECTION: &str = "business_leads";

/// MongoDB configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Username for authentication (optional)
    pub username: Option<String>,
    /// Password for authentication (optional)
    pub password: Option<String>,
    /// Collection name for quote requests (defaults to `quotes`)
    pub quote_collection: Option<String>,
    /// Collection name for contact messages (defaults to `messages`)
    pub message_collection: Option<String>,
    /// Collection name for business leads (defaults to `business_leads`)
    pub business_collection: Option<String>,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl MongoConfig {
    /// Load MongoDB configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MONGO_URI: MongoDB connection URI (required)
    /// - MONGO_DATABASE: Database name (required)
    /// - MONGO_QUOTE_COLLECTION: Collection name for quote requests (optional)
    /// - MONGO_MESSAGE_COLLECTION: Collection name for contact messages (optional)
    /// - MONGO_BUSINESS_COLLECTION: Collection name for business leads (optional)
    /// - MONGO_POOL_SIZE: Connection pool size (defaults to 10)
    /// - MONGO_CONNECTION_TIMEOUT: Connection timeout in seconds (defaults to 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let uri = env::var("MONGO_URI")
            .map_err(|_| {
                error!("MONGO_URI environment variable not found");
                ConfigError::EnvVarNotFound("MONGO_URI".to_string())
            })?;
        debug!("MongoDB URI loaded ({} chars)", uri.len());

        let database = env::var("MONGO_DATABASE")
            .map_err(|_| {
                error!("MONGO_DATABASE environment variable not found");
                ConfigError::EnvVarNotFound("MONGO_DATABASE".to_string())
            })?;
        debug!("MongoDB database: {}", database);

        let username = env::var("MONGO_USERNAME").ok();
        if let Some(ref user) = username {
            debug!("MongoDB username: {}", user);
        } else {
            debug!("No MongoDB username specified");
        }

        let password = env::var("MONGO_PASSWORD").ok();
        if let Some(_) = password {
            debug!("MongoDB password provided");
        } else {
            debug!("No MongoDB password specified");
        }

        let quote_collection = env::var("MONGO_QUOTE_COLLECTION").ok();
        let message_collection = env::var("MONGO_MESSAGE_COLLECTION").ok();
        let business_collection = env::var("MONGO_BUSINESS_COLLECTION").ok();
        debug!(
            quotes = quote_collection.as_deref().unwrap_or(DEFAULT_QUOTE_COLLECTION),
            messages = message_collection.as_deref().unwrap_or(DEFAULT_MESSAGE_COLLECTION),
            business = business_collection.as_deref().unwrap_or(DEFAULT_BUSINESS_COLLECTION),
            "MongoDB collections"
        );

        let pool_size = env::var("MONGO_POOL_SIZE")
            .unwrap_or_else(|_| {
                warn!("MONGO_POOL_SIZE not set, using default: 10");
                "10".to_string()
            })
            .parse::<u32>()
            .map_err(|_| {
                error!("Invalid MONGO_POOL_SIZE value");
                ConfigError::InvalidValue("Invalid MONGO_POOL_SIZE value".to_string())
            })?;
        debug!("MongoDB pool size: {}", pool_size);

        let connection_timeout_secs = env::var("MONGO_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| {
                warn!("MONGO_CONNECTION_TIMEOUT not set, using default: 5 seconds");
                "5".to_string()
            })
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid MONGO_CONNECTION_TIMEOUT value");
                ConfigError::InvalidValue("Invalid MONGO_CONNECTION_TIMEOUT value".to_string())
            })?;
        debug!("MongoDB connection timeout: {} seconds", connection_timeout_secs);

        let config = MongoConfig {
            uri,
            database,
            username,
            password,
            quote_collection,
            message_collection,
            business_collection,
            pool_size,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("MongoDB configuration loaded successfully");
        Ok(config)
    }

    /// Create MongoConfig for testing
    pub fn from_test_env() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "test_db".to_string(),
            username: Some("testuser".to_string()),
            password: Some("testpass".to_string()),
            quote_collection: Some("test_quotes".to_string()),
            message_collection: Some("test_messages".to_string()),
            business_collection: Some("test_business_leads".to_string()),
            pool_size: 2,
            connection_timeout_secs: 2,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        info!("Validating MongoDB configuration");

        if self.uri.is_empty() {
            error!("MongoDB URI is empty");
            return Err(ConfigError::ValidationError("MongoDB URI cannot be empty".to_string()));
        }

        if self.database.is_empty() {
            error!("MongoDB database is empty");
            return Err(ConfigError::ValidationError("MongoDB database cannot be empty".to_string()));
        }

        if self.pool_size == 0 {
            error!("MongoDB pool size is 0");
            return Err(ConfigError::ValidationError("MongoDB pool size must be greater than 0".to_string()));
        }

        if self.connection_timeout_secs == 0 {
            error!("MongoDB connection timeout is 0");
            return Err(ConfigError::ValidationError("MongoDB connection timeout must be greater than 0".to_string()));
        }

        for name in [&self.quote_collection, &self.message_collection, &self.business_collection]
            .into_iter()
            .flatten()
        {
            if name.trim().is_empty() {
                error!("MongoDB collection name is empty");
                return Err(ConfigError::ValidationError("MongoDB collection names cannot be empty if set".to_string()));
            }
        }

        // Optionally validate username/password if present
        if let Some(ref user) = self.username {
            if user.is_empty() {
                error!("MongoDB username is empty");
                return Err(ConfigError::ValidationError("MongoDB username cannot be empty if set".to_string()));
            }
        }
        if let Some(ref pass) = self.password {
            if pass.is_empty() {
                error!("MongoDB password is empty");
                return Err(ConfigError::ValidationError("MongoDB password cannot be empty if set".to_string()));
            }
        }
        info!("MongoDB configuration validation successful");
        Ok(())
    }

    /// Collection holding records of the given submission kind
    pub fn collection_for(&self, kind: SubmissionKind) -> &str {
        match kind {
            SubmissionKind::Quote => self.quote_collection.as_deref().unwrap_or(DEFAULT_QUOTE_COLLECTION),
            SubmissionKind::Contact => self.message_collection.as_deref().unwrap_or(DEFAULT_MESSAGE_COLLECTION),
            SubmissionKind::Business => self.business_collection.as_deref().unwrap_or(DEFAULT_BUSINESS_COLLECTION),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "batimove".to_string(),
            username: None,
            password: None,
            quote_collection: None,
            message_collection: None,
            business_collection: None,
            pool_size: 10,
            connection_timeout_secs: 5,
        }
    }
}
