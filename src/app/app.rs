use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AppConfig, ConfigError, EmailConfig, MongoConfig, StorageBackend};
use crate::handler::intake_handler::IntakeState;
use crate::repository::{
    IdAllocator, InMemoryRecordRepository, MongoRecordRepository, RecordStore, StoreError, UuidAllocator,
};
use crate::router::intake_router::intake_router;
use crate::service::intake_service::{IntakeService, IntakeServiceImpl};
use crate::service::notification_service::{EmailNotifier, LogNotifier, Notifier};
use crate::util::email::{EmailError, SmtpEmailService};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not connect to MongoDB: {0}")]
    Store(#[from] StoreError),

    #[error("could not set up email delivery: {0}")]
    Email(#[from] EmailError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct App {
    config: AppConfig,
    router: Router,
    pub intake_service: Arc<dyn IntakeService>,
}

impl App {
    /// Wire the application from the environment.
    pub async fn new() -> Result<Self, StartupError> {
        let config = AppConfig::from_env()?;
        let ids: Arc<dyn IdAllocator> = Arc::new(UuidAllocator);

        let store: Arc<dyn RecordStore> = match config.storage {
            StorageBackend::Durable => {
                let mongo_config = MongoConfig::from_env()?;
                Arc::new(MongoRecordRepository::new(&mongo_config, ids).await?)
            }
            StorageBackend::Ephemeral => {
                warn!("⚠️ DEV_MODE enabled: submissions are kept in memory and LOST on restart");
                Arc::new(InMemoryRecordRepository::new(ids))
            }
        };

        let notifier = Self::notifier()?;
        Ok(Self::with_parts(config, store, notifier))
    }

    /// Wire the application from already constructed collaborators.
    pub fn with_parts(config: AppConfig, store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        let intake_service: Arc<dyn IntakeService> = Arc::new(IntakeServiceImpl::new(store, notifier));
        let router = intake_router(IntakeState {
            service: intake_service.clone(),
            debug: config.debug,
        });
        App { config, router, intake_service }
    }

    /// Email when a provider is configured, log-only otherwise.
    fn notifier() -> Result<Arc<dyn Notifier>, StartupError> {
        match EmailConfig::from_env() {
            Ok(email_config) => {
                let operator = email_config.operator_email.clone();
                let sender = Arc::new(SmtpEmailService::new(email_config)?);
                info!(operator = %operator, "Operator notifications will be emailed");
                Ok(Arc::new(EmailNotifier::new(sender, operator)))
            }
            Err(ConfigError::EnvVarNotFound(var)) => {
                warn!("Email not configured ({} missing): notifications will only be logged", var);
                Ok(Arc::new(LogNotifier))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn start(self) -> Result<(), StartupError> {
        let host = self
            .config
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("Invalid host: {}", self.config.host)))?;
        let addr = SocketAddr::new(host, self.config.port);
        info!(mode = %self.config.storage.mode_name(), "🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
