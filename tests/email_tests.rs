use async_trait::async_trait;
use batimove_backend::config::EmailConfig;
use batimove_backend::model::record::{RecordId, StoredRecord};
use batimove_backend::model::submission::{ContactMessage, Submission};
use batimove_backend::service::notification_service::{EmailNotifier, LogNotifier, Notifier, NotifyError};
use batimove_backend::util::email::{check_address, EmailError, EmailMessage, EmailSender, SmtpEmailService};
use std::sync::{Arc, Mutex};

/// Initialize tracing for tests
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .try_init();
}

/// Create test email config
fn create_test_config() -> EmailConfig {
    EmailConfig::from_test_env()
}

/// Keeps every message instead of sending it
#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

struct RefusingSender;

#[async_trait]
impl EmailSender for RefusingSender {
    async fn send_email(&self, _message: EmailMessage) -> Result<(), EmailError> {
        Err(EmailError::SmtpError("550 mailbox unavailable".to_string()))
    }
}

fn contact_record() -> StoredRecord {
    StoredRecord::stamp(
        RecordId::new("c0ffee00-0000-4000-8000-000000000000"),
        Submission::Contact(ContactMessage {
            name: "Marie".to_string(),
            email: "marie@example.fr".to_string(),
            subject: "Cartons".to_string(),
            message: "Vendez-vous des cartons ?".to_string(),
        }),
        chrono::Utc::now(),
    )
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_email_service_creation() {
        init_tracing();
        let service = SmtpEmailService::new(create_test_config());
        assert!(service.is_ok());
    }

    #[test]
    fn test_email_message_creation() {
        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "Test Subject".to_string(),
        );

        assert_eq!(message.to, "test@example.com");
        assert_eq!(message.subject, "Test Subject");
        assert!(message.text_body.is_none());
        assert!(message.html_body.is_none());
        assert!(message.reply_to.is_none());
    }

    #[test]
    fn test_email_message_with_bodies() {
        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "Test Subject".to_string(),
        )
        .with_text_body("Text body content".to_string())
        .with_html_body("<h1>HTML body content</h1>".to_string())
        .with_reply_to(Some("client@example.com".to_string()));

        assert_eq!(message.text_body.unwrap(), "Text body content");
        assert_eq!(message.html_body.unwrap(), "<h1>HTML body content</h1>");
        assert_eq!(message.reply_to.unwrap(), "client@example.com");
    }

    #[test]
    fn test_check_address() {
        assert!(check_address("info@batimove.ch").is_ok());
        assert!(matches!(check_address(""), Err(EmailError::AddressError(_))));
        assert!(matches!(check_address("no-at-sign"), Err(EmailError::AddressError(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_creation() {
        let mut config = create_test_config();
        config.smtp_host = "".to_string();

        let result = SmtpEmailService::new(config);
        assert!(matches!(result, Err(EmailError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_rejected() {
        let mut config = create_test_config();
        config.api_key = "".to_string();
        assert!(SmtpEmailService::new(config).is_err());
    }
}

#[cfg(test)]
mod notifier_tests {
    use super::*;

    #[tokio::test]
    async fn test_email_notifier_sends_to_operator() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = EmailNotifier::new(sender.clone(), "info@batimove.ch");

        notifier.notify(&contact_record()).await.unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "info@batimove.ch");
        assert_eq!(sent[0].subject, "💬 Contact: Cartons - Marie");
        assert_eq!(sent[0].reply_to.as_deref(), Some("marie@example.fr"));
        assert!(sent[0].text_body.is_some());
        assert!(sent[0].html_body.is_some());
    }

    #[tokio::test]
    async fn test_email_notifier_surfaces_delivery_error() {
        let notifier = EmailNotifier::new(Arc::new(RefusingSender), "info@batimove.ch");
        let err = notifier.notify(&contact_record()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Delivery(EmailError::SmtpError(_))));
        assert!(err.to_string().contains("550"));
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        init_tracing();
        assert!(LogNotifier.notify(&contact_record()).await.is_ok());
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_email_error_types() {
        let errors = vec![
            EmailError::ConfigError("Config error".to_string()),
            EmailError::SmtpError("SMTP error".to_string()),
            EmailError::MessageError("Message error".to_string()),
            EmailError::AddressError("Address error".to_string()),
        ];

        for error in errors {
            assert!(!format!("{}", error).is_empty());
            assert!(!format!("{:?}", error).is_empty());
        }
    }
}

// Integration tests that would require actual SMTP server
#[cfg(test)]
mod integration_tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires a local SMTP catcher on localhost:1025
    async fn test_send_email_integration() {
        init_tracing();
        let service = SmtpEmailService::new(create_test_config()).expect("Failed to create test email service");

        let message = EmailMessage::new(
            "operator@example.com".to_string(),
            "Integration Test Email".to_string(),
        )
        .with_text_body("This is a test email from the integration test.".to_string())
        .with_reply_to(Some("client@example.com".to_string()));

        assert!(service.send_email(message).await.is_ok());
    }
}
