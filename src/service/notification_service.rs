use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::model::record::StoredRecord;
use crate::util::email::{EmailError, EmailMessage, EmailSender};
use crate::util::template::{self, RenderedNotification};

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("email delivery failed: {0}")]
    Delivery(#[from] EmailError),
}

/// Tells the operator that a submission was stored.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, record: &StoredRecord) -> Result<(), NotifyError>;
}

/// Sends each rendered notification to the fixed operator mailbox.
pub struct EmailNotifier {
    sender: Arc<dyn EmailSender>,
    operator_email: String,
}

impl EmailNotifier {
    pub fn new(sender: Arc<dyn EmailSender>, operator_email: impl Into<String>) -> Self {
        EmailNotifier {
            sender,
            operator_email: operator_email.into(),
        }
    }

    fn message_for(&self, rendered: RenderedNotification) -> EmailMessage {
        EmailMessage::new(self.operator_email.clone(), rendered.subject)
            .with_text_body(rendered.text_body)
            .with_html_body(rendered.html_body)
            .with_reply_to(rendered.reply_to)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    #[instrument(skip(self, record), fields(id = %record.id, kind = %record.kind()))]
    async fn notify(&self, record: &StoredRecord) -> Result<(), NotifyError> {
        let message = self.message_for(template::render(record));
        self.sender.send_email(message).await?;
        info!("Operator notified by email");
        Ok(())
    }
}

/// Renders notifications into the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, record: &StoredRecord) -> Result<(), NotifyError> {
        let rendered = template::render(record);
        info!(id = %record.id, subject = %rendered.subject, "[DEV MODE] Email not sent, notification logged");
        debug!(reply_to = ?rendered.reply_to, body = %rendered.text_body, "[DEV MODE] Notification body");
        Ok(())
    }
}
