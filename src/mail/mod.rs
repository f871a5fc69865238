pub mod message;
pub mod smtp;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use lettre::Message;

use crate::models::{BulkResult, RecipientOutcome, RelayConfig, SendRequest};

pub use message::{build_message, load_attachments, LoadedAttachment, OutgoingMessage};
pub use smtp::SmtpRelay;

/// Failure of a single recipient's delivery. Recorded in that recipient's
/// outcome, never propagated past [`Dispatcher::send_bulk`].
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Failed to read attachment {}: {source}", path.display())]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Message(String),

    #[error("Failed to send email: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl From<lettre::error::Error> for DeliveryError {
    fn from(err: lettre::error::Error) -> Self {
        DeliveryError::Message(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for DeliveryError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        DeliveryError::Transport(Box::new(err))
    }
}

/// A mail relay able to open an authenticated session and hand off one
/// message. Each call opens and closes its own session.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn deliver(&self, config: &RelayConfig, message: Message) -> Result<(), DeliveryError>;
}

/// Sends one message to many recipients, sequentially
#[derive(Clone)]
pub struct Dispatcher {
    relay: Arc<dyn Relay>,
}

impl Dispatcher {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        Self { relay }
    }

    /// Attempt every recipient exactly once, in request order.
    ///
    /// Recipient failures are recorded and the loop moves on; the returned
    /// result always holds an outcome for every address in the request.
    pub async fn send_bulk(&self, config: &RelayConfig, request: &SendRequest) -> BulkResult {
        let total = request.recipients.len();
        let mut results = BulkResult::new();

        for (index, recipient) in request.recipients.iter().enumerate() {
            let outcome = self
                .send_one(
                    config,
                    recipient,
                    &request.sender_name,
                    &request.subject,
                    &request.body,
                    &request.attachments,
                )
                .await;

            match &outcome {
                Ok(()) => tracing::info!(
                    index = index + 1,
                    total,
                    recipient = %recipient,
                    "Progress: delivered"
                ),
                Err(e) => tracing::warn!(
                    index = index + 1,
                    total,
                    recipient = %recipient,
                    error = %e,
                    "Progress: failed"
                ),
            }

            results.record(recipient.as_str(), RecipientOutcome::from(outcome));
        }

        let summary = results.summary();
        tracing::info!(
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            "Bulk send finished"
        );

        results
    }

    /// Deliver to a single recipient. Attachments are loaded before the
    /// relay is contacted, so an unreadable file means no session at all.
    pub async fn send_one(
        &self,
        config: &RelayConfig,
        recipient: &str,
        sender_name: &str,
        subject: &str,
        body: &str,
        attachments: &[PathBuf],
    ) -> Result<(), DeliveryError> {
        let loaded = load_attachments(attachments).await?;

        let message = build_message(
            &OutgoingMessage {
                sender_name,
                sender_address: config.user(),
                recipient,
                subject,
                body,
            },
            loaded,
        )?;

        self.relay.deliver(config, message).await
    }
}
