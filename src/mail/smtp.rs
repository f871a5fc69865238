use std::time::Duration;

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::models::RelayConfig;

use super::{DeliveryError, Relay};

/// Delivers over SMTP with implicit TLS, one connection per message
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    timeout: Duration,
}

impl SmtpRelay {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Relay for SmtpRelay {
    async fn deliver(&self, config: &RelayConfig, message: Message) -> Result<(), DeliveryError> {
        let credentials = Credentials::new(config.user().to_string(), config.credential().to_string());

        // Built without the pool feature: the connection is closed once
        // `send` returns, on success and on error alike.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(config.host())?
            .port(config.port())
            .credentials(credentials)
            .timeout(Some(self.timeout))
            .build();

        tracing::debug!(host = %config.host(), port = config.port(), "Opening relay session");

        let response = transport.send(message).await?;

        tracing::debug!(
            code = %response.code(),
            "Relay accepted message"
        );

        Ok(())
    }
}
