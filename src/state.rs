use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::mail::{Dispatcher, Relay, SmtpRelay};
use crate::models::RelayConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    relay_config: Arc<RwLock<Option<Arc<RelayConfig>>>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_relay(Arc::new(SmtpRelay::new(config.relay_timeout())))
    }

    pub fn with_relay(relay: Arc<dyn Relay>) -> Self {
        Self {
            dispatcher: Dispatcher::new(relay),
            relay_config: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the relay configuration wholesale
    pub async fn set_relay_config(&self, relay_config: RelayConfig) {
        *self.relay_config.write().await = Some(Arc::new(relay_config));
    }

    /// Snapshot of the current relay configuration. Sends already in flight
    /// keep the snapshot they started with.
    pub async fn relay_config(&self) -> Result<Arc<RelayConfig>> {
        self.relay_config
            .read()
            .await
            .clone()
            .ok_or(AppError::ConfigurationMissing)
    }

    pub async fn is_configured(&self) -> bool {
        self.relay_config.read().await.is_some()
    }
}
