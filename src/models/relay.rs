use std::fmt;

use serde_json::Value;

use crate::error::{AppError, Result};

use super::{require_fields, string_field};

pub const REQUIRED_FIELDS: [&str; 4] = ["email_host", "email_port", "email_user", "email_password"];

/// Connection settings for the outbound relay.
///
/// Built once per `/api/config` call and never mutated afterwards; a new
/// call replaces the whole value.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    host: String,
    port: u16,
    user: String,
    credential: String,
}

impl RelayConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            credential: credential.into(),
        }
    }

    /// Validate a `/api/config` payload
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let object = require_fields(payload, &REQUIRED_FIELDS)?;

        let port = object
            .get("email_port")
            .and_then(coerce_port)
            .ok_or_else(|| {
                AppError::Validation(
                    "Field 'email_port' must be an integer between 0 and 65535".to_string(),
                )
            })?;

        Ok(Self {
            host: string_field(object, "email_host")?,
            port,
            user: string_field(object, "email_user")?,
            credential: string_field(object, "email_password")?,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Login name, also used as the sender address
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("credential", &"<redacted>")
            .finish()
    }
}

fn coerce_port(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(n) => u16::try_from(n).ok(),
            // Whole floats such as 465.0; fractional ports are rejected
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(f))
                .map(|f| f as u16),
        },
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
