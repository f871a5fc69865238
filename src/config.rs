use std::env;
use std::time::Duration;

/// Output format for the fmt tracing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub relay_timeout_seconds: u64,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            relay_timeout_seconds: parse_relay_timeout(env::var("RELAY_TIMEOUT_SECONDS").ok())?,
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                Ok("text") | Err(_) => LogFormat::Text,
                Ok(other) => return Err(ConfigError::InvalidLogFormat(other.to_string())),
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_secs(self.relay_timeout_seconds)
    }
}

/// Unset or unparsable falls back to 30 seconds. Zero is rejected.
fn parse_relay_timeout(raw: Option<String>) -> Result<u64, ConfigError> {
    match raw.and_then(|value| value.trim().parse::<u64>().ok()) {
        Some(0) => Err(ConfigError::InvalidRelayTimeout),
        Some(seconds) => Ok(seconds),
        None => Ok(30),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 5000,
            relay_timeout_seconds: 30,
            log_format: LogFormat::Text,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("RELAY_TIMEOUT_SECONDS must be at least 1")]
    InvalidRelayTimeout,
    #[error("Unknown LOG_FORMAT {0:?}, expected \"text\" or \"json\"")]
    InvalidLogFormat(String),
}
