use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000/ws";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Startup settings for a client. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Peer address, opened once per session.
    pub endpoint: String,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
        .validated()
    }

    /// Trims the endpoint and requires a `ws://` or `wss://` scheme.
    /// The log level must name a `log::Level`.
    pub fn validated(mut self) -> Result<Self> {
        self.level()?;

        let trimmed = self.endpoint.trim();
        if trimmed.is_empty() {
            return Err(Error::Config("endpoint is empty".to_string()));
        }
        if !(trimmed.starts_with("ws://") || trimmed.starts_with("wss://")) {
            return Err(Error::Config(format!(
                "endpoint {trimmed:?} must use ws:// or wss://"
            )));
        }
        self.endpoint = trimmed.to_string();
        Ok(self)
    }

    pub fn level(&self) -> Result<log::Level> {
        self.log_level
            .parse()
            .map_err(|_| Error::Config(format!("unknown log level {:?}", self.log_level)))
    }
}
