// Configuration for building interview API clients

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::http::HttpInterviewClient;
use crate::traits::InterviewApi;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the interview backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend root, e.g. "https://api.example.com/api"
    pub base_url: String,
    /// Bearer token from the surrounding user session (never read from files)
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Factory for creating interview clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_client(config: ClientConfig) -> Result<Arc<dyn InterviewApi>> {
        let mut builder = HttpInterviewClient::builder()
            .base_url(config.base_url)
            .timeout(Duration::from_secs(config.timeout_secs));
        if let Some(token) = config.api_token {
            builder = builder.api_token(token);
        }
        Ok(Arc::new(builder.build()?))
    }
}
