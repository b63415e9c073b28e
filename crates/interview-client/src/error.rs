use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Interview API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Short text suitable for an inline error banner
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Api { status, .. } => format!("The interview service returned {}", status),
            Self::Http(e) if e.is_timeout() => "The interview service took too long to respond".to_string(),
            Self::Http(_) => "Could not reach the interview service".to_string(),
            Self::Decode(_) => "The interview service sent an unexpected response".to_string(),
            Self::Config(msg) => msg.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
