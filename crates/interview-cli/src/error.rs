use config::ConfigError;
use interview_chat::ChatError;
use interview_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid asset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Command(String),

    #[error("No interview session; pass --session or start one with `chat`")]
    NoSession,
}

pub type CliResult<T> = Result<T, CliError>;
