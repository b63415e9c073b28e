use interview_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Api(#[from] ClientError),

    #[error("Invalid controller configuration: {0}")]
    Config(String),

    #[error("The interview has not been started")]
    NotStarted,

    #[error("The interview is already complete")]
    Complete,

    #[error("A request is already in flight")]
    Busy,

    #[error("Choose a suggestion or keep your original answer first")]
    SuggestionPending,

    #[error("There is no suggestion to resolve")]
    NoPendingSuggestion,

    #[error("Suggestion {0} does not exist")]
    InvalidSuggestion(usize),

    #[error("Cannot navigate: {0}")]
    Navigation(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("The server did not return a session id")]
    MissingSessionId,

    #[error("Nothing to retry")]
    NothingToRetry,
}

impl ChatError {
    /// Text for the inline error banner
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
