use async_trait::async_trait;
use interview_types::{
    HistoryResponse, InterviewSchema, NavigateRequest, SendMessageRequest, SessionStatus,
    StartSessionRequest, TurnResponse, TurnsSummary,
};

use crate::error::Result;

/// Backend interview API
///
/// Every call is a single request/response. Implementations do not retry;
/// the UI layer decides what a failure means.
#[async_trait]
pub trait InterviewApi: Send + Sync {
    /// Open a new session; the response carries the session id and first question
    async fn start_session(&self, request: StartSessionRequest) -> Result<TurnResponse>;

    /// Answer the current turn with free text or a UI tool value
    async fn send_message(&self, request: SendMessageRequest) -> Result<TurnResponse>;

    /// Jump to an already visited turn
    async fn navigate_to_turn(&self, request: NavigateRequest) -> Result<TurnResponse>;

    async fn get_session_status(&self, session_id: &str) -> Result<SessionStatus>;

    async fn get_turns_summary(&self, session_id: &str) -> Result<TurnsSummary>;

    async fn get_schema(&self) -> Result<InterviewSchema>;

    async fn get_history(&self, session_id: &str) -> Result<HistoryResponse>;
}
