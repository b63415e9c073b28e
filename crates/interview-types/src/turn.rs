use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::ConversationMessage;
use crate::tool::UiTool;

/// Body of `POST /golden-interview/start`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_data: Option<Value>,
}

/// Body of `POST /golden-interview/chat`
///
/// Exactly one of `content` or `uiResponse` is normally set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refine_action: Option<RefineAction>,
}

impl SendMessageRequest {
    pub fn text(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            content: Some(content.into()),
            ui_response: None,
            client_message_id: None,
            refine_action: None,
        }
    }

    pub fn ui_response(session_id: impl Into<String>, value: Value) -> Self {
        Self {
            session_id: session_id.into(),
            content: None,
            ui_response: Some(value),
            client_message_id: None,
            refine_action: None,
        }
    }

    pub fn with_client_message_id(mut self, id: impl Into<String>) -> Self {
        self.client_message_id = Some(id.into());
        self
    }

    pub fn with_refine_action(mut self, action: RefineAction) -> Self {
        self.refine_action = Some(action);
        self
    }
}

/// How the user resolved a pending refine block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefineAction {
    AcceptSuggestion,
    KeepOriginal,
}

/// Body of `POST /golden-interview/navigate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    pub session_id: String,
    pub target_index: usize,
}

/// Turn-shaped payload returned by start, chat and navigate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnResponse {
    #[serde(default, rename = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub ui_tool: Option<UiTool>,
    #[serde(default)]
    pub interview_phase: Option<String>,
    #[serde(default)]
    pub context_explanation: Option<String>,
    #[serde(default)]
    pub completion_percentage: Option<f64>,
    #[serde(default)]
    pub currently_asking_field: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub navigation: Option<Navigation>,
    #[serde(default)]
    pub previous_response: Option<PreviousResponse>,
    #[serde(default)]
    pub refine_result: Option<RefineResult>,
    /// Server-confirmed copy of the user's answer, carrying its client id
    #[serde(default)]
    pub user_message: Option<ConversationMessage>,
}

impl TurnResponse {
    /// Whether the server considers the interview finished
    pub fn marks_complete(&self) -> bool {
        self.is_complete
            || self
                .interview_phase
                .as_deref()
                .is_some_and(|phase| phase.eq_ignore_ascii_case("complete"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub current_index: usize,
    pub max_index: usize,
    #[serde(default)]
    pub can_go_back: bool,
    #[serde(default)]
    pub can_go_forward: bool,
    #[serde(default)]
    pub is_editing: bool,
}

/// What the user answered the last time this turn was visited
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviousResponse {
    #[serde(default, rename = "uiResponse", skip_serializing_if = "Option::is_none")]
    pub ui_response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefineResult {
    #[serde(default)]
    pub suggestions: Vec<RefineSuggestion>,
    #[serde(default = "default_true")]
    pub can_proceed: bool,
    #[serde(default)]
    pub validation_issue: Option<String>,
    #[serde(default)]
    pub original_value: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

fn default_true() -> bool {
    true
}

impl RefineResult {
    /// A hard validation failure: nothing to pick from and the turn cannot advance
    pub fn is_validation_failure(&self) -> bool {
        !self.can_proceed && self.suggestions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineSuggestion {
    pub value: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// `GET /golden-interview/session/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStatus {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub interview_phase: Option<String>,
    #[serde(default)]
    pub completion_percentage: Option<f64>,
    #[serde(default)]
    pub currently_asking_field: Option<String>,
    #[serde(default)]
    pub ui_tool: Option<UiTool>,
    #[serde(default)]
    pub collected_data: Value,
}

/// `GET /golden-interview/session/{id}/turns`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnsSummary {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub turns: Vec<TurnSummary>,
    #[serde(default)]
    pub current_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub index: usize,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer_preview: Option<String>,
}

/// `GET /golden-interview/schema`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewSchema {
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl InterviewSchema {
    pub fn field(&self, id: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// `GET /golden-interview/session/{id}/history`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
}
