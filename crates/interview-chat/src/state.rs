use interview_types::RefineSuggestion;
use serde::Serialize;

use crate::tools::ResolvedTool;

/// Where the interview conversation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    /// No turn has been applied yet
    Initializing,
    /// Waiting for the user's answer; navigation allowed
    Active,
    /// The server proposed rewrites of the last answer
    AwaitingSuggestion,
    Complete,
}

impl ChatState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// What input the UI should offer right now
#[derive(Debug, Clone, PartialEq)]
pub enum InputAffordance {
    /// A request is outstanding, the interview has not started, or it is over
    Disabled,
    FreeText { prefill: Option<String> },
    Tool(ResolvedTool),
    /// The server sent a widget this client cannot draw; free text is offered instead
    UnknownTool { tool_type: String, notice: String },
    Suggestions {
        suggestions: Vec<RefineSuggestion>,
        original_value: Option<String>,
        reasoning: Option<String>,
    },
}

impl InputAffordance {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}
