pub mod message;
pub mod turn;
pub mod tool;
pub mod asset;

pub use message::{Action, ConversationMessage, MessageMetadata, MessageRole, MessageTimestamp};
pub use turn::{
    HistoryResponse, InterviewSchema, NavigateRequest, Navigation, PreviousResponse,
    RefineAction, RefineResult, RefineSuggestion, SchemaField, SendMessageRequest,
    SessionStatus, StartSessionRequest, TurnResponse, TurnSummary, TurnsSummary,
};
pub use tool::UiTool;
pub use asset::CreativeAsset;
