//! # Golden Interview
//!
//! Client for a conversational job-posting interview. The backend owns the
//! interview itself; this crate drives it from the user's side.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use golden_interview::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ClientFactory::create_client(
//!         ClientConfig::new("https://api.example.com").with_api_token("token"),
//!     )?;
//!
//!     let mut controller = InterviewController::builder()
//!         .api(api)
//!         .persistence(PersistClient::builder().directory(".golden-interview").build())
//!         .build()?;
//!
//!     controller.start().await?;
//!     println!("{}", controller.current_question().unwrap_or_default());
//!
//!     controller.send_text("Sous Chef").await?;
//!     if let InputAffordance::Suggestions { suggestions, .. } = controller.input_affordance() {
//!         println!("{} suggestions", suggestions.len());
//!         controller.accept_suggestion(0).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`interview-types`**: wire types shared by every crate
//! - **`interview-client`**: `InterviewApi` trait and its HTTP implementation
//! - **`interview-persist`**: session id storage and the transcript cache
//! - **`interview-preview`**: creative-asset renderer resolution and job preview
//! - **`interview-chat`**: the chat controller state machine and dynamic tools

pub mod prelude;

pub use interview_types::{
    Action, ConversationMessage, CreativeAsset, HistoryResponse, InterviewSchema,
    MessageMetadata, MessageRole, MessageTimestamp, NavigateRequest, Navigation,
    PreviousResponse, RefineAction, RefineResult, RefineSuggestion, SchemaField,
    SendMessageRequest, SessionStatus, StartSessionRequest, TurnResponse, TurnSummary,
    TurnsSummary, UiTool,
};

pub use interview_client::{
    ClientConfig, ClientError, ClientFactory, HttpInterviewClient, HttpInterviewClientBuilder,
    InterviewApi,
};

pub use interview_persist::{
    cache_key, session_id_from_url, with_session_param, CachedConversation, ConversationCache,
    FileStorage, KeyValueStorage, MemoryStorage, PersistClient, PersistClientBuilder,
    PersistError, SessionStore,
};

pub use interview_preview::{
    render_preview, renderer_for, resolve_renderer, ChannelRenderer, JobPreview,
    JobPreviewField, PreviewCard, PreviewMedia, PreviewRenderer, RendererKind,
};

pub use interview_chat::{
    ChatError, ChatState, InputAffordance, InterviewController, InterviewControllerBuilder,
    ResolvedTool, ToolKind, ToolOption, ToolRegistry, ToolResolution,
};
