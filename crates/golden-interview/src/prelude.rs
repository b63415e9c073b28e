//! Prelude module for convenient imports
//!
//! ```rust
//! use golden_interview::prelude::*;
//! ```

pub use crate::{
    ClientConfig, ClientFactory, InterviewApi,
    ConversationMessage, MessageRole, TurnResponse, UiTool, CreativeAsset,
    PersistClient, MemoryStorage, FileStorage,
    InterviewController, ChatState, ChatError, InputAffordance, ToolRegistry, ToolKind,
    render_preview, JobPreview, PreviewCard,
};
