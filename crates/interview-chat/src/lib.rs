pub mod builder;
pub mod controller;
pub mod error;
pub mod state;
pub mod tools;

pub use builder::InterviewControllerBuilder;
pub use controller::InterviewController;
pub use error::{ChatError, Result};
pub use state::{ChatState, InputAffordance};
pub use tools::{ResolvedTool, ToolKind, ToolOption, ToolRegistry, ToolResolution};
