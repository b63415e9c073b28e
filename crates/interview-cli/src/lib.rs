pub mod config;
pub mod error;
pub mod handlers;
pub mod render;
pub mod state;

pub use config::Config;
pub use error::{CliError, CliResult};
pub use state::AppState;
