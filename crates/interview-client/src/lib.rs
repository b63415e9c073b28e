pub mod traits;
pub mod config;
pub mod error;
pub mod http;

pub use traits::InterviewApi;
pub use config::{ClientConfig, ClientFactory};
pub use error::{ClientError, Result};
pub use http::{HttpInterviewClient, HttpInterviewClientBuilder};
