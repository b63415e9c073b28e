use std::sync::Arc;

use interview_client::InterviewApi;
use interview_persist::{session_id_from_url, PersistClient};
use serde_json::Value;

use crate::controller::InterviewController;
use crate::error::{ChatError, Result};
use crate::tools::ToolRegistry;

/// Builder for an [`InterviewController`] with optional components
pub struct InterviewControllerBuilder {
    api: Option<Arc<dyn InterviewApi>>,
    persist: Option<PersistClient>,
    registry: ToolRegistry,
    session_id: Option<String>,
    initial_data: Option<Value>,
}

impl InterviewControllerBuilder {
    pub fn new() -> Self {
        Self {
            api: None,
            persist: None,
            registry: ToolRegistry::new(),
            session_id: None,
            initial_data: None,
        }
    }

    /// Set the backend API client
    pub fn api(mut self, api: Arc<dyn InterviewApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Where the session id and transcript cache live; in-memory when unset
    pub fn persistence(mut self, persist: PersistClient) -> Self {
        self.persist = Some(persist);
        self
    }

    pub fn tool_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Resume this session instead of the remembered one
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Take the session id from a `?session=` / `?q=` URL, if it has one
    pub fn session_from_url(mut self, url: &str) -> Self {
        if let Some(id) = session_id_from_url(url) {
            self.session_id = Some(id);
        }
        self
    }

    /// Seed data sent with `start_session` when a new session is opened
    pub fn initial_data(mut self, data: Value) -> Self {
        self.initial_data = Some(data);
        self
    }

    pub fn build(self) -> Result<InterviewController> {
        let api = self
            .api
            .ok_or_else(|| ChatError::Config("Interview API client is required".to_string()))?;
        let persist = self
            .persist
            .unwrap_or_else(|| PersistClient::builder().build());

        Ok(InterviewController::from_parts(
            api,
            persist,
            self.registry,
            self.initial_data,
            self.session_id,
        ))
    }
}

impl Default for InterviewControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
