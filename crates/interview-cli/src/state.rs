use std::sync::Arc;

use interview_chat::InterviewController;
use interview_client::{ClientFactory, InterviewApi};
use interview_persist::PersistClient;

use crate::config::Config;
use crate::error::CliResult;

/// Resources shared by every command
///
/// The API client and storage are created once from the configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: Arc<dyn InterviewApi>,
    pub persist: PersistClient,
}

impl AppState {
    pub fn new(config: Config) -> CliResult<Self> {
        let api = ClientFactory::create_client(config.client_config())?;
        let persist = config.persist_client();
        Ok(Self::with_parts(config, api, persist))
    }

    pub fn with_parts(config: Config, api: Arc<dyn InterviewApi>, persist: PersistClient) -> Self {
        Self {
            config: Arc::new(config),
            api,
            persist,
        }
    }

    /// Controller for `session`, which may be a bare id or a URL with `?session=`
    pub fn controller(&self, session: Option<&str>) -> CliResult<InterviewController> {
        let mut builder = InterviewController::builder()
            .api(self.api.clone())
            .persistence(self.persist.clone());

        builder = match session.map(str::trim).filter(|s| !s.is_empty()) {
            Some(url) if url.contains("://") => builder.session_from_url(url),
            Some(id) => builder.session_id(id),
            None => builder,
        };

        Ok(builder.build()?)
    }

    /// Explicit session, else the remembered one
    pub fn resolve_session(&self, session: Option<&str>) -> Option<String> {
        match session.map(str::trim).filter(|s| !s.is_empty()) {
            Some(url) if url.contains("://") => interview_persist::session_id_from_url(url),
            Some(id) => Some(id.to_string()),
            None => self.persist.sessions().recall(),
        }
    }
}
