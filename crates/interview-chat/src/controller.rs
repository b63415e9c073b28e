use std::sync::Arc;

use interview_client::{ClientError, InterviewApi};
use interview_persist::{
    apply_client_message_ids, cache_key, derive_version, upsert_confirmed, PersistClient,
};
use interview_preview::JobPreview;
use interview_types::{
    ConversationMessage, InterviewSchema, MessageRole, NavigateRequest, Navigation,
    PreviousResponse, RefineAction, RefineResult, SendMessageRequest, SessionStatus,
    StartSessionRequest, TurnResponse, TurnsSummary, UiTool,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::builder::InterviewControllerBuilder;
use crate::error::{ChatError, Result};
use crate::state::{ChatState, InputAffordance};
use crate::tools::{ToolRegistry, ToolResolution};

/// A request that failed and can be replayed with [`InterviewController::retry`]
#[derive(Debug, Clone)]
enum PendingRequest {
    Start,
    Send {
        request: SendMessageRequest,
        echo: Option<ConversationMessage>,
    },
    Navigate {
        target_index: usize,
    },
}

/// Drives one interview conversation against the backend.
///
/// Every transition mirrors the last server response; the controller never
/// decides on its own that a field is valid or that the interview is done.
/// Methods take `&mut self`, so only one request can be outstanding.
pub struct InterviewController {
    api: Arc<dyn InterviewApi>,
    persist: PersistClient,
    registry: ToolRegistry,
    initial_data: Option<Value>,
    requested_session: Option<String>,

    state: ChatState,
    session_id: Option<String>,
    messages: Vec<ConversationMessage>,
    current_question: Option<String>,
    current_tool: Option<UiTool>,
    interview_phase: Option<String>,
    context_explanation: Option<String>,
    completion_percentage: f64,
    currently_asking_field: Option<String>,
    navigation: Option<Navigation>,
    previous_response: Option<PreviousResponse>,
    refine: Option<RefineResult>,
    error: Option<String>,
    busy: bool,
    failed: Option<PendingRequest>,
}

impl InterviewController {
    pub fn builder() -> InterviewControllerBuilder {
        InterviewControllerBuilder::new()
    }

    pub(crate) fn from_parts(
        api: Arc<dyn InterviewApi>,
        persist: PersistClient,
        registry: ToolRegistry,
        initial_data: Option<Value>,
        requested_session: Option<String>,
    ) -> Self {
        Self {
            api,
            persist,
            registry,
            initial_data,
            requested_session,
            state: ChatState::Initializing,
            session_id: None,
            messages: Vec::new(),
            current_question: None,
            current_tool: None,
            interview_phase: None,
            context_explanation: None,
            completion_percentage: 0.0,
            currently_asking_field: None,
            navigation: None,
            previous_response: None,
            refine: None,
            error: None,
            busy: false,
            failed: None,
        }
    }

    /// Resume the requested or remembered session, or open a new one.
    ///
    /// The cached transcript is shown before the server history arrives.
    /// A remembered session the server reports as inactive is forgotten.
    pub async fn start(&mut self) -> Result<()> {
        if self.busy {
            return Err(ChatError::Busy);
        }
        self.error = None;

        let remembered = self
            .requested_session
            .clone()
            .or_else(|| self.persist.sessions().recall());

        if let Some(session_id) = remembered {
            match self.resume(&session_id).await {
                Ok(true) => return Ok(()),
                Ok(false) => {
                    info!("Session {} is no longer active, starting a new one", session_id);
                    self.discard_session(&session_id);
                }
                Err(e) if e.is_not_found() => {
                    info!("Session {} was not found, starting a new one", session_id);
                    self.discard_session(&session_id);
                }
                Err(e) => return Err(self.fail(PendingRequest::Start, e)),
            }
        }

        self.start_new().await
    }

    async fn resume(&mut self, session_id: &str) -> std::result::Result<bool, ClientError> {
        self.busy = true;
        let status = self.api.get_session_status(session_id).await;
        self.busy = false;
        let status = status?;

        if !status.is_active || status.is_complete {
            return Ok(false);
        }

        self.session_id = Some(session_id.to_string());
        if let Some(cached) = self.persist.conversations().load(&cache_key(session_id)) {
            debug!(
                "Showing {} cached messages for session {}",
                cached.messages.len(),
                session_id
            );
            self.messages = cached.messages;
        }
        self.apply_status(status);

        self.busy = true;
        let history = self.api.get_history(session_id).await;
        self.busy = false;
        match history {
            Ok(history) => self.messages = apply_client_message_ids(&history.messages),
            Err(e) => warn!(
                "Could not load history for session {}, keeping cached transcript: {}",
                session_id, e
            ),
        }

        self.current_question = self
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.clone());
        self.state = ChatState::Active;
        self.failed = None;
        self.persist.sessions().remember(session_id);
        self.save_cache();

        info!(
            "Resumed interview session {} with {} messages",
            session_id,
            self.messages.len()
        );
        Ok(true)
    }

    async fn start_new(&mut self) -> Result<()> {
        let request = StartSessionRequest {
            initial_data: self.initial_data.clone(),
        };

        self.busy = true;
        let result = self.api.start_session(request).await;
        self.busy = false;

        let turn = result.map_err(|e| self.fail(PendingRequest::Start, e))?;
        let Some(session_id) = turn.session_id.clone().filter(|id| !id.trim().is_empty()) else {
            let err = ChatError::MissingSessionId;
            self.error = Some(err.user_message());
            self.failed = Some(PendingRequest::Start);
            return Err(err);
        };

        self.session_id = Some(session_id.clone());
        self.messages.clear();
        self.failed = None;
        self.persist.sessions().remember(&session_id);
        info!("Started interview session {}", session_id);

        self.apply_turn(turn, true);
        Ok(())
    }

    /// Answer the current turn with free text
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let session_id = self.ready_for_answer()?;

        let echo = ConversationMessage::local_echo(text);
        let request =
            SendMessageRequest::text(session_id, text).with_client_message_id(echo.id.clone());
        self.submit(request, Some(echo)).await
    }

    /// Answer the current turn with the value a UI tool produced
    pub async fn send_ui_response(&mut self, value: Value) -> Result<()> {
        let Some(display) = display_text(&value) else {
            return Err(ChatError::EmptyMessage);
        };
        let session_id = self.ready_for_answer()?;

        let echo = ConversationMessage::local_echo(display);
        let request = SendMessageRequest::ui_response(session_id, value)
            .with_client_message_id(echo.id.clone());
        self.submit(request, Some(echo)).await
    }

    /// Take suggestion `index` from the pending refine block
    pub async fn accept_suggestion(&mut self, index: usize) -> Result<()> {
        let session_id = self.ready_for_suggestion()?;
        let suggestion = self
            .refine
            .as_ref()
            .and_then(|refine| refine.suggestions.get(index))
            .cloned()
            .ok_or(ChatError::InvalidSuggestion(index))?;

        let echo = ConversationMessage::local_echo(suggestion.value.clone());
        let request = SendMessageRequest::text(session_id, suggestion.value)
            .with_client_message_id(echo.id.clone())
            .with_refine_action(RefineAction::AcceptSuggestion);
        self.submit(request, Some(echo)).await
    }

    /// Reject the suggestions and keep the answer as typed
    pub async fn keep_original(&mut self) -> Result<()> {
        let session_id = self.ready_for_suggestion()?;
        let original = self
            .refine
            .as_ref()
            .and_then(|refine| refine.original_value.clone())
            .or_else(|| {
                self.messages
                    .iter()
                    .rev()
                    .find(|m| m.role == MessageRole::User)
                    .map(|m| m.content.clone())
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or(ChatError::EmptyMessage)?;

        let request = SendMessageRequest {
            session_id,
            content: Some(original),
            ui_response: None,
            client_message_id: None,
            refine_action: Some(RefineAction::KeepOriginal),
        };
        self.submit(request, None).await
    }

    async fn submit(
        &mut self,
        request: SendMessageRequest,
        echo: Option<ConversationMessage>,
    ) -> Result<()> {
        self.error = None;
        if let Some(echo) = &echo {
            self.messages.push(echo.clone());
        }

        self.busy = true;
        let result = self.api.send_message(request.clone()).await;
        self.busy = false;

        match result {
            Ok(turn) => {
                self.failed = None;
                self.apply_turn(turn, true);
                Ok(())
            }
            Err(e) => {
                if let Some(echo) = &echo {
                    self.messages.retain(|m| m.id != echo.id);
                }
                Err(self.fail(PendingRequest::Send { request, echo }, e))
            }
        }
    }

    pub async fn go_back(&mut self) -> Result<()> {
        self.ready_for_navigation()?;
        let nav = self.current_navigation().await?;
        if !nav.can_go_back || nav.current_index == 0 {
            return Err(ChatError::Navigation("already at the first question".to_string()));
        }
        self.navigate_to(nav.current_index - 1).await
    }

    pub async fn go_forward(&mut self) -> Result<()> {
        self.ready_for_navigation()?;
        let nav = self.current_navigation().await?;
        if !nav.can_go_forward || nav.current_index >= nav.max_index {
            return Err(ChatError::Navigation("already at the latest question".to_string()));
        }
        self.navigate_to(nav.current_index + 1).await
    }

    /// Revisit turn `target_index` (0-based); its earlier answer becomes the prefill
    pub async fn navigate_to(&mut self, target_index: usize) -> Result<()> {
        let session_id = self.ready_for_navigation()?;
        if let Some(nav) = self.navigation.filter(|nav| target_index > nav.max_index) {
            return Err(ChatError::Navigation(format!(
                "question {} has not been reached yet (latest is {})",
                target_index + 1,
                nav.max_index + 1
            )));
        }
        self.error = None;

        let request = NavigateRequest {
            session_id,
            target_index,
        };
        self.busy = true;
        let result = self.api.navigate_to_turn(request).await;
        self.busy = false;

        match result {
            Ok(turn) => {
                debug!("Navigated to turn {}", target_index);
                self.failed = None;
                self.apply_turn(turn, false);
                Ok(())
            }
            Err(e) => Err(self.fail(PendingRequest::Navigate { target_index }, e)),
        }
    }

    /// Replay the last request that failed
    pub async fn retry(&mut self) -> Result<()> {
        if self.busy {
            return Err(ChatError::Busy);
        }
        let pending = self.failed.take().ok_or(ChatError::NothingToRetry)?;
        debug!("Retrying {:?}", pending);

        match pending {
            PendingRequest::Start => self.start().await,
            PendingRequest::Send { request, echo } => self.submit(request, echo).await,
            PendingRequest::Navigate { target_index } => self.navigate_to(target_index).await,
        }
    }

    /// Which input the UI should show for the current state
    pub fn input_affordance(&self) -> InputAffordance {
        if self.busy {
            return InputAffordance::Disabled;
        }

        match self.state {
            ChatState::Initializing | ChatState::Complete => InputAffordance::Disabled,
            ChatState::AwaitingSuggestion => match &self.refine {
                Some(refine) => InputAffordance::Suggestions {
                    suggestions: refine.suggestions.clone(),
                    original_value: refine.original_value.clone(),
                    reasoning: refine.reasoning.clone(),
                },
                None => InputAffordance::Disabled,
            },
            ChatState::Active => {
                let previous = self.previous_response.as_ref();
                match &self.current_tool {
                    None => InputAffordance::FreeText {
                        prefill: previous.and_then(|p| p.content.clone()),
                    },
                    Some(tool) => match self.registry.resolve(tool) {
                        ToolResolution::Known(resolved) => InputAffordance::Tool(
                            resolved.with_initial_value(previous.and_then(|p| {
                                p.ui_response.clone().or_else(|| p.content.clone().map(Value::String))
                            })),
                        ),
                        ToolResolution::Unknown { tool_type, notice } => {
                            InputAffordance::UnknownTool { tool_type, notice }
                        }
                    },
                }
            }
        }
    }

    /// Collected data so far, for the job preview pane
    pub async fn job_preview(&self) -> Result<JobPreview> {
        let session_id = self.session_id.as_deref().ok_or(ChatError::NotStarted)?;
        let status: SessionStatus = self.api.get_session_status(session_id).await?;
        Ok(JobPreview::from_status(&status))
    }

    pub async fn turns_summary(&self) -> Result<TurnsSummary> {
        let session_id = self.session_id.as_deref().ok_or(ChatError::NotStarted)?;
        Ok(self.api.get_turns_summary(session_id).await?)
    }

    pub async fn schema(&self) -> Result<InterviewSchema> {
        Ok(self.api.get_schema().await?)
    }

    fn apply_turn(&mut self, turn: TurnResponse, record_message: bool) {
        let complete = turn.marks_complete();

        if let Some(confirmed) = turn.user_message {
            upsert_confirmed(&mut self.messages, confirmed);
        }
        if let Some(text) = turn.message.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            if record_message {
                self.messages.push(ConversationMessage::assistant(text));
            }
            self.current_question = Some(text.to_string());
        }
        if turn.interview_phase.is_some() {
            self.interview_phase = turn.interview_phase;
        }
        if let Some(pct) = turn.completion_percentage {
            self.completion_percentage = pct;
        }
        self.context_explanation = turn.context_explanation;
        self.currently_asking_field = turn.currently_asking_field;
        self.current_tool = turn.ui_tool;
        self.navigation = turn.navigation;
        self.previous_response = turn.previous_response;

        if complete {
            self.complete();
            return;
        }

        match turn.refine_result {
            Some(refine) if !refine.suggestions.is_empty() => {
                debug!("Server offered {} suggestions", refine.suggestions.len());
                self.refine = Some(refine);
                self.state = ChatState::AwaitingSuggestion;
            }
            Some(refine) if refine.is_validation_failure() => {
                self.refine = None;
                self.error = Some(
                    refine
                        .validation_issue
                        .unwrap_or_else(|| "That answer could not be accepted".to_string()),
                );
                self.state = ChatState::Active;
            }
            _ => {
                self.refine = None;
                self.state = ChatState::Active;
            }
        }

        self.save_cache();
    }

    fn apply_status(&mut self, status: SessionStatus) {
        if status.interview_phase.is_some() {
            self.interview_phase = status.interview_phase;
        }
        if let Some(pct) = status.completion_percentage {
            self.completion_percentage = pct;
        }
        self.currently_asking_field = status.currently_asking_field;
        self.current_tool = status.ui_tool;
    }

    fn complete(&mut self) {
        self.state = ChatState::Complete;
        self.refine = None;
        self.current_tool = None;
        self.persist.sessions().forget();
        if let Some(session_id) = &self.session_id {
            self.persist.conversations().clear(&cache_key(session_id));
            info!("Interview session {} complete", session_id);
        }
    }

    /// Drop every local trace of a session the server no longer serves
    fn discard_session(&mut self, session_id: &str) {
        self.persist.sessions().forget();
        self.persist.conversations().clear(&cache_key(session_id));
        self.requested_session = None;
        self.session_id = None;
        self.messages.clear();
    }

    fn save_cache(&self) {
        if let Some(session_id) = &self.session_id {
            let version = derive_version(&self.messages);
            self.persist
                .conversations()
                .save(&cache_key(session_id), &self.messages, version);
        }
    }

    fn fail(&mut self, pending: PendingRequest, err: ClientError) -> ChatError {
        warn!("Interview request failed: {}", err);
        self.error = Some(err.user_message());
        self.failed = Some(pending);
        ChatError::Api(err)
    }

    async fn current_navigation(&mut self) -> Result<Navigation> {
        if let Some(nav) = self.navigation {
            return Ok(nav);
        }

        let session_id = self.session_id.clone().ok_or(ChatError::NotStarted)?;
        self.busy = true;
        let summary = self.api.get_turns_summary(&session_id).await;
        self.busy = false;

        let summary = summary.map_err(|e| {
            self.error = Some(e.user_message());
            ChatError::Api(e)
        })?;
        let max_index = summary.turns.len().saturating_sub(1).max(summary.current_index);
        Ok(Navigation {
            current_index: summary.current_index,
            max_index,
            can_go_back: summary.current_index > 0,
            can_go_forward: summary.current_index < max_index,
            is_editing: summary.current_index < max_index,
        })
    }

    fn ensure_open(&self) -> Result<String> {
        if self.busy {
            return Err(ChatError::Busy);
        }
        match self.state {
            ChatState::Initializing => Err(ChatError::NotStarted),
            ChatState::Complete => Err(ChatError::Complete),
            ChatState::Active | ChatState::AwaitingSuggestion => {
                self.session_id.clone().ok_or(ChatError::NotStarted)
            }
        }
    }

    fn ready_for_answer(&self) -> Result<String> {
        let session_id = self.ensure_open()?;
        if self.state == ChatState::AwaitingSuggestion {
            return Err(ChatError::SuggestionPending);
        }
        Ok(session_id)
    }

    fn ready_for_navigation(&self) -> Result<String> {
        self.ready_for_answer()
    }

    fn ready_for_suggestion(&self) -> Result<String> {
        let session_id = self.ensure_open()?;
        if self.state != ChatState::AwaitingSuggestion {
            return Err(ChatError::NoPendingSuggestion);
        }
        Ok(session_id)
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn current_question(&self) -> Option<&str> {
        self.current_question.as_deref()
    }

    pub fn current_tool(&self) -> Option<&UiTool> {
        self.current_tool.as_ref()
    }

    pub fn interview_phase(&self) -> Option<&str> {
        self.interview_phase.as_deref()
    }

    pub fn context_explanation(&self) -> Option<&str> {
        self.context_explanation.as_deref()
    }

    pub fn completion_percentage(&self) -> f64 {
        self.completion_percentage
    }

    pub fn currently_asking_field(&self) -> Option<&str> {
        self.currently_asking_field.as_deref()
    }

    pub fn navigation(&self) -> Option<Navigation> {
        self.navigation
    }

    pub fn previous_response(&self) -> Option<&PreviousResponse> {
        self.previous_response.as_ref()
    }

    pub fn pending_refine(&self) -> Option<&RefineResult> {
        self.refine.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn can_retry(&self) -> bool {
        self.failed.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Transcript text for a UI tool answer; `None` when there is nothing to show
fn display_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => (if *b { "Yes" } else { "No" }).to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(display_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
