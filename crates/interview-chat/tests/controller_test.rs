use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use interview_chat::{ChatError, ChatState, InputAffordance, InterviewController, ToolKind};
use interview_client::{ClientError, InterviewApi, Result as ClientResult};
use interview_persist::{cache_key, MemoryStorage, PersistClient};
use interview_types::{
    ConversationMessage, HistoryResponse, InterviewSchema, MessageRole, NavigateRequest,
    RefineAction, SendMessageRequest, SessionStatus, StartSessionRequest, TurnResponse,
    TurnsSummary,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

type Queue<T> = Mutex<VecDeque<ClientResult<T>>>;

/// Replays canned responses in order and records what was sent
#[derive(Default)]
struct ScriptedApi {
    starts: Queue<TurnResponse>,
    chats: Queue<TurnResponse>,
    navigations: Queue<TurnResponse>,
    statuses: Queue<SessionStatus>,
    summaries: Queue<TurnsSummary>,
    histories: Queue<HistoryResponse>,
    sent: Mutex<Vec<SendMessageRequest>>,
    navigated: Mutex<Vec<NavigateRequest>>,
    start_calls: Mutex<usize>,
}

fn next<T>(queue: &Queue<T>, endpoint: &str) -> ClientResult<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ClientError::Config(format!("unexpected call to {}", endpoint))))
}

impl ScriptedApi {
    fn start(self, turn: Value) -> Self {
        self.starts.lock().unwrap().push_back(Ok(parse(turn)));
        self
    }

    fn chat(self, turn: Value) -> Self {
        self.chats.lock().unwrap().push_back(Ok(parse(turn)));
        self
    }

    fn chat_error(self, status: StatusCode, message: &str) -> Self {
        self.chats.lock().unwrap().push_back(Err(api_error(status, message)));
        self
    }

    fn navigate(self, turn: Value) -> Self {
        self.navigations.lock().unwrap().push_back(Ok(parse(turn)));
        self
    }

    fn status(self, status: Value) -> Self {
        self.statuses.lock().unwrap().push_back(Ok(parse(status)));
        self
    }

    fn status_error(self, status: StatusCode, message: &str) -> Self {
        self.statuses.lock().unwrap().push_back(Err(api_error(status, message)));
        self
    }

    fn summary(self, summary: Value) -> Self {
        self.summaries.lock().unwrap().push_back(Ok(parse(summary)));
        self
    }

    fn history(self, history: Value) -> Self {
        self.histories.lock().unwrap().push_back(Ok(parse(history)));
        self
    }

    fn history_error(self, status: StatusCode) -> Self {
        self.histories.lock().unwrap().push_back(Err(api_error(status, "")));
        self
    }

    fn sent(&self) -> Vec<SendMessageRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl InterviewApi for ScriptedApi {
    async fn start_session(&self, _request: StartSessionRequest) -> ClientResult<TurnResponse> {
        *self.start_calls.lock().unwrap() += 1;
        next(&self.starts, "start")
    }

    async fn send_message(&self, request: SendMessageRequest) -> ClientResult<TurnResponse> {
        self.sent.lock().unwrap().push(request);
        next(&self.chats, "chat")
    }

    async fn navigate_to_turn(&self, request: NavigateRequest) -> ClientResult<TurnResponse> {
        self.navigated.lock().unwrap().push(request);
        next(&self.navigations, "navigate")
    }

    async fn get_session_status(&self, _session_id: &str) -> ClientResult<SessionStatus> {
        next(&self.statuses, "session")
    }

    async fn get_turns_summary(&self, _session_id: &str) -> ClientResult<TurnsSummary> {
        next(&self.summaries, "turns")
    }

    async fn get_schema(&self) -> ClientResult<InterviewSchema> {
        Ok(InterviewSchema::default())
    }

    async fn get_history(&self, _session_id: &str) -> ClientResult<HistoryResponse> {
        next(&self.histories, "history")
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

fn api_error(status: StatusCode, message: &str) -> ClientError {
    ClientError::Api {
        status,
        message: message.to_string(),
    }
}

fn first_turn() -> Value {
    json!({
        "sessionId": "s-1",
        "message": "What's the job title?",
        "ui_tool": { "type": "text_input", "props": { "placeholder": "e.g. Sous Chef" } },
        "interview_phase": "basics",
        "completion_percentage": 0,
        "currently_asking_field": "job_title"
    })
}

struct Harness {
    api: Arc<ScriptedApi>,
    persist: PersistClient,
    controller: InterviewController,
}

fn harness(api: ScriptedApi) -> Harness {
    harness_with(api, PersistClient::new(Arc::new(MemoryStorage::new())))
}

fn harness_with(api: ScriptedApi, persist: PersistClient) -> Harness {
    let api = Arc::new(api);
    let controller = InterviewController::builder()
        .api(api.clone())
        .persistence(persist.clone())
        .build()
        .unwrap();
    Harness {
        api,
        persist,
        controller,
    }
}

#[tokio::test]
async fn test_start_opens_and_remembers_session() {
    let mut h = harness(ScriptedApi::default().start(first_turn()));

    assert_eq!(h.controller.input_affordance(), InputAffordance::Disabled);
    h.controller.start().await.unwrap();

    assert_eq!(h.controller.state(), ChatState::Active);
    assert_eq!(h.controller.session_id(), Some("s-1"));
    assert_eq!(h.persist.sessions().recall().as_deref(), Some("s-1"));
    assert_eq!(h.controller.current_question(), Some("What's the job title?"));
    assert_eq!(h.controller.currently_asking_field(), Some("job_title"));
    assert_eq!(h.controller.messages().len(), 1);

    match h.controller.input_affordance() {
        InputAffordance::Tool(tool) => {
            assert_eq!(tool.kind, ToolKind::TextInput);
            assert_eq!(tool.placeholder.as_deref(), Some("e.g. Sous Chef"));
        }
        other => panic!("expected a tool, got {:?}", other),
    }
}

#[tokio::test]
async fn test_start_reads_camel_case_session_id() {
    let api = ScriptedApi::default().start(json!({
        "sessionId": "abc-123",
        "message": "What's the job title?",
        "navigation": { "currentIndex": 0, "maxIndex": 0, "canGoBack": false, "canGoForward": false }
    }));
    let mut h = harness(api);

    h.controller.start().await.unwrap();

    assert_eq!(h.controller.session_id(), Some("abc-123"));
    assert_eq!(h.persist.sessions().recall().as_deref(), Some("abc-123"));
    assert_eq!(h.controller.navigation().map(|nav| nav.max_index), Some(0));
}

#[tokio::test]
async fn test_start_without_session_id_is_retryable() {
    let api = ScriptedApi::default()
        .start(json!({ "session_id": "ignored", "message": "Hi" }))
        .start(first_turn());
    let mut h = harness(api);

    assert!(matches!(h.controller.start().await, Err(ChatError::MissingSessionId)));
    assert!(h.controller.can_retry());

    h.controller.retry().await.unwrap();
    assert_eq!(h.controller.session_id(), Some("s-1"));
}

#[tokio::test]
async fn test_send_text_echoes_and_caches() {
    let api = ScriptedApi::default().start(first_turn()).chat(json!({
        "message": "Where is the role based?",
        "currently_asking_field": "location",
        "completion_percentage": 20
    }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();

    h.controller.send_text("  Sous Chef ").await.unwrap();

    let sent = h.api.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].content.as_deref(), Some("Sous Chef"));

    let messages = h.controller.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(sent[0].client_message_id.as_deref(), Some(messages[1].id.as_str()));
    assert_eq!(h.controller.completion_percentage(), 20.0);
    assert!(matches!(h.controller.input_affordance(), InputAffordance::FreeText { .. }));

    let cached = h.persist.conversations().load(&cache_key("s-1")).unwrap();
    assert_eq!(cached.messages.len(), 3);
    assert!(cached.version > 0);
}

#[tokio::test]
async fn test_confirmed_user_message_replaces_echo_in_place() {
    let api = ScriptedApi::default().start(first_turn());
    let mut h = harness(api);
    h.controller.start().await.unwrap();

    // The echo id is only known once sent: fail once, confirm on retry
    let echo_id = {
        h.api.chats.lock().unwrap().push_back(Err(api_error(StatusCode::BAD_GATEWAY, "")));
        let _ = h.controller.send_text("Sous Chef").await;
        h.api.sent()[0].client_message_id.clone().unwrap()
    };
    let confirmed = ConversationMessage::new("srv-7", MessageRole::User, "Sous Chef").with_metadata(
        interview_types::MessageMetadata {
            client_message_id: Some(echo_id.clone()),
            actions: None,
        },
    );
    h.api.chats.lock().unwrap().push_back(Ok(TurnResponse {
        message: Some("Where is the role based?".to_string()),
        user_message: Some(confirmed),
        ..Default::default()
    }));

    h.controller.retry().await.unwrap();

    let messages = h.controller.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].id, "srv-7");
    assert_eq!(messages[1].client_message_id(), Some(echo_id.as_str()));
    assert_eq!(messages[2].content, "Where is the role based?");
}

#[tokio::test]
async fn test_failed_send_removes_echo_and_retry_resends() {
    let api = ScriptedApi::default()
        .start(first_turn())
        .chat_error(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
        .chat(json!({ "message": "Where is the role based?" }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();

    let err = h.controller.send_text("Sous Chef").await.unwrap_err();
    assert!(matches!(err, ChatError::Api(_)));
    assert_eq!(h.controller.error(), Some("Service unavailable"));
    assert_eq!(h.controller.messages().len(), 1);
    assert!(h.controller.can_retry());
    assert_eq!(h.controller.state(), ChatState::Active);

    h.controller.retry().await.unwrap();

    let sent = h.api.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].client_message_id, sent[1].client_message_id);
    assert_eq!(h.controller.error(), None);
    assert!(!h.controller.can_retry());
    assert_eq!(h.controller.messages().len(), 3);
    assert!(matches!(h.controller.retry().await, Err(ChatError::NothingToRetry)));
}

#[tokio::test]
async fn test_refine_suggestion_flow() {
    let api = ScriptedApi::default()
        .start(first_turn())
        .chat(json!({
            "message": "Want to polish that title?",
            "refine_result": {
                "suggestions": [
                    { "value": "Sous Chef (French cuisine)", "explanation": "More specific" },
                    { "value": "Junior Sous Chef" }
                ],
                "can_proceed": true,
                "original_value": "sous chef",
                "reasoning": "Titles with a cuisine attract better matches"
            }
        }))
        .chat(json!({ "message": "Where is the role based?" }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();
    h.controller.send_text("sous chef").await.unwrap();

    assert_eq!(h.controller.state(), ChatState::AwaitingSuggestion);
    match h.controller.input_affordance() {
        InputAffordance::Suggestions { suggestions, original_value, .. } => {
            assert_eq!(suggestions.len(), 2);
            assert_eq!(original_value.as_deref(), Some("sous chef"));
        }
        other => panic!("expected suggestions, got {:?}", other),
    }

    assert!(matches!(
        h.controller.send_text("something else").await,
        Err(ChatError::SuggestionPending)
    ));
    assert!(matches!(h.controller.go_back().await, Err(ChatError::SuggestionPending)));
    assert!(matches!(
        h.controller.accept_suggestion(5).await,
        Err(ChatError::InvalidSuggestion(5))
    ));

    h.controller.accept_suggestion(0).await.unwrap();

    let sent = h.api.sent();
    let accepted = sent.last().unwrap();
    assert_eq!(accepted.refine_action, Some(RefineAction::AcceptSuggestion));
    assert_eq!(accepted.content.as_deref(), Some("Sous Chef (French cuisine)"));
    assert_eq!(h.controller.state(), ChatState::Active);
    assert!(h.controller.pending_refine().is_none());
}

#[tokio::test]
async fn test_keep_original_sends_original_without_echo() {
    let api = ScriptedApi::default()
        .start(first_turn())
        .chat(json!({
            "refine_result": {
                "suggestions": [{ "value": "Head Chef" }],
                "original_value": "chef de cuisine"
            }
        }))
        .chat(json!({ "message": "Where is the role based?" }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();
    h.controller.send_text("chef de cuisine").await.unwrap();
    let before = h.controller.messages().len();

    assert!(matches!(h.controller.keep_original().await, Ok(())));

    let kept = h.api.sent().pop().unwrap();
    assert_eq!(kept.refine_action, Some(RefineAction::KeepOriginal));
    assert_eq!(kept.content.as_deref(), Some("chef de cuisine"));
    assert!(kept.client_message_id.is_none());
    assert_eq!(h.controller.messages().len(), before + 1);
}

#[tokio::test]
async fn test_keep_original_without_any_answer_is_rejected() {
    let api = ScriptedApi::default().start(json!({
        "sessionId": "s-1",
        "message": "What's the job title?",
        "refine_result": { "suggestions": [{ "value": "Head Chef" }] }
    }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();
    assert_eq!(h.controller.state(), ChatState::AwaitingSuggestion);

    assert!(matches!(
        h.controller.keep_original().await,
        Err(ChatError::EmptyMessage)
    ));
    assert!(h.api.sent().is_empty());
    assert_eq!(h.controller.state(), ChatState::AwaitingSuggestion);
}

#[tokio::test]
async fn test_keep_original_requires_pending_refine() {
    let mut h = harness(ScriptedApi::default().start(first_turn()));
    h.controller.start().await.unwrap();
    assert!(matches!(
        h.controller.keep_original().await,
        Err(ChatError::NoPendingSuggestion)
    ));
}

#[tokio::test]
async fn test_validation_failure_surfaces_issue() {
    let api = ScriptedApi::default().start(first_turn()).chat(json!({
        "message": "What's the salary range?",
        "refine_result": { "can_proceed": false, "validation_issue": "Salary must be a number" }
    }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();
    h.controller.send_text("lots").await.unwrap();

    assert_eq!(h.controller.state(), ChatState::Active);
    assert_eq!(h.controller.error(), Some("Salary must be a number"));
    assert!(!h.controller.can_retry());
}

#[tokio::test]
async fn test_completion_forgets_session_and_clears_cache() {
    let api = ScriptedApi::default()
        .start(first_turn())
        .chat(json!({ "message": "Where is the role based?" }))
        .chat(json!({ "message": "All done!", "interview_phase": "complete", "completion_percentage": 100 }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();
    h.controller.send_text("Sous Chef").await.unwrap();
    assert!(h.persist.conversations().load(&cache_key("s-1")).is_some());

    h.controller.send_text("Lyon").await.unwrap();

    assert_eq!(h.controller.state(), ChatState::Complete);
    assert!(h.controller.is_complete());
    assert_eq!(h.controller.input_affordance(), InputAffordance::Disabled);
    assert!(h.persist.sessions().recall().is_none());
    assert!(h.persist.conversations().load(&cache_key("s-1")).is_none());
    assert_eq!(h.controller.messages().last().unwrap().content, "All done!");
    assert!(matches!(h.controller.send_text("more").await, Err(ChatError::Complete)));
}

#[tokio::test]
async fn test_resume_remembered_session_from_history() {
    let persist = PersistClient::new(Arc::new(MemoryStorage::new()));
    persist.sessions().remember("s-9");
    let stale = vec![ConversationMessage::assistant("cached question")];
    persist.conversations().save(&cache_key("s-9"), &stale, 1);

    let api = ScriptedApi::default()
        .status(json!({
            "sessionId": "s-9",
            "is_active": true,
            "interview_phase": "location",
            "completion_percentage": 40,
            "ui_tool": { "type": "location_picker", "props": {} }
        }))
        .history(json!({
            "sessionId": "s-9",
            "messages": [
                { "id": "m1", "role": "assistant", "content": "What's the job title?" },
                { "id": "m2", "role": "user", "content": "Sous Chef", "metadata": { "clientMessageId": "c-1" } },
                { "id": "m3", "role": "assistant", "content": "Where is the role based?" }
            ]
        }));
    let mut h = harness_with(api, persist);

    h.controller.start().await.unwrap();

    assert_eq!(*h.api.start_calls.lock().unwrap(), 0);
    assert_eq!(h.controller.session_id(), Some("s-9"));
    assert_eq!(h.controller.state(), ChatState::Active);
    assert_eq!(h.controller.completion_percentage(), 40.0);
    assert_eq!(h.controller.current_question(), Some("Where is the role based?"));
    assert_eq!(h.controller.messages()[1].id, "c-1");
    assert!(matches!(
        h.controller.input_affordance(),
        InputAffordance::Tool(tool) if tool.kind == ToolKind::LocationPicker
    ));

    let cached = h.persist.conversations().load(&cache_key("s-9")).unwrap();
    assert_eq!(cached.messages.len(), 3);
}

#[tokio::test]
async fn test_resume_keeps_cache_when_history_fails() {
    let persist = PersistClient::new(Arc::new(MemoryStorage::new()));
    persist.sessions().remember("s-9");
    let cached = vec![
        ConversationMessage::assistant("What's the job title?"),
        ConversationMessage::user("Sous Chef"),
    ];
    persist.conversations().save(&cache_key("s-9"), &cached, 1);

    let api = ScriptedApi::default()
        .status(json!({ "sessionId": "s-9", "is_active": true }))
        .history_error(StatusCode::INTERNAL_SERVER_ERROR);
    let mut h = harness_with(api, persist);

    h.controller.start().await.unwrap();

    assert_eq!(h.controller.messages().len(), 2);
    assert_eq!(h.controller.current_question(), Some("What's the job title?"));
}

#[tokio::test]
async fn test_inactive_session_is_forgotten_and_replaced() {
    let persist = PersistClient::new(Arc::new(MemoryStorage::new()));
    persist.sessions().remember("old");
    persist
        .conversations()
        .save(&cache_key("old"), &[ConversationMessage::assistant("old question")], 1);

    let api = ScriptedApi::default()
        .status(json!({ "sessionId": "old", "is_active": false }))
        .start(first_turn());
    let mut h = harness_with(api, persist);

    h.controller.start().await.unwrap();

    assert_eq!(h.controller.session_id(), Some("s-1"));
    assert_eq!(h.persist.sessions().recall().as_deref(), Some("s-1"));
    assert!(h.persist.conversations().load(&cache_key("old")).is_none());
    assert_eq!(h.controller.messages().len(), 1);
}

#[tokio::test]
async fn test_missing_session_starts_fresh() {
    let api = ScriptedApi::default()
        .status_error(StatusCode::NOT_FOUND, "Session not found")
        .start(first_turn());
    let api = Arc::new(api);
    let mut controller = InterviewController::builder()
        .api(api.clone())
        .session_from_url("https://app.example.com/interview?session=gone")
        .build()
        .unwrap();

    controller.start().await.unwrap();

    assert_eq!(controller.session_id(), Some("s-1"));
    assert_eq!(*api.start_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_start_failure_can_be_retried() {
    let api = ScriptedApi::default();
    api.starts
        .lock()
        .unwrap()
        .push_back(Err(api_error(StatusCode::BAD_GATEWAY, "")));
    let mut h = harness(api.start(first_turn()));

    assert!(h.controller.start().await.is_err());
    assert_eq!(h.controller.state(), ChatState::Initializing);
    assert_eq!(
        h.controller.error(),
        Some("The interview service returned 502 Bad Gateway")
    );

    h.controller.retry().await.unwrap();
    assert_eq!(h.controller.state(), ChatState::Active);
    assert_eq!(h.controller.error(), None);
}

#[tokio::test]
async fn test_navigation_back_prefills_previous_answer() {
    let api = ScriptedApi::default()
        .start(json!({
            "sessionId": "s-1",
            "message": "What's the salary range?",
            "navigation": { "currentIndex": 2, "maxIndex": 2, "canGoBack": true, "canGoForward": false }
        }))
        .navigate(json!({
            "message": "Where is the role based?",
            "navigation": { "currentIndex": 1, "maxIndex": 2, "canGoBack": true, "canGoForward": true, "isEditing": true },
            "previous_response": { "content": "Lyon" }
        }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();

    assert!(matches!(h.controller.go_forward().await, Err(ChatError::Navigation(_))));
    assert!(matches!(h.controller.navigate_to(5).await, Err(ChatError::Navigation(_))));
    assert!(h.api.navigated.lock().unwrap().is_empty());

    h.controller.go_back().await.unwrap();

    assert_eq!(h.api.navigated.lock().unwrap()[0].target_index, 1);
    assert_eq!(h.controller.current_question(), Some("Where is the role based?"));
    assert!(h.controller.navigation().unwrap().is_editing);
    assert_eq!(
        h.controller.input_affordance(),
        InputAffordance::FreeText { prefill: Some("Lyon".to_string()) }
    );
    // Revisiting a turn does not duplicate the question in the transcript
    assert_eq!(h.controller.messages().len(), 1);
}

#[tokio::test]
async fn test_go_back_without_navigation_uses_turn_summary() {
    let api = ScriptedApi::default()
        .start(first_turn())
        .summary(json!({
            "sessionId": "s-1",
            "turns": [{ "index": 0 }, { "index": 1 }],
            "current_index": 1
        }))
        .navigate(json!({ "message": "What's the job title?" }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();

    h.controller.go_back().await.unwrap();

    assert_eq!(h.api.navigated.lock().unwrap()[0].target_index, 0);
}

#[tokio::test]
async fn test_unknown_tool_degrades_to_notice() {
    let api = ScriptedApi::default().start(json!({
        "sessionId": "s-1",
        "message": "Draw the office layout",
        "ui_tool": { "type": "floor_plan", "props": {} }
    }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();

    assert_eq!(
        h.controller.input_affordance(),
        InputAffordance::UnknownTool {
            tool_type: "floor_plan".to_string(),
            notice: "Unknown input type: floor_plan".to_string(),
        }
    );
}

#[tokio::test]
async fn test_ui_response_echo_uses_display_text() {
    let api = ScriptedApi::default()
        .start(json!({
            "sessionId": "s-1",
            "message": "Salary range?",
            "ui_tool": { "type": "range_slider", "props": { "min": 0 } }
        }))
        .chat(json!({ "message": "Benefits?" }));
    let mut h = harness(api);
    h.controller.start().await.unwrap();

    h.controller.send_ui_response(json!([40000, 60000])).await.unwrap();

    assert_eq!(h.api.sent()[0].ui_response, Some(json!([40000, 60000])));
    assert_eq!(h.controller.messages()[1].content, "40000, 60000");
    assert!(matches!(
        h.controller.send_ui_response(Value::Null).await,
        Err(ChatError::EmptyMessage)
    ));
}

#[tokio::test]
async fn test_operations_before_start_are_rejected() {
    let mut h = harness(ScriptedApi::default());
    assert!(matches!(h.controller.send_text("hi").await, Err(ChatError::NotStarted)));
    assert!(matches!(h.controller.go_back().await, Err(ChatError::NotStarted)));
    assert!(matches!(h.controller.job_preview().await, Err(ChatError::NotStarted)));
}

#[test]
fn test_builder_requires_api() {
    let result = InterviewController::builder().build();
    assert!(matches!(result, Err(ChatError::Config(_))));
}
