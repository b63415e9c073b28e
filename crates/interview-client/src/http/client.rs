// HTTP implementation of the interview API

use std::time::Duration;

use async_trait::async_trait;
use interview_types::{
    HistoryResponse, InterviewSchema, NavigateRequest, SendMessageRequest, SessionStatus,
    StartSessionRequest, TurnResponse, TurnsSummary,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::error::{ClientError, Result};
use crate::traits::InterviewApi;

const API_PREFIX: &str = "golden-interview";

/// Interview backend client (reqwest, bearer auth)
#[derive(Debug, Clone)]
pub struct HttpInterviewClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpInterviewClient {
    pub fn builder() -> HttpInterviewClientBuilder {
        HttpInterviewClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/golden-interview/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("Base URL cannot have a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);

        let response = self.http_client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!("POST {}", url);

        let response = self.http_client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!("Interview API request failed: status={}, body={}", status, body);
            return Err(ClientError::Api { status, message });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Pull the `error` field out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Default)]
pub struct HttpInterviewClientBuilder {
    base_url: Option<String>,
    api_token: Option<String>,
    timeout: Option<Duration>,
}

impl HttpInterviewClientBuilder {
    /// Backend root, e.g. "https://api.example.com/api"
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpInterviewClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Config("Base URL is required".to_string()))?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("Base URL cannot have a path: {}", base_url)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.api_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ClientError::Config("Invalid API token format".to_string()))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
            .build()?;

        Ok(HttpInterviewClient {
            http_client,
            base_url,
        })
    }
}

// ============================================================================
// TRAIT IMPLEMENTATION
// ============================================================================

#[async_trait]
impl InterviewApi for HttpInterviewClient {
    async fn start_session(&self, request: StartSessionRequest) -> Result<TurnResponse> {
        self.post_json(&["start"], &request).await
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<TurnResponse> {
        self.post_json(&["chat"], &request).await
    }

    async fn navigate_to_turn(&self, request: NavigateRequest) -> Result<TurnResponse> {
        self.post_json(&["navigate"], &request).await
    }

    async fn get_session_status(&self, session_id: &str) -> Result<SessionStatus> {
        self.get_json(&["session", session_id]).await
    }

    async fn get_turns_summary(&self, session_id: &str) -> Result<TurnsSummary> {
        self.get_json(&["session", session_id, "turns"]).await
    }

    async fn get_schema(&self) -> Result<InterviewSchema> {
        self.get_json(&["schema"]).await
    }

    async fn get_history(&self, session_id: &str) -> Result<HistoryResponse> {
        self.get_json(&["session", session_id, "history"]).await
    }
}
