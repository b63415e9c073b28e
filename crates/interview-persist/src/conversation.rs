//! Conversation cache
//!
//! Keeps the visible transcript of an interview in storage so a restart can
//! redraw it before the backend answers. The backend stays the record of
//! truth: every storage failure is logged and turned into a cache miss.

use std::sync::Arc;

use chrono::Utc;
use interview_types::{ConversationMessage, MessageMetadata, MessageRole, MessageTimestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::storage::KeyValueStorage;

pub const CONVERSATION_CACHE_PREFIX: &str = "golden_interview_conversation";

/// Storage key for the transcript of one session or job
pub fn cache_key(scope_id: &str) -> String {
    format!("{}:{}", CONVERSATION_CACHE_PREFIX, scope_id)
}

/// Storable form of a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachePayload {
    pub version: i64,
    pub messages: Vec<StoredMessage>,
}

/// Message with its timestamp flattened to a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

/// Transcript read back from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct CachedConversation {
    pub messages: Vec<ConversationMessage>,
    pub version: i64,
}

/// Newest message timestamp in epoch milliseconds.
///
/// 0 for an empty list. Unparsable timestamps are skipped; if none is
/// usable the current time is returned.
pub fn derive_version(messages: &[ConversationMessage]) -> i64 {
    if messages.is_empty() {
        return 0;
    }

    messages
        .iter()
        .filter_map(|m| m.created_at.as_ref().and_then(MessageTimestamp::millis))
        .max()
        .unwrap_or_else(|| Utc::now().timestamp_millis())
}

/// Give user messages their client-generated id back
pub fn apply_client_message_ids(messages: &[ConversationMessage]) -> Vec<ConversationMessage> {
    messages
        .iter()
        .map(|message| match (message.role, message.client_message_id()) {
            (MessageRole::User, Some(client_id)) => ConversationMessage {
                id: client_id.to_string(),
                ..message.clone()
            },
            _ => message.clone(),
        })
        .collect()
}

pub fn serialize(messages: &[ConversationMessage], version: i64) -> CachePayload {
    CachePayload {
        version,
        messages: messages
            .iter()
            .map(|m| StoredMessage {
                id: m.id.clone(),
                role: m.role,
                content: m.content.clone(),
                created_at: m.created_at.as_ref().map(MessageTimestamp::to_iso_string),
                metadata: m.metadata.clone(),
            })
            .collect(),
    }
}

/// Decode a stored payload.
///
/// Returns `None` when there is no payload or its `messages` is not a list.
/// Entries that are not message-shaped are dropped.
pub fn deserialize(payload: Option<&Value>) -> Option<CachedConversation> {
    let payload = payload?;
    let entries = payload.get("messages")?.as_array()?;

    let messages: Vec<ConversationMessage> = entries
        .iter()
        .filter_map(|entry| match StoredMessage::deserialize(entry) {
            Ok(stored) => Some(ConversationMessage {
                id: stored.id,
                role: stored.role,
                content: stored.content,
                created_at: stored.created_at.map(MessageTimestamp::parse),
                metadata: stored.metadata,
            }),
            Err(e) => {
                tracing::debug!("Skipping malformed cached message: {}", e);
                None
            }
        })
        .collect();

    let version = match payload.get("version").and_then(Value::as_f64) {
        Some(v) if v.is_finite() => v as i64,
        _ => derive_version(&messages),
    };

    Some(CachedConversation { messages, version })
}

/// Put a server-confirmed message into the transcript.
///
/// A local echo carrying the same client id (or an entry with the same id)
/// is replaced at its current position; otherwise the message is appended.
pub fn upsert_confirmed(messages: &mut Vec<ConversationMessage>, confirmed: ConversationMessage) {
    let client_id = confirmed.client_message_id().map(str::to_string);

    let position = messages.iter().position(|existing| {
        existing.id == confirmed.id
            || client_id.as_deref().is_some_and(|cid| {
                existing.id == cid || existing.client_message_id() == Some(cid)
            })
    });

    match position {
        Some(idx) => messages[idx] = confirmed,
        None => messages.push(confirmed),
    }
}

/// Best-effort transcript cache on top of a [`KeyValueStorage`]
#[derive(Clone)]
pub struct ConversationCache {
    storage: Arc<dyn KeyValueStorage>,
}

impl ConversationCache {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn try_load(&self, key: &str) -> Result<Option<CachedConversation>> {
        let Some(raw) = self.storage.get_item(key)? else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&raw)?;
        Ok(deserialize(Some(&value)))
    }

    /// Read a transcript; any failure is a miss
    pub fn load(&self, key: &str) -> Option<CachedConversation> {
        match self.try_load(key) {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Conversation cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    pub fn try_save(&self, key: &str, messages: &[ConversationMessage], version: i64) -> Result<()> {
        let payload = serialize(messages, version);
        let raw = serde_json::to_string(&payload)?;
        self.storage.set_item(key, &raw)
    }

    /// Write a transcript; failures are logged and dropped
    pub fn save(&self, key: &str, messages: &[ConversationMessage], version: i64) {
        if let Err(e) = self.try_save(key, messages, version) {
            tracing::warn!("Conversation cache write failed for {}: {}", key, e);
        }
    }

    pub fn clear(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            tracing::warn!("Conversation cache clear failed for {}: {}", key, e);
        }
    }
}
