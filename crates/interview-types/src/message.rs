use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Chat message shown in the interview transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<MessageTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
}

/// Quick-reply button offered alongside an assistant message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// Message timestamp as it travels through the client.
///
/// Timestamps arrive either already parsed or as strings that may or may not
/// be valid ISO-8601. Unparsable strings are kept verbatim so they survive a
/// cache round trip untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTimestamp {
    At(DateTime<Utc>),
    Raw(String),
}

impl MessageTimestamp {
    pub fn now() -> Self {
        Self::At(Utc::now())
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self::At)
    }

    /// Parse an ISO-8601 string, keeping it raw when it does not parse
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(dt) => Self::At(dt.with_timezone(&Utc)),
            Err(_) => Self::Raw(raw),
        }
    }

    /// Milliseconds since the epoch, if this timestamp can be interpreted
    pub fn millis(&self) -> Option<i64> {
        match self {
            Self::At(dt) => Some(dt.timestamp_millis()),
            Self::Raw(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|dt| dt.timestamp_millis()),
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(dt) => Some(*dt),
            Self::Raw(_) => None,
        }
    }

    /// ISO-8601 form for storage; raw strings pass through unchanged
    pub fn to_iso_string(&self) -> String {
        match self {
            Self::At(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

impl From<DateTime<Utc>> for MessageTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::At(dt)
    }
}

impl Serialize for MessageTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for MessageTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Millis(i64),
            Float(f64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Millis(ms) => Ok(Self::from_millis(ms).unwrap_or_else(|| Self::Raw(ms.to_string()))),
            Wire::Float(ms) if ms.is_finite() => Ok(Self::from_millis(ms as i64)
                .unwrap_or_else(|| Self::Raw(ms.to_string()))),
            Wire::Float(ms) => Ok(Self::Raw(ms.to_string())),
            Wire::Text(text) => Ok(Self::parse(text)),
        }
    }
}

impl ConversationMessage {
    pub fn new(id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            created_at: Some(MessageTimestamp::now()),
            metadata: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), MessageRole::Assistant, content)
    }

    /// Optimistic local echo of something the user just submitted.
    ///
    /// The generated id doubles as `metadata.clientMessageId` so the
    /// server-confirmed copy can replace it in place.
    pub fn local_echo(content: impl Into<String>) -> Self {
        let client_id = uuid::Uuid::new_v4().to_string();
        Self {
            id: client_id.clone(),
            role: MessageRole::User,
            content: content.into(),
            created_at: Some(MessageTimestamp::now()),
            metadata: Some(MessageMetadata {
                client_message_id: Some(client_id),
                actions: None,
            }),
        }
    }

    pub fn with_created_at(mut self, created_at: Option<MessageTimestamp>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn client_message_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.client_message_id.as_deref())
    }

    pub fn actions(&self) -> &[Action] {
        self.metadata
            .as_ref()
            .and_then(|m| m.actions.as_deref())
            .unwrap_or(&[])
    }
}
