use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generated ad creative as returned by the backend.
///
/// Every field is optional; `content` is free-form and renderers search it
/// for whatever text and media they can find.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeAsset {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub artifact_type: Option<String>,
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub content: Value,
}

impl CreativeAsset {
    /// Non-empty string field of `content`
    pub fn content_str(&self, key: &str) -> Option<&str> {
        self.content
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// First non-empty string among `keys`, in order
    pub fn first_content_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.content_str(key))
    }
}
