use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-described dynamic input widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    #[serde(default)]
    pub props: Value,
}

impl UiTool {
    pub fn new(tool_type: impl Into<String>, props: Value) -> Self {
        Self {
            tool_type: tool_type.into(),
            props,
        }
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.prop(key).and_then(Value::as_str)
    }
}
