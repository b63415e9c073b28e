use std::collections::HashMap;

use interview_types::UiTool;
use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::{ChatError, Result};

/// Widget families the client knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    TextInput,
    TextArea,
    SingleSelect,
    MultiSelect,
    ChipCloud,
    Slider,
    RangeSlider,
    Toggle,
    NumberInput,
    DatePicker,
    LocationPicker,
    TagInput,
}

impl ToolKind {
    fn builtin() -> &'static [(&'static str, ToolKind)] {
        &[
            ("text_input", ToolKind::TextInput),
            ("textarea", ToolKind::TextArea),
            ("single_select", ToolKind::SingleSelect),
            ("multi_select", ToolKind::MultiSelect),
            ("chip_cloud", ToolKind::ChipCloud),
            ("slider", ToolKind::Slider),
            ("range_slider", ToolKind::RangeSlider),
            ("toggle", ToolKind::Toggle),
            ("number_input", ToolKind::NumberInput),
            ("date_picker", ToolKind::DatePicker),
            ("location_picker", ToolKind::LocationPicker),
            ("tag_input", ToolKind::TagInput),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOption {
    pub value: Value,
    pub label: String,
}

/// A server tool descriptor matched to a known widget, with its props pulled out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTool {
    pub kind: ToolKind,
    pub tool_type: String,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub options: Vec<ToolOption>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub unit: Option<String>,
    pub max_selections: Option<usize>,
    /// Earlier answer to prefill when revisiting a turn
    pub initial_value: Option<Value>,
    pub props: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolResolution {
    Known(ResolvedTool),
    Unknown { tool_type: String, notice: String },
}

/// Maps tool `type` strings to widget kinds
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    kinds: HashMap<String, ToolKind>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let kinds = ToolKind::builtin()
            .iter()
            .map(|(name, kind)| (name.to_string(), *kind))
            .collect();
        Self { kinds }
    }

    /// Register an alias, e.g. a tool type a newer backend sends
    pub fn register(&mut self, tool_type: impl Into<String>, kind: ToolKind) {
        self.kinds.insert(tool_type.into().to_lowercase(), kind);
    }

    pub fn kind_of(&self, tool_type: &str) -> Option<ToolKind> {
        self.kinds.get(&tool_type.trim().to_lowercase()).copied()
    }

    pub fn resolve(&self, tool: &UiTool) -> ToolResolution {
        let Some(kind) = self.kind_of(&tool.tool_type) else {
            tracing::warn!("Unknown UI tool type: {}", tool.tool_type);
            return ToolResolution::Unknown {
                tool_type: tool.tool_type.clone(),
                notice: format!("Unknown input type: {}", tool.tool_type),
            };
        };

        let number = |key: &str| tool.prop(key).and_then(Value::as_f64);

        ToolResolution::Known(ResolvedTool {
            kind,
            tool_type: tool.tool_type.clone(),
            label: tool.prop_str("label").or_else(|| tool.prop_str("title")).map(str::to_string),
            placeholder: tool.prop_str("placeholder").map(str::to_string),
            options: tool.prop("options").map(parse_options).unwrap_or_default(),
            min: number("min"),
            max: number("max"),
            step: number("step"),
            unit: tool.prop_str("unit").map(str::to_string),
            max_selections: tool
                .prop("max_selections")
                .and_then(Value::as_u64)
                .map(|n| n as usize),
            initial_value: None,
            props: tool.props.clone(),
        })
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Options come as plain strings or `{value, label}` objects
fn parse_options(raw: &Value) -> Vec<ToolOption> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(ToolOption {
                value: item.clone(),
                label: s.clone(),
            }),
            Value::Object(map) => {
                let value = map.get("value").or_else(|| map.get("id")).cloned()?;
                let label = map
                    .get("label")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| plain(&value));
                Some(ToolOption { value, label })
            }
            Value::Number(_) | Value::Bool(_) => Some(ToolOption {
                value: item.clone(),
                label: item.to_string(),
            }),
            Value::Null | Value::Array(_) => None,
        })
        .collect()
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ResolvedTool {
    pub fn with_initial_value(mut self, value: Option<Value>) -> Self {
        self.initial_value = value;
        self
    }

    /// Turn a line of terminal input into the `ui_response` this widget would send
    pub fn parse_input(&self, input: &str) -> Result<Value> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        match self.kind {
            ToolKind::TextInput
            | ToolKind::TextArea
            | ToolKind::DatePicker
            | ToolKind::LocationPicker => Ok(Value::String(input.to_string())),
            ToolKind::NumberInput | ToolKind::Slider => {
                let n = self.parse_number(input)?;
                number_value(n)
            }
            ToolKind::RangeSlider => {
                let (low, high) = split_range(input)
                    .ok_or_else(|| invalid("Enter a range like 40000-60000"))?;
                let (low, high) = (self.parse_number(low)?, self.parse_number(high)?);
                if low > high {
                    return Err(invalid("The lower bound must not exceed the upper bound"));
                }
                Ok(Value::Array(vec![number_value(low)?, number_value(high)?]))
            }
            ToolKind::Toggle => parse_bool(input)
                .map(Value::Bool)
                .ok_or_else(|| invalid("Answer yes or no")),
            ToolKind::SingleSelect => self.pick_option(input),
            ToolKind::MultiSelect | ToolKind::ChipCloud => {
                let picked = list_items(input)
                    .map(|item| self.pick_option(item))
                    .collect::<Result<Vec<_>>>()?;
                if let Some(limit) = self.max_selections {
                    if picked.len() > limit {
                        return Err(invalid(&format!("Choose at most {} options", limit)));
                    }
                }
                Ok(Value::Array(picked))
            }
            ToolKind::TagInput => Ok(Value::Array(
                list_items(input).map(|t| Value::String(t.to_string())).collect(),
            )),
        }
    }

    fn parse_number(&self, raw: &str) -> Result<f64> {
        let cleaned: String = raw.chars().filter(|c| !matches!(c, ',' | '_' | ' ')).collect();
        let n: f64 = cleaned
            .parse()
            .map_err(|_| invalid(&format!("'{}' is not a number", raw.trim())))?;

        if let Some(min) = self.min.filter(|min| n < *min) {
            return Err(invalid(&format!("Must be at least {}", min)));
        }
        if let Some(max) = self.max.filter(|max| n > *max) {
            return Err(invalid(&format!("Must be at most {}", max)));
        }
        Ok(n)
    }

    /// 1-based index, or an option label/value
    fn pick_option(&self, raw: &str) -> Result<Value> {
        if self.options.is_empty() {
            return Ok(Value::String(raw.to_string()));
        }

        if let Ok(index) = raw.parse::<usize>() {
            if let Some(option) = index.checked_sub(1).and_then(|i| self.options.get(i)) {
                return Ok(option.value.clone());
            }
        }

        self.options
            .iter()
            .find(|o| o.label.eq_ignore_ascii_case(raw) || plain(&o.value).eq_ignore_ascii_case(raw))
            .map(|o| o.value.clone())
            .ok_or_else(|| invalid(&format!("'{}' is not one of the options", raw)))
    }
}

fn invalid(message: &str) -> ChatError {
    ChatError::InvalidInput(message.to_string())
}

fn number_value(n: f64) -> Result<Value> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Ok(Value::from(n as i64));
    }
    Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| invalid("Not a finite number"))
}

fn split_range(input: &str) -> Option<(&str, &str)> {
    ["..", " to ", "-", ","]
        .iter()
        .find_map(|sep| input.split_once(sep))
        .filter(|(low, high)| !low.trim().is_empty() && !high.trim().is_empty())
}

fn list_items(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "y" | "yes" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(tool_type: &str, props: Value) -> ResolvedTool {
        match ToolRegistry::new().resolve(&UiTool::new(tool_type, props)) {
            ToolResolution::Known(tool) => tool,
            other => panic!("expected known tool, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_yields_notice() {
        let resolution = ToolRegistry::new().resolve(&UiTool::new("hologram", json!({})));
        assert_eq!(
            resolution,
            ToolResolution::Unknown {
                tool_type: "hologram".to_string(),
                notice: "Unknown input type: hologram".to_string(),
            }
        );
    }

    #[test]
    fn test_registered_alias_resolves() {
        let mut registry = ToolRegistry::new();
        registry.register("Currency_Input", ToolKind::NumberInput);
        assert_eq!(registry.kind_of("currency_input"), Some(ToolKind::NumberInput));
    }

    #[test]
    fn test_options_accept_strings_and_objects() {
        let tool = resolve(
            "single_select",
            json!({ "label": "Seniority", "options": ["Junior", { "value": "sr", "label": "Senior" }, null] }),
        );
        assert_eq!(tool.label.as_deref(), Some("Seniority"));
        assert_eq!(tool.options.len(), 2);
        assert_eq!(tool.parse_input("2").unwrap(), json!("sr"));
        assert_eq!(tool.parse_input("junior").unwrap(), json!("Junior"));
        assert!(tool.parse_input("Principal").is_err());
    }

    #[test]
    fn test_slider_respects_bounds() {
        let tool = resolve("slider", json!({ "min": 0, "max": 10 }));
        assert_eq!(tool.parse_input("7").unwrap(), json!(7));
        assert_eq!(tool.parse_input("2.5").unwrap(), json!(2.5));
        assert!(matches!(tool.parse_input("11"), Err(ChatError::InvalidInput(_))));
    }

    #[test]
    fn test_range_slider_parses_pairs() {
        let tool = resolve("range_slider", json!({ "min": 0 }));
        assert_eq!(tool.parse_input("40,000 - 60,000").unwrap(), json!([40000, 60000]));
        assert_eq!(tool.parse_input("10..20").unwrap(), json!([10, 20]));
        assert!(tool.parse_input("60-40").is_err());
    }

    #[test]
    fn test_multi_select_limit_and_tags() {
        let tool = resolve("multi_select", json!({ "options": ["a", "b", "c"], "max_selections": 2 }));
        assert_eq!(tool.parse_input("1, c").unwrap(), json!(["a", "c"]));
        assert!(tool.parse_input("a,b,c").is_err());

        let tags = resolve("tag_input", json!({}));
        assert_eq!(tags.parse_input("rust, , tokio").unwrap(), json!(["rust", "tokio"]));
    }

    #[test]
    fn test_toggle_and_empty_input() {
        let tool = resolve("toggle", json!({}));
        assert_eq!(tool.parse_input("Yes").unwrap(), json!(true));
        assert!(matches!(tool.parse_input("   "), Err(ChatError::EmptyMessage)));
    }
}
