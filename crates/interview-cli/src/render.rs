use interview_chat::{InputAffordance, InterviewController, ResolvedTool, ToolKind};
use interview_types::{ConversationMessage, MessageRole};
use serde_json::Value;

pub fn render_message(message: &ConversationMessage) -> String {
    let speaker = match message.role {
        MessageRole::User => "You",
        MessageRole::Assistant => "Interviewer",
        MessageRole::System => "System",
    };
    let mut text = format!("{}: {}", speaker, message.content);
    let actions = message.actions();
    if !actions.is_empty() {
        let labels: Vec<String> = actions.iter().map(|a| format!("[{}]", a.label)).collect();
        text.push_str(&format!("\n  {}", labels.join(" ")));
    }
    text
}

/// Progress line plus any context the server sent
pub fn render_status(controller: &InterviewController) -> String {
    let mut parts = Vec::new();
    if let Some(phase) = controller.interview_phase() {
        parts.push(format!("[{}]", phase));
    }
    parts.push(format!("{:.0}%", controller.completion_percentage()));
    if let Some(field) = controller.currently_asking_field() {
        parts.push(format!("asking: {}", field));
    }
    if let Some(nav) = controller.navigation().filter(|nav| nav.is_editing) {
        parts.push(format!("editing {}/{}", nav.current_index + 1, nav.max_index + 1));
    }

    let mut text = parts.join(" · ");
    if let Some(context) = controller.context_explanation() {
        text.push_str(&format!("\n({})", context));
    }
    text
}

pub fn render_error(controller: &InterviewController) -> Option<String> {
    controller.error().map(|error| {
        if controller.can_retry() {
            format!("! {} (type :retry to try again)", error)
        } else {
            format!("! {}", error)
        }
    })
}

/// Hint shown above the prompt for the current input
pub fn render_affordance(affordance: &InputAffordance) -> String {
    match affordance {
        InputAffordance::Disabled => String::new(),
        InputAffordance::FreeText { prefill: Some(prefill) } => {
            format!("Previously: {} (Enter a new answer to change it)", prefill)
        }
        InputAffordance::FreeText { prefill: None } => String::new(),
        InputAffordance::Tool(tool) => render_tool(tool),
        InputAffordance::UnknownTool { notice, .. } => {
            format!("{} (answer in free text)", notice)
        }
        InputAffordance::Suggestions {
            suggestions,
            original_value,
            reasoning,
        } => {
            let mut lines = Vec::new();
            if let Some(reasoning) = reasoning {
                lines.push(reasoning.clone());
            }
            for (i, suggestion) in suggestions.iter().enumerate() {
                match &suggestion.explanation {
                    Some(why) => lines.push(format!("  {}. {} ({})", i + 1, suggestion.value, why)),
                    None => lines.push(format!("  {}. {}", i + 1, suggestion.value)),
                }
            }
            match original_value {
                Some(original) => lines.push(format!(":accept N to use a suggestion, :keep to keep \"{}\"", original)),
                None => lines.push(":accept N to use a suggestion, :keep to keep your answer".to_string()),
            }
            lines.join("\n")
        }
    }
}

fn render_tool(tool: &ResolvedTool) -> String {
    let mut lines = Vec::new();
    if let Some(label) = &tool.label {
        lines.push(label.clone());
    }

    match tool.kind {
        ToolKind::SingleSelect | ToolKind::MultiSelect | ToolKind::ChipCloud => {
            for (i, option) in tool.options.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, option.label));
            }
            if tool.kind != ToolKind::SingleSelect {
                lines.push("Pick one or more, separated by commas".to_string());
            }
        }
        ToolKind::Slider | ToolKind::NumberInput | ToolKind::RangeSlider => {
            let bound = |b: Option<f64>| b.map(|n| n.to_string()).unwrap_or_else(|| "…".to_string());
            let unit = tool.unit.as_deref().map(|u| format!(" {}", u)).unwrap_or_default();
            let shape = if tool.kind == ToolKind::RangeSlider { "min-max, " } else { "" };
            lines.push(format!("Enter {}between {} and {}{}", shape, bound(tool.min), bound(tool.max), unit));
        }
        ToolKind::Toggle => lines.push("yes / no".to_string()),
        ToolKind::TagInput => lines.push("Comma-separated tags".to_string()),
        ToolKind::DatePicker => lines.push("Date (YYYY-MM-DD)".to_string()),
        ToolKind::TextInput | ToolKind::TextArea | ToolKind::LocationPicker => {}
    }

    if let Some(placeholder) = &tool.placeholder {
        lines.push(format!("e.g. {}", placeholder));
    }
    if let Some(initial) = &tool.initial_value {
        lines.push(format!("Previously: {}", plain(initial)));
    }
    lines.join("\n")
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
