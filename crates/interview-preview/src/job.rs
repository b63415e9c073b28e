use std::fmt;

use interview_types::SessionStatus;
use serde::Serialize;
use serde_json::Value;

/// Fields rendered in the header of the preview, in this order
const HEADER_FIELDS: &[&str] = &[
    "job_title",
    "company_name",
    "location",
    "employment_type",
    "salary_range",
    "description",
];

/// Job posting as collected so far, for the preview pane
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobPreview {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    /// Remaining collected fields, sorted by key
    pub other_fields: Vec<JobPreviewField>,
    pub completion_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPreviewField {
    pub key: String,
    pub value: String,
}

impl JobPreview {
    pub fn from_collected(collected: &Value) -> Self {
        let text = |key: &str| collected.get(key).and_then(display_value);

        let mut other_fields: Vec<JobPreviewField> = collected
            .as_object()
            .map(|map| {
                map.iter()
                    .filter(|(key, _)| !HEADER_FIELDS.contains(&key.as_str()))
                    .filter_map(|(key, value)| {
                        display_value(value).map(|value| JobPreviewField {
                            key: key.clone(),
                            value,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        other_fields.sort_by(|a, b| a.key.cmp(&b.key));

        Self {
            title: text("job_title"),
            company: text("company_name"),
            location: text("location"),
            employment_type: text("employment_type"),
            salary: collected.get("salary_range").and_then(salary_text),
            description: text("description"),
            other_fields,
            completion_percentage: None,
        }
    }

    pub fn from_status(status: &SessionStatus) -> Self {
        Self {
            completion_percentage: status.completion_percentage,
            ..Self::from_collected(&status.collected_data)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.company.is_none()
            && self.location.is_none()
            && self.employment_type.is_none()
            && self.salary.is_none()
            && self.description.is_none()
            && self.other_fields.is_empty()
    }
}

/// Human-readable form of a collected value; `None` for empty values
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(display_value).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

/// `{min, max, currency}` or a preformatted string
fn salary_text(value: &Value) -> Option<String> {
    let Some(range) = value.as_object() else {
        return display_value(value);
    };

    let currency = range.get("currency").and_then(Value::as_str).unwrap_or("");
    let amount = |key: &str| range.get(key).and_then(Value::as_f64).map(|n| format!("{}", n));

    let text = match (amount("min"), amount("max")) {
        (Some(min), Some(max)) => format!("{}–{}", min, max),
        (Some(min), None) => format!("from {}", min),
        (None, Some(max)) => format!("up to {}", max),
        (None, None) => return None,
    };

    Some(if currency.is_empty() { text } else { format!("{} {}", text, currency) })
}

impl fmt::Display for JobPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title.as_deref().unwrap_or("Untitled role"))?;

        let subtitle: Vec<&str> = [&self.company, &self.location, &self.employment_type]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect();
        if !subtitle.is_empty() {
            writeln!(f, "{}", subtitle.join(" · "))?;
        }
        if let Some(salary) = &self.salary {
            writeln!(f, "Salary: {}", salary)?;
        }
        if let Some(description) = &self.description {
            writeln!(f, "\n{}", description)?;
        }
        for field in &self.other_fields {
            writeln!(f, "{}: {}", field.key, field.value)?;
        }
        if let Some(pct) = self.completion_percentage {
            write!(f, "({:.0}% complete)", pct)?;
        }
        Ok(())
    }
}
