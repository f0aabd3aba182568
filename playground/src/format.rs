use serde_json::{Value, json};

/// State of the evaluation engine from the playground's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Re-serialize `raw` as two-space indented JSON, or `None` when it is not JSON.
pub fn pretty_json(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    Some(format!("{:#}", value))
}

/// Pretty JSON when `raw` parses, otherwise `raw` as a JSON string literal.
pub fn format_json_like(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    pretty_json(trimmed).unwrap_or_else(|| Value::String(trimmed.to_string()).to_string())
}

/// Text shown in the read-only output pane of a playground row.
pub fn build_output_doc(status: &EngineStatus, error: Option<&str>, output: &str) -> String {
    match (status, error) {
        (EngineStatus::Failed(message), _) => format!("{:#}", json!({ "error": message })),
        (EngineStatus::Loading, _) => format!("{:#}", json!({ "status": "loading" })),
        (EngineStatus::Ready, Some(error)) => format!("{:#}", json!({ "error": error })),
        (EngineStatus::Ready, None) => format_json_like(output),
    }
}
