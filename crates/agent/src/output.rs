//! Headless agent output: JSON result documents and stream-json events.
//!
//! Both formats are loosely specified by the agent CLIs, so events are kept
//! as `serde_json::Value` and only the fields we summarize are read.

use serde_json::{json, Value};

/// Characters of assistant content shown per stream event.
const ASSISTANT_PREVIEW_CHARS: usize = 100;

/// Parse one stream-json line.
///
/// Blank lines yield `None`; malformed lines yield `Some(Err(_))`.
pub fn parse_stream_line(line: &str) -> Option<Result<Value, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Human-readable lines describing one stream event, for stderr.
pub fn describe_event(event: &Value) -> Vec<String> {
    let kind = event.get("type").and_then(Value::as_str);
    let subtype = event.get("subtype").and_then(Value::as_str);

    match (kind, subtype) {
        (Some("system"), Some("init")) => vec![format!(
            "Session started: {}",
            event.get("session_id").map(display_value).unwrap_or_default()
        )],
        (Some("assistant"), _) => {
            let content = event
                .get("message")
                .and_then(|m| m.get("content"))
                .and_then(Value::as_str)
                .unwrap_or("");
            let preview: String = content.chars().take(ASSISTANT_PREVIEW_CHARS).collect();
            vec![format!("Assistant: {}...", preview)]
        }
        (Some("result"), _) => {
            let mut lines = vec![
                "\nFinal result:".to_string(),
                format!("  Success: {}", subtype == Some("success")),
                format!("  Cost: ${:.4}", number(event, "cost_usd")),
                format!("  Duration: {}ms", integer(event, "duration_ms")),
                format!("  Turns: {}", integer(event, "num_turns")),
            ];
            if let Some(result) = event.get("result").filter(|r| is_truthy(r)) {
                lines.push(format!("\nResult text:\n{}", display_value(result)));
            }
            lines
        }
        _ => Vec::new(),
    }
}

/// Parse a whole JSON result document.
///
/// Unparseable output is wrapped rather than rejected so the raw text still
/// reaches the user.
pub fn parse_result_document(output: &str) -> Value {
    match serde_json::from_str(output) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Error parsing JSON output: {}", e);
            json!({"error": "Failed to parse JSON output", "raw": output})
        }
    }
}

/// Summary lines for a `type: result` document, for stderr.
pub fn result_summary(document: &Value) -> Option<Vec<String>> {
    if document.get("type").and_then(Value::as_str) != Some("result") {
        return None;
    }

    let is_error = document
        .get("is_error")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let session = document
        .get("session_id")
        .map(display_value)
        .unwrap_or_else(|| "unknown".to_string());

    Some(vec![
        "\nSummary:".to_string(),
        format!("  Success: {}", !is_error),
        format!("  Cost: ${:.4}", number(document, "cost_usd")),
        format!("  Duration: {}ms", integer(document, "duration_ms")),
        format!("  Session: {}", session),
    ])
}

fn number(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn integer(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    }
}
