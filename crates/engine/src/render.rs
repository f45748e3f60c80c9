//! Plain-text rendering of classified results.
//!
//! JSON payloads render as an indented key/value tree rather than raw JSON,
//! so nested structures read top to bottom. Binary shapes render as a short
//! marker plus the object URL a client can dereference.

use crate::classify::WorkflowResult;

const INDENT: &str = "  ";

/// Render a classified result for display.
pub fn render(result: &WorkflowResult) -> String {
    match result {
        WorkflowResult::Json(value) => {
            let mut out = String::new();
            render_value(value, 0, &mut out);
            out
        }
        WorkflowResult::Image(url) => format!("[image] {url}"),
        WorkflowResult::Pdf(url) => format!("[pdf viewer] {url}"),
        WorkflowResult::Text(text) => text.clone(),
        WorkflowResult::Blob(url) => format!("[download] {url}"),
    }
}

fn render_value(value: &serde_json::Value, depth: usize, out: &mut String) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, value) in map {
                render_entry(key, value, depth, out);
            }
        }
        serde_json::Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                render_entry(&index.to_string(), value, depth, out);
            }
        }
        scalar => {
            out.push_str(&INDENT.repeat(depth));
            push_scalar(scalar, out);
            out.push('\n');
        }
    }
}

fn render_entry(key: &str, value: &serde_json::Value, depth: usize, out: &mut String) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(key);
    out.push(':');
    match value {
        serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
            out.push('\n');
            render_value(value, depth + 1, out);
        }
        scalar => {
            out.push(' ');
            push_scalar(scalar, out);
            out.push('\n');
        }
    }
}

fn push_scalar(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::Null => out.push_str("null"),
        serde_json::Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        serde_json::Value::Number(n) => out.push_str(&n.to_string()),
        serde_json::Value::String(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        // Containers are handled a level up.
        serde_json::Value::Object(_) | serde_json::Value::Array(_) => unreachable!(),
    }
}
