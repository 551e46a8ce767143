use crate::calc::ValidationError;
use crate::insights::InsightError;
use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Reply for a line that is not a request at all; there is no id to echo.
pub fn bad_json(message: impl Into<String>) -> serde_json::Value {
    json!({
        "ok": false,
        "error": {
            "code": "bad_json",
            "message": message.into(),
        }
    })
}

pub fn validation_err(id: &str, e: &ValidationError) -> serde_json::Value {
    tracing::debug!(id, kind = e.kind(), "validation failed: {e}");
    let mut details = json!({ "kind": e.kind() });
    if let Some(subject) = e.subject() {
        details["subject"] = json!(subject);
    }
    err(id, "validation_failed", e.to_string(), Some(details))
}

pub fn insight_err(id: &str, e: &InsightError) -> serde_json::Value {
    tracing::warn!(id, "insight generation rejected input: {e}");
    err(id, "insight_failed", e.to_string(), None)
}
