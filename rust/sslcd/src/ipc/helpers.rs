use crate::calc::{self, SubjectMark, ValidationError};
use crate::ipc::error::{err, validation_err};
use crate::ipc::types::Request;
use serde_json::json;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn required_f64(req: &Request, key: &str) -> Result<f64, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("{} must be a number", key),
                None,
            )
        })
}

pub fn required_bool(req: &Request, key: &str) -> Result<bool, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("{} must be a boolean", key),
                None,
            )
        })
}

pub fn required_f64_list(req: &Request, key: &str) -> Result<Vec<f64>, serde_json::Value> {
    let Some(items) = req.params.get(key).and_then(|v| v.as_array()) else {
        return Err(err(
            &req.id,
            "bad_params",
            format!("{} must be an array of numbers", key),
            None,
        ));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_f64().ok_or_else(|| {
                err(
                    &req.id,
                    "bad_params",
                    format!("{} must be an array of numbers", key),
                    Some(json!({ "index": i })),
                )
            })
        })
        .collect()
}

/// Marks arrive as typed form text or as JSON numbers; numbers are turned
/// back into their literal text so `80.5` fails the whole-number check.
fn mark_text(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn subject_item(
    req: &Request,
    index: usize,
    item: &serde_json::Value,
) -> Result<SubjectMark, serde_json::Value> {
    if let Some(encoded) = item.as_str() {
        return SubjectMark::from_encoded(encoded).map_err(|e| validation_err(&req.id, &e));
    }

    let bad_item = |message: &str| {
        err(
            &req.id,
            "bad_params",
            message.to_string(),
            Some(json!({ "index": index })),
        )
    };
    let obj = item
        .as_object()
        .ok_or_else(|| bad_item("subjects entries must be objects or \"subject:mark\" strings"))?;
    let subject = obj
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| bad_item("missing subjects[].subject"))?;
    let mark = obj
        .get("mark")
        .and_then(mark_text)
        .ok_or_else(|| bad_item("missing subjects[].mark"))?;
    Ok(SubjectMark::new(subject, mark))
}

/// Parses and checks entries in one ordered pass, so a bad mark in an early
/// entry is reported before a malformed later one.
pub fn required_subjects(req: &Request) -> Result<Vec<SubjectMark>, serde_json::Value> {
    let Some(items) = req.params.get("subjects").and_then(|v| v.as_array()) else {
        return Err(err(&req.id, "bad_params", "missing subjects", None));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let entry = subject_item(req, i, item)?;
            calc::check_entry(&entry).map_err(|e| validation_err(&req.id, &e))?;
            Ok(entry)
        })
        .collect()
}

/// Name and subjects together, as every grading method takes them.
pub fn submission(req: &Request) -> Result<(String, Vec<SubjectMark>), serde_json::Value> {
    let name = required_str(req, "name")?;
    if name.trim().is_empty() {
        return Err(validation_err(&req.id, &ValidationError::NameRequired));
    }
    let subjects = required_subjects(req)?;
    Ok((name, subjects))
}
