use crate::calc;
use crate::ipc::error::{err, insight_err, ok, validation_err};
use crate::ipc::helpers::submission;
use crate::ipc::types::{AppState, Request};
use crate::report;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::json;

/// `generatedOn` is a `YYYY-MM-DD` date (midnight) or a `YYYY-MM-DDTHH:MM:SS`
/// local timestamp; absent means now.
fn generated_at(req: &Request) -> Result<NaiveDateTime, serde_json::Value> {
    match req.params.get("generatedOn") {
        None | Some(serde_json::Value::Null) => Ok(chrono::Local::now().naive_local()),
        Some(v) => v
            .as_str()
            .and_then(|s| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .or_else(|| {
                        NaiveDate::parse_from_str(s, "%Y-%m-%d")
                            .ok()
                            .map(|d| d.and_time(NaiveTime::MIN))
                    })
            })
            .ok_or_else(|| {
                err(
                    &req.id,
                    "bad_params",
                    "generatedOn must be a YYYY-MM-DD date or YYYY-MM-DDTHH:MM:SS timestamp",
                    Some(json!({ "generatedOn": v })),
                )
            }),
    }
}

fn handle_reports_result_model(state: &AppState, req: &Request) -> serde_json::Value {
    let (name, subjects) = match submission(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let at = match generated_at(req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let record = match calc::compute(&name, &subjects) {
        Ok(v) => v,
        Err(e) => return validation_err(&req.id, &e),
    };

    match report::result_report(&record, &state.config, at) {
        Ok(model) => ok(&req.id, json!(model)),
        Err(e) => insight_err(&req.id, &e),
    }
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.resultModel" => Some(handle_reports_result_model(state, req)),
        _ => None,
    }
}
