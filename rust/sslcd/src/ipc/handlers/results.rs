use crate::calc;
use crate::insights;
use crate::ipc::error::{insight_err, ok, validation_err};
use crate::ipc::helpers::{required_bool, required_f64, required_f64_list, submission};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_calc_result(_state: &AppState, req: &Request) -> serde_json::Value {
    let (name, subjects) = match submission(req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    match calc::compute(&name, &subjects) {
        Ok(record) => ok(&req.id, json!(record)),
        Err(e) => validation_err(&req.id, &e),
    }
}

fn handle_calc_grade(_state: &AppState, req: &Request) -> serde_json::Value {
    let percentage = match required_f64(req, "percentage") {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok(
        &req.id,
        json!({ "grade": calc::calculate_grade(percentage) }),
    )
}

fn handle_insights_generate(_state: &AppState, req: &Request) -> serde_json::Value {
    let overall = match required_f64(req, "overallPercentage") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let failed = match required_bool(req, "failed") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let percentages = match required_f64_list(req, "subjectPercentages") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match insights::generate(overall, failed, &percentages) {
        Ok(lines) => ok(&req.id, json!({ "insights": lines })),
        Err(e) => insight_err(&req.id, &e),
    }
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "calc.result" => Some(handle_calc_result(state, req)),
        "calc.grade" => Some(handle_calc_grade(state, req)),
        "insights.generate" => Some(handle_insights_generate(state, req)),
        _ => None,
    }
}
