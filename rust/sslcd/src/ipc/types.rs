use crate::config::ReportConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Read-only for the life of the process; requests never share anything else.
pub struct AppState {
    pub config: ReportConfig,
}
