use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
