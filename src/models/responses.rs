use serde::{Deserialize, Serialize};

/// Envelope for successful responses carrying a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self { message: message.into(), data }
    }
}

/// Summarization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub status: bool,
    pub summary: String,
}

/// Status flag with a human readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: bool,
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), details: None }
    }

    pub fn with_details(error: impl Into<String>, details: impl ToString) -> Self {
        Self {
            error: error.into(),
            details: Some(details.to_string()),
        }
    }
}
