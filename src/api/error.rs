//! Failure envelopes for API endpoints.
//!
//! Every endpoint answers errors with the same shape as its success body:
//! `{"success": false, "error": "<message>", ...}` plus whatever empty
//! collection or hint that endpoint promises, so the dashboard never has to
//! special-case a missing key.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::store::FetchError;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    /// Extra top-level keys merged into the envelope
    fields: Map<String, Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: Map::new(),
        }
    }

    /// Internal server error (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// A failed upstream fetch. Logged here with its full source chain.
    pub fn fetch(context: &str, err: FetchError) -> Self {
        tracing::error!(error = ?err, "{}: {}", context, error_chain(&err));
        Self::internal(err.to_string())
    }

    /// Add a top-level key to the error envelope.
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn into_body(self) -> Value {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(false));
        body.insert("error".to_string(), Value::String(self.message));
        body.extend(self.fields);
        Value::Object(body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self.into_body())).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
