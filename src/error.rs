use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::graph::GraphError;

#[derive(Debug)]
pub enum AppError {
    Form(String),
    Metadata(serde_json::Error),
    Graph(GraphError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Form(msg) => write!(f, "Invalid form submission: {msg}"),
            AppError::Metadata(err) => write!(f, "Failed to serialize metadata: {err}"),
            AppError::Graph(err) => write!(f, "{err}"),
        }
    }
}

/// Every failure is a 500 reported to the submitter with its message attached.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Form(_) => tracing::warn!("Rejected submission: {self}"),
            AppError::Metadata(_) | AppError::Graph(_) => {
                tracing::error!("Registration failed: {self}")
            }
        }

        let body = json!({ "ok": false, "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        AppError::Graph(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Metadata(err)
    }
}
