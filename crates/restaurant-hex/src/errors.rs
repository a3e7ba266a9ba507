use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use restaurant_types::ports::order_repository::RepoError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    /// The client only ever sees `Failed to <action>`; the source is logged.
    #[error("Failed to {action}")]
    Storage {
        action: &'static str,
        #[source]
        source: RepoError,
    },
}

impl AppError {
    pub fn storage(action: &'static str) -> impl FnOnce(RepoError) -> AppError {
        move |source| AppError::Storage { action, source }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum ErrorBody {
    Message(String),
    Error(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, body) = match &self {
            AppError::NotFound(m) => {
                tracing::debug!(reason = %m, "not found");
                (StatusCode::NOT_FOUND, ErrorBody::Message(m.clone()))
            }
            AppError::Storage { action, source } => {
                tracing::error!(error = %source, "failed to {action}");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::Error(self.to_string()))
            }
        };

        let body = serde_json::to_string(&body)
            .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
        (code, [("content-type", "application/json")], body).into_response()
    }
}
