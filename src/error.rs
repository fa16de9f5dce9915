//! Mapping of request failures to HTTP responses.

use axum::{BoxError, Json};
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tower::timeout::error::Elapsed;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to read request body: {0}")]
    Body(#[from] BytesRejection),

    #[error("invalid JSON body: {0}")]
    Json(#[source] serde_json::Error),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to serialize response: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("request timed out")]
    Timeout,

    #[error("middleware failed: {0}")]
    Middleware(String),
}

impl From<BoxError> for ServerError {
    fn from(err: BoxError) -> Self {
        if err.is::<Elapsed>() {
            ServerError::Timeout
        } else {
            ServerError::Middleware(err.to_string())
        }
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Body(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ServerError::Body(_)
            | ServerError::Json(_)
            | ServerError::Query(_)
            | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ServerError::Store(StoreError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::Store(StoreError::Query(_))
            | ServerError::Serialization(_)
            | ServerError::Middleware(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to hand back to the client. Driver messages stay in the logs.
    fn detail(&self) -> String {
        match self {
            ServerError::Store(StoreError::Connection(_)) => "database is unavailable".into(),
            ServerError::Store(StoreError::Query(_)) => "database query failed".into(),
            ServerError::Serialization(_) => "failed to serialize response".into(),
            ServerError::Middleware(_) => "internal server error".into(),
            _ => self.to_string(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    title: String,
    status: u16,
    detail: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(err = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::warn!(err = %self, status = status.as_u16(), "request rejected");
        }

        let body = ResponseError {
            title: status.canonical_reason().unwrap_or("Error").to_owned(),
            status: status.as_u16(),
            detail: self.detail(),
        };

        (status, Json(body)).into_response()
    }
}
