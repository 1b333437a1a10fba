//! Error responses.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::{ChartError, EphemerisError};

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug)]
pub enum AppError {
    Chart(ChartError),
    /// The blocking task panicked or was cancelled.
    Internal(String),
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ApiError) {
        match self {
            AppError::Chart(ChartError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, ApiError::new("INVALID_INPUT", msg.clone()))
            }
            AppError::Chart(ChartError::Oracle(EphemerisError::Timeout(limit))) => (
                StatusCode::GATEWAY_TIMEOUT,
                ApiError::new("ORACLE_TIMEOUT", "ephemeris calculation timed out")
                    .with_details(format!("deadline {} ms", limit.as_millis())),
            ),
            AppError::Chart(ChartError::Oracle(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("ORACLE_FAILURE", "ephemeris calculation failed").with_details(e.to_string()),
            ),
            AppError::Chart(ChartError::Invariant(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INVARIANT_VIOLATION", "chart computation produced an invalid value")
                    .with_details(msg.clone()),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg.clone()),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            error!(code = %body.code, details = ?body.details, "request failed");
        } else {
            warn!(code = %body.code, message = %body.message, "request rejected");
        }
        (status, Json(body)).into_response()
    }
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        AppError::Chart(err)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Chart(ChartError::invalid(rejection.body_text()))
    }
}
