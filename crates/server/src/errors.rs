use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error body shared by every customer endpoint:
/// `{ "success": false, "message": ..., "error": ... }`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, message: message.into(), detail }
    }

    pub fn bad_request(message: impl Into<String>, detail: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, detail)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { success: false, message: &self.message, error: self.detail.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Model(m) => {
                JsonApiError::bad_request("Missing required fields", Some(m.to_string()))
            }
            // id as the client sent it, not uppercased
            ServiceError::Duplicate(id) => JsonApiError::bad_request(
                "Customer ID already exists",
                Some(format!("Customer with ID {} is already registered", id)),
            ),
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, msg, None),
            ServiceError::Storage(msg) => {
                // the io detail names server paths; it stays in the log only
                error!(error = %msg, "customer storage failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error saving customer data", None)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
