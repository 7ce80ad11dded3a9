//! Normalized API errors.
//!
//! Every failure that reaches the response boundary is one of these
//! variants, so a single rendering path can produce the error body.
//! Variants are constructed once and never mutated.

use std::env;

use axum::response::{IntoResponse, Response};
use chrono::Utc;
use http::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller-supplied request data failed shape or content rules.
    #[error("{message}")]
    Validation {
        message: String,
        invalid_fields: Vec<String>,
    },

    /// A resolved model adapter raised while being invoked.
    #[error("{service} service temporarily unavailable")]
    Service { service: String, reason: String },

    /// Any other failure, with the status the raising component
    /// supplied.
    #[error("{message}")]
    Generic {
        message: String,
        status: StatusCode,
        details: Option<Value>,
    },

    /// Unmatched API route.
    #[error("Route not found: {method} {path}")]
    NotFound { method: String, path: String },

    /// Unexpected failure from a collaborator, carried whole so the
    /// cause chain survives to the boundary.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>, invalid_fields: &[&str]) -> Self {
        Self::Validation {
            message: message.into(),
            invalid_fields: invalid_fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn service(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Service {
            service: service.into(),
            reason: reason.into(),
        }
    }

    pub fn generic(message: impl Into<String>, status: StatusCode, details: Option<Value>) -> Self {
        Self::Generic {
            message: message.into(),
            status,
            details,
        }
    }

    pub fn not_found(method: &str, path: &str) -> Self {
        Self::NotFound {
            method: method.to_string(),
            path: path.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Service { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Generic { status, .. } => *status,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured payload for the error body. The raw provider error
    /// never appears here, only the sanitized reason text.
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::Validation { invalid_fields, .. } => {
                Some(json!({ "invalidFields": invalid_fields }))
            }
            Self::Service { service, reason } => {
                Some(json!({ "service": service, "reason": reason }))
            }
            Self::Generic { details, .. } => details.clone(),
            Self::NotFound { method, path } => Some(json!({ "path": path, "method": method })),
            Self::Internal(_) => None,
        }
    }

    fn stack(&self) -> Option<Vec<String>> {
        match self {
            Self::Internal(cause) => Some(cause.chain().map(|c| c.to_string()).collect()),
            _ => None,
        }
    }
}

// Anything other than "production" counts as diagnostic mode.
fn diagnostic_mode() -> bool {
    env::var("RELAY_ENV").map(|v| v != "production").unwrap_or(true)
}

// In production only client errors expose their details; the payload
// of a 5xx could leak provider internals.
fn should_expose_details(status: StatusCode) -> bool {
    diagnostic_mode() || status.is_client_error()
}

/// Renders the fixed error shape: `{ error, timestamp, details?,
/// stack? }`. Logs every error once, with severity derived from the
/// status.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }

        let mut body = json!({
            "error": self.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        if should_expose_details(status) {
            if let Some(details) = self.details() {
                body["details"] = details;
            }
            if diagnostic_mode() {
                if let Some(stack) = self.stack() {
                    body["stack"] = json!(stack);
                }
            }
        }

        (status, axum::Json(body)).into_response()
    }
}
