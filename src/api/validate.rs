//! Request field validation.
//!
//! axum's `Json` extractor only guarantees well-formed JSON, so the
//! request types keep every field optional and these checks enforce
//! the field rules. Failures carry the offending field names and
//! short-circuit the pipeline before any session state changes.

use std::sync::LazyLock;

use http::HeaderMap;
use regex::Regex;

use super::error::ApiError;
use crate::session::DEFAULT_SESSION;

static SESSION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9_-]+$").expect("invalid session id pattern"));

const SESSION_ID_MAX_LEN: usize = 100;

/// Strips NUL bytes and surrounding whitespace. The sanitized value
/// is what gets validated, stored, and dispatched.
pub fn sanitize(value: &str) -> String {
    value.replace('\0', "").trim().to_string()
}

/// Required string field with length bounds. Returns the sanitized
/// value.
pub fn required_string(
    value: Option<&str>,
    field: &str,
    min_len: usize,
    max_len: usize,
) -> Result<String, ApiError> {
    let Some(value) = value else {
        return Err(ApiError::validation(
            format!("{field} is required"),
            &[field],
        ));
    };
    let sanitized = sanitize(value);
    if sanitized.is_empty() {
        return Err(ApiError::validation(
            format!("{field} cannot be empty"),
            &[field],
        ));
    }
    bounded(sanitized, field, min_len, max_len)
}

/// Optional string field with an upper length bound. A value that is
/// empty after sanitization counts as absent.
pub fn optional_string(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(value) => {
            let sanitized = sanitize(value);
            if sanitized.is_empty() {
                return Ok(None);
            }
            bounded(sanitized, field, 0, max_len).map(Some)
        }
    }
}

fn bounded(value: String, field: &str, min_len: usize, max_len: usize) -> Result<String, ApiError> {
    let length = value.chars().count();
    if length < min_len {
        return Err(ApiError::validation(
            format!("{field} must be at least {min_len} characters"),
            &[field],
        ));
    }
    if length > max_len {
        return Err(ApiError::validation(
            format!("{field} must be at most {max_len} characters"),
            &[field],
        ));
    }
    Ok(value)
}

/// Optional enum field; the value must be one of `allowed`. A value
/// that is empty after sanitization counts as absent.
pub fn one_of(
    value: Option<&str>,
    field: &str,
    allowed: &[&str],
) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(value) => {
            let sanitized = sanitize(value);
            if sanitized.is_empty() {
                return Ok(None);
            }
            if allowed.contains(&sanitized.as_str()) {
                Ok(Some(sanitized))
            } else {
                Err(ApiError::validation(
                    format!("{field} must be one of: {}", allowed.join(", ")),
                    &[field],
                ))
            }
        }
    }
}

/// Resolves the session id from the `x-session-id` header, falling
/// back to the shared default session when the header is absent or
/// empty.
pub fn session_id(headers: &HeaderMap) -> Result<String, ApiError> {
    let Some(value) = headers.get("x-session-id") else {
        return Ok(DEFAULT_SESSION.to_string());
    };
    let id = value.to_str().map_err(|_| invalid_session_id())?;
    if id.is_empty() {
        return Ok(DEFAULT_SESSION.to_string());
    }
    if !SESSION_ID_RE.is_match(id) {
        return Err(invalid_session_id());
    }
    if id.len() > SESSION_ID_MAX_LEN {
        return Err(ApiError::validation(
            format!("Session ID is too long (max {SESSION_ID_MAX_LEN} characters)"),
            &["x-session-id"],
        ));
    }
    Ok(id.to_string())
}

fn invalid_session_id() -> ApiError {
    ApiError::validation(
        "Invalid session ID format. Use only alphanumeric characters, hyphens, and underscores.",
        &["x-session-id"],
    )
}
