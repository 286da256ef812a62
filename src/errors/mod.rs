//! Error handling module for the Adopt-an-Area client.
//!
//! Provides the crate-wide error type and the mapping from backend error bodies
//! to user-visible messages.

use serde_json::Value;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const INVALID_STATE: &str = "INVALID_STATE";
}

/// Message shown when a failure carries nothing more specific.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Longest plain-text error body shown to the user as-is.
const MAX_PLAIN_MESSAGE_CHARS: usize = 200;

/// Application error type.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Local validation failed; nothing was sent
    Validation(String),
    /// The backend rejected the credential (401/403)
    Unauthorized(String),
    /// The backend answered with a non-success status
    Server { status: u16, message: String },
    /// Connection failure or timeout
    Transport(String),
    /// Response body could not be decoded
    Decode(String),
    /// Invalid configuration
    Config(String),
    /// Operation not allowed in the current workflow state
    InvalidState(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Server { .. } => codes::SERVER_ERROR,
            AppError::Transport(_) => codes::TRANSPORT_ERROR,
            AppError::Decode(_) => codes::DECODE_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::InvalidState(_) => codes::INVALID_STATE,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Server { message, .. } => message.clone(),
            AppError::Transport(msg) => msg.clone(),
            AppError::Decode(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::InvalidState(msg) => msg.clone(),
        }
    }

    /// Build an error from a non-success backend response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
        match status {
            401 | 403 => AppError::Unauthorized(message),
            _ => AppError::Server { status, message },
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::debug!("HTTP error: {:?}", err);
        if err.is_decode() {
            AppError::Decode(format!("Invalid response: {}", err))
        } else if err.is_timeout() {
            AppError::Transport("The request timed out".to_string())
        } else if let Some(status) = err.status() {
            AppError::Server {
                status: status.as_u16(),
                message: GENERIC_FAILURE.to_string(),
            }
        } else {
            AppError::Transport(format!("Network error: {}", err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!("JSON error: {:?}", err);
        AppError::Decode(format!("JSON error: {}", err))
    }
}

/// Extract a human-readable message from a backend error body.
///
/// Understands `{"detail": ".."}`, `{"message": ".."}`, `{"error": ".."}`,
/// field-error maps like `{"area_name": [".."]}` and short plain text.
/// Markup (a proxy's HTML error page) yields `None`.
pub fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => message_from_value(&value),
        Err(_) if trimmed.starts_with('<') => None,
        Err(_) => Some(plain_message(trimmed)),
    }
}

fn plain_message(text: &str) -> String {
    if text.chars().count() <= MAX_PLAIN_MESSAGE_CHARS {
        return text.to_string();
    }
    let mut message: String = text.chars().take(MAX_PLAIN_MESSAGE_CHARS).collect();
    message.push_str("...");
    message
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.iter().find_map(message_from_value),
        Value::Object(map) => {
            for key in ["detail", "message", "error"] {
                if let Some(msg) = map.get(key).and_then(message_from_value) {
                    return Some(msg);
                }
            }
            map.iter().find_map(|(field, v)| {
                message_from_value(v).map(|msg| {
                    if field == "non_field_errors" {
                        msg
                    } else {
                        format!("{}: {}", field, msg)
                    }
                })
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_detail() {
        assert_eq!(
            server_message(r#"{"detail": "duplicate area"}"#).as_deref(),
            Some("duplicate area")
        );
    }

    #[test]
    fn test_server_message_nested_error() {
        assert_eq!(
            server_message(r#"{"error": {"message": "quota exceeded"}}"#).as_deref(),
            Some("quota exceeded")
        );
    }

    #[test]
    fn test_server_message_field_errors() {
        assert_eq!(
            server_message(r#"{"area_name": ["This field may not be blank."]}"#).as_deref(),
            Some("area_name: This field may not be blank.")
        );
        assert_eq!(
            server_message(r#"{"non_field_errors": ["duplicate area"]}"#).as_deref(),
            Some("duplicate area")
        );
    }

    #[test]
    fn test_server_message_plain_text_and_empty() {
        assert_eq!(
            server_message("  Bad Gateway \n").as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(server_message(""), None);
        assert_eq!(server_message("{}"), None);
        assert_eq!(server_message("null"), None);
    }

    #[test]
    fn test_server_message_ignores_markup_and_caps_text() {
        let page = "<html><head><title>502 Bad Gateway</title></head><body>nginx</body></html>";
        assert_eq!(server_message(page), None);
        assert_eq!(
            AppError::from_response(502, page).message(),
            GENERIC_FAILURE
        );

        let long = "x".repeat(500);
        let message = server_message(&long).unwrap();
        assert_eq!(message.chars().count(), MAX_PLAIN_MESSAGE_CHARS + 3);
        assert!(message.ends_with("..."));
    }

    #[test]
    fn test_from_response_status_mapping() {
        assert_eq!(
            AppError::from_response(401, r#"{"detail": "Not logged in"}"#),
            AppError::Unauthorized("Not logged in".to_string())
        );
        assert_eq!(
            AppError::from_response(500, ""),
            AppError::Server {
                status: 500,
                message: GENERIC_FAILURE.to_string()
            }
        );
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::Validation("End date is required".to_string());
        assert_eq!(err.to_string(), "VALIDATION_ERROR: End date is required");
    }
}
