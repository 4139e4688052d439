//! Client error taxonomy.

use serde_json::Value;
use thiserror::Error;

use storefront_core::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure reported by (or while reaching) an API collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 4xx with server-reported field messages.
    #[error("validation failed ({status}): {}", .messages.join(". "))]
    Validation { status: u16, messages: Vec<String> },

    /// Any other non-success response.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Network error / API unreachable.
    #[error("network error: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn validation(messages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Validation {
            status: 400,
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Classify a non-success HTTP response.
    ///
    /// A 4xx whose JSON body carries `message` (a list of strings, or a single
    /// string) is a validation failure; everything else is a status error.
    pub fn from_response(status: u16, body: &str) -> Self {
        let messages = serde_json::from_str::<Value>(body)
            .ok()
            .map(|json| extract_messages(&json))
            .unwrap_or_default();

        if (400..500).contains(&status) && !messages.is_empty() {
            return Self::Validation { status, messages };
        }

        let message = if messages.is_empty() {
            body.trim().to_string()
        } else {
            messages.join(". ")
        };
        Self::Status { status, message }
    }

    /// Text shown to the user: validation messages verbatim (joined, prefixed),
    /// anything else the operation's generic fallback.
    pub fn user_message(&self, invalid_data_prefix: &str, fallback: &str) -> String {
        match self {
            ApiError::Validation { messages, .. } if !messages.is_empty() => {
                format!("{invalid_data_prefix}{}", messages.join(". "))
            }
            _ => fallback.to_string(),
        }
    }
}

fn extract_messages(json: &Value) -> Vec<String> {
    match json.get("message") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(message)) if !message.trim().is_empty() => vec![message.clone()],
        _ => Vec::new(),
    }
}

/// Error returned by screens and the mutation coordinator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A submission from the same control is still in flight.
    #[error("a submission is already in flight")]
    Busy,

    /// The owning view went away before the call completed.
    #[error("view closed before the request completed")]
    Cancelled,

    /// Sign-in required and the configured policy suppressed the call.
    #[error("sign-in required")]
    Unauthenticated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_with_message_list_is_validation() {
        let err = ApiError::from_response(
            400,
            r#"{"message":["name must not be empty","phone_number is invalid"],"statusCode":400}"#,
        );
        assert_eq!(
            err,
            ApiError::Validation {
                status: 400,
                messages: vec![
                    "name must not be empty".to_string(),
                    "phone_number is invalid".to_string()
                ],
            }
        );
        assert_eq!(
            err.user_message("Invalid data: ", "fallback"),
            "Invalid data: name must not be empty. phone_number is invalid"
        );
    }

    #[test]
    fn single_message_string_is_accepted() {
        let err = ApiError::from_response(409, r#"{"message":"out of stock"}"#);
        assert!(matches!(err, ApiError::Validation { status: 409, ref messages } if messages == &["out of stock"]));
    }

    #[test]
    fn server_errors_use_the_fallback() {
        let err = ApiError::from_response(500, r#"{"message":["boom"]}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "boom".to_string()
            }
        );
        assert_eq!(err.user_message("Invalid data: ", "Could not save."), "Could not save.");
    }

    #[test]
    fn non_json_bodies_become_status_errors() {
        let err = ApiError::from_response(404, "Not Found\n");
        assert_eq!(
            err,
            ApiError::Status {
                status: 404,
                message: "Not Found".to_string()
            }
        );
        assert_eq!(
            ApiError::transport("connection refused").user_message("x", "Try again."),
            "Try again."
        );
    }
}
