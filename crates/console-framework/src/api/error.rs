//! Backend and transport failures, and the message shown for each.

use serde::Deserialize;

/// A failed API call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// `{errors: [{msg}, ...]}` from the backend's own validation.
    #[error("Validation failed: {}", .0.join(", "))]
    FieldErrors(Vec<String>),

    /// `{message}` from the backend.
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// The most specific message available, in priority order: backend field
    /// messages, backend message, transport description, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let specific = match self {
            ApiError::FieldErrors(messages) => messages
                .iter()
                .map(|m| m.trim())
                .filter(|m| !m.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            ApiError::Backend { message, .. } => message.trim().to_string(),
            ApiError::Transport(description) => description.trim().to_string(),
        };
        if specific.is_empty() {
            fallback.to_string()
        } else {
            specific
        }
    }

    /// Interprets an error response body. Accepts both `{message}` and
    /// `{errors: [{msg}]}`; anything else becomes a transport description.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct FieldMessage {
            #[serde(default)]
            msg: String,
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            errors: Vec<FieldMessage>,
            #[serde(default)]
            message: Option<String>,
        }

        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            let field_messages: Vec<String> = parsed
                .errors
                .into_iter()
                .map(|e| e.msg)
                .filter(|m| !m.trim().is_empty())
                .collect();
            if !field_messages.is_empty() {
                return ApiError::FieldErrors(field_messages);
            }
            if let Some(message) = parsed.message.filter(|m| !m.trim().is_empty()) {
                return ApiError::Backend { status, message };
            }
        }
        ApiError::Transport(format!("Request failed with status code {status}"))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_take_priority_over_message() {
        let err = ApiError::from_response(
            422,
            r#"{"message":"Validation failed","errors":[{"msg":"Code must be unique"},{"msg":"Name too long"}]}"#,
        );
        assert_eq!(err.user_message("Failed to save department"), "Code must be unique, Name too long");
    }

    #[test]
    fn test_backend_message_used_when_no_field_errors() {
        let err = ApiError::from_response(409, r#"{"message":"Department already exists"}"#);
        assert_eq!(
            err,
            ApiError::Backend {
                status: 409,
                message: "Department already exists".into()
            }
        );
        assert_eq!(err.user_message("Failed to save department"), "Department already exists");
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status_description() {
        let err = ApiError::from_response(502, "<html>Bad gateway</html>");
        assert_eq!(err.user_message("Failed to delete department"), "Request failed with status code 502");
    }

    #[test]
    fn test_empty_description_uses_generic_fallback() {
        let err = ApiError::Transport("   ".into());
        assert_eq!(err.user_message("Failed to save department"), "Failed to save department");
        let blank_fields = ApiError::FieldErrors(vec![String::new()]);
        assert_eq!(blank_fields.user_message("Failed to save department"), "Failed to save department");
    }
}
