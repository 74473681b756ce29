//! Error types for the engine.
//!
//! # Design
//! Three caller-facing kinds, one per failure class: `ValidationError` is
//! detected locally and never reaches the network, `AuthError` is scoped to
//! the session flow, `SyncError` to the collection flow. `ApiError` is the
//! internal vocabulary of the build/parse layer; the components convert it
//! into a scoped, human-readable message at their boundary, so no error
//! crosses into the presentation layer as an exception.

use std::fmt;

use serde::Deserialize;

use crate::http::TransportError;

/// Fallback text when a failure carries no server-supplied message.
pub const GENERIC_FAILURE: &str = "Connection failed";

/// Locally detected input violation. Never causes a network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The todo title is empty after trimming whitespace.
    EmptyTitle,
    /// Usernames must be at least 2 characters.
    UsernameTooShort,
    /// Passwords must be at least 6 characters.
    PasswordTooShort,
    /// The collection holds no record with this id.
    UnknownTodo(u64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "title must not be empty"),
            ValidationError::UsernameTooShort => {
                write!(f, "username must be at least 2 characters")
            }
            ValidationError::PasswordTooShort => {
                write!(f, "password must be at least 6 characters")
            }
            ValidationError::UnknownTodo(id) => write!(f, "no todo with id {id}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A session-flow failure: login or registration rejected or unreachable.
///
/// Rejected credentials and connectivity failures both land in `Failed`;
/// only the message text distinguishes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    Validation(ValidationError),
    Failed(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Validation(violation) => write!(f, "{violation}"),
            AuthError::Failed(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<ValidationError> for AuthError {
    fn from(violation: ValidationError) -> Self {
        AuthError::Validation(violation)
    }
}

/// A collection-flow failure. The collection is guaranteed to be in its
/// pre-call state whenever one of these is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    Validation(ValidationError),
    /// An operation was invoked with no authenticated session.
    NoSession,
    /// The request failed; the message carries an operation-specific prefix.
    Failed(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Validation(violation) => write!(f, "{violation}"),
            SyncError::NoSession => write!(f, "not signed in"),
            SyncError::Failed(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<ValidationError> for SyncError {
    fn from(violation: ValidationError) -> Self {
        SyncError::Validation(violation)
    }
}

/// Errors spoken by the build/parse plumbing.
#[derive(Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    HttpError { status: u16, body: String },

    /// The round trip itself failed; no response arrived.
    Transport(TransportError),

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl ApiError {
    /// Server-supplied human-readable detail, when the error body is a JSON
    /// object carrying a `message` or `error` string field. The shape is not
    /// assumed: anything else yields `None`.
    pub fn server_message(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(alias = "error")]
            message: Option<String>,
        }

        match self {
            ApiError::HttpError { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|parsed| parsed.message),
            _ => None,
        }
    }

    /// `server_message` with the generic connectivity fallback.
    pub fn detail(&self) -> String {
        self.server_message()
            .unwrap_or_else(|| GENERIC_FAILURE.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::Transport(err) => write!(f, "{err}"),
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(body: &str) -> ApiError {
        ApiError::HttpError {
            status: 500,
            body: body.to_string(),
        }
    }

    #[test]
    fn server_message_reads_error_field() {
        let err = http_error(r#"{"error":"Todo not found"}"#);
        assert_eq!(err.server_message().as_deref(), Some("Todo not found"));
    }

    #[test]
    fn server_message_reads_message_field() {
        let err = http_error(r#"{"message":"try again later"}"#);
        assert_eq!(err.server_message().as_deref(), Some("try again later"));
    }

    #[test]
    fn server_message_is_none_for_non_json_body() {
        let err = http_error("<html>502 Bad Gateway</html>");
        assert!(err.server_message().is_none());
        assert_eq!(err.detail(), GENERIC_FAILURE);
    }

    #[test]
    fn server_message_is_none_for_transport_failure() {
        let err = ApiError::Transport(TransportError("connection refused".to_string()));
        assert!(err.server_message().is_none());
        assert_eq!(err.detail(), GENERIC_FAILURE);
    }

    #[test]
    fn server_message_is_none_when_field_missing() {
        let err = http_error(r#"{"status":"error"}"#);
        assert!(err.server_message().is_none());
    }
}
