//! Errors the reconciliation layer can report.
//!
//! - [`ValidationError`] is local and raised before any request is made.
//! - [`RequestError`] classifies every way an outbound call can end badly.
//!
//! Messages never echo unvalidated operator input: validation errors name the
//! field group only.
use thiserror::Error;

/// A form failed local validation. No request was sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required fields missing: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{0}: choose a value from the list")]
    InvalidSelection(&'static str),
    #[error("{0}: enter a whole number of 0 or more")]
    InvalidPrice(&'static str),
    #[error("{0}: enter a valid date (YYYY-MM-DD)")]
    InvalidDate(&'static str),
}

/// Outcome of a request that did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Superseded or abandoned. Never shown to the operator.
    #[error("request cancelled")]
    Cancelled,
    #[error("server unreachable: {0}")]
    Transport(String),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("unexpected server response: {0}")]
    Malformed(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RequestError {
    /// Text to show the operator, or `None` when the error must stay silent.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Cancelled => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_is_silent() {
        assert_eq!(RequestError::Cancelled.user_message(), None);
    }

    #[test]
    fn http_error_shows_extracted_message_only() {
        let err = RequestError::Http {
            status: 409,
            message: "unit code already exists".to_string(),
        };
        assert_eq!(err.user_message().as_deref(), Some("unit code already exists"));
    }

    #[test]
    fn missing_fields_are_listed_by_label() {
        let err = ValidationError::Missing(vec!["name", "unit"]);
        assert_eq!(err.to_string(), "required fields missing: name, unit");
    }
}
