use thiserror::Error;

/// Gemini API errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Errors surfaced by the route pooling advisor.
///
/// Callers only ever see these two kinds: either the query must be fixed
/// before asking again, or the suggestion is unavailable right now.
#[derive(Error, Debug)]
pub enum AdviceError {
    /// A required query field is missing or malformed.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The model call failed or its output did not match the advice schema.
    #[error("Route suggestion unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AdviceError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True if the caller should re-prompt the user instead of retrying.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<GeminiError> for AdviceError {
    fn from(err: GeminiError) -> Self {
        Self::ServiceUnavailable(err.to_string())
    }
}

/// Result type for advisor operations
pub type AdviceResult<T> = Result<T, AdviceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_error_folds_into_service_unavailable() {
        let err: AdviceError = GeminiError::HttpError {
            status_code: 503,
            message: "overloaded".to_string(),
        }
        .into();

        assert!(!err.is_validation());
        match err {
            AdviceError::ServiceUnavailable(msg) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("overloaded"));
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = AdviceError::validation("startLocation", "must not be empty");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid startLocation: must not be empty");
    }
}
