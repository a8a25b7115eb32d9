//! Error types for code generation.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors that can occur while generating an application.
///
/// None of these are recovered locally. They travel to the session
/// controller, which records them as the session's failure state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Missing or malformed credential.
    #[error("{message}")]
    Configuration { message: String, code: u16 },

    /// The instruction was empty after trimming.
    #[error("{0}")]
    Validation(String),

    /// The request did not finish before the deadline.
    #[error("Request timed out after {seconds} seconds.")]
    Timeout { seconds: u64 },

    /// The provider answered with a non-success status.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The provider answered, but not with a usable HTML document.
    #[error("{0}")]
    InvalidResponse(String),

    /// Anything else (transport, decoding, unexpected failures).
    #[error("Generation service error: {0}")]
    Service(String),
}

impl GenerationError {
    pub fn missing_credential() -> Self {
        Self::Configuration {
            message: "API configuration missing. Please add your key in settings.".to_string(),
            code: 400,
        }
    }

    pub fn malformed_credential() -> Self {
        Self::Configuration {
            message: "Invalid API key format. Please check your configuration.".to_string(),
            code: 401,
        }
    }

    pub fn empty_instruction() -> Self {
        Self::Validation("Prompt cannot be empty.".to_string())
    }

    /// Deadline exceeded. Partial seconds round up, so a sub-second
    /// deadline never reads as 0.
    pub fn timeout(limit: Duration) -> Self {
        let millis = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        Self::Timeout {
            seconds: millis.div_ceil(1000),
        }
    }

    /// Numeric code attached to the error, mirroring HTTP semantics.
    pub fn code(&self) -> u16 {
        match self {
            Self::Configuration { code, .. } => *code,
            Self::Validation(_) => 400,
            Self::Timeout { .. } => 408,
            Self::Http { status, .. } => *status,
            Self::InvalidResponse(_) | Self::Service(_) => 500,
        }
    }

    /// Structured provider error body, when one was returned.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Http { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Short machine-friendly tag for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Validation(_) => "validation",
            Self::Timeout { .. } => "timeout",
            Self::Http { .. } => "http",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Service(_) => "service",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(GenerationError::missing_credential().code(), 400);
        assert_eq!(GenerationError::malformed_credential().code(), 401);
        assert_eq!(GenerationError::empty_instruction().code(), 400);
        assert_eq!(GenerationError::Timeout { seconds: 30 }.code(), 408);
        assert_eq!(
            GenerationError::Http {
                status: 429,
                message: "quota".to_string(),
                details: None
            }
            .code(),
            429
        );
        assert_eq!(GenerationError::Service("boom".to_string()).code(), 500);
    }

    #[test]
    fn test_timeout_message() {
        let err = GenerationError::Timeout { seconds: 30 };
        assert_eq!(err.to_string(), "Request timed out after 30 seconds.");
        assert!(err.is_timeout());
        assert_eq!(err.kind(), "timeout");
    }

    #[test]
    fn test_timeout_rounds_partial_seconds_up() {
        assert_eq!(
            GenerationError::timeout(Duration::from_secs(30)),
            GenerationError::Timeout { seconds: 30 }
        );
        let err = GenerationError::timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Request timed out after 1 seconds.");
        assert_eq!(
            GenerationError::timeout(Duration::from_millis(1500)),
            GenerationError::Timeout { seconds: 2 }
        );
    }
}
