use thiserror::Error;

/// Error types for the brief pipeline and its data collaborators
#[derive(Error, Debug)]
pub enum BriefError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("API error: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Classification unavailable: {reason}")]
    ClassificationUnavailable { reason: String },

    #[error("Insufficient history for {ticker}: {observed} observations, need {required}")]
    InsufficientHistory {
        ticker: String,
        observed: usize,
        required: usize,
    },

    #[error("Division by zero for {ticker}: previous close is 0.0")]
    DivisionByZero { ticker: String },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Data validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for brief pipeline operations
pub type BriefResult<T> = Result<T, BriefError>;

impl BriefError {
    /// Check if the error is recoverable per item. Recoverable errors drop
    /// the offending article/ticker into the run's error list; the run as a
    /// whole still completes. `InvariantViolation` signals a contract breach
    /// between components and must abort assembly.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BriefError::ClassificationUnavailable { .. } => true,
            BriefError::InsufficientHistory { .. } => true,
            BriefError::DivisionByZero { .. } => true,
            BriefError::Network(_) => true,
            BriefError::Api { .. } => true,
            BriefError::Parse { .. } => true,
            _ => false,
        }
    }

    /// Create a parse error with context
    pub fn parse_error<S: Into<String>>(message: S) -> Self {
        BriefError::Parse {
            message: message.into(),
        }
    }

    /// Create a validation error with field context
    pub fn validation_error<S: Into<String>>(field: S, message: S) -> Self {
        BriefError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an API error with status code
    pub fn api_error<S: Into<String>>(status_code: u16, message: S) -> Self {
        BriefError::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Create a classification-unavailable error
    pub fn classification_unavailable<S: Into<String>>(reason: S) -> Self {
        BriefError::ClassificationUnavailable {
            reason: reason.into(),
        }
    }

    /// Create an invariant-violation error
    pub fn invariant<S: Into<String>>(message: S) -> Self {
        BriefError::InvariantViolation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_item_errors_are_recoverable() {
        assert!(BriefError::classification_unavailable("model offline").is_recoverable());
        assert!(BriefError::InsufficientHistory {
            ticker: "AAPL".to_string(),
            observed: 1,
            required: 2,
        }
        .is_recoverable());
        assert!(BriefError::DivisionByZero {
            ticker: "AAPL".to_string(),
        }
        .is_recoverable());
    }

    #[test]
    fn test_invariant_violation_is_fatal() {
        assert!(!BriefError::invariant("emerging ticker missing from quotes").is_recoverable());
        assert!(!BriefError::Config("missing key".to_string()).is_recoverable());
    }
}
