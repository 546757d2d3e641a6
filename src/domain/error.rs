use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Timed out: {operation} after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            seconds: duration.as_secs(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("text and vector are required");
        assert_eq!(
            error.to_string(),
            "Validation error: text and vector are required"
        );
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("gemini", "empty response");
        assert_eq!(error.to_string(), "Provider error: gemini - empty response");
    }

    #[test]
    fn test_timeout_error() {
        let error = DomainError::timeout("remote get", Duration::from_secs(15));
        assert_eq!(error.to_string(), "Timed out: remote get after 15s");
    }
}
