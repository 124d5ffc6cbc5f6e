//! Error types for the cache engines
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is absent or its entry has expired
    #[error("no value found for provided key")]
    NotFound,

    /// Configuration cannot be turned into a working engine
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Background sweep requested but no tokio runtime is available
    #[error("Background sweep requires a running tokio runtime")]
    RuntimeUnavailable,
}

// == Result Type Alias ==
/// Convenience Result type for the cache engines.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::NotFound.to_string(),
            "no value found for provided key"
        );
        assert_eq!(
            CacheError::InvalidConfig("zero interval".to_string()).to_string(),
            "Invalid configuration: zero interval"
        );
        assert!(CacheError::RuntimeUnavailable.to_string().contains("tokio"));
    }
}
