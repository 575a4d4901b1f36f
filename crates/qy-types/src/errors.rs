use thiserror::Error;

/// Main error type for Quarry
#[derive(Error, Debug)]
pub enum QyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Problems detected while freezing a search configuration.
///
/// All of these are fatal and are raised before any worker starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("dimension count must be at least 1")]
    ZeroDimensions,

    #[error("step size must be at least 1")]
    ZeroStep,

    #[error("retention count (K) must be at least 1")]
    ZeroKeep,

    #[error("worker count override must be at least 1")]
    ZeroWorkers,

    #[error("invalid domain [{min}, {max}): bounds must be finite with 0 <= min < max <= 1")]
    InvalidDomain { min: f32, max: f32 },

    #[error("strategy {strategy} scores {expected} dimension(s), configuration has {actual}")]
    DimensionMismatch {
        strategy: String,
        expected: usize,
        actual: usize,
    },

    #[error("unknown scoring strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown output columns: {0} (expected raw, encoded or both)")]
    UnknownColumns(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

/// Result type alias for Quarry operations
pub type QyResult<T> = Result<T, QyError>;

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {
        $crate::QyError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ConfigError::DimensionMismatch {
            strategy: "coirrational".to_string(),
            expected: 2,
            actual: 3,
        };

        let text = error.to_string();
        assert!(text.contains("coirrational"));
        assert!(text.contains('2'));
        assert!(text.contains('3'));
    }

    #[test]
    fn test_error_conversion() {
        let qy_error: QyError = ConfigError::ZeroStep.into();
        match qy_error {
            QyError::Config(ConfigError::ZeroStep) => (),
            other => panic!("Expected Config error, got {other:?}"),
        }

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(QyError::from(io), QyError::Io(_)));
    }

    #[test]
    fn test_macros() {
        let err = internal_error!("worker {} panicked", 3);
        assert_eq!(err.to_string(), "Internal error: worker 3 panicked");
    }
}
