//! Error types for store construction and read-back

use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Configuration missing or invalid
    E001InvalidConfig,
    /// E002: Backend operator could not be built
    E002OperatorInit,
    /// E003: Read operation failed
    E003ReadFailure,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E001InvalidConfig => "E001",
            Self::E002OperatorInit => "E002",
            Self::E003ReadFailure => "E003",
        }
    }
}

#[derive(Debug, Error)]
pub enum WriterError {
    /// Invalid configuration provided
    #[error("[{code}] Invalid storage configuration: {message}")]
    InvalidConfig { code: &'static str, message: String },

    /// OpenDAL rejected the backend settings
    #[error("[{code}] Failed to create {backend} operator for bucket '{bucket}': {reason}")]
    OperatorInit {
        code: &'static str,
        backend: &'static str,
        bucket: String,
        reason: String,
    },

    #[error("[{code}] Read failed for '{bucket}/{key}': {reason}")]
    ReadFailure {
        code: &'static str,
        bucket: String,
        key: String,
        reason: String,
    },
}

impl WriterError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            code: ErrorCode::E001InvalidConfig.as_str(),
            message: message.into(),
        }
    }

    pub fn operator_init(backend: &'static str, bucket: &str, reason: impl ToString) -> Self {
        Self::OperatorInit {
            code: ErrorCode::E002OperatorInit.as_str(),
            backend,
            bucket: bucket.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn read_failure(bucket: &str, key: &str, reason: impl ToString) -> Self {
        Self::ReadFailure {
            code: ErrorCode::E003ReadFailure.as_str(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { code, .. }
            | Self::OperatorInit { code, .. }
            | Self::ReadFailure { code, .. } => code,
        }
    }
}

/// Result type alias for WriterError
pub type Result<T> = std::result::Result<T, WriterError>;
