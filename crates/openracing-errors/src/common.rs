//! Common error types and classification used across the compositor crates.

use core::fmt;

use crate::{FfbError, TransportError, ValidationError};

/// Top-level error type that wraps all sub-errors.
#[derive(Debug, thiserror::Error)]
pub enum OpenRacingError {
    /// Effect upload/play rejections
    #[error("Effect error: {0}")]
    Effect(#[from] FfbError),

    /// Command channel failures
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl OpenRacingError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            OpenRacingError::Effect(_) => ErrorCategory::Effect,
            OpenRacingError::Transport(_) => ErrorCategory::Transport,
            OpenRacingError::Validation(_) => ErrorCategory::Validation,
            OpenRacingError::Io(_) => ErrorCategory::IO,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            OpenRacingError::Effect(e) => e.severity(),
            OpenRacingError::Transport(e) => e.severity(),
            OpenRacingError::Validation(e) => e.severity(),
            OpenRacingError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Check if this error is recoverable.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }
}

impl From<std::io::Error> for OpenRacingError {
    fn from(e: std::io::Error) -> Self {
        OpenRacingError::Io(e)
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Effect table errors
    Effect = 0,
    /// Command channel errors
    Transport = 1,
    /// Validation errors
    Validation = 2,
    /// I/O errors
    IO = 3,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Effect => write!(f, "Effect"),
            ErrorCategory::Transport => write!(f, "Transport"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::IO => write!(f, "IO"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, system may be in unstable state
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
