//! Command channel error types.

use crate::common::ErrorSeverity;

/// Failures of the outbound command channel.
///
/// The tick path never propagates these; it logs them and bumps a counter.
/// Control-path commands (autocenter, range, LEDs) return them to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum TransportError {
    /// Outbound queue is full
    #[error("outbound command queue is full")]
    QueueFull,

    /// Channel has been shut down
    #[error("command channel is closed")]
    Closed,

    /// Device rejected or failed to accept a report
    #[error("device write failed")]
    WriteFailed,
}

impl TransportError {
    /// Get the error severity.
    pub fn severity(self) -> ErrorSeverity {
        match self {
            TransportError::QueueFull => ErrorSeverity::Warning,
            TransportError::Closed => ErrorSeverity::Critical,
            TransportError::WriteFailed => ErrorSeverity::Error,
        }
    }

    /// Check if a later attempt can succeed without reopening the channel.
    pub fn is_transient(self) -> bool {
        matches!(self, TransportError::QueueFull)
    }
}
