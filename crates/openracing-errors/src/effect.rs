//! Effect table error types.
//!
//! These are returned synchronously by the control path (`upload`, `play`).
//! A rejected call never mutates the effect table.

use crate::common::ErrorSeverity;

/// Rejections reported by effect upload and playback.
///
/// # Examples
///
/// ```
/// use openracing_errors::FfbError;
///
/// let err = FfbError::ZeroPeriod { id: 2 };
/// assert!(err.is_invalid_parameter());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum FfbError {
    /// Effect id does not address a slot of the fixed-size table
    #[error("effect id {id} is outside the effect table (capacity {capacity})")]
    InvalidEffectId {
        /// Requested effect id
        id: usize,
        /// Table capacity
        capacity: usize,
    },

    /// Periodic effect uploaded with a zero period
    #[error("periodic effect {id} has a zero period")]
    ZeroPeriod {
        /// Effect id
        id: usize,
    },

    /// Re-upload of a started effect tried to change its class
    #[error("effect {id} is started as {stored} and cannot be replaced by {requested}")]
    TypeMismatch {
        /// Effect id
        id: usize,
        /// Class of the effect currently stored
        stored: &'static str,
        /// Class of the rejected upload
        requested: &'static str,
    },

    /// Effect class not supported by the device
    #[error("effect class {kind} is not supported by this device")]
    UnsupportedEffect {
        /// Rejected class
        kind: &'static str,
    },

    /// Playback requested for an id that has never been uploaded
    #[error("effect {id} has not been uploaded")]
    NotUploaded {
        /// Effect id
        id: usize,
    },
}

impl FfbError {
    /// Whether the rejection is an invalid-parameter condition.
    pub fn is_invalid_parameter(self) -> bool {
        matches!(
            self,
            FfbError::InvalidEffectId { .. }
                | FfbError::ZeroPeriod { .. }
                | FfbError::TypeMismatch { .. }
                | FfbError::NotUploaded { .. }
        )
    }

    /// Get the error severity.
    pub fn severity(self) -> ErrorSeverity {
        ErrorSeverity::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_classification() {
        assert!(FfbError::ZeroPeriod { id: 0 }.is_invalid_parameter());
        assert!(
            FfbError::TypeMismatch {
                id: 1,
                stored: "spring",
                requested: "damper",
            }
            .is_invalid_parameter()
        );
        assert!(!FfbError::UnsupportedEffect { kind: "ramp" }.is_invalid_parameter());
    }

    #[test]
    fn test_display() {
        let err = FfbError::InvalidEffectId {
            id: 16,
            capacity: 16,
        };
        assert_eq!(
            err.to_string(),
            "effect id 16 is outside the effect table (capacity 16)"
        );
    }

    #[test]
    fn test_ffb_error_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<FfbError>();
    }
}
