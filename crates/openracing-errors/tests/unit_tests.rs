//! Unit tests for all error variants.
//!
//! Tests Display implementations, std::error::Error implementations,
//! and From conversions.

use openracing_errors::{
    Result,
    common::{ErrorCategory, ErrorSeverity, OpenRacingError},
    effect::FfbError,
    transport::TransportError,
    validation::ValidationError,
};

mod effect_error_tests {
    use super::*;

    #[test]
    fn test_all_variants_display() -> Result<()> {
        let variants = [
            FfbError::InvalidEffectId {
                id: 20,
                capacity: 16,
            },
            FfbError::ZeroPeriod { id: 1 },
            FfbError::TypeMismatch {
                id: 2,
                stored: "spring",
                requested: "constant",
            },
            FfbError::UnsupportedEffect { kind: "ramp" },
            FfbError::NotUploaded { id: 5 },
        ];

        for variant in variants {
            let msg = variant.to_string();
            assert!(!msg.is_empty(), "FfbError variant should have display message");
        }
        Ok(())
    }

    #[test]
    fn test_std_error_impl() -> Result<()> {
        let err = FfbError::ZeroPeriod { id: 0 };
        let _: &dyn std::error::Error = &err;
        Ok(())
    }

    #[test]
    fn test_type_mismatch_names_both_classes() -> Result<()> {
        let err = FfbError::TypeMismatch {
            id: 7,
            stored: "damper",
            requested: "friction",
        };
        let msg = err.to_string();
        assert!(msg.contains("damper"));
        assert!(msg.contains("friction"));
        assert!(msg.contains('7'));
        Ok(())
    }
}

mod conversion_tests {
    use super::*;

    #[test]
    fn test_from_effect_error() -> Result<()> {
        let err: OpenRacingError = FfbError::NotUploaded { id: 3 }.into();
        assert_eq!(err.category(), ErrorCategory::Effect);
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        Ok(())
    }

    #[test]
    fn test_from_transport_error() -> Result<()> {
        let err: OpenRacingError = TransportError::WriteFailed.into();
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(err.to_string().contains("device write failed"));
        Ok(())
    }

    #[test]
    fn test_from_validation_error() -> Result<()> {
        let err: OpenRacingError = ValidationError::out_of_range("gain", 70_000, 0, 65_535).into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.is_recoverable());
        Ok(())
    }

    #[test]
    fn test_from_io_error() -> Result<()> {
        let io = std::io::Error::other("pipe closed");
        let err: OpenRacingError = io.into();
        assert_eq!(err.category(), ErrorCategory::IO);
        Ok(())
    }

    #[test]
    fn test_question_mark_propagation() -> Result<()> {
        fn reject() -> Result<()> {
            let upload: std::result::Result<(), FfbError> = Err(FfbError::ZeroPeriod { id: 9 });
            upload?;
            Ok(())
        }
        match reject() {
            Err(OpenRacingError::Effect(FfbError::ZeroPeriod { id })) => assert_eq!(id, 9),
            other => return Err(OpenRacingError::Io(std::io::Error::other(format!("{other:?}")))),
        }
        Ok(())
    }
}
