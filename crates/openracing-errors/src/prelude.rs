//! Prelude module for convenient error handling imports.
//!
//! ```
//! use openracing_errors::prelude::*;
//!
//! fn send() -> Result<()> {
//!     Err(TransportError::QueueFull.into())
//! }
//!
//! assert!(send().is_err());
//! ```

pub use crate::{
    FfbResult, Result,
    common::{ErrorCategory, ErrorSeverity, OpenRacingError},
    effect::FfbError,
    transport::TransportError,
    validation::ValidationError,
};
