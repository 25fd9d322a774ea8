//! Centralized error types for the OpenRacing force-feedback compositor
//!
//! This crate provides the error vocabulary shared by the effect table, the
//! slot encoder, the tick scheduler and the engine. It distinguishes between
//! control-path failures (reported to the caller) and transport failures
//! (which the tick path only logs and counts).
//!
//! # Architecture
//!
//! - [`common`]: Top-level error type, classification and severity
//! - [`effect`]: Effect upload/play rejections
//! - [`transport`]: Command channel failures
//! - [`validation`]: Configuration validation failures
//!
//! # RT Safety
//!
//! [`FfbError`] and [`TransportError`] are `Copy` and allocation-free so the
//! tick path can create and log them without touching the heap.
//!
//! # Example
//!
//! ```
//! use openracing_errors::prelude::*;
//!
//! fn check_period(period_ms: u16) -> Result<()> {
//!     if period_ms == 0 {
//!         return Err(FfbError::ZeroPeriod { id: 3 }.into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_period(0).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod effect;
pub mod prelude;
pub mod transport;
pub mod validation;

pub use common::{ErrorCategory, ErrorSeverity, OpenRacingError};
pub use effect::FfbError;
pub use transport::TransportError;
pub use validation::ValidationError;

/// A specialized `Result` type for OpenRacing operations.
pub type Result<T> = std::result::Result<T, OpenRacingError>;

/// A specialized `Result` type for effect table operations.
pub type FfbResult<T = ()> = std::result::Result<T, FfbError>;
