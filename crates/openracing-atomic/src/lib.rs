//! # openracing-atomic
//!
//! RT-safe atomic counters and peak trackers for force feedback diagnostics.
//!
//! These primitives can be used in the tick path without allocations, blocking,
//! or syscalls, and read from any other thread.
//!
//! ## Safety Guarantees
//!
//! - **No heap allocations**
//! - **No blocking operations** - all methods are lock-free
//! - **No syscalls** in RT hot paths
//! - **Deterministic execution time** for all operations
//!
//! ## Usage
//!
//! ```rust
//! use openracing_atomic::{EngineCounters, PeakLevel};
//!
//! let counters = EngineCounters::new();
//! let peak = PeakLevel::new();
//!
//! // Tick path
//! counters.inc_tick();
//! peak.record(16000);
//!
//! // Diagnostics path
//! let values = counters.snapshot_and_reset();
//! assert_eq!(values.total_ticks, 1);
//! assert_eq!(peak.take(), 16000);
//! ```

#![no_std]
#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod counters;
pub mod peak;

pub mod prelude;

pub use counters::{CounterSnapshot, EngineCounters};
pub use peak::PeakLevel;
