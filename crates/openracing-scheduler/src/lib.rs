//! Backpressure-aware periodic tick scheduling for force feedback engines.
//!
//! This crate decides when an engine tick runs and provides the thread that
//! fires it:
//!
//! - **BackpressurePolicy**: fixed, static (period doubling) or dynamic
//!   (per-tick retry) reaction to a busy outbound command queue
//! - **TickScheduler**: per-tick admission and restart/stop decisions
//! - **TimerDriver**: one-shot timer thread with race-free re-arming
//!
//! # RT-Safety Guarantees
//!
//! - **No heap allocations** in [`TickScheduler`]
//! - **No blocking operations** in admission decisions
//! - **Bounded execution time** for all operations
//!
//! # Example
//!
//! ```
//! use openracing_scheduler::{Admission, SchedulerConfig, TickScheduler, TimerAction};
//!
//! let mut scheduler = TickScheduler::new(SchedulerConfig::default());
//! if scheduler.admit(false) == Admission::Run {
//!     // Evaluate effects and transmit changed slots here
//! }
//! assert_eq!(scheduler.after_tick(1), TimerAction::Restart { delay_ms: 2 });
//! assert_eq!(scheduler.after_tick(0), TimerAction::Stop);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]

pub mod driver;
pub mod policy;
pub mod tick;

pub mod prelude;

pub use driver::{TIMER_THREAD_NAME, TickTarget, TimerDriver, TimerHandle};
pub use policy::{BackpressurePolicy, SchedulerConfig};
pub use tick::{Admission, TickScheduler, TimerAction};

/// Default tick period in milliseconds.
pub const DEFAULT_PERIOD_MS: u32 = 2;
