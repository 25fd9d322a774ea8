//! Prelude module for common scheduler types.
//!
//! This module provides a convenient way to import the most commonly used
//! types from the scheduler crate.

pub use crate::DEFAULT_PERIOD_MS;
pub use crate::driver::{TickTarget, TimerDriver, TimerHandle};
pub use crate::policy::{BackpressurePolicy, SchedulerConfig};
pub use crate::tick::{Admission, TickScheduler, TimerAction};
