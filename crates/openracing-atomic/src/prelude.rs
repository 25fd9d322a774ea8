//! Prelude for common atomic types.

pub use crate::counters::{CounterSnapshot, EngineCounters};
pub use crate::peak::PeakLevel;
