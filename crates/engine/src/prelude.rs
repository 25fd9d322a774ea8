//! Prelude module for common engine types
//!
//! This module provides a convenient way to import the most commonly used
//! types from the force feedback engine.

// Engine and configuration
pub use crate::config::EngineConfig;
pub use crate::device::DeviceDescriptor;
pub use crate::engine::{Engine, TickReport};

// Ports and the supplied channel
pub use crate::channel::QueuedChannel;
pub use crate::ports::{Clock, CommandChannel, MonotonicClock, ReportWriter};

// Diagnostics
pub use crate::leds::{LevelClass, LevelObserver};

// Effect model
pub use openracing_ffb::{
    Condition, ConstantForce, Effect, Envelope, PeriodicForce, PlayOutcome, RampForce, Replay,
    Waveform,
};

// Test harness for development
#[cfg(any(test, feature = "harness"))]
pub use crate::test_harness::{ManualClock, RecordingChannel};
