//! Racing Wheel FFB Engine - Timer-driven force feedback compositor
//!
//! This crate ties the effect table, mixer and slot encoder to a wheel: it
//! owns the locks, runs the tick on a dedicated timer thread, queues device
//! commands through a [`CommandChannel`] and publishes diagnostics.
//!
//! ```
//! use std::sync::Arc;
//!
//! use openracing_errors::TransportError;
//! use openracing_ffb::{ConstantForce, Effect};
//! use racing_wheel_ffb_engine::{DeviceDescriptor, Engine, EngineConfig, QueuedChannel};
//! use racing_wheel_hid_logitech_protocol::{Command, LogitechModel};
//!
//! let channel = Arc::new(QueuedChannel::spawn(|_report: &Command| Ok::<(), TransportError>(()))?);
//! let engine = Arc::new(Engine::new(
//!     DeviceDescriptor::from_model(LogitechModel::G27),
//!     EngineConfig::default(),
//!     channel,
//! )?);
//! let mut timer = engine.spawn_timer()?;
//!
//! engine.init_slots()?;
//! engine.upload(Effect::constant(0, ConstantForce::new(16000)).with_direction(0x4000))?;
//! engine.play(0, 1)?;
//!
//! engine.play(0, 0)?;
//! timer.shutdown();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod channel;
pub mod config;
pub mod device;
pub mod engine;
pub mod leds;
pub mod ports;
pub mod prelude;
#[cfg(any(test, feature = "harness"))]
pub mod test_harness;

pub use channel::{DEFAULT_QUEUE_CAPACITY, QueuedChannel, WRITER_THREAD_NAME};
pub use config::{EngineConfig, MAX_TIMER_PERIOD_MS};
pub use device::DeviceDescriptor;
pub use engine::{Engine, TickReport};
pub use leds::{DEFAULT_LEVEL_WINDOW_MS, LevelClass, LevelMeter, LevelObserver};
pub use ports::{Clock, CommandChannel, MonotonicClock, ReportWriter};
#[cfg(any(test, feature = "harness"))]
pub use test_harness::{ManualClock, RecordingChannel};
