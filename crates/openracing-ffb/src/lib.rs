//! Force feedback effect model, lifecycle and mixing
//!
//! This crate holds the device-independent half of the compositor: the
//! fixed-capacity [`EffectTable`] with its per-effect state machine, the
//! per-class evaluators and the [`Mixer`] that folds every playing effect
//! into four actuator channels. Wire encoding lives in the protocol crate.
//!
//! Everything here is integer arithmetic with explicit truncation, so the
//! output is bit-exact across platforms.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod constants;
pub mod effects;
pub mod evaluate;
pub mod fixed;
pub mod mixer;
pub mod state;
pub mod table;
pub mod time;

pub use constants::*;
pub use effects::*;
pub use mixer::{ChannelParameters, MixSettings, Mixer};
pub use state::{EffectState, Expiry, Lifecycle};
pub use table::{EffectTable, PlayOutcome};
pub use time::Timestamp;
