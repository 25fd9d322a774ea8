//! Logitech 4-slot force feedback protocol: slot encoding and device commands.
//!
//! This crate is intentionally I/O-free and allocation-free on hot paths.
//! It provides pure functions and types that can be tested without hardware.

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod output;
pub mod quant;
pub mod slot;
pub mod types;

pub use ids::{LOGITECH_VENDOR_ID, product_ids};
pub use output::{
    CommandSequence, MAX_RANGE_DEG, MIN_RANGE_DEG, build_autocenter_ffex_report,
    build_fixed_loop_report, build_set_autocenter_reports, build_set_leds_report,
    build_set_range_dfp_reports, build_set_range_report, build_stop_all_report,
};
pub use slot::{COMMAND_LEN, Command, Slot, SlotBank, SlotBatch, SlotKind, opcodes};
pub use types::{AutocenterStyle, LogitechModel, RangeStyle, is_wheel_product};
