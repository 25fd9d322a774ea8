//! Device-wide command encoding: slot mode, stop, autocenter, range and LEDs.
//!
//! All functions are pure and allocation-free. Every command is
//! [`COMMAND_LEN`] bytes and is written with the same output report as the
//! slot commands.
//!
//! # Protocol notes
//!
//! Autocenter on every wheel except the Formula Force EX is a two-step
//! sequence:
//!
//! 1. `{0xFE, 0x0D, a, a, b, 0, 0}` configure spring parameters
//! 2. `{0x14, 0, 0, 0, 0, 0, 0}` activate
//!
//! and `{0xF5, 0, 0, 0, 0, 0, 0}` turns it off. The Formula Force EX takes a
//! single `{0xFE, 0x03, ...}` command instead.
//!
//! The Driving Force Pro sets its range with a coarse limit (200 or 900
//! degrees) followed by a fine limit; later wheels take the range in degrees
//! directly.

use crate::ids::{commands, subcommands};
use crate::quant::byte;
use crate::slot::{COMMAND_LEN, Command};

/// Lowest range any wheel accepts.
pub const MIN_RANGE_DEG: u16 = 40;

/// Full rotation of the DFP and later wheels.
pub const MAX_RANGE_DEG: u16 = 900;

/// DFP coarse limit used for ranges up to and including this value.
const DFP_SHORT_RANGE_DEG: u16 = 200;

/// Autocenter magnitude where the spring curve changes slope.
const AUTOCENTER_KNEE: u32 = 0xaaaa;

/// Up to two commands that must be sent back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandSequence {
    commands: [Command; 2],
    len: usize,
}

impl CommandSequence {
    fn one(cmd: Command) -> Self {
        Self {
            commands: [cmd, [0; COMMAND_LEN]],
            len: 1,
        }
    }

    fn two(first: Command, second: Command) -> Self {
        Self {
            commands: [first, second],
            len: 2,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands[..self.len]
    }
}

fn command(head: u8, body: [u8; COMMAND_LEN - 1]) -> Command {
    let [b1, b2, b3, b4, b5, b6] = body;
    [head, b1, b2, b3, b4, b5, b6]
}

/// Build the slot-mode command sent before slot initialization.
///
/// In fixed-loop mode the wheel keeps replaying the last slot command; the
/// engine otherwise runs the wheel in its default streaming mode.
pub fn build_fixed_loop_report(enabled: bool) -> Command {
    command(commands::FIXED_LOOP, [u8::from(enabled), 0, 0, 0, 0, 0])
}

/// Build the command that stops all four force slots.
pub fn build_stop_all_report() -> Command {
    command(commands::STOP_ALL, [0; 6])
}

/// Build the command that turns the centering spring off.
pub fn build_autocenter_off_report() -> Command {
    command(commands::AUTOCENTER_OFF, [0; 6])
}

/// Build the command that turns the centering spring on.
pub fn build_autocenter_activate_report() -> Command {
    command(commands::AUTOCENTER_ON, [0; 6])
}

/// Build the centering spring parameter command for all wheels except the
/// Formula Force EX.
///
/// `magnitude` is on the 16-bit gain scale. The stiffness rises at
/// `0x0c` per step up to `0xaaaa` and at `0x06` beyond it; the clip rises at
/// `0x80` and then `0xff`. Non-MOMO wheels take half the stiffness.
pub fn build_autocenter_spring_report(magnitude: u16, momo: bool) -> Command {
    let magnitude = u32::from(magnitude);
    let (mut expand_a, expand_b) = if magnitude <= AUTOCENTER_KNEE {
        (0x0c * magnitude, 0x80 * magnitude)
    } else {
        let over = magnitude - AUTOCENTER_KNEE;
        (
            0x0c * AUTOCENTER_KNEE + 0x06 * over,
            0x80 * AUTOCENTER_KNEE + 0xff * over,
        )
    };
    if !momo {
        expand_a >>= 1;
    }
    let a = u8::try_from(expand_a / AUTOCENTER_KNEE).unwrap_or(u8::MAX);
    let b = u8::try_from(expand_b / AUTOCENTER_KNEE).unwrap_or(u8::MAX);
    command(
        commands::AUTOCENTER_SPRING,
        [subcommands::AUTOCENTER_DEFAULT, a, a, b, 0, 0],
    )
}

/// Full autocenter sequence for all wheels except the Formula Force EX.
///
/// ```
/// use racing_wheel_hid_logitech_protocol::build_set_autocenter_reports;
///
/// assert_eq!(build_set_autocenter_reports(0, false).as_slice(), &[[0xf5, 0, 0, 0, 0, 0, 0]]);
/// assert_eq!(build_set_autocenter_reports(0x8000, false).len(), 2);
/// ```
pub fn build_set_autocenter_reports(magnitude: u16, momo: bool) -> CommandSequence {
    if magnitude == 0 {
        return CommandSequence::one(build_autocenter_off_report());
    }
    CommandSequence::two(
        build_autocenter_spring_report(magnitude, momo),
        build_autocenter_activate_report(),
    )
}

/// Build the Formula Force EX autocenter command. The magnitude is rescaled
/// to `0..=90`.
pub fn build_autocenter_ffex_report(magnitude: u16) -> Command {
    let scaled = u32::from(magnitude) * 90 / u32::from(u16::MAX);
    let high = u8::try_from(scaled >> 14).unwrap_or(u8::MAX);
    let low = u8::try_from(scaled & 0xff).unwrap_or(u8::MAX);
    command(
        commands::AUTOCENTER_SPRING,
        [subcommands::AUTOCENTER_FFEX, high, high, low, 0, 0],
    )
}

/// Build the G25-style set-range command (G25, G27, DFGT, G29).
///
/// `degrees` is the full rotation range, sent little-endian.
pub fn build_set_range_report(degrees: u16) -> Command {
    let [lsb, msb] = degrees.to_le_bytes();
    command(
        commands::EXTENDED,
        [subcommands::SET_RANGE, lsb, msb, 0, 0, 0],
    )
}

/// Build the Driving Force Pro range sequence: a coarse 200/900 degree limit
/// followed by the fine limit. `degrees` is clamped to 40..=900.
///
/// ```
/// use racing_wheel_hid_logitech_protocol::build_set_range_dfp_reports;
///
/// let seq = build_set_range_dfp_reports(900);
/// assert_eq!(seq.as_slice()[0], [0xf8, 0x03, 0, 0, 0, 0, 0]);
/// assert_eq!(seq.as_slice()[1], [0x81, 0x0b, 0, 0, 0, 0, 0]);
/// ```
pub fn build_set_range_dfp_reports(degrees: u16) -> CommandSequence {
    let range = degrees.clamp(MIN_RANGE_DEG, MAX_RANGE_DEG);
    let (coarse, full_range) = if range > DFP_SHORT_RANGE_DEG {
        (subcommands::DFP_RANGE_900, MAX_RANGE_DEG)
    } else {
        (subcommands::DFP_RANGE_200, DFP_SHORT_RANGE_DEG)
    };
    let coarse = command(commands::EXTENDED, [coarse, 0, 0, 0, 0, 0]);

    if range == full_range {
        let fine = command(
            commands::DFP_FINE_RANGE,
            [subcommands::DFP_FINE_RANGE, 0, 0, 0, 0, 0],
        );
        return CommandSequence::two(coarse, fine);
    }

    let full = u32::from(full_range);
    let start_left = ((full - u32::from(range) + 1) * 2047) / full;
    let start_right = 0xfff - start_left;
    let left = u16::try_from(start_left).unwrap_or(u16::MAX);
    let right = u16::try_from(start_right).unwrap_or(u16::MAX);

    let fine = command(
        commands::DFP_FINE_RANGE,
        [
            subcommands::DFP_FINE_RANGE,
            byte(left >> 4),
            byte(right >> 4),
            0xff,
            byte(((right & 0xe) << 4) | (left & 0xe)),
            0xff,
        ],
    );
    CommandSequence::two(coarse, fine)
}

/// Build the rev-light LED command.
///
/// `led_mask` is a 5-bit bitmask: bit 0 = LED 1 (leftmost), bit 4 = LED 5 (rightmost).
pub fn build_set_leds_report(led_mask: u8) -> Command {
    command(
        commands::EXTENDED,
        [subcommands::SET_LEDS, led_mask & 0x1F, 0, 0, 0, 0],
    )
}
