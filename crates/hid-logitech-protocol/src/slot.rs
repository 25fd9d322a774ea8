//! The four hardware force slots and their 7-byte commands.
//!
//! ```text
//! Byte 0: (0x10 << slot) + opcode
//!   Opcodes: 0x01 = start, 0x03 = stop, 0x0c = update
//! Bytes 1-6: slot-specific payload
//! ```
//!
//! | Slot | Class    | Byte 1 | Payload |
//! |------|----------|--------|---------|
//! | 0    | Constant | `0x00` | force byte at `2 + slot` (`0x80` = none) |
//! | 1    | Spring   | `0x0b` | 11-bit deadband edges, 4-bit coefficients, sign bits, 8-bit clip |
//! | 2    | Damper   | `0x0c` | 4-bit coefficients, sign bytes, 8-bit clip |
//! | 3    | Friction | `0x0e` | 8-bit coefficients, 8-bit clip, sign nibble |
//!
//! A slot only reports a command as pending when its bytes changed. A start
//! opcode is compared as if it were an update so that the start-then-update
//! handover of an unchanged force does not cost a transfer.

use openracing_ffb::{
    ChannelParameters, SLOT_CONSTANT, SLOT_COUNT, SLOT_DAMPER, SLOT_FRICTION, SLOT_SPRING,
};
use tracing::trace;

use crate::quant::{byte, clamp_s16, scale_coeff, scale_u16, translate_force};

/// Wire size of every slot and vendor command.
pub const COMMAND_LEN: usize = 7;

/// One 7-byte device command.
pub type Command = [u8; COMMAND_LEN];

/// Opcodes carried in the low nibble of byte 0.
pub mod opcodes {
    pub const START: u8 = 0x01;
    pub const STOP: u8 = 0x03;
    pub const UPDATE: u8 = 0x0c;
}

/// Slot-specific byte 1.
mod class_bytes {
    pub const CONSTANT: u8 = 0x00;
    pub const SPRING: u8 = 0x0b;
    pub const DAMPER: u8 = 0x0c;
    pub const FRICTION: u8 = 0x0e;
}

/// Effect class bound to a hardware slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Constant,
    Spring,
    Damper,
    Friction,
}

impl SlotKind {
    /// Slot kinds in slot order.
    pub const ALL: [SlotKind; SLOT_COUNT] = [
        SlotKind::Constant,
        SlotKind::Spring,
        SlotKind::Damper,
        SlotKind::Friction,
    ];

    pub fn index(self) -> usize {
        match self {
            SlotKind::Constant => SLOT_CONSTANT,
            SlotKind::Spring => SLOT_SPRING,
            SlotKind::Damper => SLOT_DAMPER,
            SlotKind::Friction => SLOT_FRICTION,
        }
    }

    fn class_byte(self) -> u8 {
        match self {
            SlotKind::Constant => class_bytes::CONSTANT,
            SlotKind::Spring => class_bytes::SPRING,
            SlotKind::Damper => class_bytes::DAMPER,
            SlotKind::Friction => class_bytes::FRICTION,
        }
    }
}

/// Wire state of one slot: last opcode, last command and whether it still
/// has to be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    kind: SlotKind,
    opcode: Option<u8>,
    command: Command,
    dirty: bool,
}

impl Slot {
    pub fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            opcode: None,
            command: [0; COMMAND_LEN],
            dirty: false,
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Opcode of the last encoded command, `None` before the first encode.
    pub fn opcode(&self) -> Option<u8> {
        self.opcode
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Re-encodes the slot from this tick's parameters. Returns whether a
    /// command is pending afterwards.
    pub fn update(&mut self, params: &ChannelParameters) -> bool {
        let previous = normalized(self.command);
        let opcode = self.next_opcode(params);
        self.opcode = Some(opcode);

        let index = self.kind.index();
        let mut cmd = [0; COMMAND_LEN];
        cmd[0] = (0x10_u8 << index) + opcode;
        if opcode != opcodes::STOP {
            cmd[1] = self.kind.class_byte();
            encode_payload(self.kind, params, &mut cmd);
        }
        self.command = cmd;

        if cmd != previous {
            self.dirty = true;
        }
        self.dirty
    }

    /// Pending command, clearing the pending flag.
    pub fn take(&mut self) -> Option<Command> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.command)
    }

    fn next_opcode(&self, params: &ChannelParameters) -> u8 {
        match self.kind {
            SlotKind::Constant => match self.opcode {
                None => opcodes::START,
                Some(_) => opcodes::UPDATE,
            },
            _ if params.clip == 0 => opcodes::STOP,
            _ if self.opcode == Some(opcodes::STOP) => opcodes::START,
            _ => opcodes::UPDATE,
        }
    }
}

/// A start command compares equal to the update carrying the same payload.
fn normalized(mut cmd: Command) -> Command {
    if cmd[0] & 0x0f == opcodes::START {
        cmd[0] = (cmd[0] & 0xf0) + opcodes::UPDATE;
    }
    cmd
}

fn encode_payload(kind: SlotKind, p: &ChannelParameters, cmd: &mut Command) {
    let k1 = i64::from(p.k1);
    let k2 = i64::from(p.k2);
    let s1 = u8::from(p.k1 < 0);
    let s2 = u8::from(p.k2 < 0);
    let clip = byte(scale_u16(i64::from(p.clip), 8));

    match kind {
        SlotKind::Constant => {
            cmd[2 + kind.index()] = translate_force(i64::from(p.level));
        }
        SlotKind::Spring => {
            let d1 = deadband_edge(p.d1);
            let d2 = deadband_edge(p.d2);
            cmd[2] = byte(d1 >> 3);
            cmd[3] = byte(d2 >> 3);
            cmd[4] = (byte(scale_coeff(k2, 4)) << 4) + byte(scale_coeff(k1, 4));
            cmd[5] = (byte(d2 & 7) << 5) + (byte(d1 & 7) << 1) + (s2 << 4) + s1;
            cmd[6] = clip;
        }
        SlotKind::Damper => {
            cmd[2] = byte(scale_coeff(k1, 4));
            cmd[3] = s1;
            cmd[4] = byte(scale_coeff(k2, 4));
            cmd[5] = s2;
            cmd[6] = clip;
        }
        SlotKind::Friction => {
            cmd[2] = byte(scale_coeff(k1, 8));
            cmd[3] = byte(scale_coeff(k2, 8));
            cmd[4] = clip;
            cmd[5] = (s2 << 4) + s1;
        }
    }
}

/// Signed position mapped to an unsigned 11-bit value (`0x400` = center).
fn deadband_edge(d: i32) -> u16 {
    scale_u16(i64::from(clamp_s16(i64::from(d))) + 0x8000, 11)
}

/// Commands produced by one encode pass, in slot order. Fixed capacity, no
/// allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotBatch {
    commands: [Command; SLOT_COUNT],
    len: usize,
}

impl SlotBatch {
    fn push(&mut self, cmd: Command) {
        if let Some(entry) = self.commands.get_mut(self.len) {
            *entry = cmd;
            self.len += 1;
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

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.as_slice().iter()
    }
}

/// The four slots of one device.
///
/// # Examples
///
/// ```
/// use openracing_ffb::ChannelParameters;
/// use racing_wheel_hid_logitech_protocol::SlotBank;
///
/// let mut bank = SlotBank::new();
/// bank.initialize();
///
/// let mut channels = [ChannelParameters::default(); 4];
/// channels[0].level = 16000;
/// let batch = bank.encode(&channels);
/// assert_eq!(batch.as_slice(), &[[0x1c, 0x00, 0xbe, 0x00, 0x00, 0x00, 0x00]]);
///
/// // Unchanged parameters produce nothing to send.
/// assert!(bank.encode(&channels).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SlotBank {
    slots: [Slot; SLOT_COUNT],
}

impl Default for SlotBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotBank {
    pub fn new() -> Self {
        Self {
            slots: SlotKind::ALL.map(Slot::new),
        }
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Forgets all wire state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Resets the bank and encodes neutral parameters into every slot.
    /// Returns all four commands, which the device needs regardless of the
    /// change detection.
    pub fn initialize(&mut self) -> SlotBatch {
        self.reset();
        let neutral = ChannelParameters::default();
        let mut batch = SlotBatch::default();
        for slot in &mut self.slots {
            slot.update(&neutral);
            batch.push(*slot.command());
            slot.dirty = false;
        }
        batch
    }

    /// Encodes this tick's parameters and returns the commands that changed,
    /// in ascending slot order.
    pub fn encode(&mut self, channels: &[ChannelParameters; SLOT_COUNT]) -> SlotBatch {
        let mut batch = SlotBatch::default();
        for (slot, params) in self.slots.iter_mut().zip(channels) {
            slot.update(params);
            if let Some(cmd) = slot.take() {
                trace!(slot = slot.kind.index(), ?cmd, "slot changed");
                batch.push(cmd);
            }
        }
        batch
    }
}
