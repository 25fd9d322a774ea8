//! FFB effect types

use serde::{Deserialize, Serialize};

use crate::constants::{SLOT_CONSTANT, SLOT_DAMPER, SLOT_FRICTION, SLOT_SPRING};

/// Class of a force feedback effect
///
/// # Examples
///
/// ```
/// use openracing_ffb::EffectKind;
///
/// assert_eq!(EffectKind::Ramp.slot(), 0);
/// assert_eq!(EffectKind::Damper.slot(), 2);
/// assert_eq!(EffectKind::Friction.name(), "friction");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Constant,
    Ramp,
    Periodic,
    Spring,
    Damper,
    Friction,
}

impl EffectKind {
    /// All effect classes in declaration order.
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Constant,
        EffectKind::Ramp,
        EffectKind::Periodic,
        EffectKind::Spring,
        EffectKind::Damper,
        EffectKind::Friction,
    ];

    /// Actuator slot this class is mixed into.
    pub const fn slot(self) -> usize {
        match self {
            EffectKind::Constant | EffectKind::Ramp | EffectKind::Periodic => SLOT_CONSTANT,
            EffectKind::Spring => SLOT_SPRING,
            EffectKind::Damper => SLOT_DAMPER,
            EffectKind::Friction => SLOT_FRICTION,
        }
    }

    /// Lower-case class name used in logs and errors.
    pub const fn name(self) -> &'static str {
        match self {
            EffectKind::Constant => "constant",
            EffectKind::Ramp => "ramp",
            EffectKind::Periodic => "periodic",
            EffectKind::Spring => "spring",
            EffectKind::Damper => "damper",
            EffectKind::Friction => "friction",
        }
    }

    /// Whether the class carries an attack/fade envelope.
    pub const fn has_envelope(self) -> bool {
        matches!(
            self,
            EffectKind::Constant | EffectKind::Ramp | EffectKind::Periodic
        )
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of effect classes, used by device descriptors to advertise support.
///
/// ```
/// use openracing_ffb::{EffectClassSet, EffectKind};
///
/// let set = EffectClassSet::empty()
///     .with(EffectKind::Constant)
///     .with(EffectKind::Spring);
/// assert!(set.contains(EffectKind::Spring));
/// assert!(!set.contains(EffectKind::Ramp));
/// assert!(EffectClassSet::all().contains(EffectKind::Ramp));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectClassSet(u8);

impl EffectClassSet {
    /// No classes.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every class the compositor can render.
    pub const fn all() -> Self {
        Self(0b0011_1111)
    }

    /// Returns the set with `kind` added.
    #[must_use]
    pub const fn with(self, kind: EffectKind) -> Self {
        Self(self.0 | kind.bit())
    }

    /// Returns the set with `kind` removed.
    #[must_use]
    pub const fn without(self, kind: EffectKind) -> Self {
        Self(self.0 & !kind.bit())
    }

    pub const fn contains(self, kind: EffectKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the classes in the set.
    pub fn iter(self) -> impl Iterator<Item = EffectKind> {
        EffectKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl Default for EffectClassSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Replay timing. A zero `length_ms` means the effect plays until stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Replay {
    pub length_ms: u16,
    pub delay_ms: u16,
}

impl Replay {
    pub const fn infinite() -> Self {
        Self {
            length_ms: 0,
            delay_ms: 0,
        }
    }

    pub const fn new(length_ms: u16, delay_ms: u16) -> Self {
        Self {
            length_ms,
            delay_ms,
        }
    }

    pub const fn is_infinite(&self) -> bool {
        self.length_ms == 0
    }
}

/// Attack/fade envelope. Zero-length segments disable blending for that segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub attack_length: u16,
    pub attack_level: u16,
    pub fade_length: u16,
    pub fade_level: u16,
}

impl Envelope {
    pub const fn attack(length: u16, level: u16) -> Self {
        Self {
            attack_length: length,
            attack_level: level,
            fade_length: 0,
            fade_level: 0,
        }
    }

    #[must_use]
    pub const fn with_fade(mut self, length: u16, level: u16) -> Self {
        self.fade_length = length;
        self.fade_level = level;
        self
    }
}

/// Periodic waveform shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Square,
    Triangle,
    Sine,
    SawUp,
    SawDown,
}

/// Constant force payload
///
/// ```
/// use openracing_ffb::{ConstantForce, Envelope};
///
/// let force = ConstantForce::new(-12000).with_envelope(Envelope::attack(100, 0));
/// assert_eq!(force.level, -12000);
/// assert_eq!(force.envelope.attack_length, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstantForce {
    pub level: i16,
    #[serde(default)]
    pub envelope: Envelope,
}

impl ConstantForce {
    pub const fn new(level: i16) -> Self {
        Self {
            level,
            envelope: Envelope::attack(0, 0),
        }
    }

    #[must_use]
    pub const fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }
}

/// Ramp payload: level moves linearly from `start_level` to `end_level`
/// over the part of the replay not covered by the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RampForce {
    pub start_level: i16,
    pub end_level: i16,
    #[serde(default)]
    pub envelope: Envelope,
}

impl RampForce {
    pub const fn new(start_level: i16, end_level: i16) -> Self {
        Self {
            start_level,
            end_level,
            envelope: Envelope::attack(0, 0),
        }
    }

    #[must_use]
    pub const fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }
}

/// Periodic payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicForce {
    pub waveform: Waveform,
    pub period_ms: u16,
    pub magnitude: i16,
    #[serde(default)]
    pub offset: i16,
    #[serde(default)]
    pub phase: u16,
    #[serde(default)]
    pub envelope: Envelope,
}

impl PeriodicForce {
    pub const fn new(waveform: Waveform, period_ms: u16, magnitude: i16) -> Self {
        Self {
            waveform,
            period_ms,
            magnitude,
            offset: 0,
            phase: 0,
            envelope: Envelope::attack(0, 0),
        }
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: i16) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn with_phase(mut self, phase: u16) -> Self {
        self.phase = phase;
        self
    }

    #[must_use]
    pub const fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }
}

/// Condition payload shared by spring, damper and friction.
///
/// ```
/// use openracing_ffb::Condition;
///
/// let spring = Condition::symmetric(8000, 0x7fff).with_deadband(0, 200);
/// assert_eq!(spring.left_coeff, 8000);
/// assert_eq!(spring.right_saturation, 0x7fff);
/// assert_eq!(spring.deadband, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub right_saturation: u16,
    pub left_saturation: u16,
    pub right_coeff: i16,
    pub left_coeff: i16,
    pub deadband: u16,
    pub center: i16,
}

impl Condition {
    /// Same coefficient and saturation on both sides, centered, no deadband.
    pub const fn symmetric(coeff: i16, saturation: u16) -> Self {
        Self {
            right_saturation: saturation,
            left_saturation: saturation,
            right_coeff: coeff,
            left_coeff: coeff,
            deadband: 0,
            center: 0,
        }
    }

    #[must_use]
    pub const fn with_deadband(mut self, center: i16, deadband: u16) -> Self {
        self.center = center;
        self.deadband = deadband;
        self
    }

    /// Larger of the two saturations.
    pub fn saturation(&self) -> u16 {
        self.left_saturation.max(self.right_saturation)
    }
}

/// Class-specific effect payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectPayload {
    Constant(ConstantForce),
    Ramp(RampForce),
    Periodic(PeriodicForce),
    Spring(Condition),
    Damper(Condition),
    Friction(Condition),
}

impl EffectPayload {
    pub const fn kind(&self) -> EffectKind {
        match self {
            EffectPayload::Constant(_) => EffectKind::Constant,
            EffectPayload::Ramp(_) => EffectKind::Ramp,
            EffectPayload::Periodic(_) => EffectKind::Periodic,
            EffectPayload::Spring(_) => EffectKind::Spring,
            EffectPayload::Damper(_) => EffectKind::Damper,
            EffectPayload::Friction(_) => EffectKind::Friction,
        }
    }

    /// Envelope of the force classes; `None` for conditions.
    pub const fn envelope(&self) -> Option<&Envelope> {
        match self {
            EffectPayload::Constant(c) => Some(&c.envelope),
            EffectPayload::Ramp(r) => Some(&r.envelope),
            EffectPayload::Periodic(p) => Some(&p.envelope),
            EffectPayload::Spring(_) | EffectPayload::Damper(_) | EffectPayload::Friction(_) => {
                None
            }
        }
    }
}

/// A caller-defined effect, addressed by its table index.
///
/// # Examples
///
/// ```
/// use openracing_ffb::{ConstantForce, Effect, EffectKind, Replay};
///
/// let effect = Effect::constant(3, ConstantForce::new(16000))
///     .with_direction(0x4000)
///     .with_replay(Replay::new(500, 20));
///
/// assert_eq!(effect.kind(), EffectKind::Constant);
/// assert_eq!(effect.replay.length_ms, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub id: usize,
    #[serde(default)]
    pub direction: u16,
    #[serde(default)]
    pub replay: Replay,
    #[serde(flatten)]
    pub payload: EffectPayload,
}

impl Effect {
    pub const fn new(id: usize, payload: EffectPayload) -> Self {
        Self {
            id,
            direction: 0,
            replay: Replay::infinite(),
            payload,
        }
    }

    pub const fn constant(id: usize, force: ConstantForce) -> Self {
        Self::new(id, EffectPayload::Constant(force))
    }

    pub const fn ramp(id: usize, force: RampForce) -> Self {
        Self::new(id, EffectPayload::Ramp(force))
    }

    pub const fn periodic(id: usize, force: PeriodicForce) -> Self {
        Self::new(id, EffectPayload::Periodic(force))
    }

    pub const fn spring(id: usize, condition: Condition) -> Self {
        Self::new(id, EffectPayload::Spring(condition))
    }

    pub const fn damper(id: usize, condition: Condition) -> Self {
        Self::new(id, EffectPayload::Damper(condition))
    }

    pub const fn friction(id: usize, condition: Condition) -> Self {
        Self::new(id, EffectPayload::Friction(condition))
    }

    #[must_use]
    pub const fn with_direction(mut self, direction: u16) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub const fn with_replay(mut self, replay: Replay) -> Self {
        self.replay = replay;
        self
    }

    pub const fn kind(&self) -> EffectKind {
        self.payload.kind()
    }
}
