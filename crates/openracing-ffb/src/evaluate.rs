//! Per-class effect evaluation.
//!
//! Force classes (constant, ramp, periodic) produce a signed level that is
//! already scaled by the latched direction gain. Condition classes merge
//! straight into their slot's [`ChannelParameters`].
//!
//! All arithmetic is done in `i64` and truncates toward zero, except the
//! ramp body which uses an arithmetic shift.

use crate::constants::LEVEL_MAX;
use crate::effects::{
    Condition, ConstantForce, EffectPayload, Envelope, PeriodicForce, RampForce, Waveform,
};
use crate::fixed::sin_q15;
use crate::mixer::ChannelParameters;
use crate::state::EffectState;

/// Playback context shared by all force evaluators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    /// Milliseconds since the playing window opened
    pub time_playing: u32,
    /// Replay length, 0 for infinite
    pub length_ms: u16,
    /// Q15 direction gain
    pub direction_gain: i32,
    /// Waveform phase in degrees
    pub phase: u32,
    /// Q16 ramp slope
    pub slope: i64,
}

impl Playback {
    pub fn from_state(state: &EffectState) -> Option<Self> {
        let effect = state.effect()?;
        Some(Self {
            time_playing: state.time_playing(),
            length_ms: effect.replay.length_ms,
            direction_gain: state.direction_gain(),
            phase: state.phase(),
            slope: state.slope(),
        })
    }

    fn directed(&self, level: i64) -> i64 {
        i64::from(self.direction_gain) * level / i64::from(LEVEL_MAX)
    }

    // Elapsed time inside the fade window, if the effect is in it.
    fn fade_elapsed(&self, envelope: &Envelope) -> Option<i64> {
        if self.length_ms == 0 || envelope.fade_length == 0 {
            return None;
        }
        let t = i64::from(self.time_playing) - i64::from(self.length_ms)
            + i64::from(envelope.fade_length);
        (t > 0).then_some(t)
    }
}

fn sign(level: i64) -> i64 {
    if level < 0 { -1 } else { 1 }
}

/// Applies attack/fade blending to a nominal level.
///
/// Zero-length segments are skipped. At `time_playing == attack_length` the
/// result equals `nominal`.
pub fn blend_envelope(nominal: i64, envelope: &Envelope, playback: &Playback) -> i64 {
    let tp = i64::from(playback.time_playing);
    let attack_length = i64::from(envelope.attack_length);

    if tp < attack_length {
        let from = sign(nominal) * i64::from(envelope.attack_level);
        return from + (nominal - from) * tp / attack_length;
    }

    match playback.fade_elapsed(envelope) {
        Some(t) => {
            let to = sign(nominal) * i64::from(envelope.fade_level);
            nominal - (nominal - to) * t / i64::from(envelope.fade_length)
        }
        None => nominal,
    }
}

pub fn constant_level(force: &ConstantForce, playback: &Playback) -> i64 {
    let level = blend_envelope(i64::from(force.level), &force.envelope, playback);
    playback.directed(level)
}

/// Ramp level: attack blends toward `start_level`, the body follows the
/// slope, and the fade blends away from `end_level`.
pub fn ramp_level(force: &RampForce, playback: &Playback) -> i64 {
    let envelope = &force.envelope;
    let tp = i64::from(playback.time_playing);
    let attack_length = i64::from(envelope.attack_length);
    let start = i64::from(force.start_level);

    let level = if tp < attack_length {
        blend_envelope(start, envelope, playback)
    } else if let Some(t) = playback.fade_elapsed(envelope) {
        let end = i64::from(force.end_level);
        let to = sign(end) * i64::from(envelope.fade_level);
        end - (end - to) * t / i64::from(envelope.fade_length)
    } else {
        start + (((tp - attack_length) * playback.slope) >> 16)
    };
    playback.directed(level)
}

/// Raw waveform sample for `phase` degrees at `magnitude`, before the offset.
pub fn waveform_sample(waveform: Waveform, phase: u32, magnitude: i64) -> i64 {
    let p = i64::from(phase);
    match waveform {
        Waveform::Sine => i64::from(sin_q15(phase)) * magnitude / i64::from(LEVEL_MAX),
        Waveform::Square => {
            if phase < 180 {
                magnitude
            } else {
                -magnitude
            }
        }
        Waveform::Triangle => (p * magnitude * 2 / 360 - magnitude).abs() * 2 - magnitude,
        Waveform::SawUp => p * magnitude * 2 / 360 - magnitude,
        Waveform::SawDown => magnitude - p * magnitude * 2 / 360,
    }
}

pub fn periodic_level(force: &PeriodicForce, playback: &Playback) -> i64 {
    let magnitude = blend_envelope(i64::from(force.magnitude), &force.envelope, playback);
    let level =
        i64::from(force.offset) + waveform_sample(force.waveform, playback.phase, magnitude);
    playback.directed(level)
}

/// Merges a spring into its channel: deadband bounds widen, coefficients add,
/// clip takes the maximum saturation.
pub fn merge_spring(condition: &Condition, channel: &mut ChannelParameters) {
    let half_band = i32::from(condition.deadband / 2);
    let d1 = i32::from(condition.center) - half_band;
    let d2 = i32::from(condition.center) + half_band;
    channel.d1 = channel.d1.min(d1);
    channel.d2 = channel.d2.max(d2);
    merge_resistance(condition, channel);
}

/// Merges a damper or friction into its channel.
pub fn merge_resistance(condition: &Condition, channel: &mut ChannelParameters) {
    channel.k1 = channel.k1.saturating_add(i32::from(condition.left_coeff));
    channel.k2 = channel.k2.saturating_add(i32::from(condition.right_coeff));
    channel.clip = channel.clip.max(u32::from(condition.saturation()));
}

/// Adds one playing effect to the per-slot accumulators.
pub fn contribute(state: &EffectState, channels: &mut [ChannelParameters]) {
    let Some(effect) = state.effect() else {
        return;
    };
    let Some(playback) = Playback::from_state(state) else {
        return;
    };
    let Some(channel) = channels.get_mut(effect.kind().slot()) else {
        return;
    };

    let level = match &effect.payload {
        EffectPayload::Constant(force) => constant_level(force, &playback),
        EffectPayload::Ramp(force) => ramp_level(force, &playback),
        EffectPayload::Periodic(force) => periodic_level(force, &playback),
        EffectPayload::Spring(condition) => {
            merge_spring(condition, channel);
            return;
        }
        EffectPayload::Damper(condition) | EffectPayload::Friction(condition) => {
            merge_resistance(condition, channel);
            return;
        }
    };
    channel.level = channel.level.saturating_add(saturate_i32(level));
}

fn saturate_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
