//! Per-tick channel accumulation and gain scaling.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONDITION_LEVEL, GAIN_MAX, LEVEL_MAX, SLOT_COUNT};
use crate::evaluate;
use crate::state::EffectState;

/// Accumulated parameters of one actuator slot for the current tick.
///
/// Slot 0 only uses `level`; condition slots use the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelParameters {
    pub level: i32,
    pub d1: i32,
    pub d2: i32,
    pub k1: i32,
    pub k2: i32,
    pub clip: u32,
}

/// Gains and condition intensities applied after accumulation.
///
/// ```
/// use openracing_ffb::MixSettings;
///
/// let settings = MixSettings::default();
/// assert_eq!(settings.combined_gain(), 0xffff);
///
/// let half = MixSettings { master_gain: 0x8000, ..MixSettings::default() };
/// assert_eq!(half.combined_gain(), 0x8000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixSettings {
    pub master_gain: u16,
    pub device_gain: u16,
    /// Spring intensity in percent (0-100)
    pub spring_level: u8,
    /// Damper intensity in percent (0-100)
    pub damper_level: u8,
    /// Friction intensity in percent (0-100)
    pub friction_level: u8,
}

impl Default for MixSettings {
    fn default() -> Self {
        Self {
            master_gain: u16::MAX,
            device_gain: u16::MAX,
            spring_level: DEFAULT_CONDITION_LEVEL,
            damper_level: DEFAULT_CONDITION_LEVEL,
            friction_level: DEFAULT_CONDITION_LEVEL,
        }
    }
}

impl MixSettings {
    /// `master_gain * device_gain / 0xffff`, truncating.
    pub fn combined_gain(&self) -> u32 {
        u32::from(self.master_gain) * u32::from(self.device_gain) / GAIN_MAX
    }
}

/// Per-tick accumulator for all four slots.
///
/// # Examples
///
/// ```
/// use openracing_ffb::{
///     ConstantForce, Effect, EffectTable, MixSettings, Mixer, Timestamp,
/// };
///
/// let mut table = EffectTable::new();
/// let now = Timestamp::from_millis(0);
/// table.upload(Effect::constant(0, ConstantForce::new(16000)).with_direction(0x4000), now)?;
/// table.play(0, 1, now)?;
///
/// let mut mixer = Mixer::new();
/// table.for_each_playing(now, |state| mixer.accumulate(state));
/// let ffb_level = mixer.finish(&MixSettings::default());
///
/// assert_eq!(mixer.channels()[0].level, 16000);
/// assert_eq!(ffb_level, 16000);
/// # Ok::<(), openracing_errors::FfbError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    channels: [ChannelParameters; SLOT_COUNT],
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes every channel. Call at the start of each tick.
    pub fn reset(&mut self) {
        self.channels = [ChannelParameters::default(); SLOT_COUNT];
    }

    pub fn accumulate(&mut self, state: &EffectState) {
        evaluate::contribute(state, &mut self.channels);
    }

    /// Applies gain and intensity scaling and returns the diagnostic force level
    /// (`|level| + sum(clip * 0x7fff / 0xffff)` over the condition slots).
    pub fn finish(&mut self, settings: &MixSettings) -> u32 {
        let gain = u64::from(settings.combined_gain());
        let [constant, spring, damper, friction] = &mut self.channels;

        constant.level = scale_signed(constant.level, gain);
        let mut ffb_level = u64::from(constant.level.unsigned_abs());

        for (channel, percent) in [
            (spring, settings.spring_level),
            (damper, settings.damper_level),
            (friction, settings.friction_level),
        ] {
            let clip = u64::from(channel.clip) * u64::from(percent) / 100;
            channel.k1 = scale_signed(channel.k1, gain);
            channel.k2 = scale_signed(channel.k2, gain);
            channel.clip = saturate_u32(clip * gain / u64::from(GAIN_MAX));
            ffb_level += u64::from(channel.clip) * LEVEL_MAX_U64 / u64::from(GAIN_MAX);
        }

        saturate_u32(ffb_level)
    }

    pub fn channels(&self) -> &[ChannelParameters; SLOT_COUNT] {
        &self.channels
    }

    pub fn channel(&self, slot: usize) -> Option<&ChannelParameters> {
        self.channels.get(slot)
    }
}

const LEVEL_MAX_U64: u64 = LEVEL_MAX.unsigned_abs() as u64;

fn scale_signed(value: i32, gain: u64) -> i32 {
    let gain = i64::try_from(gain).unwrap_or(i64::MAX);
    let scaled = i64::from(value) * gain / i64::from(GAIN_MAX);
    i32::try_from(scaled).unwrap_or(if scaled < 0 { i32::MIN } else { i32::MAX })
}

fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
