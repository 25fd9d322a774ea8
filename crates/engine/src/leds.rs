//! Force level meter shown on the wheel's rev lights.
//!
//! The meter keeps the highest force level seen during a window of ticks and
//! classifies it against fixed fractions of full scale once per window. Each
//! class maps to a five-LED pattern: the bar fills up to 100 % and then
//! empties from the left as the output clips harder.

use serde::{Deserialize, Serialize};

/// Default length of one metering window.
pub const DEFAULT_LEVEL_WINDOW_MS: u32 = 480;

/// Force level class, relative to a full scale of `0x8000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelClass {
    /// Below 7.5 %
    Idle,
    /// Below 25 %
    Low,
    /// Below 50 %
    Medium,
    /// Below 75 %
    High,
    /// Below 90 %
    NearFull,
    /// Up to and including 100 %
    Full,
    /// Below 110 %
    Over10,
    /// Below 125 %
    Over25,
    /// Below 150 %
    Over50,
    /// 150 % and above
    Clipping,
}

impl LevelClass {
    /// Classify a combined force level.
    pub fn from_level(level: u32) -> Self {
        match level {
            0..2458 => Self::Idle,
            2458..8192 => Self::Low,
            8192..16384 => Self::Medium,
            16384..24576 => Self::High,
            24576..29491 => Self::NearFull,
            29491..=32768 => Self::Full,
            32769..36045 => Self::Over10,
            36045..40960 => Self::Over25,
            40960..49152 => Self::Over50,
            _ => Self::Clipping,
        }
    }

    /// Rev-light pattern, bit 0 being the leftmost LED.
    pub fn led_mask(self) -> u8 {
        match self {
            Self::Idle => 0b00000,
            Self::Low => 0b00001,
            Self::Medium => 0b00011,
            Self::High => 0b00111,
            Self::NearFull => 0b01111,
            Self::Full => 0b11111,
            Self::Over10 => 0b11110,
            Self::Over25 => 0b11100,
            Self::Over50 => 0b11000,
            Self::Clipping => 0b10000,
        }
    }

    /// Whether the output exceeded full scale.
    pub fn is_clipping(self) -> bool {
        self > Self::Full
    }
}

/// Receives one level class per metering window.
///
/// Called from the timer thread after the effect table lock is released;
/// implementations must not block.
pub trait LevelObserver: Send + Sync {
    fn on_level(&self, class: LevelClass);
}

impl<F> LevelObserver for F
where
    F: Fn(LevelClass) + Send + Sync,
{
    fn on_level(&self, class: LevelClass) {
        self(class)
    }
}

/// Windowed peak meter advanced once per productive tick.
#[derive(Debug, Clone)]
pub struct LevelMeter {
    enabled: bool,
    window_ms: u32,
    countdown: u32,
    level: u32,
}

impl LevelMeter {
    pub fn new(enabled: bool, window_ms: u32) -> Self {
        Self {
            enabled,
            window_ms: window_ms.max(1),
            countdown: 0,
            level: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the meter off still publishes one final `Idle` class so the
    /// lights go dark.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Highest level seen in the current window.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Feed one tick's force level. Returns the class to publish when a
    /// window closes.
    ///
    /// With no active effects the window restarts immediately, so the lights
    /// follow the end of an effect without waiting out the window.
    pub fn observe(&mut self, ffb_level: u32, active_effects: usize, period_ms: u32) -> Option<LevelClass> {
        if !self.enabled && self.level == 0 {
            return None;
        }

        self.level = self.level.max(ffb_level);
        if !self.enabled || active_effects == 0 {
            self.countdown = 0;
            self.level = 0;
        }

        let mut published = None;
        if self.countdown == 0 {
            self.countdown = (self.window_ms / period_ms.max(1)).max(1);
            published = Some(LevelClass::from_level(self.level));
            self.level = 0;
        }
        self.countdown -= 1;
        published
    }
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new(false, DEFAULT_LEVEL_WINDOW_MS)
    }
}
