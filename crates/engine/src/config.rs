//! Engine configuration.
//!
//! Every tunable lives in one value that is loaded once, validated and then
//! handed to the mixer, scheduler and level meter.

use openracing_errors::{OpenRacingError, ValidationError};
use openracing_ffb::{DEFAULT_CONDITION_LEVEL, DEFAULT_TIMER_PERIOD_MS, MixSettings};
use openracing_scheduler::{BackpressurePolicy, SchedulerConfig};
use serde::{Deserialize, Serialize};

use crate::leds::DEFAULT_LEVEL_WINDOW_MS;

/// Longest accepted tick period.
pub const MAX_TIMER_PERIOD_MS: u32 = 1000;

/// Engine configuration
///
/// Missing JSON fields take their defaults:
///
/// ```
/// use racing_wheel_ffb_engine::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{ "backpressure": "static", "spring_level": 50 }"#)?;
/// assert_eq!(config.timer_period_ms, 2);
/// assert_eq!(config.spring_level, 50);
/// assert_eq!(config.damper_level, 30);
/// # Ok::<(), openracing_errors::OpenRacingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tick period in milliseconds
    pub timer_period_ms: u32,

    /// Reaction to a command queue that has not drained
    pub backpressure: BackpressurePolicy,

    /// Spring intensity in percent (0-100)
    pub spring_level: u8,

    /// Damper intensity in percent (0-100)
    pub damper_level: u8,

    /// Friction intensity in percent (0-100)
    pub friction_level: u8,

    /// User-facing master gain (0-65535)
    pub master_gain: u16,

    /// Application gain (0-65535)
    pub gain: u16,

    /// Put the device into fixed loop mode on slot initialization
    pub fixed_loop: bool,

    /// Show the force level on the rev lights
    pub ffb_leds: bool,

    /// Length of one level meter window
    pub level_meter_window_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timer_period_ms: DEFAULT_TIMER_PERIOD_MS,
            backpressure: BackpressurePolicy::default(),
            spring_level: DEFAULT_CONDITION_LEVEL,
            damper_level: DEFAULT_CONDITION_LEVEL,
            friction_level: DEFAULT_CONDITION_LEVEL,
            master_gain: u16::MAX,
            gain: u16::MAX,
            fixed_loop: false,
            ffb_leds: false,
            level_meter_window_ms: DEFAULT_LEVEL_WINDOW_MS,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFormat`] for malformed JSON and the
    /// [`validate`](Self::validate) error for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, OpenRacingError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ValidationError::invalid_format("engine config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFormat`] if serialization fails.
    pub fn to_json(&self) -> Result<String, OpenRacingError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::invalid_format("engine config", e.to_string()).into())
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timer_period_ms == 0 || self.timer_period_ms > MAX_TIMER_PERIOD_MS {
            return Err(ValidationError::out_of_range(
                "timer_period_ms",
                self.timer_period_ms,
                1,
                MAX_TIMER_PERIOD_MS,
            ));
        }

        for (field, value) in [
            ("spring_level", self.spring_level),
            ("damper_level", self.damper_level),
            ("friction_level", self.friction_level),
        ] {
            if value > 100 {
                return Err(ValidationError::out_of_range(field, value, 0, 100));
            }
        }

        if self.level_meter_window_ms < self.timer_period_ms {
            return Err(ValidationError::constraint(format!(
                "level_meter_window_ms ({}) must be at least timer_period_ms ({})",
                self.level_meter_window_ms, self.timer_period_ms
            )));
        }

        Ok(())
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::new(self.timer_period_ms, self.backpressure)
    }

    pub fn mix_settings(&self) -> MixSettings {
        MixSettings {
            master_gain: self.master_gain,
            device_gain: self.gain,
            spring_level: self.spring_level,
            damper_level: self.damper_level,
            friction_level: self.friction_level,
        }
    }
}
