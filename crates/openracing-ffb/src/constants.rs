//! FFB constants and limits

/// Capacity of the effect table
pub const MAX_EFFECTS: usize = 16;

/// Number of actuator slots (constant, spring, damper, friction)
pub const SLOT_COUNT: usize = 4;

/// Level domain maximum (Q15 full scale)
pub const LEVEL_MAX: i32 = 0x7fff;

/// Gain domain maximum
pub const GAIN_MAX: u32 = 0xffff;

/// Direction value corresponding to a full turn
pub const DIRECTION_FULL_TURN: u32 = 0x10000;

/// Default tick period in milliseconds
pub const DEFAULT_TIMER_PERIOD_MS: u32 = 2;

/// Default spring/damper/friction intensity in percent
pub const DEFAULT_CONDITION_LEVEL: u8 = 30;

/// Slot index of the constant/ramp/periodic channel
pub const SLOT_CONSTANT: usize = 0;
/// Slot index of the spring channel
pub const SLOT_SPRING: usize = 1;
/// Slot index of the damper channel
pub const SLOT_DAMPER: usize = 2;
/// Slot index of the friction channel
pub const SLOT_FRICTION: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(MAX_EFFECTS, 16);
        assert_eq!(SLOT_COUNT, 4);
        assert!(SLOT_FRICTION < SLOT_COUNT);
        assert_eq!(GAIN_MAX, u32::from(u16::MAX));
    }
}
