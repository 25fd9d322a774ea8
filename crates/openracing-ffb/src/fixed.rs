//! Fixed-point trigonometry.
//!
//! All values are integers. Angles are whole degrees, results are Q15
//! (`0x7fff` = 1.0). Nothing here rounds: every reduction truncates, which
//! keeps the output bit-compatible with the device firmware expectations.

use crate::constants::DIRECTION_FULL_TURN;

/// `sin(d) * 2^31 >> 16` for d in 0..=90 degrees.
const SIN_TABLE: [i16; 91] = [
    0, 571, 1143, 1714, 2285, 2855, 3425, 3993, 4560, 5126, 5690, 6252, 6812, 7371, 7927, 8480,
    9032, 9580, 10125, 10668, 11207, 11743, 12275, 12803, 13327, 13848, 14364, 14876, 15383,
    15886, 16383, 16876, 17364, 17846, 18323, 18794, 19260, 19720, 20173, 20621, 21062, 21497,
    21926, 22347, 22762, 23170, 23571, 23964, 24351, 24730, 25101, 25465, 25821, 26169, 26509,
    26841, 27165, 27481, 27788, 28087, 28377, 28659, 28932, 29196, 29451, 29697, 29935, 30163,
    30381, 30591, 30791, 30982, 31164, 31336, 31498, 31651, 31794, 31928, 32051, 32165, 32270,
    32364, 32449, 32523, 32588, 32643, 32688, 32723, 32748, 32763, 32767,
];

/// Q15 sine of an angle in whole degrees.
///
/// Input: any `u32`, reduced modulo 360. Output: `-32767..=32767`.
///
/// ```
/// use openracing_ffb::fixed::sin_q15;
///
/// assert_eq!(sin_q15(0), 0);
/// assert_eq!(sin_q15(90), 32767);
/// assert_eq!(sin_q15(270), -32767);
/// assert_eq!(sin_q15(450), 32767);
/// ```
pub fn sin_q15(degrees: u32) -> i32 {
    let d = degrees % 360;
    if d > 180 {
        -half_turn(d - 180)
    } else {
        half_turn(d)
    }
}

// d in 0..=180
fn half_turn(d: u32) -> i32 {
    let folded = if d > 90 { 180 - d } else { d };
    SIN_TABLE
        .get(folded as usize)
        .copied()
        .map_or(0, i32::from)
}

/// Converts a 16-bit direction (0x10000 = full turn) to whole degrees, truncating.
pub fn direction_to_degrees(direction: u16) -> u32 {
    u32::from(direction) * 360 / DIRECTION_FULL_TURN
}

/// Q15 gain applied to every level an effect produces.
pub fn direction_gain(direction: u16) -> i32 {
    sin_q15(direction_to_degrees(direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sin_cardinal_points() {
        assert_eq!(sin_q15(0), 0);
        assert_eq!(sin_q15(30), 16383);
        assert_eq!(sin_q15(90), 32767);
        assert_eq!(sin_q15(150), 16383);
        assert_eq!(sin_q15(180), 0);
        assert_eq!(sin_q15(210), -16383);
        assert_eq!(sin_q15(270), -32767);
        assert_eq!(sin_q15(359), -571);
        assert_eq!(sin_q15(360), 0);
    }

    #[test]
    fn test_sin_is_odd_around_half_turn() {
        for d in 1..180 {
            assert_eq!(sin_q15(d), -sin_q15(d + 180), "d = {d}");
        }
    }

    #[test]
    fn test_direction_to_degrees() {
        assert_eq!(direction_to_degrees(0), 0);
        assert_eq!(direction_to_degrees(0x4000), 90);
        assert_eq!(direction_to_degrees(0x8000), 180);
        assert_eq!(direction_to_degrees(0xC000), 270);
        assert_eq!(direction_to_degrees(0xFFFF), 359);
    }

    #[test]
    fn test_direction_gain() {
        assert_eq!(direction_gain(0), 0);
        assert_eq!(direction_gain(0x4000), 32767);
        assert_eq!(direction_gain(0xC000), -32767);
    }
}
