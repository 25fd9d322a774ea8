//! Integer quantizers used by the slot wire format.
//!
//! Inputs are the wide accumulator values produced by the mixer; outputs are
//! the narrow fields the wheel firmware expects.

/// Saturates to `0..=0xffff`. Negative input is treated as zero.
pub fn clamp_u16(x: i64) -> u16 {
    u16::try_from(x.clamp(0, i64::from(u16::MAX))).unwrap_or(u16::MAX)
}

/// Saturates to `-0x8000..=0x7fff`.
pub fn clamp_s16(x: i64) -> i16 {
    i16::try_from(x.clamp(i64::from(i16::MIN), i64::from(i16::MAX))).unwrap_or(i16::MAX)
}

/// Keeps the top `bits` bits of the saturated 16-bit value.
///
/// ```
/// use racing_wheel_hid_logitech_protocol::quant::scale_u16;
///
/// assert_eq!(scale_u16(0xffff, 8), 0xff);
/// assert_eq!(scale_u16(0x1_0000, 4), 0x0f);
/// assert_eq!(scale_u16(0x8000, 11), 0x400);
/// ```
pub fn scale_u16(x: i64, bits: u32) -> u16 {
    let bits = bits.clamp(1, 16);
    clamp_u16(x) >> (16 - bits)
}

/// Magnitude of a signed coefficient, doubled, then scaled to `bits` bits.
pub fn scale_coeff(x: i64, bits: u32) -> u16 {
    scale_u16(x.saturating_abs().saturating_mul(2), bits)
}

/// Maps a signed level onto the unsigned byte used by the constant slot
/// (`0x80` is no force).
pub fn translate_force(x: i64) -> u8 {
    let biased = (i32::from(clamp_s16(x)) + 0x8000) >> 8;
    u8::try_from(biased).unwrap_or(u8::MAX)
}

/// 8-bit form of a 16-bit quantity, for byte fields.
pub(crate) fn byte(x: u16) -> u8 {
    u8::try_from(x).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_u16_saturates_both_ends() {
        assert_eq!(clamp_u16(-1), 0);
        assert_eq!(clamp_u16(0x1234), 0x1234);
        assert_eq!(clamp_u16(0x1_0000), 0xffff);
    }

    #[test]
    fn test_clamp_s16_saturates_both_ends() {
        assert_eq!(clamp_s16(-40_000), -0x8000);
        assert_eq!(clamp_s16(40_000), 0x7fff);
        assert_eq!(clamp_s16(-5), -5);
    }

    #[test]
    fn test_translate_force_reference_points() {
        assert_eq!(translate_force(0), 0x80);
        assert_eq!(translate_force(16000), 0xbe);
        assert_eq!(translate_force(-0x8000), 0x00);
        assert_eq!(translate_force(0x7fff), 0xff);
        assert_eq!(translate_force(1_000_000), 0xff);
    }

    #[test]
    fn test_scale_coeff_uses_magnitude() {
        assert_eq!(scale_coeff(0x4000, 4), 0x08);
        assert_eq!(scale_coeff(-0x4000, 4), 0x08);
        assert_eq!(scale_coeff(0x7fff, 8), 0xff);
        assert_eq!(scale_coeff(i64::MIN, 8), 0xff);
    }
}
