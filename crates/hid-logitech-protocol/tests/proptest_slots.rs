//! Property-based tests for the slot encoder and the vendor commands.
//!
//! Uses proptest with 500 cases to verify invariants that hold across the full
//! input domain, complementing the snapshot and unit tests in the crate.

use openracing_ffb::ChannelParameters;
use proptest::prelude::*;
use racing_wheel_hid_logitech_protocol::quant::{scale_coeff, translate_force};
use racing_wheel_hid_logitech_protocol::{
    SlotBank, build_set_range_dfp_reports, build_set_range_report, opcodes,
};

fn channel() -> impl Strategy<Value = ChannelParameters> {
    (
        any::<i32>(),
        any::<i32>(),
        any::<i32>(),
        any::<i32>(),
        any::<i32>(),
        any::<u32>(),
    )
        .prop_map(|(level, d1, d2, k1, k2, clip)| ChannelParameters {
            level,
            d1,
            d2,
            k1,
            k2,
            clip,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ── Change detection ──────────────────────────────────────────────────────

    /// Re-encoding identical parameters must never produce a command.
    #[test]
    fn prop_unchanged_parameters_are_clean(
        a in channel(),
        b in channel(),
        c in channel(),
        d in channel(),
    ) {
        let mut bank = SlotBank::new();
        bank.initialize();
        let channels = [a, b, c, d];
        bank.encode(&channels);
        prop_assert!(bank.encode(&channels).is_empty());
    }

    /// Byte 0 always carries the slot bit and one of the three opcodes.
    #[test]
    fn prop_header_byte_is_well_formed(
        a in channel(),
        b in channel(),
        c in channel(),
        d in channel(),
    ) {
        let mut bank = SlotBank::new();
        bank.initialize();
        bank.encode(&[a, b, c, d]);
        for index in 0..4 {
            let head = bank.slot(index).map(|s| s.command()[0]);
            prop_assert!(head.is_some());
            let head = head.unwrap_or_default();
            prop_assert_eq!(head & 0xf0, 0x10 << index);
            prop_assert!([opcodes::START, opcodes::STOP, opcodes::UPDATE].contains(&(head & 0x0f)));
        }
    }

    /// A condition slot with zero clip always encodes a bare stop.
    #[test]
    fn prop_zero_clip_stops_condition_slot(mut p in channel(), index in 1usize..4) {
        p.clip = 0;
        let mut channels = [ChannelParameters::default(); 4];
        channels[index] = p;
        let mut bank = SlotBank::new();
        bank.initialize();
        bank.encode(&channels);
        let cmd = bank.slot(index).map(|s| *s.command());
        prop_assert_eq!(cmd.map(|c| c[0] & 0x0f), Some(opcodes::STOP));
        prop_assert_eq!(cmd.map(|c| c[1..].to_vec()), Some(vec![0u8; 6]));
    }

    // ── Quantizers ────────────────────────────────────────────────────────────

    /// Force translation is monotone in the level.
    #[test]
    fn prop_translate_force_monotone(a in any::<i32>(), b in any::<i32>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(translate_force(i64::from(lo)) <= translate_force(i64::from(hi)));
    }

    /// Coefficient scaling ignores the sign and never exceeds the field width.
    #[test]
    fn prop_scale_coeff_symmetric(k in -0x7fff_i64..=0x7fff, bits in 1u32..=8) {
        prop_assert_eq!(scale_coeff(k, bits), scale_coeff(-k, bits));
        prop_assert!(scale_coeff(k, bits) < (1 << bits));
    }

    // ── Range commands ────────────────────────────────────────────────────────

    /// G25-style range carries the degrees little-endian.
    #[test]
    fn prop_range_roundtrips_degrees(degrees in 40u16..=900) {
        let r = build_set_range_report(degrees);
        prop_assert_eq!(u16::from_le_bytes([r[2], r[3]]), degrees);
    }

    /// The DFP fine limit always brackets the center symmetrically.
    #[test]
    fn prop_dfp_fine_limit_symmetric(degrees in 40u16..=900) {
        let seq = build_set_range_dfp_reports(degrees);
        prop_assert_eq!(seq.len(), 2);
        let fine = seq.as_slice()[1];
        prop_assert_eq!(fine[0], 0x81);
        prop_assert_eq!(fine[1], 0x0b);
        if degrees != 200 && degrees != 900 {
            prop_assert_eq!(u16::from(fine[2]) + u16::from(fine[3]), 0xff);
        }
    }
}
