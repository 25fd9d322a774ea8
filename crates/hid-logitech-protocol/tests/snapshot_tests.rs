//! Snapshot tests for Logitech wire-format encoding.
//!
//! Each snapshot pins the exact bytes sent to the wheel so that any change to
//! the slot encoder or the vendor commands shows up as a diff.

use insta::assert_snapshot;
use openracing_ffb::ChannelParameters;
use racing_wheel_hid_logitech_protocol as lg;

fn initialized() -> lg::SlotBank {
    let mut bank = lg::SlotBank::new();
    bank.initialize();
    bank
}

// ── Slot initialization ──────────────────────────────────────────────────────

#[test]
fn test_snapshot_slot_initialization() {
    let mut bank = lg::SlotBank::new();
    let batch = bank.initialize();
    assert_snapshot!(
        format!("{:02X?}", batch.as_slice()),
        @"[[11, 00, 80, 00, 00, 00, 00], [23, 00, 00, 00, 00, 00, 00], [43, 00, 00, 00, 00, 00, 00], [83, 00, 00, 00, 00, 00, 00]]"
    );
}

#[test]
fn test_snapshot_fixed_loop_on() {
    let r = lg::build_fixed_loop_report(true);
    assert_snapshot!(format!("{r:02X?}"), @"[0D, 01, 00, 00, 00, 00, 00]");
}

// ── Slot commands ────────────────────────────────────────────────────────────

#[test]
fn test_snapshot_constant_16000() {
    let mut bank = initialized();
    let mut channels = [ChannelParameters::default(); 4];
    channels[0].level = 16000;
    let batch = bank.encode(&channels);
    assert_snapshot!(format!("{:02X?}", batch.as_slice()), @"[[1C, 00, BE, 00, 00, 00, 00]]");
}

#[test]
fn test_snapshot_constant_full_negative() {
    let mut bank = initialized();
    let mut channels = [ChannelParameters::default(); 4];
    channels[0].level = -40_000;
    let batch = bank.encode(&channels);
    assert_snapshot!(format!("{:02X?}", batch.as_slice()), @"[[1C, 00, 00, 00, 00, 00, 00]]");
}

#[test]
fn test_snapshot_spring_start() {
    let mut bank = initialized();
    let mut channels = [ChannelParameters::default(); 4];
    channels[1] = ChannelParameters {
        k1: 0x4000,
        k2: 0x4000,
        clip: 0xffff,
        ..Default::default()
    };
    let batch = bank.encode(&channels);
    assert_snapshot!(format!("{:02X?}", batch.as_slice()), @"[[21, 0B, 80, 80, 88, 00, FF]]");
}

#[test]
fn test_snapshot_damper_start() {
    let mut bank = initialized();
    let mut channels = [ChannelParameters::default(); 4];
    channels[2] = ChannelParameters {
        k1: -8000,
        k2: 8000,
        clip: 30000,
        ..Default::default()
    };
    let batch = bank.encode(&channels);
    assert_snapshot!(format!("{:02X?}", batch.as_slice()), @"[[41, 0C, 03, 01, 03, 00, 75]]");
}

#[test]
fn test_snapshot_friction_start() {
    let mut bank = initialized();
    let mut channels = [ChannelParameters::default(); 4];
    channels[3] = ChannelParameters {
        k1: 0x7fff,
        k2: -0x100,
        clip: 0x8000,
        ..Default::default()
    };
    let batch = bank.encode(&channels);
    assert_snapshot!(format!("{:02X?}", batch.as_slice()), @"[[81, 0E, FF, 02, 80, 10, 00]]");
}

// ── Vendor commands ──────────────────────────────────────────────────────────

#[test]
fn test_snapshot_stop_all() {
    let r = lg::build_stop_all_report();
    assert_snapshot!(format!("{r:02X?}"), @"[F3, 00, 00, 00, 00, 00, 00]");
}

#[test]
fn test_snapshot_autocenter_half_default() {
    let seq = lg::build_set_autocenter_reports(0x8000, false);
    assert_snapshot!(
        format!("{:02X?}", seq.as_slice()),
        @"[[FE, 0D, 04, 04, 60, 00, 00], [14, 00, 00, 00, 00, 00, 00]]"
    );
}

#[test]
fn test_snapshot_autocenter_off() {
    let seq = lg::build_set_autocenter_reports(0, true);
    assert_snapshot!(format!("{:02X?}", seq.as_slice()), @"[[F5, 00, 00, 00, 00, 00, 00]]");
}

#[test]
fn test_snapshot_autocenter_ffex_full() {
    let r = lg::build_autocenter_ffex_report(0xffff);
    assert_snapshot!(format!("{r:02X?}"), @"[FE, 03, 00, 00, 5A, 00, 00]");
}

#[test]
fn test_snapshot_set_range_270() {
    let r = lg::build_set_range_report(270);
    assert_snapshot!(format!("{r:02X?}"), @"[F8, 81, 0E, 01, 00, 00, 00]");
}

#[test]
fn test_snapshot_set_range_dfp_540() {
    let seq = lg::build_set_range_dfp_reports(540);
    assert_snapshot!(
        format!("{:02X?}", seq.as_slice()),
        @"[[F8, 03, 00, 00, 00, 00, 00], [81, 0B, 33, CC, FF, A4, FF]]"
    );
}

#[test]
fn test_snapshot_set_leds_all_on() {
    let r = lg::build_set_leds_report(0x1F);
    assert_snapshot!(format!("{r:02X?}"), @"[F8, 12, 1F, 00, 00, 00, 00]");
}
