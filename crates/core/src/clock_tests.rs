// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_starts_at_given_value() {
    let clock = FakeClock::new(1_000);
    assert_eq!(clock.now_utc(), 1_000);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new(0);
    clock.advance(30);
    clock.advance(5);
    assert_eq!(clock.now_utc(), 35);
}

#[test]
fn fake_clock_can_be_pinned() {
    let clock = FakeClock::new(10);
    clock.set(999);
    assert_eq!(clock.now_utc(), 999);
}

#[test]
fn system_clock_reports_a_plausible_timestamp() {
    let clock = SystemClock;
    // After 2020-01-01 and before some far future date; guards against
    // obviously wrong units (ms vs s).
    assert!(clock.now_utc() > 1_577_836_800);
    assert!(clock.now_utc() < 4_102_444_800);
}
