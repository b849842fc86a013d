#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::cmp::Ordering;

use perftool_core::time::{
    add_duration, clock, compare_duration, scale_duration, subtract_duration, variance_term,
    Clock, ClockKind, DisplayUnit, Timestamp,
};

#[test]
fn new_normalizes_overflow_and_underflow() {
    let t = Timestamp::new(1, 1_500_000_000);
    assert_eq!((t.secs(), t.subsec_nanos()), (2, 500_000_000));

    let t = Timestamp::new(3, -1);
    assert_eq!((t.secs(), t.subsec_nanos()), (2, 999_999_999));
}

#[test]
fn add_carries_into_seconds() {
    let a = Timestamp::new(1, 600_000_000);
    let b = Timestamp::new(0, 400_000_000);
    let sum = add_duration(a, b);
    assert_eq!((sum.secs(), sum.subsec_nanos()), (2, 0));

    let sum = add_duration(Timestamp::new(0, 999_999_999), Timestamp::from_nanos(1));
    assert_eq!(sum, Timestamp::from_secs(1));
}

#[test]
fn subtract_borrows_from_seconds() {
    let end = Timestamp::new(5, 100);
    let begin = Timestamp::new(3, 200);
    let d = subtract_duration(end, begin).unwrap();
    assert_eq!((d.secs(), d.subsec_nanos()), (1, 999_999_900));
}

#[test]
fn subtract_equal_is_zero() {
    let t = Timestamp::new(42, 7);
    assert_eq!(subtract_duration(t, t).unwrap(), Timestamp::ZERO);
}

#[test]
fn subtract_rejects_negative_duration() {
    let e = subtract_duration(Timestamp::new(1, 0), Timestamp::new(1, 1)).unwrap_err();
    assert_eq!(e.code().as_str(), "INVALID_ORDER");

    let e = subtract_duration(Timestamp::from_secs(1), Timestamp::from_secs(2)).unwrap_err();
    assert_eq!(e.code().as_str(), "INVALID_ORDER");
}

#[test]
fn compare_is_lexicographic() {
    let a = Timestamp::new(1, 999_999_999);
    let b = Timestamp::new(2, 0);
    assert_eq!(compare_duration(a, b), Ordering::Less);
    assert_eq!(compare_duration(b, a), Ordering::Greater);
    assert_eq!(compare_duration(a, a), Ordering::Equal);
    assert_eq!(compare_duration(a, b), a.cmp(&b));
}

#[test]
fn scale_is_exact_in_nanoseconds() {
    // 10s / 4 = 2.5s exactly.
    let m = scale_duration(Timestamp::from_secs(10), 4).unwrap();
    assert_eq!((m.secs(), m.subsec_nanos()), (2, 500_000_000));

    // 1s / 3 truncates to whole nanoseconds.
    let m = scale_duration(Timestamp::from_secs(1), 3).unwrap();
    assert_eq!(m, Timestamp::from_nanos(333_333_333));
}

#[test]
fn scale_by_zero_is_not_ready() {
    let e = scale_duration(Timestamp::from_secs(1), 0).unwrap_err();
    assert_eq!(e.code().as_str(), "NOT_READY");
}

#[test]
fn variance_term_is_squared_seconds() {
    let v = variance_term(Timestamp::from_secs(3), Timestamp::from_secs(1));
    assert!((v - 4.0).abs() < 1e-12);
    assert_eq!(variance_term(Timestamp::from_millis(5), Timestamp::from_millis(5)), 0.0);
}

#[test]
fn display_unit_conversion() {
    let t = Timestamp::from_micros(1_500);
    assert_eq!(DisplayUnit::Ns.convert(t), 1_500_000.0);
    assert_eq!(DisplayUnit::Us.convert(t), 1_500.0);
    assert_eq!(DisplayUnit::Ms.convert(t), 1.5);
    assert_eq!(DisplayUnit::Ns.render(t), "1500000ns");
    assert_eq!(DisplayUnit::Ms.render(t), "1.500ms");
    assert!((DisplayUnit::Us.from_secs_f64(0.002) - 2_000.0).abs() < 1e-9);
}

#[test]
fn cycles_scale_to_nanoseconds() {
    let t = clock::cycles_to_timestamp(5_000_000_000, 2.0);
    assert_eq!(t, Timestamp::new(2, 500_000_000));
}

#[test]
fn cycles_keep_nanosecond_resolution_at_large_counts() {
    let base = 1u64 << 56;
    let a = clock::cycles_to_timestamp(base, 2.0);
    let b = clock::cycles_to_timestamp(base + 2, 2.0);
    assert_eq!(subtract_duration(b, a).unwrap(), Timestamp::from_nanos(1));

    let a = clock::cycles_to_timestamp(u64::MAX - 3, 1.0);
    let b = clock::cycles_to_timestamp(u64::MAX, 1.0);
    assert_eq!(subtract_duration(b, a).unwrap(), Timestamp::from_nanos(3));
}

#[test]
fn cycles_with_fractional_scale() {
    // 3 cycles per ns: 3e9 cycles is one second, within rounding of the Q32 factor.
    let t = clock::cycles_to_timestamp(3_000_000_000, 3.0);
    let err = (t.total_nanos() - 1_000_000_000).abs();
    assert!(err <= 1, "{t:?}");
}

#[test]
fn deserialize_renormalizes_nanos() {
    let t: Timestamp = serde_json::from_str(r#"{"secs":0,"nanos":4000000000}"#).unwrap();
    assert_eq!((t.secs(), t.subsec_nanos()), (4, 0));
    assert_eq!(add_duration(t, t), Timestamp::from_secs(8));

    let t: Timestamp = serde_json::from_str(r#"{"secs":2,"nanos":-1}"#).unwrap();
    assert_eq!((t.secs(), t.subsec_nanos()), (1, 999_999_999));

    let back: Timestamp = serde_json::from_str(&serde_json::to_string(&t).unwrap()).unwrap();
    assert_eq!(back, t);
}

#[test]
fn wall_clock_does_not_run_backwards() {
    let c = Clock::new(ClockKind::Wall, 1.0);
    let mut prev = c.now();
    for _ in 0..1_000 {
        let next = c.now();
        assert!(subtract_duration(next, prev).is_ok());
        prev = next;
    }
}

#[test]
fn override_bypasses_live_read() {
    let fixed = Timestamp::from_secs(7);
    for kind in [ClockKind::Wall, ClockKind::CycleCounter] {
        assert_eq!(Clock::new(kind, 2.0).now_or(Some(fixed)), fixed);
    }
}
