#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use perftool_core::{
    ClockKind, DisplayUnit, Instrument, InstrumentConfig, MemorySink, ReportOutcome, Timestamp,
};

fn feed(inst: &mut Instrument, begin: Timestamp, end: Timestamp, force: bool) -> ReportOutcome {
    inst.begin_at(begin);
    inst.end_at(end);
    inst.report(force).unwrap()
}

#[test]
fn four_second_scenario() {
    let mut inst = Instrument::new(InstrumentConfig::new("scenario", 4, 2)).unwrap();
    let mut outcomes = Vec::new();
    for s in 1..=4u64 {
        let (begin, end) = (Timestamp::from_secs(100), Timestamp::from_secs(100 + s));
        outcomes.push(feed(&mut inst, begin, end, false));
    }

    assert!(outcomes[..3].iter().all(|o| o.full.is_none()));
    let full = outcomes[3].full.as_ref().expect("full report after 4th sample");
    assert_eq!(full.max, Timestamp::from_secs(4));
    assert_eq!(full.min, Timestamp::from_secs(1));
    assert_eq!(full.mean, Timestamp::new(2, 500_000_000));
    assert_eq!(full.p50, Timestamp::from_secs(2));

    // Sub-reports at samples 2 and 4; the one at 4 co-occurs with the full report.
    assert!(outcomes[1].online.is_some());
    let online = outcomes[3].online.as_ref().unwrap();
    assert_eq!(online.max, Timestamp::from_secs(4));
    assert_eq!(online.min, Timestamp::from_secs(3));
    assert_eq!(online.mean, Timestamp::new(3, 500_000_000));
}

#[test]
fn forced_report_is_always_full() {
    let mut inst = Instrument::new(InstrumentConfig::new("force", 10, 5)).unwrap();
    for i in 1..=25u64 {
        let out = inst.record(Timestamp::from_nanos(i), true).unwrap();
        let full = out.full.expect("forced report must be full");
        assert_eq!(full.max, Timestamp::from_nanos(i));
        // Forcing realigns the cycle, so every batch holds exactly one sample.
        assert_eq!(inst.positions().1, 0);
        assert_eq!(inst.window().len(), 1);
    }
}

#[test]
fn forced_commit_realigns_cycle() {
    let mut inst = Instrument::new(InstrumentConfig::new("realign", 3, 3)).unwrap();
    inst.record(Timestamp::from_nanos(1), false).unwrap();
    inst.record(Timestamp::from_nanos(2), true).unwrap();
    assert_eq!(inst.pending(), 0);

    // A full cycle of three is needed before the next automatic report.
    assert!(inst.record(Timestamp::from_nanos(3), false).unwrap().full.is_none());
    assert!(inst.record(Timestamp::from_nanos(4), false).unwrap().full.is_none());
    let full = inst.record(Timestamp::from_nanos(5), false).unwrap().full.unwrap();
    assert_eq!(full.samples, 3);
    assert_eq!(full.min, Timestamp::from_nanos(3));
}

#[test]
fn zero_duration_is_a_sample() {
    let mut inst = Instrument::new(InstrumentConfig::new("zero", 1, 1)).unwrap();
    let t = Timestamp::new(12, 345);
    let out = feed(&mut inst, t, t, false);
    assert_eq!(out.full.unwrap().max, Timestamp::ZERO);
}

#[test]
fn out_of_order_pair_is_rejected_without_side_effects() {
    let mut inst = Instrument::new(InstrumentConfig::new("order", 4, 2)).unwrap();
    feed(&mut inst, Timestamp::from_secs(1), Timestamp::from_secs(2), false);
    let before = inst.positions();

    inst.begin_at(Timestamp::from_secs(5));
    inst.end_at(Timestamp::from_secs(4));
    let err = inst.report(false).unwrap_err();
    assert_eq!(err.code().as_str(), "INVALID_ORDER");
    assert_eq!(inst.positions(), before);
    assert_eq!(inst.pending(), 1);
}

#[test]
fn slave_is_independent_of_master() {
    let cfg = InstrumentConfig::new("master", 30, 10).with_window_batches(3);
    let mut master = Instrument::new(cfg).unwrap();
    for i in 0..45u64 {
        master.record(Timestamp::from_micros(i), false).unwrap();
    }
    let master_window: Vec<Timestamp> = master.window().iter().collect();
    let master_pos = master.positions();

    let mut slave = master.derive("slave");
    assert_eq!(slave.label(), "slave");
    assert_eq!(slave.config().cycle_length, 30);
    assert_eq!(slave.config().sub_cycle_length, 10);
    assert_eq!(slave.config().window_batches, 3);
    assert!(slave.window().is_empty());
    assert_eq!(slave.positions(), (0, 0));

    for i in 0..200u64 {
        slave.record(Timestamp::from_millis(i % 7), i % 13 == 0).unwrap();
    }

    assert_eq!(master.window().iter().collect::<Vec<_>>(), master_window);
    assert_eq!(master.positions(), master_pos);
    assert_eq!(master.label(), "master");
}

#[test]
fn slave_outlives_master() {
    let master = Instrument::new(
        InstrumentConfig::new("m", 2, 1).with_unit(DisplayUnit::Ms),
    )
    .unwrap();
    let mut slave = master.derive("s");
    drop(master);
    slave.record(Timestamp::from_millis(1), false).unwrap();
    let full = slave.record(Timestamp::from_millis(3), false).unwrap().full.unwrap();
    assert_eq!(full.unit, DisplayUnit::Ms);
    assert_eq!(&*full.label, "s");
}

#[test]
fn flush_publishes_partial_cycle() {
    let mut inst = Instrument::new(InstrumentConfig::new("flush", 10, 10)).unwrap();
    assert!(inst.flush().unwrap().is_none());

    inst.record(Timestamp::from_nanos(4), false).unwrap();
    inst.record(Timestamp::from_nanos(8), false).unwrap();
    let r = inst.flush().unwrap().unwrap();
    assert_eq!(r.samples, 2);
    assert_eq!(r.mean, Timestamp::from_nanos(6));
    assert_eq!(inst.pending(), 0);

    // Nothing pending: the current summary is returned again.
    assert_eq!(inst.flush().unwrap().unwrap(), r);
}

#[test]
fn summary_before_commit_is_not_ready() {
    let mut inst = Instrument::new(InstrumentConfig::new("early", 5, 5)).unwrap();
    inst.record(Timestamp::from_nanos(1), false).unwrap();
    assert_eq!(inst.summary().unwrap_err().code().as_str(), "NOT_READY");
}

#[test]
fn report_into_delivers_full_then_online() {
    let mut inst = Instrument::new(InstrumentConfig::new("sink", 2, 2)).unwrap();
    let mut sink = MemorySink::default();
    inst.begin_at(Timestamp::ZERO);
    inst.end_at(Timestamp::from_nanos(10));
    inst.report_into(false, &mut sink).unwrap();
    inst.report_into(false, &mut sink).unwrap();
    assert_eq!(sink.full.len(), 1);
    assert_eq!(sink.online.len(), 1);
    assert_eq!(sink.online[0].count, 2);
    assert_eq!(sink.online[0].mean, Timestamp::from_nanos(10));
}

#[test]
fn live_clock_measures_real_work() {
    for kind in [ClockKind::Wall, ClockKind::CycleCounter] {
        let mut inst = Instrument::new(
            InstrumentConfig::new("live", 1, 1).with_clock(kind).with_cycles_per_ns(1.0),
        )
        .unwrap();
        inst.begin_at(Timestamp::ZERO);
        inst.end();
        assert!(inst.report(false).is_ok(), "kind={kind:?}");
    }

    let mut inst = Instrument::new(InstrumentConfig::new("wall", 1, 1)).unwrap();
    inst.begin();
    std::thread::sleep(std::time::Duration::from_millis(2));
    inst.end();
    let full = inst.report(false).unwrap().full.unwrap();
    assert!(full.max >= Timestamp::from_millis(2));
}

#[test]
fn invalid_configs_are_rejected() {
    let cases = [
        InstrumentConfig::new("a", 0, 0),
        InstrumentConfig::new("b", 4, 0),
        InstrumentConfig::new("c", 4, 5),
        InstrumentConfig::new("d", 4, 2).with_window_batches(0),
        InstrumentConfig::new("e", 4, 2).with_cycles_per_ns(0.0),
        InstrumentConfig::new("f", 4, 2).with_cycles_per_ns(f64::NAN),
    ];
    for cfg in cases {
        let err = Instrument::new(cfg).unwrap_err();
        assert_eq!(err.code().as_str(), "MISCONFIGURED");
    }
}

#[test]
fn rolling_window_sizing_rounds_up_to_cycles() {
    let cfg = InstrumentConfig::new("r", 10, 5).with_rolling_window(true, 30);
    assert_eq!(cfg.window_batches, 3);
    let cfg = InstrumentConfig::new("r", 10, 5).with_rolling_window(true, 31);
    assert_eq!(cfg.window_batches, 4);
    let cfg = InstrumentConfig::new("r", 10, 5).with_rolling_window(false, 300);
    assert_eq!(cfg.window_batches, 1);
}
