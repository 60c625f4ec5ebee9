//! Command protocol end to end: bytes in, reply lines out, shared state
//! mutated.

use sensenode::config::{SharedConfig, TimeUnit};
use sensenode::error::CommandError;
use sensenode::protocol::commands::Outcome;
use sensenode::protocol::engine::{CommandEngine, dispatch};

use super::mock_hw::RecordingSerial;

const DEFAULT_STATUS: &str = "INFO:STATUS:T1=1,T2=1,TU=s,FT=0,FP=0,ST=10,SP=10,RUN=0";

fn rig() -> (CommandEngine, SharedConfig, RecordingSerial) {
    (CommandEngine::new(), SharedConfig::default(), RecordingSerial::new())
}

fn status(engine: &mut CommandEngine, cfg: &SharedConfig, out: &mut RecordingSerial) -> String {
    out.clear();
    engine.feed_all(b"STATUS\r\n", cfg, out);
    out.last_line().unwrap()
}

#[test]
fn status_at_startup() {
    let (mut engine, cfg, mut out) = rig();
    assert_eq!(status(&mut engine, &cfg, &mut out), DEFAULT_STATUS);
    assert_eq!(out.lines().len(), 1);
}

#[test]
fn valid_period_is_reported_by_status() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"T1:5\n", &cfg, &mut out);
    assert_eq!(
        out.lines(),
        ["OK:T1:5", "DEBUG:Sampling period for distance set to 5 s"]
    );
    assert!(status(&mut engine, &cfg, &mut out).contains("T1=5,"));

    out.clear();
    engine.feed_all(b"TU:m\nT2:250\r", &cfg, &mut out);
    assert_eq!(
        out.lines(),
        [
            "OK:TU:m",
            "DEBUG:Time unit set to m",
            "OK:T2:250",
            "DEBUG:Sampling period for light set to 250 m",
        ]
    );
    assert_eq!(
        status(&mut engine, &cfg, &mut out),
        "INFO:STATUS:T1=5,T2=250,TU=m,FT=0,FP=0,ST=10,SP=10,RUN=0"
    );
}

#[test]
fn non_positive_or_non_numeric_period_is_silently_ignored() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"T1:7\n", &cfg, &mut out);
    out.clear();

    for line in [&b"T1:0\n"[..], b"T1:-4\n", b"T1:xyz\n", b"T2:0\r\n"] {
        assert_eq!(engine.feed_all(line, &cfg, &mut out), Some(Outcome::Ignored));
    }
    assert!(out.bytes.is_empty(), "unexpected replies: {:?}", out.lines());
    let snap = cfg.snapshot();
    assert_eq!(snap.distance.period, 7);
    assert_eq!(snap.light.period, 1);
}

#[test]
fn period_value_uses_leading_digits() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"T2:12xyz\n", &cfg, &mut out);
    assert_eq!(out.lines()[0], "OK:T2:12");
    assert_eq!(cfg.snapshot().light.period, 12);
}

#[test]
fn any_non_zero_enables_filter() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"FT:0\n", &cfg, &mut out);
    assert!(!cfg.snapshot().distance.filter_enabled);
    engine.feed_all(b"FT:7\n", &cfg, &mut out);
    assert!(cfg.snapshot().distance.filter_enabled);
    engine.feed_all(b"FP:-1\n", &cfg, &mut out);
    assert!(cfg.snapshot().light.filter_enabled);
    assert_eq!(out.lines(), ["OK:FT:0", "OK:FT:1", "OK:FP:1"]);
}

#[test]
fn window_bounds() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"ST:1\nSP:50\n", &cfg, &mut out);
    assert_eq!(out.lines(), ["OK:ST:1", "OK:SP:50"]);

    out.clear();
    engine.feed_all(b"ST:0\nSP:51\nST:-3\n", &cfg, &mut out);
    assert!(out.bytes.is_empty());
    let snap = cfg.snapshot();
    assert_eq!(snap.distance.window, 1);
    assert_eq!(snap.light.window, 50);
}

#[test]
fn unknown_unit_is_silently_ignored() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"TU:h\n", &cfg, &mut out);
    assert!(out.bytes.is_empty());
    assert_eq!(cfg.snapshot().unit, TimeUnit::Second);

    engine.feed_all(b"TU:Minutes\n", &cfg, &mut out);
    assert_eq!(cfg.snapshot().unit, TimeUnit::Minute);
}

#[test]
fn shortcut_bytes_toggle_without_terminator() {
    let (mut engine, cfg, mut out) = rig();
    assert_eq!(engine.feed(b'a', &cfg, &mut out), Some(Outcome::Applied));
    assert!(cfg.is_running());
    assert_eq!(engine.feed(b'b', &cfg, &mut out), Some(Outcome::Applied));
    assert!(!cfg.is_running());
    assert_eq!(
        out.lines(),
        [
            "OK:a",
            "DEBUG:Acquisition started",
            "OK:b",
            "DEBUG:Acquisition stopped",
        ]
    );
    assert!(engine.pending().is_empty());
}

#[test]
fn unknown_command_yields_one_error() {
    let (mut engine, cfg, mut out) = rig();
    let outcome = engine.feed_all(b"XYZ\r\n", &cfg, &mut out);
    assert_eq!(
        outcome,
        Some(Outcome::Rejected(CommandError::unknown_bytes(b"XYZ")))
    );
    assert_eq!(out.lines(), ["ERROR:Unknown command: XYZ"]);
    assert!(engine.pending().is_empty());
    assert_eq!(status(&mut engine, &cfg, &mut out), DEFAULT_STATUS);
}

#[test]
fn unknown_command_with_value_names_only_the_command() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"QQ:12\n", &cfg, &mut out);
    assert_eq!(out.lines(), ["ERROR:Unknown command: QQ"]);
}

#[test]
fn lookup_is_case_sensitive() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"STATUs\n", &cfg, &mut out);
    assert_eq!(out.lines(), ["ERROR:Unknown command: STATUs"]);
}

#[test]
fn missing_value_is_an_error() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"T1\nFT:\nST\n", &cfg, &mut out);
    assert_eq!(
        out.lines(),
        [
            "ERROR:Value required for T1",
            "ERROR:Value required for FT",
            "ERROR:Value required for ST",
        ]
    );
    assert_eq!(status(&mut engine, &cfg, &mut out), DEFAULT_STATUS);
}

#[test]
fn overlong_line_is_truncated_and_still_dispatched() {
    let (mut engine, cfg, mut out) = rig();
    let mut line = b"T1:".to_vec();
    line.extend(std::iter::repeat_n(b'9', 40));
    engine.feed_all(&line, &cfg, &mut out);
    assert_eq!(engine.pending().len(), 31);

    engine.feed(b'\n', &cfg, &mut out);
    assert!(engine.pending().is_empty());
    // 28 nines saturate to i32::MAX.
    assert_eq!(out.lines()[0], format!("OK:T1:{}", i32::MAX));
}

#[test]
fn replies_are_written_one_line_per_call() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"T1:3\n", &cfg, &mut out);
    assert_eq!(out.writes, 2);
    assert_eq!(out.lines().len(), 2);
}

#[test]
fn start_and_stop_also_dispatch_as_line_commands() {
    let (_, cfg, mut out) = rig();

    assert_eq!(dispatch(b"a", &cfg, &mut out), Outcome::Applied);
    assert!(cfg.is_running());
    assert_eq!(dispatch(b"b:junk", &cfg, &mut out), Outcome::Applied);
    assert!(!cfg.is_running());

    assert_eq!(out.lines(), ["OK:a", "OK:b"]);
    assert_eq!(out.count_prefix("DEBUG:"), 0);
}

#[test]
fn start_byte_inside_a_line_acts_immediately() {
    let (mut engine, cfg, mut out) = rig();
    engine.feed_all(b"XaY\n", &cfg, &mut out);
    assert!(cfg.is_running());
    assert_eq!(out.count_prefix("OK:a"), 1);
    assert_eq!(out.last_line().unwrap(), "ERROR:Unknown command: XY");
}
