//! Main control loop: timer reconciliation, reprogram protocol, run LED,
//! pacing; plus the button edge handler and startup banner.

use sensenode::app::acquisition::TimerStatus;
use sensenode::app::control::{ControlLoop, send_banner};
use sensenode::config::{AcquisitionConfig, NodeConfig, SharedConfig};
use sensenode::drivers::button::{ButtonAction, ButtonHandler};
use sensenode::protocol::engine::CommandEngine;

use super::mock_hw::{FakeButton, FakeDelay, FakeLed, FakeTimer, RecordingSerial, TimerCall};

type Loop = ControlLoop<FakeTimer, FakeTimer, FakeLed, FakeDelay>;

fn make_loop(cfg: &SharedConfig) -> Loop {
    ControlLoop::new(
        &cfg.snapshot(),
        FakeTimer::new(),
        FakeTimer::new(),
        FakeLed::default(),
        FakeDelay::default(),
        NodeConfig::default(),
    )
}

#[test]
fn timers_start_at_one_second() {
    let cfg = SharedConfig::default();
    let ctl = make_loop(&cfg);
    assert_eq!(ctl.distance_timer().live_reload(), 1_000);
    assert_eq!(ctl.light_timer().live_reload(), 1_000);
    assert!(ctl.distance_timer().timer().running);
    assert_eq!(ctl.light_timer().status(), TimerStatus::Running);
    assert_eq!(ctl.light_timer().channel(), sensenode::sensors::Channel::Light);
}

#[test]
fn unchanged_config_does_not_touch_timers() {
    let cfg = SharedConfig::default();
    let mut ctl = make_loop(&cfg);
    let mut out = RecordingSerial::new();
    let before = ctl.distance_timer().timer().calls.len();

    let tick = ctl.iterate(&cfg, &mut out);
    assert!(!tick.reprogrammed_distance && !tick.reprogrammed_light);
    assert_eq!(ctl.distance_timer().timer().calls.len(), before);
    assert!(out.bytes.is_empty());
}

#[test]
fn period_change_reprograms_with_stop_load_reset_start() {
    let cfg = SharedConfig::default();
    let mut ctl = make_loop(&cfg);
    let mut out = RecordingSerial::new();
    let mut engine = CommandEngine::new();

    engine.feed_all(b"T1:2\n", &cfg, &mut out);
    out.clear();

    let tick = ctl.iterate(&cfg, &mut out);
    assert!(tick.reprogrammed_distance);
    assert!(!tick.reprogrammed_light);

    let calls = &ctl.distance_timer().timer().calls;
    assert_eq!(
        calls[calls.len() - 4..],
        [
            TimerCall::Stop,
            TimerCall::SetReload(2_000),
            TimerCall::ResetCount,
            TimerCall::Start,
        ]
    );
    assert_eq!(ctl.distance_timer().timer().count, 0);
    assert_eq!(out.lines(), ["INFO:Timer distance updated: 2000 ms"]);

    // Second pass: already in line.
    out.clear();
    assert!(!ctl.iterate(&cfg, &mut out).reprogrammed_distance);
    assert!(out.bytes.is_empty());
}

#[test]
fn unit_change_reprograms_both_channels() {
    let cfg = SharedConfig::default();
    let mut ctl = make_loop(&cfg);
    let mut out = RecordingSerial::new();
    let mut engine = CommandEngine::new();

    engine.feed_all(b"T2:5\nTU:M\n", &cfg, &mut out);
    out.clear();
    ctl.iterate(&cfg, &mut out);

    assert_eq!(ctl.distance_timer().live_reload(), 60_000);
    assert_eq!(ctl.light_timer().live_reload(), 300_000);
    assert_eq!(
        out.lines(),
        [
            "INFO:Timer distance updated: 60000 ms",
            "INFO:Timer light updated: 300000 ms",
        ]
    );
}

#[test]
fn stale_count_is_cleared_on_reprogram() {
    let cfg = SharedConfig::default();
    let mut ctl = make_loop(&cfg);
    let mut out = RecordingSerial::new();

    let mut next = cfg.snapshot();
    next.unit = sensenode::config::TimeUnit::Millisecond;
    cfg.update(|c| *c = next);

    ctl.reconcile_timers(&cfg.snapshot(), &mut out);
    assert_eq!(ctl.light_timer().live_reload(), 1);
    assert_eq!(ctl.light_timer().timer().count, 0);
}

#[test]
fn run_led_blinks_while_running_and_is_off_when_stopped() {
    let cfg = SharedConfig::default();
    let mut ctl = make_loop(&cfg);
    let mut out = RecordingSerial::new();

    let idle = ctl.iterate(&cfg, &mut out);
    assert_eq!(idle.paced_ms, 200);
    assert!(!ctl.run_led().high);

    cfg.set_running(true);
    let t1 = ctl.iterate(&cfg, &mut out);
    assert_eq!(t1.paced_ms, 500);
    assert!(ctl.run_led().high);
    ctl.iterate(&cfg, &mut out);
    assert!(!ctl.run_led().high);
    ctl.iterate(&cfg, &mut out);
    assert!(ctl.run_led().high);

    cfg.set_running(false);
    ctl.iterate(&cfg, &mut out);
    assert!(!ctl.run_led().high);
}

#[test]
fn default_startup_config_matches_shared_default() {
    assert_eq!(SharedConfig::default().snapshot(), AcquisitionConfig::DEFAULT);
}

// ── Button ────────────────────────────────────────────────────

#[test]
fn button_high_level_toggles_run_flag() {
    let cfg = SharedConfig::default();
    let mut out = RecordingSerial::new();
    let mut button = ButtonHandler::new(FakeButton { high: true });

    assert_eq!(button.on_edge(&cfg, &mut out), ButtonAction::Started);
    assert!(cfg.is_running());
    assert_eq!(button.on_edge(&cfg, &mut out), ButtonAction::Stopped);
    assert!(!cfg.is_running());
    assert_eq!(
        out.lines(),
        [
            "INFO:Button pressed - acquisition started",
            "INFO:Button pressed - acquisition stopped",
        ]
    );
}

#[test]
fn button_low_level_is_ignored() {
    let cfg = SharedConfig::default();
    let mut out = RecordingSerial::new();
    let mut button = ButtonHandler::new(FakeButton { high: false });

    assert_eq!(button.on_edge(&cfg, &mut out), ButtonAction::Ignored);
    assert!(!cfg.is_running());
    assert!(out.bytes.is_empty());
}

// ── Banner ────────────────────────────────────────────────────

#[test]
fn banner_lines() {
    let mut out = RecordingSerial::new();
    send_banner(&mut out);
    let lines = out.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        format!("Sensing node started v{}", env!("CARGO_PKG_VERSION"))
    );
    assert_eq!(lines[1], "Send 'a' to start, 'b' to stop");
    assert!(lines[2].starts_with("Commands: T1:"));
}
