//! Sampling pipeline against a scripted ADC: gating on the run flag,
//! conversion, optional filtering, report format, activity LED, and the
//! bounded conversion wait.

use sensenode::app::pipeline::SamplingPipeline;
use sensenode::app::ports::NoIndicator;
use sensenode::config::SharedConfig;
use sensenode::error::{Error, SensorError};
use sensenode::sensors::{Channel, DISTANCE, LIGHT, distance, light};

use super::mock_hw::{FakeLed, RecordingSerial, ScriptedAdc};

const POLL_LIMIT: u32 = 16;

fn running() -> SharedConfig {
    let cfg = SharedConfig::default();
    cfg.set_running(true);
    cfg
}

#[test]
fn stopped_acquisition_is_a_no_op() {
    let cfg = SharedConfig::default();
    let mut out = RecordingSerial::new();
    let mut p = SamplingPipeline::new(&DISTANCE, ScriptedAdc::with_samples(&[100]), FakeLed::default(), POLL_LIMIT);

    assert_eq!(p.on_timer_event(&cfg, &mut out), Ok(None));
    assert!(out.bytes.is_empty());
    assert!(!p.activity().high);
}

#[test]
fn distance_report_and_activity_toggle() {
    let cfg = running();
    let mut out = RecordingSerial::new();
    let mut p = SamplingPipeline::new(
        &DISTANCE,
        ScriptedAdc::with_samples(&[2048, 1024]),
        FakeLed::default(),
        POLL_LIMIT,
    );

    let first = p.on_timer_event(&cfg, &mut out).unwrap().unwrap();
    assert_eq!(first, distance::raw_to_cm(2048));
    assert!(p.activity().high);

    p.on_timer_event(&cfg, &mut out).unwrap();
    assert!(!p.activity().high);

    assert_eq!(
        out.lines(),
        [
            format!("TEMP:{:.2}", distance::raw_to_cm(2048)),
            format!("TEMP:{:.2}", distance::raw_to_cm(1024)),
        ]
    );
}

#[test]
fn light_report_uses_lux_tag() {
    let cfg = running();
    let mut out = RecordingSerial::new();
    let mut p = SamplingPipeline::new(&LIGHT, ScriptedAdc::with_samples(&[300]), NoIndicator, POLL_LIMIT);

    p.on_timer_event(&cfg, &mut out).unwrap();
    assert_eq!(p.descriptor().tag, "LUX");
    assert_eq!(out.lines(), [format!("LUX:{:.2}", light::raw_to_intensity(300))]);
}

#[test]
fn raw_sample_is_masked_to_channel_width() {
    let cfg = running();
    let mut out = RecordingSerial::new();
    let mut p = SamplingPipeline::new(&LIGHT, ScriptedAdc::with_samples(&[0x0400 | 5]), NoIndicator, POLL_LIMIT);

    let v = p.on_timer_event(&cfg, &mut out).unwrap().unwrap();
    assert_eq!(v, light::raw_to_intensity(5));
}

#[test]
fn filter_smooths_with_configured_window() {
    let cfg = running();
    cfg.set_filter(Channel::Light, true);
    assert!(cfg.set_window(Channel::Light, 2));
    let mut out = RecordingSerial::new();
    let mut p = SamplingPipeline::new(&LIGHT, ScriptedAdc::with_samples(&[100, 300]), NoIndicator, POLL_LIMIT);

    let a = p.on_timer_event(&cfg, &mut out).unwrap().unwrap();
    let b = p.on_timer_event(&cfg, &mut out).unwrap().unwrap();

    let v100 = light::raw_to_intensity(100);
    let v300 = light::raw_to_intensity(300);
    // Window slots start at zero, so the first output is pulled down.
    assert!((a - v100 / 2.0).abs() < 1e-3);
    assert!((b - (v100 + v300) / 2.0).abs() < 1e-3);
    assert_eq!(p.filter().window(), 2);
}

#[test]
fn disabled_filter_reports_raw_converted_values_exactly() {
    let cfg = running();
    cfg.set_filter(Channel::Distance, true);
    let mut out = RecordingSerial::new();
    let mut p = SamplingPipeline::new(
        &DISTANCE,
        ScriptedAdc::with_samples(&[1000, 1000, 3000]),
        FakeLed::default(),
        POLL_LIMIT,
    );

    p.on_timer_event(&cfg, &mut out).unwrap();
    p.on_timer_event(&cfg, &mut out).unwrap();
    let cursor = p.filter().cursor();

    cfg.set_filter(Channel::Distance, false);
    let v = p.on_timer_event(&cfg, &mut out).unwrap().unwrap();
    assert_eq!(v, distance::raw_to_cm(3000));
    // Bypassed entirely: buffer untouched.
    assert_eq!(p.filter().cursor(), cursor);
}

#[test]
fn stalled_conversion_reports_timeout_and_gives_up() {
    let cfg = running();
    cfg.set_filter(Channel::Distance, true);
    let mut out = RecordingSerial::new();
    let mut p = SamplingPipeline::new(&DISTANCE, ScriptedAdc::stalled(), FakeLed::default(), POLL_LIMIT);

    let result = p.on_timer_event(&cfg, &mut out);
    assert_eq!(
        result,
        Err(Error::Sensor(SensorError::ConversionTimeout(Channel::Distance)))
    );
    assert_eq!(out.lines(), ["ERROR:TEMP conversion timeout"]);
    assert!(!p.activity().high, "no report, no toggle");
    assert_eq!(p.filter().cursor(), 0, "filter untouched");
}
