//! Main control loop: lowest-priority context, runs forever.
//!
//! Each iteration:
//!
//! 1. Recompute the reload for both channels from a configuration snapshot
//!    and reprogram any timer whose live reload differs.
//! 2. Drive the run indicator: toggle and wait the active pace while
//!    acquisition runs; drive it low and wait the idle pace otherwise.
//!
//! The loop never blocks on anything but its own pacing delay.

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::StatefulOutputPin;

use crate::config::{AcquisitionConfig, NodeConfig, SharedConfig};
use crate::protocol::reply::Reply;
use crate::sensors::Channel;

use super::acquisition::{TimerState, desired_reload};
use super::ports::{PeriodicTimer, SerialChannel};

/// Firmware version shown in the startup banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const COMMAND_SUMMARY: &str =
    "Commands: T1:period, T2:period, TU:[m,s,M], FT:[0,1], FP:[0,1], ST:samples, SP:samples";

/// Send the startup banner: version, start/stop hint, command summary.
pub fn send_banner<S: SerialChannel + ?Sized>(out: &mut S) {
    let mut version = heapless::String::<48>::new();
    let _ = write!(version, "Sensing node started v{VERSION}");
    Reply::Text(version.as_str()).send(out);
    Reply::Text("Send 'a' to start, 'b' to stop").send(out);
    Reply::Text(COMMAND_SUMMARY).send(out);
}

/// What one iteration did, for tests and the binary's trace logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub reprogrammed_distance: bool,
    pub reprogrammed_light: bool,
    pub running: bool,
    pub paced_ms: u32,
}

pub struct ControlLoop<TD, TL, L, D> {
    distance: TimerState<TD>,
    light: TimerState<TL>,
    run_led: L,
    delay: D,
    node: NodeConfig,
}

impl<TD, TL, L, D> ControlLoop<TD, TL, L, D>
where
    TD: PeriodicTimer,
    TL: PeriodicTimer,
    L: StatefulOutputPin,
    D: DelayNs,
{
    /// Take ownership of both timers and start them at the reload the
    /// startup configuration asks for.
    pub fn new(
        cfg: &AcquisitionConfig,
        distance_timer: TD,
        light_timer: TL,
        run_led: L,
        delay: D,
        node: NodeConfig,
    ) -> Self {
        Self {
            distance: TimerState::start(
                Channel::Distance,
                distance_timer,
                desired_reload(cfg, Channel::Distance),
            ),
            light: TimerState::start(
                Channel::Light,
                light_timer,
                desired_reload(cfg, Channel::Light),
            ),
            run_led,
            delay,
            node,
        }
    }

    pub fn distance_timer(&self) -> &TimerState<TD> {
        &self.distance
    }

    pub fn light_timer(&self) -> &TimerState<TL> {
        &self.light
    }

    pub fn run_led(&mut self) -> &mut L {
        &mut self.run_led
    }

    /// Bring both timers in line with the configuration without pacing.
    pub fn reconcile_timers<S: SerialChannel + ?Sized>(
        &mut self,
        cfg: &AcquisitionConfig,
        out: &mut S,
    ) -> (bool, bool) {
        let distance = self
            .distance
            .reconcile(desired_reload(cfg, Channel::Distance), out);
        let light = self
            .light
            .reconcile(desired_reload(cfg, Channel::Light), out);
        (distance, light)
    }

    /// One pass of the main loop.
    pub fn iterate<S: SerialChannel + ?Sized>(
        &mut self,
        shared: &SharedConfig,
        out: &mut S,
    ) -> Tick {
        let cfg = shared.snapshot();
        let (reprogrammed_distance, reprogrammed_light) = self.reconcile_timers(&cfg, out);

        let paced_ms = if cfg.running {
            let _ = self.run_led.toggle();
            self.node.active_pace_ms
        } else {
            let _ = self.run_led.set_low();
            self.node.idle_pace_ms
        };
        self.delay.delay_ms(paced_ms);

        Tick {
            reprogrammed_distance,
            reprogrammed_light,
            running: cfg.running,
            paced_ms,
        }
    }

    /// Never returns.
    pub fn run<S: SerialChannel + ?Sized>(&mut self, shared: &SharedConfig, out: &mut S) -> ! {
        loop {
            self.iterate(shared, out);
        }
    }
}
