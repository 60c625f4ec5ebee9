//! Sampling period → timer reload conversion and the reprogramming
//! protocol.
//!
//! The timers tick at 1 kHz, so a reload value is a period in
//! milliseconds.  The control loop recomputes the reload for both channels
//! every iteration and only touches a timer whose live reload differs.

use log::info;

use crate::config::{AcquisitionConfig, TimeUnit};
use crate::protocol::reply::Reply;
use crate::sensors::Channel;

use super::ports::{PeriodicTimer, SerialChannel};

/// Reload value for `magnitude` periods of `unit`, never below 1.
/// Saturates instead of wrapping on overflow.
pub fn reload_value(magnitude: u32, unit: TimeUnit) -> u32 {
    magnitude.saturating_mul(unit.millis_factor()).max(1)
}

/// Reload value the configuration asks for on `channel`.
pub fn desired_reload(cfg: &AcquisitionConfig, channel: Channel) -> u32 {
    reload_value(cfg.channel(channel).period, cfg.unit)
}

/// Whether a timer is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Running,
    Stopped,
}

/// One channel's sampling timer as the control loop sees it.
///
/// Created running at the default 1 s period and lives for the whole
/// process; only the control loop mutates it.
pub struct TimerState<T> {
    channel: Channel,
    timer: T,
    status: TimerStatus,
}

impl<T: PeriodicTimer> TimerState<T> {
    /// Take ownership of `timer`, load `initial` and start it.
    pub fn start(channel: Channel, mut timer: T, initial: u32) -> Self {
        timer.stop();
        timer.set_reload(initial.max(1));
        timer.reset_count();
        timer.start();
        Self {
            channel,
            timer,
            status: TimerStatus::Running,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    /// Reload value live in the hardware.
    pub fn live_reload(&self) -> u32 {
        self.timer.reload()
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Bring the timer in line with `desired`.
    ///
    /// Stop, load, zero the count, restart: the count is cleared while the
    /// timer is stopped, so no stale in-flight count can fire early against
    /// the new reload.  Emits an `INFO:` notice and returns `true` when the
    /// timer was reprogrammed.
    pub fn reconcile<S: SerialChannel + ?Sized>(&mut self, desired: u32, out: &mut S) -> bool {
        if self.timer.reload() == desired {
            return false;
        }
        self.timer.stop();
        self.status = TimerStatus::Stopped;
        self.timer.set_reload(desired);
        self.timer.reset_count();
        self.timer.start();
        self.status = TimerStatus::Running;

        info!("{} timer reload -> {} ms", self.channel.name(), desired);
        Reply::Info(format_args!(
            "Timer {} updated: {} ms",
            self.channel.name(),
            desired
        ))
        .send(out);
        true
    }
}
