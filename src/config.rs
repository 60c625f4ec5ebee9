//! System configuration parameters
//!
//! Two layers:
//!
//! - [`NodeConfig`]: static tunables fixed at build/boot time (baud rate,
//!   main-loop pacing, ADC poll budget).
//! - [`AcquisitionConfig`]: the runtime-mutable acquisition state (run flag,
//!   sampling periods, time unit, filter settings).  The process-wide
//!   instance lives in a [`SharedConfig`] that every execution context
//!   (serial RX, button edge, timer callbacks, main loop) reads from.
//!
//! ## Writers
//!
//! Only three contexts ever write the shared acquisition state:
//!
//! | Writer                 | Fields                                  |
//! |------------------------|-----------------------------------------|
//! | Command engine (UART)  | all fields                              |
//! | Button edge handler    | `running` only                          |
//! | Control loop           | none (owns the `TimerState`s instead)   |

use core::cell::Cell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;
use serde::{Deserialize, Serialize};

use crate::sensors::Channel;

/// Fixed capacity of each channel's moving-average buffer.
pub const FILTER_CAPACITY: usize = 50;

/// Window size each channel starts with.
pub const DEFAULT_WINDOW: u8 = 10;

/// Sampling period magnitude each channel starts with.
pub const DEFAULT_PERIOD: u32 = 1;

/// Capacity of the in-progress command line, terminator slot included.
pub const COMMAND_LINE_CAPACITY: usize = 32;

// ---------------------------------------------------------------------------
// Time unit
// ---------------------------------------------------------------------------

/// Global sampling time unit.  Applies to both channels at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// `m` on the wire.
    Millisecond,
    /// `s` on the wire.
    Second,
    /// `M` on the wire.
    Minute,
}

impl TimeUnit {
    /// Parse the single-character wire code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'm' => Some(Self::Millisecond),
            b's' => Some(Self::Second),
            b'M' => Some(Self::Minute),
            _ => None,
        }
    }

    /// Single-character wire code used in STATUS and acknowledgements.
    pub const fn code(self) -> char {
        match self {
            Self::Millisecond => 'm',
            Self::Second => 's',
            Self::Minute => 'M',
        }
    }

    /// Number of milliseconds (timer ticks) in one unit.
    pub const fn millis_factor(self) -> u32 {
        match self {
            Self::Millisecond => 1,
            Self::Second => 1_000,
            Self::Minute => 60_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Acquisition configuration
// ---------------------------------------------------------------------------

/// Per-channel acquisition settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Sampling period magnitude, in units of [`AcquisitionConfig::unit`].
    /// Always > 0.
    pub period: u32,
    /// Whether reports go through the moving-average filter.
    pub filter_enabled: bool,
    /// Moving-average window, `1..=FILTER_CAPACITY`.
    pub window: u8,
}

impl ChannelSettings {
    pub const DEFAULT: Self = Self {
        period: DEFAULT_PERIOD,
        filter_enabled: false,
        window: DEFAULT_WINDOW,
    };
}

/// Snapshot of the runtime-mutable acquisition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Run flag; gates every sampling pipeline.
    pub running: bool,
    /// Global time unit shared by both periods.
    pub unit: TimeUnit,
    pub distance: ChannelSettings,
    pub light: ChannelSettings,
}

impl AcquisitionConfig {
    /// Power-on state: stopped, 1 s periods, filters off, windows of 10.
    pub const DEFAULT: Self = Self {
        running: false,
        unit: TimeUnit::Second,
        distance: ChannelSettings::DEFAULT,
        light: ChannelSettings::DEFAULT,
    };

    pub fn channel(&self, channel: Channel) -> &ChannelSettings {
        match channel {
            Channel::Distance => &self.distance,
            Channel::Light => &self.light,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut ChannelSettings {
        match channel {
            Channel::Distance => &mut self.distance,
            Channel::Light => &mut self.light,
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Shared configuration
// ---------------------------------------------------------------------------

/// Process-wide acquisition state shared across execution contexts.
///
/// The whole [`AcquisitionConfig`] sits behind a critical-section mutex:
/// every read is a full consistent snapshot and every write is a scoped
/// read-modify-write with interrupts masked, so a reader can never observe
/// a half-applied update (e.g. a new unit with an old period).
pub struct SharedConfig {
    inner: CriticalSectionMutex<Cell<AcquisitionConfig>>,
}

impl SharedConfig {
    pub const fn new(initial: AcquisitionConfig) -> Self {
        Self {
            inner: CriticalSectionMutex::new(Cell::new(initial)),
        }
    }

    /// Consistent copy of every field.
    pub fn snapshot(&self) -> AcquisitionConfig {
        self.inner.lock(Cell::get)
    }

    /// Apply `f` to the state inside one critical section.
    pub fn update<R>(&self, f: impl FnOnce(&mut AcquisitionConfig) -> R) -> R {
        self.inner.lock(|cell| {
            let mut cfg = cell.get();
            let out = f(&mut cfg);
            cell.set(cfg);
            out
        })
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().running
    }

    pub fn set_running(&self, running: bool) {
        self.update(|cfg| cfg.running = running);
    }

    /// Flip the run flag and return the new value.
    pub fn toggle_running(&self) -> bool {
        self.update(|cfg| {
            cfg.running = !cfg.running;
            cfg.running
        })
    }

    /// Set a channel's period magnitude.  Zero is rejected and the prior
    /// value kept; returns whether the value was applied.
    pub fn set_period(&self, channel: Channel, period: u32) -> bool {
        if period == 0 {
            return false;
        }
        self.update(|cfg| cfg.channel_mut(channel).period = period);
        true
    }

    pub fn set_unit(&self, unit: TimeUnit) {
        self.update(|cfg| cfg.unit = unit);
    }

    pub fn set_filter(&self, channel: Channel, enabled: bool) {
        self.update(|cfg| cfg.channel_mut(channel).filter_enabled = enabled);
    }

    /// Set a channel's window size.  Values outside `1..=FILTER_CAPACITY`
    /// are rejected; returns whether the value was applied.
    pub fn set_window(&self, channel: Channel, window: u8) -> bool {
        if window == 0 || usize::from(window) > FILTER_CAPACITY {
            return false;
        }
        self.update(|cfg| cfg.channel_mut(channel).window = window);
        true
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(AcquisitionConfig::DEFAULT)
    }
}

// ---------------------------------------------------------------------------
// Static node tunables
// ---------------------------------------------------------------------------

/// Build/boot-time tunables for the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Serial link baud rate.
    pub baud_rate: u32,
    /// Maximum conversion-complete polls before an ADC read is declared
    /// stalled.
    pub adc_poll_limit: u32,
    /// Main-loop pacing while acquisition runs (run LED blink half-period).
    pub active_pace_ms: u32,
    /// Main-loop pacing while acquisition is stopped.
    pub idle_pace_ms: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            adc_poll_limit: 10_000,
            active_pace_ms: 500,
            idle_pace_ms: 200,
        }
    }
}
