//! Unified error types for the sensing node firmware.
//!
//! Sensor faults and peripheral bring-up failures convert into a single
//! `Error`, returned by the pipelines, `hw_init` and `HwTimer::new`.
//! Protocol rejections stay as `CommandError`: they become an `ERROR:`
//! reply and the engine keeps accumulating.

use core::fmt;

use crate::drivers::hw_init::HwInitError;
use crate::sensors::Channel;

/// Longest command name carried inside a [`CommandError`].
pub const MAX_NAME_LEN: usize = 32;

/// Command name as received on the wire, truncated to [`MAX_NAME_LEN`].
pub type CommandName = heapless::String<MAX_NAME_LEN>;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Fallible library operations funnel into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sampling pipeline could not obtain a reading.
    Sensor(SensorError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The conversion-complete condition never showed up within the poll
    /// budget.
    ConversionTimeout(Channel),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConversionTimeout(ch) => write!(f, "{} conversion timeout", ch.tag()),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Rejections that produce an `ERROR:` reply.  The `Display` output is the
/// reply body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No entry in the command table matches the name.
    UnknownCommand(CommandName),
    /// The command needs a value and none was supplied.
    MissingValue(&'static str),
}

impl CommandError {
    /// Build an [`UnknownCommand`](Self::UnknownCommand) from a raw wire
    /// name, truncated to [`MAX_NAME_LEN`].  Invalid UTF-8 sequences become
    /// U+FFFD.
    pub fn unknown_bytes(name: &[u8]) -> Self {
        let mut owned = CommandName::new();
        'outer: for chunk in name.utf8_chunks() {
            for c in chunk.valid().chars() {
                if owned.push(c).is_err() {
                    break 'outer;
                }
            }
            if !chunk.invalid().is_empty() && owned.push('\u{fffd}').is_err() {
                break;
            }
        }
        Self::UnknownCommand(owned)
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "Unknown command: {name}"),
            Self::MissingValue(name) => write!(f, "Value required for {name}"),
        }
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
