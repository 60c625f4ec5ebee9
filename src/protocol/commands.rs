//! Command table.
//!
//! Each entry names a command, whether it needs a value, and the handler
//! that validates the value and applies it.  The engine looks the name up
//! (exact, case-sensitive), rejects a missing value for commands that need
//! one, and otherwise hands over to the handler.
//!
//! | Name     | Value            | Effect                          | Bad value |
//! |----------|------------------|---------------------------------|-----------|
//! | `STATUS` | -                | status line                     | -         |
//! | `a`/`b`  | -                | start / stop acquisition        | -         |
//! | `T1`/`T2`| integer > 0      | distance / light period         | silent    |
//! | `TU`     | `m` / `s` / `M`  | global time unit                | silent    |
//! | `FT`/`FP`| integer          | filter on (≠ 0) / off (0)       | -         |
//! | `ST`/`SP`| integer 1..=50   | distance / light window         | silent    |

use log::{debug, info};

use crate::app::ports::SerialChannel;
use crate::config::{FILTER_CAPACITY, SharedConfig, TimeUnit};
use crate::error::CommandError;
use crate::sensors::Channel;

use super::codec::parse_int;
use super::reply::{AckValue, Reply};

/// What happened to a dispatched line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed and an acknowledgement went out.
    Applied,
    /// Informational reply only (STATUS).
    Reported,
    /// Value failed validation; nothing changed and nothing was sent.
    Ignored,
    /// `ERROR:` reply sent.
    Rejected(CommandError),
}

/// Whether a command needs a value after the `:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    None,
    Required,
}

/// Handler signature.  `value` is empty for [`ValueRule::None`] commands.
pub type Handler = fn(&SharedConfig, &[u8], &mut dyn SerialChannel) -> Outcome;

pub struct CommandSpec {
    pub name: &'static str,
    pub value: ValueRule,
    pub handler: Handler,
}

pub static COMMANDS: [CommandSpec; 10] = [
    CommandSpec { name: "STATUS", value: ValueRule::None, handler: status },
    CommandSpec { name: "a", value: ValueRule::None, handler: start_line },
    CommandSpec { name: "b", value: ValueRule::None, handler: stop_line },
    CommandSpec { name: "T1", value: ValueRule::Required, handler: distance_period },
    CommandSpec { name: "T2", value: ValueRule::Required, handler: light_period },
    CommandSpec { name: "TU", value: ValueRule::Required, handler: time_unit },
    CommandSpec { name: "FT", value: ValueRule::Required, handler: distance_filter },
    CommandSpec { name: "FP", value: ValueRule::Required, handler: light_filter },
    CommandSpec { name: "ST", value: ValueRule::Required, handler: distance_window },
    CommandSpec { name: "SP", value: ValueRule::Required, handler: light_window },
];

/// Exact, case-sensitive lookup.
pub fn lookup(name: &[u8]) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name.as_bytes() == name)
}

// ── Run flag ──────────────────────────────────────────────────

/// Set the run flag and acknowledge.  The byte-level shortcut also sends a
/// `DEBUG:` follow-up; the line form does not.
pub fn set_running(
    cfg: &SharedConfig,
    running: bool,
    verbose: bool,
    out: &mut dyn SerialChannel,
) -> Outcome {
    cfg.set_running(running);
    info!("acquisition {}", if running { "started" } else { "stopped" });
    let command = if running { "a" } else { "b" };
    Reply::Ack { command, value: None }.send(out);
    if verbose {
        let state = if running { "started" } else { "stopped" };
        Reply::Debug(format_args!("Acquisition {state}")).send(out);
    }
    Outcome::Applied
}

fn start_line(cfg: &SharedConfig, _: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    set_running(cfg, true, false, out)
}

fn stop_line(cfg: &SharedConfig, _: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    set_running(cfg, false, false, out)
}

fn status(cfg: &SharedConfig, _: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    Reply::Status(&cfg.snapshot()).send(out);
    Outcome::Reported
}

// ── Periods ───────────────────────────────────────────────────

fn set_period(
    channel: Channel,
    command: &'static str,
    cfg: &SharedConfig,
    value: &[u8],
    out: &mut dyn SerialChannel,
) -> Outcome {
    let requested = parse_int(value);
    if requested <= 0 || !cfg.set_period(channel, requested as u32) {
        debug!("{command}: ignoring period {requested}");
        return Outcome::Ignored;
    }
    let period = requested as u32;
    let unit = cfg.snapshot().unit;
    info!("{} period -> {} {}", channel.name(), period, unit.code());
    Reply::Ack {
        command,
        value: Some(AckValue::Number(period)),
    }
    .send(out);
    Reply::Debug(format_args!(
        "Sampling period for {} set to {} {}",
        channel.name(),
        period,
        unit.code()
    ))
    .send(out);
    Outcome::Applied
}

fn distance_period(cfg: &SharedConfig, value: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    set_period(Channel::Distance, "T1", cfg, value, out)
}

fn light_period(cfg: &SharedConfig, value: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    set_period(Channel::Light, "T2", cfg, value, out)
}

// ── Unit ──────────────────────────────────────────────────────

fn time_unit(cfg: &SharedConfig, value: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    let Some(unit) = value.first().copied().and_then(TimeUnit::from_code) else {
        debug!("TU: ignoring unit {:?}", value.first().map(|&b| b as char));
        return Outcome::Ignored;
    };
    cfg.set_unit(unit);
    info!("time unit -> {}", unit.code());
    Reply::Ack {
        command: "TU",
        value: Some(AckValue::Unit(unit)),
    }
    .send(out);
    Reply::Debug(format_args!("Time unit set to {}", unit.code())).send(out);
    Outcome::Applied
}

// ── Filters ───────────────────────────────────────────────────

fn set_filter(
    channel: Channel,
    command: &'static str,
    cfg: &SharedConfig,
    value: &[u8],
    out: &mut dyn SerialChannel,
) -> Outcome {
    let enabled = parse_int(value) != 0;
    cfg.set_filter(channel, enabled);
    info!("{} filter -> {}", channel.name(), if enabled { "on" } else { "off" });
    Reply::Ack {
        command,
        value: Some(AckValue::Flag(enabled)),
    }
    .send(out);
    Outcome::Applied
}

fn distance_filter(cfg: &SharedConfig, value: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    set_filter(Channel::Distance, "FT", cfg, value, out)
}

fn light_filter(cfg: &SharedConfig, value: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    set_filter(Channel::Light, "FP", cfg, value, out)
}

// ── Windows ───────────────────────────────────────────────────

fn set_window(
    channel: Channel,
    command: &'static str,
    cfg: &SharedConfig,
    value: &[u8],
    out: &mut dyn SerialChannel,
) -> Outcome {
    let requested = parse_int(value);
    let in_range = requested > 0 && requested as usize <= FILTER_CAPACITY;
    if !in_range || !cfg.set_window(channel, requested as u8) {
        debug!("{command}: ignoring window {requested}");
        return Outcome::Ignored;
    }
    info!("{} window -> {}", channel.name(), requested);
    Reply::Ack {
        command,
        value: Some(AckValue::Number(requested as u32)),
    }
    .send(out);
    Outcome::Applied
}

fn distance_window(cfg: &SharedConfig, value: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    set_window(Channel::Distance, "ST", cfg, value, out)
}

fn light_window(cfg: &SharedConfig, value: &[u8], out: &mut dyn SerialChannel) -> Outcome {
    set_window(Channel::Light, "SP", cfg, value, out)
}
