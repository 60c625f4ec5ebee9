//! Command protocol engine: runs in the serial-receive context.
//!
//! Two states:
//!
//! ```text
//!            data byte (kept or dropped)
//!           ┌──────────┐
//!           ▼          │
//!   ┌──────────────┐   │   terminator, line non-empty   ┌─────────────┐
//!   │ Accumulating │───┴───────────────────────────────▶│ Dispatching │
//!   └──────────────┘◀───────────────────────────────────┴─────────────┘
//!       │    ▲               line cleared
//!       └────┘
//!   `a` / `b` (run flag, immediate)
//!   terminator on empty line (no-op)
//! ```
//!
//! Dispatching is instantaneous: it happens inside the [`feed`] call that
//! delivered the terminator.
//!
//! [`feed`]: CommandEngine::feed

use log::debug;

use crate::app::ports::SerialChannel;
use crate::config::SharedConfig;
use crate::error::CommandError;

use super::codec::{ByteClass, CommandLine, classify, split_command};
use super::commands::{self, Outcome, ValueRule};
use super::reply::Reply;

/// Byte-at-a-time command parser and dispatcher.
#[derive(Debug, Default)]
pub struct CommandEngine {
    line: CommandLine,
}

impl CommandEngine {
    pub const fn new() -> Self {
        Self {
            line: CommandLine::new(),
        }
    }

    /// Feed one received byte.
    ///
    /// Returns the outcome when the byte completed a command (terminator
    /// or `a`/`b` shortcut), `None` while still accumulating.
    pub fn feed<S: SerialChannel>(
        &mut self,
        byte: u8,
        cfg: &SharedConfig,
        out: &mut S,
    ) -> Option<Outcome> {
        match classify(byte) {
            ByteClass::Start => Some(commands::set_running(cfg, true, true, out)),
            ByteClass::Stop => Some(commands::set_running(cfg, false, true, out)),
            ByteClass::Terminator => {
                if self.line.is_empty() {
                    return None;
                }
                let outcome = dispatch(self.line.as_bytes(), cfg, out);
                self.line.clear();
                Some(outcome)
            }
            ByteClass::Data(b) => {
                if !self.line.push(b) {
                    debug!("command line full, dropped 0x{:02x}", b);
                }
                None
            }
        }
    }

    /// Feed a run of bytes, returning the last completed outcome.
    pub fn feed_all<S: SerialChannel>(
        &mut self,
        bytes: &[u8],
        cfg: &SharedConfig,
        out: &mut S,
    ) -> Option<Outcome> {
        bytes
            .iter()
            .fold(None, |last, &b| self.feed(b, cfg, out).or(last))
    }

    /// Bytes accumulated so far.
    pub fn pending(&self) -> &[u8] {
        self.line.as_bytes()
    }
}

/// Resolve and run one complete line.
pub fn dispatch(line: &[u8], cfg: &SharedConfig, out: &mut dyn SerialChannel) -> Outcome {
    let Some((name, value)) = split_command(line) else {
        debug!("dropping nameless line");
        return Outcome::Ignored;
    };

    let Some(spec) = commands::lookup(name) else {
        return reject(CommandError::unknown_bytes(name), out);
    };

    match (spec.value, value) {
        (ValueRule::Required, None) => reject(CommandError::MissingValue(spec.name), out),
        (ValueRule::Required, Some(v)) => (spec.handler)(cfg, v, out),
        (ValueRule::None, _) => (spec.handler)(cfg, &[], out),
    }
}

fn reject(err: CommandError, out: &mut dyn SerialChannel) -> Outcome {
    debug!("rejected: {}", err);
    Reply::Error(&err).send(out);
    Outcome::Rejected(err)
}
