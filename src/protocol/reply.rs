//! Outbound line formats.
//!
//! ```text
//! OK:<cmd>[:<value>]       acknowledgement
//! ERROR:<message>          rejection
//! INFO:<message>           notices and the STATUS reply
//! DEBUG:<message>          follow-ups after some acknowledgements
//! <TAG>:<value .2>         channel reports (TEMP, LUX)
//! ```
//!
//! Every line is formatted into one stack buffer and handed to the serial
//! channel in a single write, `\r\n` included, so lines from different
//! contexts never interleave mid-line.

use core::fmt::{self, Write as _};

use log::warn;

use crate::app::ports::SerialChannel;
use crate::config::{AcquisitionConfig, TimeUnit};

/// Longest outbound line, terminator included.
pub const LINE_CAPACITY: usize = 128;

/// Value echoed in an acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckValue {
    Number(u32),
    Flag(bool),
    Unit(TimeUnit),
}

impl fmt::Display for AckValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(on) => write!(f, "{}", u8::from(*on)),
            Self::Unit(u) => write!(f, "{}", u.code()),
        }
    }
}

/// One outbound line.
pub enum Reply<'a> {
    Ack {
        command: &'a str,
        value: Option<AckValue>,
    },
    Error(&'a dyn fmt::Display),
    Info(fmt::Arguments<'a>),
    Debug(fmt::Arguments<'a>),
    Status(&'a AcquisitionConfig),
    Report { tag: &'a str, value: f32 },
    /// Untagged text (boot banner).
    Text(&'a str),
}

impl fmt::Display for Reply<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ack {
                command,
                value: Some(v),
            } => write!(f, "OK:{command}:{v}"),
            Self::Ack {
                command,
                value: None,
            } => write!(f, "OK:{command}"),
            Self::Error(msg) => write!(f, "ERROR:{msg}"),
            Self::Info(args) => write!(f, "INFO:{args}"),
            Self::Debug(args) => write!(f, "DEBUG:{args}"),
            Self::Status(c) => write!(
                f,
                "INFO:STATUS:T1={},T2={},TU={},FT={},FP={},ST={},SP={},RUN={}",
                c.distance.period,
                c.light.period,
                c.unit.code(),
                u8::from(c.distance.filter_enabled),
                u8::from(c.light.filter_enabled),
                c.distance.window,
                c.light.window,
                u8::from(c.running),
            ),
            Self::Report { tag, value } => write!(f, "{tag}:{value:.2}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Reply<'_> {
    /// Format the line and write it, `\r\n`-terminated, in one call.
    pub fn send<S: SerialChannel + ?Sized>(&self, out: &mut S) {
        let mut line = LineBuf::default();
        let _ = write!(line, "{self}");
        if line.truncated {
            warn!("reply truncated: {}", line.buf);
        }
        // The body never takes the last two slots.
        let _ = line.buf.push_str("\r\n");
        out.write_bytes(line.buf.as_bytes());
    }
}

/// Stack line buffer that keeps whatever fits and drops the rest.
#[derive(Default)]
struct LineBuf {
    buf: heapless::String<LINE_CAPACITY>,
    truncated: bool,
}

impl fmt::Write for LineBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.truncated || self.buf.len() + c.len_utf8() > LINE_CAPACITY - 2 {
                self.truncated = true;
                break;
            }
            let _ = self.buf.push(c);
        }
        Ok(())
    }
}
