//! Inbound byte handling: classification and line accumulation.
//!
//! Two bytes act immediately regardless of line state (`a` starts and
//! `b` stops acquisition).  Everything else accumulates until a line
//! terminator.

use crate::config::COMMAND_LINE_CAPACITY;

/// What a received byte means to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// `a`: start acquisition, no terminator needed.
    Start,
    /// `b`: stop acquisition, no terminator needed.
    Stop,
    /// `\r` or `\n`.
    Terminator,
    /// Anything else.
    Data(u8),
}

pub const fn classify(byte: u8) -> ByteClass {
    match byte {
        b'a' => ByteClass::Start,
        b'b' => ByteClass::Stop,
        b'\r' | b'\n' => ByteClass::Terminator,
        other => ByteClass::Data(other),
    }
}

/// Bounded accumulator for one in-progress command.
///
/// Holds at most `COMMAND_LINE_CAPACITY - 1` bytes; the last slot is the
/// terminator's.  Bytes arriving once full are dropped, and what was kept
/// is still dispatched when the terminator shows up.
#[derive(Debug, Default)]
pub struct CommandLine {
    buf: heapless::Vec<u8, COMMAND_LINE_CAPACITY>,
}

impl CommandLine {
    /// Usable length, terminator slot excluded.
    pub const MAX_LEN: usize = COMMAND_LINE_CAPACITY - 1;

    pub const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
        }
    }

    /// Append a byte.  Returns `false` if it was dropped.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.buf.len() >= Self::MAX_LEN {
            return false;
        }
        self.buf.push(byte).is_ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Split a line into command name and value.
///
/// Leading `:` are skipped; the name runs to the next `:`.  The value is
/// whatever follows, minus trailing `\r`/`\n`, and is `None` when absent or
/// empty.  Returns `None` when there is no name at all.
pub fn split_command(line: &[u8]) -> Option<(&[u8], Option<&[u8]>)> {
    let start = line.iter().position(|&b| b != b':')?;
    let line = &line[start..];
    let (name, rest) = match line.iter().position(|&b| b == b':') {
        Some(i) => (&line[..i], Some(&line[i + 1..])),
        None => (line, None),
    };
    let value = rest
        .map(|v| {
            let end = v
                .iter()
                .rposition(|&b| b != b'\r' && b != b'\n')
                .map_or(0, |i| i + 1);
            &v[..end]
        })
        .filter(|v| !v.is_empty());
    Some((name, value))
}

/// Decimal integer with C `atoi` leniency: leading whitespace, optional
/// sign, then as many digits as there are.  No digits gives 0; overflow
/// saturates.
pub fn parse_int(bytes: &[u8]) -> i32 {
    let mut it = bytes
        .iter()
        .copied()
        .skip_while(|b| matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r'))
        .peekable();
    let negative = match it.peek() {
        Some(b'-') => {
            it.next();
            true
        }
        Some(b'+') => {
            it.next();
            false
        }
        _ => false,
    };
    let mut acc: i64 = 0;
    for b in it.take_while(u8::is_ascii_digit) {
        acc = (acc * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    let signed = if negative { -acc } else { acc };
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
