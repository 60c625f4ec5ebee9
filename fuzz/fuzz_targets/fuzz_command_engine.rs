//! Fuzz target: `CommandEngine::feed`
//!
//! Drives arbitrary byte sequences into the command engine and asserts
//! that it never panics, never grows the pending line past its bound, that
//! every reply is a complete `\r\n`-terminated line, and that the shared
//! state stays inside its invariants.
//!
//! cargo fuzz run fuzz_command_engine

#![no_main]

use libfuzzer_sys::fuzz_target;
use sensenode::app::ports::SerialChannel;
use sensenode::config::{FILTER_CAPACITY, SharedConfig};
use sensenode::protocol::codec::CommandLine;
use sensenode::protocol::engine::CommandEngine;
use sensenode::protocol::reply::LINE_CAPACITY;

// Links the host critical-section implementation.
use critical_section as _;

struct Lines(Vec<Vec<u8>>);

impl SerialChannel for Lines {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.0.push(bytes.to_vec());
    }
}

fuzz_target!(|data: &[u8]| {
    let cfg = SharedConfig::default();
    let mut engine = CommandEngine::new();
    let mut out = Lines(Vec::new());

    for &b in data {
        engine.feed(b, &cfg, &mut out);
        assert!(engine.pending().len() <= CommandLine::MAX_LEN);
    }

    for line in &out.0 {
        assert!(line.ends_with(b"\r\n"), "reply not terminated");
        assert!(line.len() <= LINE_CAPACITY, "reply exceeds line buffer");
    }

    let snap = cfg.snapshot();
    for ch in [snap.distance, snap.light] {
        assert!(ch.period > 0);
        assert!(ch.window >= 1 && usize::from(ch.window) <= FILTER_CAPACITY);
    }
});
