//! Serial command protocol.
//!
//! Line-oriented ASCII over the UART, `\r\n` on the way out, `\r` or `\n`
//! on the way in.
//!
//! ```text
//!  RX byte ──▶ codec (CommandLine) ──▶ engine ──▶ commands (table) ──▶ SharedConfig
//!                                        │
//!                                        └──▶ reply ──▶ SerialChannel
//! ```
//!
//! The same [`reply`] formatter is used by the sampling pipelines and the
//! control loop for their reports and notices, so every outbound line has
//! one definition.

pub mod codec;
pub mod commands;
pub mod engine;
pub mod reply;
