//! Sensing node firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod filter;
pub mod protocol;
pub mod sensors;

pub mod pins;

// Adapters and drivers carry simulation stubs so the crate builds on the
// host; the real implementations are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
