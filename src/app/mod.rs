//! Application core: acquisition logic, zero direct I/O.
//!
//! Hardware reaches this layer only through the **port traits** in
//! [`ports`] (plus the `embedded-hal` digital and delay traits), so every
//! pipeline and the control loop run unchanged against host mocks.

pub mod acquisition;
pub mod control;
pub mod pipeline;
pub mod ports;
