//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter  | Implements                               | Connects to            |
//! |----------|------------------------------------------|------------------------|
//! | `analog` | `AnalogInput`                            | ESP32 ADC oneshot      |
//! | `gpio`   | embedded-hal `InputPin` / `StatefulOutputPin` | ESP32 GPIO        |
//! | `uart`   | `SerialChannel` (+ byte receive)         | ESP32 UART0            |
//!
//! Periodic timers live in [`crate::drivers::hw_timer`].  On non-espidf
//! targets every adapter falls back to a simulation stub.

pub mod analog;
pub mod gpio;
pub mod uart;
