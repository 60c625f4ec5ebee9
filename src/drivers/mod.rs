//! Button handling, hardware initialisation, and sampling timers.

pub mod button;
pub mod hw_init;
pub mod hw_timer;
