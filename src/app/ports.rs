//! Port traits: the boundary between acquisition logic and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ pipelines / command engine / control loop
//! ```
//!
//! Peripherals that `embedded-hal` 1.0 already models are taken through
//! its traits directly:
//!
//! | Capability            | Trait                                       |
//! |-----------------------|---------------------------------------------|
//! | button level          | [`embedded_hal::digital::InputPin`]         |
//! | indicator LEDs        | [`embedded_hal::digital::StatefulOutputPin`]|
//! | main-loop pacing      | [`embedded_hal::delay::DelayNs`]            |
//!
//! The rest (serial text output, analog conversion, periodic timers) are
//! defined here.

// ───────────────────────────────────────────────────────────────
// Serial channel (domain → host)
// ───────────────────────────────────────────────────────────────

/// Outbound half of the serial link.
///
/// Implementations write the bytes in order and block until they are
/// queued.  Failures are the adapter's to log; the core has no recovery
/// path for a dead UART.
pub trait SerialChannel {
    fn write_bytes(&mut self, bytes: &[u8]);

    fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }
}

impl<T: SerialChannel + ?Sized> SerialChannel for &mut T {
    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }
}

// ───────────────────────────────────────────────────────────────
// Analog input (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One analog input with software-triggered single conversions.
pub trait AnalogInput {
    /// Kick off one conversion.
    fn start_conversion(&mut self);

    /// Whether the last started conversion has finished.
    fn conversion_complete(&mut self) -> bool;

    /// Result of the last finished conversion, right-aligned to the
    /// channel's sample width.
    fn read_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Periodic timer (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// A free-running periodic timer ticking at 1 kHz that fires an event each
/// time its count reaches the reload value.
pub trait PeriodicTimer {
    /// Reload value currently loaded in the hardware, in milliseconds.
    fn reload(&self) -> u32;

    fn stop(&mut self);

    /// Load a new reload value.  Only called while stopped.
    fn set_reload(&mut self, reload: u32);

    /// Zero the running count.  Only called while stopped.
    fn reset_count(&mut self);

    fn start(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Absent indicator
// ───────────────────────────────────────────────────────────────

/// Stand-in output for channels that have no indicator wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl embedded_hal::digital::ErrorType for NoIndicator {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for NoIndicator {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl embedded_hal::digital::StatefulOutputPin for NoIndicator {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}
