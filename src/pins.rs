//! GPIO / peripheral pin assignments for the sensing node board.
//!
//! Single source of truth; every adapter references this module rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Analog inputs
// ---------------------------------------------------------------------------

/// Sharp IR distance sensor, analog out.  ADC2 channel 0 (GPIO 11 on
/// ESP32-S3), 12-bit.
pub const DISTANCE_ADC_UNIT: u32 = 2;
pub const DISTANCE_ADC_CHANNEL: u32 = 0;

/// Photodiode light sensor behind a transimpedance stage.  ADC1 channel 3
/// (GPIO 4 on ESP32-S3), sampled at 12 bits and reported at 10.
pub const LIGHT_ADC_UNIT: u32 = 1;
pub const LIGHT_ADC_CHANNEL: u32 = 3;

/// ADC attenuation for both channels (12 dB, ~0 – 3.1 V range).
pub const ADC_ATTEN: u32 = 3;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Toggles on every distance report.
pub const ACTIVITY_LED_GPIO: i32 = 7;
/// Blinks while acquisition runs, off while stopped.
pub const RUN_LED_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// User button (active-high, rising-edge interrupt)
// ---------------------------------------------------------------------------

pub const BUTTON_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// UART command link (UART0)
// ---------------------------------------------------------------------------

pub const UART_PORT: i32 = 0;
pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;
