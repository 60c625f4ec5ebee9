//! Light-intensity sensor on a 10-bit ADC channel.
//!
//! Calibrated against 990 counts rather than the 1023 full scale; the
//! amplifier saturates just below full scale and the board was trimmed
//! to that point.
//!
//! ```text
//! V   = raw * 3.3 / 990
//! lux = V * 303.03
//! ```

pub const ADC_BITS: u8 = 10;

const VREF: f32 = 3.3;
const CAL_COUNTS: f32 = 990.0;
const LUX_PER_VOLT: f32 = 303.03;

pub fn raw_to_volts(raw: u16) -> f32 {
    f32::from(raw) * (VREF / CAL_COUNTS)
}

/// Raw ADC counts to light intensity.
pub fn raw_to_intensity(raw: u16) -> f32 {
    raw_to_volts(raw) * LUX_PER_VOLT
}
