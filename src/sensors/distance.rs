//! Sharp GP2Y0A-series IR rangefinder.
//!
//! 12-bit ADC against a 3.3 V reference.  The sensor's voltage/distance
//! curve is fitted by a power law:
//!
//! ```text
//! V  = raw * 3.3 / 4095
//! cm = 25.63 * V^-1.268
//! ```
//!
//! The fit diverges as `V → 0` (nothing in range).  A zero reading yields
//! `+inf`, which is reported as-is: it is a property of the sensor, not a
//! software fault.

pub const ADC_BITS: u8 = 12;

const VREF: f32 = 3.3;
const FULL_SCALE: f32 = 4095.0;
const FIT_GAIN: f32 = 25.63;
const FIT_EXPONENT: f32 = -1.268;

/// Raw ADC counts to output voltage.
pub fn raw_to_volts(raw: u16) -> f32 {
    f32::from(raw) * (VREF / FULL_SCALE)
}

/// Raw ADC counts to distance in centimetres.
pub fn raw_to_cm(raw: u16) -> f32 {
    FIT_GAIN * raw_to_volts(raw).powf(FIT_EXPONENT)
}
