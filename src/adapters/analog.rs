//! Oneshot ADC adapter.
//!
//! The ESP-IDF oneshot driver converts synchronously, so the conversion
//! runs inside [`AnalogInput::start_conversion`] and its result is held
//! until read.  A driver error leaves nothing pending; the pipeline's
//! bounded poll then reports it as a conversion timeout.

use crate::app::ports::AnalogInput;
use crate::drivers::hw_init;

pub struct OneshotChannel {
    unit: u32,
    channel: u32,
    /// Right shift applied to the 12-bit conversion (2 for a 10-bit channel).
    shift: u8,
    pending: Option<u16>,
}

impl OneshotChannel {
    pub fn new(unit: u32, channel: u32, sample_bits: u8) -> Self {
        Self {
            unit,
            channel,
            shift: 12u8.saturating_sub(sample_bits),
            pending: None,
        }
    }
}

impl AnalogInput for OneshotChannel {
    fn start_conversion(&mut self) {
        self.pending = hw_init::adc_read(self.unit, self.channel).map(|raw| raw >> self.shift);
        if self.pending.is_none() {
            log::warn!("ADC{} CH{}: oneshot read failed", self.unit, self.channel);
        }
    }

    fn conversion_complete(&mut self) -> bool {
        self.pending.is_some()
    }

    fn read_raw(&mut self) -> u16 {
        self.pending.take().unwrap_or(0)
    }
}
