//! Sampling pipeline: one instance per channel, run from that channel's
//! periodic timer event.
//!
//! ```text
//! timer event ─▶ run flag? ─▶ ADC start ─▶ poll EOC ─▶ read ─▶ convert
//!                   │ no                     │ budget spent
//!                   ▼                        ▼
//!                 no-op              ERROR:<TAG> conversion timeout
//!
//!   convert ─▶ [filter if enabled] ─▶ <TAG>:<value .2> ─▶ [toggle activity LED]
//! ```
//!
//! The pipeline owns its channel's filter state outright; no other context
//! touches it, so raw read → convert → filter → report is atomic with
//! respect to that state.  Configuration is read once per invocation from
//! a [`SharedConfig`] snapshot.

use embedded_hal::digital::StatefulOutputPin;
use log::error;

use crate::config::SharedConfig;
use crate::error::{Result, SensorError};
use crate::filter::MovingAverage;
use crate::protocol::reply::Reply;
use crate::sensors::ChannelDescriptor;

use super::ports::{AnalogInput, SerialChannel};

/// Generic per-channel sampling pipeline.
///
/// `P` is the activity indicator; channels that do not drive one use
/// [`NoIndicator`](super::ports::NoIndicator).
pub struct SamplingPipeline<A, P> {
    descriptor: &'static ChannelDescriptor,
    adc: A,
    activity: P,
    filter: MovingAverage,
    poll_limit: u32,
}

impl<A: AnalogInput, P: StatefulOutputPin> SamplingPipeline<A, P> {
    /// `poll_limit` bounds the conversion-complete wait; see
    /// [`NodeConfig::adc_poll_limit`](crate::config::NodeConfig::adc_poll_limit).
    pub fn new(
        descriptor: &'static ChannelDescriptor,
        adc: A,
        activity: P,
        poll_limit: u32,
    ) -> Self {
        Self {
            descriptor,
            adc,
            activity,
            filter: MovingAverage::default(),
            poll_limit: poll_limit.max(1),
        }
    }

    pub fn descriptor(&self) -> &'static ChannelDescriptor {
        self.descriptor
    }

    pub fn filter(&self) -> &MovingAverage {
        &self.filter
    }

    pub fn activity(&mut self) -> &mut P {
        &mut self.activity
    }

    /// Handle one timer event.
    ///
    /// Returns the reported value, `Ok(None)` when acquisition is stopped,
    /// or the conversion fault after it has been reported on `out`.
    pub fn on_timer_event<S: SerialChannel + ?Sized>(
        &mut self,
        cfg: &SharedConfig,
        out: &mut S,
    ) -> Result<Option<f32>> {
        let snapshot = cfg.snapshot();
        if !snapshot.running {
            return Ok(None);
        }
        let settings = *snapshot.channel(self.descriptor.channel);

        let raw = match self.convert_once() {
            Ok(raw) => raw,
            Err(e) => {
                error!("{} ADC: {}", self.descriptor.name, e);
                Reply::Error(&e).send(out);
                return Err(e.into());
            }
        };

        let mut value = (self.descriptor.convert)(raw);
        if settings.filter_enabled {
            self.filter.set_window(settings.window);
            value = self.filter.push(value);
        }

        Reply::Report {
            tag: self.descriptor.tag,
            value,
        }
        .send(out);

        if self.descriptor.toggles_activity {
            // Indicator only; a failed toggle is not worth a report.
            let _ = self.activity.toggle();
        }
        Ok(Some(value))
    }

    /// Trigger one conversion and wait, boundedly, for the result.
    fn convert_once(&mut self) -> core::result::Result<u16, SensorError> {
        self.adc.start_conversion();
        for _ in 0..self.poll_limit {
            if self.adc.conversion_complete() {
                return Ok(self.adc.read_raw() & self.descriptor.max_raw());
            }
        }
        Err(SensorError::ConversionTimeout(self.descriptor.channel))
    }
}
