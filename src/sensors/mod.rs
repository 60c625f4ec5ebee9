//! Sensing channels: identity, calibration, and report labelling.
//!
//! The node samples two analog signals.  Each is described by a static
//! [`ChannelDescriptor`] so one generic sampling pipeline can serve both.
//!
//! | Channel  | Sensor                 | ADC width | Record tag |
//! |----------|------------------------|-----------|------------|
//! | Distance | Sharp IR rangefinder   | 12 bit    | `TEMP`     |
//! | Light    | photodiode amplifier   | 10 bit    | `LUX`      |

pub mod distance;
pub mod light;

/// One of the two independently sampled signal paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Distance,
    Light,
}

impl Channel {
    pub const ALL: [Self; 2] = [Self::Distance, Self::Light];

    /// Static descriptor for this channel.
    pub fn descriptor(self) -> &'static ChannelDescriptor {
        match self {
            Self::Distance => &DISTANCE,
            Self::Light => &LIGHT,
        }
    }

    /// Record tag written in front of every report line.
    pub fn tag(self) -> &'static str {
        self.descriptor().tag
    }

    /// Human-readable name for notices and logs.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

/// Per-channel constants consumed by the sampling pipeline.
#[derive(Debug)]
pub struct ChannelDescriptor {
    pub channel: Channel,
    pub name: &'static str,
    /// Report record tag.
    pub tag: &'static str,
    /// Raw sample width in bits.
    pub adc_bits: u8,
    /// Raw sample → physical unit.
    pub convert: fn(u16) -> f32,
    /// Whether each report toggles the activity indicator.
    pub toggles_activity: bool,
}

impl ChannelDescriptor {
    /// Largest raw value the ADC can produce at this width.
    pub const fn max_raw(&self) -> u16 {
        ((1u32 << self.adc_bits) - 1) as u16
    }
}

pub static DISTANCE: ChannelDescriptor = ChannelDescriptor {
    channel: Channel::Distance,
    name: "distance",
    tag: "TEMP",
    adc_bits: distance::ADC_BITS,
    convert: distance::raw_to_cm,
    toggles_activity: true,
};

pub static LIGHT: ChannelDescriptor = ChannelDescriptor {
    channel: Channel::Light,
    name: "light",
    tag: "LUX",
    adc_bits: light::ADC_BITS,
    convert: light::raw_to_intensity,
    toggles_activity: false,
};
