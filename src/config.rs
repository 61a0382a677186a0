//! Driver configuration
//!
//! Fixed at construction. The raw byte form matches the config flags used by
//! existing OctoWS2811 firmware, so hosts that store the byte keep working.

use smart_leds::RGB8;

use crate::error::{Error, Result};
use crate::waveform::{BitRate, WaveformTiming};

pub const WS2811_RGB: u8 = 0x00;
pub const WS2811_RBG: u8 = 0x01;
pub const WS2811_GRB: u8 = 0x02;
pub const WS2811_GBR: u8 = 0x03;
pub const WS2811_800KHZ: u8 = 0x00;
pub const WS2811_400KHZ: u8 = 0x10;

const COLOR_ORDER_MASK: u8 = 0x03;
const KNOWN_BITS: u8 = COLOR_ORDER_MASK | WS2811_400KHZ;

/// Order in which the three color channels go out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorOrder {
    Rgb,
    Rbg,
    /// WS2812 native order
    #[default]
    Grb,
    Gbr,
}

impl ColorOrder {
    const fn from_bits(bits: u8) -> Self {
        match bits & COLOR_ORDER_MASK {
            WS2811_RGB => Self::Rgb,
            WS2811_RBG => Self::Rbg,
            WS2811_GRB => Self::Grb,
            _ => Self::Gbr,
        }
    }

    const fn bits(self) -> u8 {
        match self {
            Self::Rgb => WS2811_RGB,
            Self::Rbg => WS2811_RBG,
            Self::Grb => WS2811_GRB,
            Self::Gbr => WS2811_GBR,
        }
    }

    /// Pack a color into a 24-bit wire word, first channel in the top byte
    pub const fn pack(self, color: RGB8) -> u32 {
        let (first, second, third) = match self {
            Self::Rgb => (color.r, color.g, color.b),
            Self::Rbg => (color.r, color.b, color.g),
            Self::Grb => (color.g, color.r, color.b),
            Self::Gbr => (color.g, color.b, color.r),
        };
        ((first as u32) << 16) | ((second as u32) << 8) | third as u32
    }

    /// Inverse of [`ColorOrder::pack`]
    pub const fn unpack(self, word: u32) -> RGB8 {
        let first = (word >> 16) as u8;
        let second = (word >> 8) as u8;
        let third = word as u8;
        let (r, g, b) = match self {
            Self::Rgb => (first, second, third),
            Self::Rbg => (first, third, second),
            Self::Grb => (second, first, third),
            Self::Gbr => (third, first, second),
        };
        RGB8 { r, g, b }
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub bit_rate: BitRate,
    pub color_order: ColorOrder,
    pub timing: WaveformTiming,
}

impl Config {
    pub const fn new(bit_rate: BitRate) -> Self {
        Self {
            bit_rate,
            color_order: ColorOrder::Grb,
            timing: WaveformTiming::DEFAULT,
        }
    }

    #[must_use]
    pub const fn with_color_order(mut self, color_order: ColorOrder) -> Self {
        self.color_order = color_order;
        self
    }

    /// Override the tuned waveform high times
    #[must_use]
    pub const fn with_timing(mut self, timing: WaveformTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Decode a raw config byte such as `WS2811_GRB | WS2811_800KHZ`.
    ///
    /// Timing always starts from the tuned defaults.
    pub const fn from_bits(bits: u8) -> Result<Self> {
        if bits & !KNOWN_BITS != 0 {
            return Err(Error::InvalidConfig(bits));
        }
        let bit_rate = if bits & WS2811_400KHZ != 0 {
            BitRate::Khz400
        } else {
            BitRate::Khz800
        };
        Ok(Self::new(bit_rate).with_color_order(ColorOrder::from_bits(bits)))
    }

    /// Encode back to the raw config byte
    pub const fn bits(&self) -> u8 {
        let rate = match self.bit_rate {
            BitRate::Khz800 => WS2811_800KHZ,
            BitRate::Khz400 => WS2811_400KHZ,
        };
        rate | self.color_order.bits()
    }
}

impl TryFrom<u8> for Config {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self> {
        Self::from_bits(bits)
    }
}
