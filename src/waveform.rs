//! Reference timing waveforms.
//!
//! Two PWM outputs run at the bit rate. Their edges are not transmitted; they
//! are the trigger sources for the DMA pipeline. The "0" waveform goes high at
//! the start of every bit-time and falls after the short high time of a zero
//! bit. The "1" waveform falls after the long high time of a one bit.

/// High time of a "0" bit, on a 0..=255 scale of the bit period.
///
/// Longer than the datasheet value: the pulse narrows when the DMA controller
/// sees extra latency during bus arbitration.
pub const T0H: u8 = 60;

/// High time of a "1" bit, on a 0..=255 scale of the bit period.
///
/// Chips tested latch on a one-shot delay from the rising edge, so this only
/// needs to leave enough low time for the next rising edge to be detected.
pub const T1H: u8 = 176;

/// PWM resolution the duty values are expressed in.
pub const DUTY_RESOLUTION_BITS: u8 = 8;

const DUTY_SCALE: u64 = 1 << DUTY_RESOLUTION_BITS;

/// Bit rate of the strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitRate {
    /// WS2812 and most WS2811 strips
    #[default]
    Khz800,
    /// Older WS2811 strips in slow mode
    Khz400,
}

impl BitRate {
    /// PWM frequency for this bit rate
    pub const fn frequency_hz(self) -> u32 {
        match self {
            Self::Khz800 => 800_000,
            Self::Khz400 => 400_000,
        }
    }
}

/// Identifies one of the two timing waveforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    /// Falls after the high time of a "0" bit
    Zero,
    /// Falls after the high time of a "1" bit
    One,
}

/// Tunable high times for both waveforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaveformTiming {
    pub zero_high: u8,
    pub one_high: u8,
}

impl WaveformTiming {
    pub const DEFAULT: Self = Self {
        zero_high: T0H,
        one_high: T1H,
    };
}

impl Default for WaveformTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything a backend needs to program the two PWM outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaveformConfig {
    pub frequency_hz: u32,
    pub resolution_bits: u8,
    pub timing: WaveformTiming,
}

impl WaveformConfig {
    pub const fn new(bit_rate: BitRate, timing: WaveformTiming) -> Self {
        Self {
            frequency_hz: bit_rate.frequency_hz(),
            resolution_bits: DUTY_RESOLUTION_BITS,
            timing,
        }
    }

    /// Duty value written to the PWM channel of `waveform`
    pub const fn duty(&self, waveform: Waveform) -> u8 {
        match waveform {
            Waveform::Zero => self.timing.zero_high,
            Waveform::One => self.timing.one_high,
        }
    }

    /// Length of one bit-time in nanoseconds
    pub const fn bit_period_ns(&self) -> u32 {
        1_000_000_000 / self.frequency_hz
    }

    /// Nominal high time of `waveform` in nanoseconds, before bus latency
    pub const fn high_time_ns(&self, waveform: Waveform) -> u32 {
        let period = self.bit_period_ns() as u64;
        (period * self.duty(waveform) as u64 / DUTY_SCALE) as u32
    }
}
