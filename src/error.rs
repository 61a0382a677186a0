use derive_more::derive::{Display, Error};

use crate::tracker::TransmitState;

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by checked construction and the bit-plane helpers.
///
/// The transmit path itself has no runtime errors: a misconfigured pipeline
/// shows up as a corrupted waveform on the wire, not as a value here.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The memory block cannot hold both frame buffers.
    #[display("buffer holds {provided} bytes, {required} required")]
    BufferTooSmall { required: usize, provided: usize },

    /// The frame exceeds the DMA major loop counter.
    #[display("frame of {bit_times} bit-times exceeds the DMA transfer count")]
    FrameTooLong { bit_times: usize },

    /// A frame needs at least one pixel per strip.
    #[display("frame is empty")]
    EmptyFrame,

    /// Unknown bits set in a raw config byte.
    #[display("invalid config byte {_0:#04x}")]
    InvalidConfig(#[error(not(source))] u8),

    #[display("strip index {_0} out of range")]
    StripOutOfRange(#[error(not(source))] usize),

    #[display("pixel index {_0} out of range")]
    PixelOutOfRange(#[error(not(source))] usize),

    /// A launch was requested while the previous frame is still pending.
    #[display("transmitter is busy ({_0:?})")]
    WouldBlock(#[error(not(source))] TransmitState),
}
