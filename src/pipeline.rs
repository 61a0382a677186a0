//! Three-channel DMA bit reconstruction.
//!
//! Every bit-time the port goes through three writes, each issued by its own
//! DMA channel on a waveform edge:
//!
//! 1. rising edge of the "0" waveform: `0xFF` to the set register, all lines high
//! 2. falling edge of the "0" waveform: next frame byte to the data register,
//!    lines whose bit is 0 drop low here
//! 3. falling edge of the "1" waveform: `0xFF` to the clear register, all lines low
//!
//! Each channel moves one byte per trigger for the whole frame and then
//! disables itself. Channel 3 raises the completion interrupt.

use crate::error::{Error, Result};
use crate::hal::Hardware;
use crate::waveform::Waveform;

/// Largest major loop count the eDMA citer field can hold without channel linking.
pub const MAX_BIT_TIMES: usize = 0x7FFF;

static ONES: u8 = 0xFF;

/// The three pipeline channels, numbered as on the DMA controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DmaChannel {
    SetHigh = 1,
    ApplyData = 2,
    ClearAll = 3,
}

impl DmaChannel {
    /// Channels in pipeline order
    pub const ALL: [Self; 3] = [Self::SetHigh, Self::ApplyData, Self::ClearAll];

    /// Hardware channel number
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Bit of this channel in the request-enable register
    pub const fn mask(self) -> u32 {
        1 << self.number()
    }

    /// Which waveform edge requests a transfer on this channel
    pub const fn trigger(self) -> Trigger {
        match self {
            Self::SetHigh => Trigger::new(Waveform::Zero, Edge::Rising),
            Self::ApplyData => Trigger::new(Waveform::Zero, Edge::Falling),
            Self::ClearAll => Trigger::new(Waveform::One, Edge::Falling),
        }
    }
}

/// Set of channels for a single request-enable write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSet(u32);

impl ChannelSet {
    /// All three pipeline channels (`0x0E`)
    pub const ALL: Self = Self(
        DmaChannel::SetHigh.mask() | DmaChannel::ApplyData.mask() | DmaChannel::ClearAll.mask(),
    );

    /// Raw request-enable bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether `channel` is in the set
    pub const fn contains(self, channel: DmaChannel) -> bool {
        self.0 & channel.mask() != 0
    }
}

/// GPIO port register targeted by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortRegister {
    /// Bits written as 1 go high
    Set,
    /// Bits written as 1 go low
    Clear,
    /// Output latch, written as a whole byte
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
}

/// Waveform edge routed through the DMA request multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Trigger {
    pub waveform: Waveform,
    pub edge: Edge,
}

impl Trigger {
    /// Request on `edge` of `waveform`
    pub const fn new(waveform: Waveform, edge: Edge) -> Self {
        Self { waveform, edge }
    }
}

/// One channel's transfer control descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferDescriptor {
    pub source: *const u8,
    /// Added to the source after each byte
    pub source_offset: i16,
    /// Added to the source when the major loop completes
    pub source_last_adjust: i32,
    pub destination: PortRegister,
    /// Bytes moved per request
    pub minor_bytes: u32,
    /// Requests before the channel is done
    pub major_count: u16,
    /// Clear the channel's request enable when the major loop completes
    pub disable_on_complete: bool,
    /// Raise the channel interrupt when the major loop completes
    pub interrupt_on_complete: bool,
    pub trigger: Trigger,
}

/// Descriptor set for one frame geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline {
    bit_times: u16,
}

impl Pipeline {
    /// Descriptors moving `frame_len` bytes per frame.
    ///
    /// A zero count is a DMA configuration error that would leave the
    /// completion interrupt silent, so empty frames are rejected.
    pub fn new(frame_len: usize) -> Result<Self> {
        if frame_len == 0 {
            return Err(Error::EmptyFrame);
        }
        let bit_times = u16::try_from(frame_len)
            .ok()
            .filter(|&count| usize::from(count) <= MAX_BIT_TIMES)
            .ok_or(Error::FrameTooLong {
                bit_times: frame_len,
            })?;
        Ok(Self { bit_times })
    }

    /// Major loop count programmed into every channel
    pub const fn bit_times(&self) -> u16 {
        self.bit_times
    }

    /// Descriptor for `channel`, with `front` as the frame source
    pub fn descriptor(&self, channel: DmaChannel, front: *const u8) -> TransferDescriptor {
        let constant = TransferDescriptor {
            source: &raw const ONES,
            source_offset: 0,
            source_last_adjust: 0,
            destination: PortRegister::Set,
            minor_bytes: 1,
            major_count: self.bit_times,
            disable_on_complete: true,
            interrupt_on_complete: false,
            trigger: channel.trigger(),
        };
        match channel {
            DmaChannel::SetHigh => constant,
            DmaChannel::ApplyData => TransferDescriptor {
                source: front,
                source_offset: 1,
                source_last_adjust: -i32::from(self.bit_times),
                destination: PortRegister::Data,
                ..constant
            },
            DmaChannel::ClearAll => TransferDescriptor {
                destination: PortRegister::Clear,
                interrupt_on_complete: true,
                ..constant
            },
        }
    }

    /// Descriptors for all channels, in [`DmaChannel::ALL`] order
    pub fn descriptors(&self, front: *const u8) -> [TransferDescriptor; 3] {
        DmaChannel::ALL.map(|channel| self.descriptor(channel, front))
    }

    /// Program all three channels and their triggers, channels left disabled.
    pub fn configure<H: Hardware>(&self, hardware: &mut H, front: *const u8) {
        hardware.reset_dma();
        for (channel, descriptor) in DmaChannel::ALL.into_iter().zip(self.descriptors(front)) {
            hardware.configure_channel(channel, &descriptor);
            hardware.route_trigger(channel, descriptor.trigger);
        }
        hardware.enable_completion_interrupt(DmaChannel::ClearAll);
    }
}
