//! Output line wiring
//!
//! All eight strips share one 8-bit GPIO port, so a single byte write updates
//! every line in the same bus cycle. Strip `n` is always port bit `n`.

/// Number of parallel strips
pub const STRIP_COUNT: usize = 8;

/// Port bits used by the strips
pub const PORT_MASK: u8 = 0xFF;

/// One strip's physical output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputLine {
    /// Logical strip index, also the port bit
    pub strip: u8,
    /// Board pin number
    pub pin: u8,
}

impl OutputLine {
    /// Port bit mask of this line
    pub const fn mask(self) -> u8 {
        strip_mask(self.strip as usize)
    }
}

/// Teensy 3.x wiring: port D bits 0..=7 in strip order.
pub const PORT_D_LINES: [OutputLine; STRIP_COUNT] = [
    OutputLine { strip: 0, pin: 2 },
    OutputLine { strip: 1, pin: 14 },
    OutputLine { strip: 2, pin: 7 },
    OutputLine { strip: 3, pin: 8 },
    OutputLine { strip: 4, pin: 6 },
    OutputLine { strip: 5, pin: 20 },
    OutputLine { strip: 6, pin: 21 },
    OutputLine { strip: 7, pin: 5 },
];

/// Bit of every buffer byte that drives `strip`.
///
/// `strip` must be below [`STRIP_COUNT`].
pub const fn strip_mask(strip: usize) -> u8 {
    1 << strip
}
