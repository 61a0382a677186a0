//! Bit-plane layout helpers.
//!
//! A frame is `pixels * 24` bytes. Byte `pixel * 24 + k` carries bit `23 - k`
//! of every strip's 24-bit wire word for that pixel, one strip per byte bit.
//! These helpers only move bits around; colors are used as given.

use smart_leds::RGB8;

use crate::buffer::BYTES_PER_PIXEL;
use crate::config::ColorOrder;
use crate::error::{Error, Result};
use crate::lines::{STRIP_COUNT, strip_mask};

/// Color type accepted by [`write_pixel`]
pub type Rgb = RGB8;

/// Byte offset of `color_bit` (0 = most significant) of `pixel`
pub const fn bit_index(pixel: usize, color_bit: usize) -> usize {
    pixel * BYTES_PER_PIXEL + color_bit
}

/// Set or clear one strip's bit at bit-time `index`.
pub fn set_strip_bit(frame: &mut [u8], index: usize, strip: usize, on: bool) -> Result<()> {
    let mask = checked_mask(strip)?;
    let byte = frame.get_mut(index).ok_or(Error::PixelOutOfRange(index / BYTES_PER_PIXEL))?;
    if on {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
    Ok(())
}

/// Read one strip's bit at bit-time `index`.
pub fn strip_bit(frame: &[u8], index: usize, strip: usize) -> Result<bool> {
    let mask = checked_mask(strip)?;
    let byte = frame.get(index).ok_or(Error::PixelOutOfRange(index / BYTES_PER_PIXEL))?;
    Ok(byte & mask != 0)
}

/// Write `color` for `pixel` of `strip`, leaving the other strips untouched.
pub fn write_pixel(
    frame: &mut [u8],
    strip: usize,
    pixel: usize,
    color: Rgb,
    order: ColorOrder,
) -> Result<()> {
    let mask = checked_mask(strip)?;
    let bits = pixel_bytes_mut(frame, pixel)?;
    let word = order.pack(color);
    for (k, byte) in bits.iter_mut().enumerate() {
        if (word >> (BYTES_PER_PIXEL - 1 - k)) & 1 == 1 {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }
    Ok(())
}

/// Read back the color of `pixel` on `strip`.
pub fn read_pixel(frame: &[u8], strip: usize, pixel: usize, order: ColorOrder) -> Result<Rgb> {
    let mask = checked_mask(strip)?;
    let start = pixel * BYTES_PER_PIXEL;
    let bits = frame
        .get(start..start + BYTES_PER_PIXEL)
        .ok_or(Error::PixelOutOfRange(pixel))?;
    let word = bits
        .iter()
        .fold(0u32, |word, byte| (word << 1) | u32::from(byte & mask != 0));
    Ok(order.unpack(word))
}

fn pixel_bytes_mut(frame: &mut [u8], pixel: usize) -> Result<&mut [u8]> {
    let start = pixel * BYTES_PER_PIXEL;
    frame
        .get_mut(start..start + BYTES_PER_PIXEL)
        .ok_or(Error::PixelOutOfRange(pixel))
}

fn checked_mask(strip: usize) -> Result<u8> {
    if strip >= STRIP_COUNT {
        return Err(Error::StripOutOfRange(strip));
    }
    Ok(strip_mask(strip))
}
