//! Double-buffered bit-plane memory.
//!
//! One caller-provided block holds two frames of `pixels_per_strip * 24`
//! bytes each. The front half is read by DMA; the draw half is handed to the
//! caller. Swapping exchanges the two base pointers and never copies.

use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::error::{Error, Result};

/// Bit-times per pixel: three color channels of eight bits.
pub const BYTES_PER_PIXEL: usize = 24;

/// Bytes in one frame of `pixels_per_strip` pixels
pub const fn frame_len(pixels_per_strip: usize) -> usize {
    pixels_per_strip * BYTES_PER_PIXEL
}

/// Bytes the caller must provide for both frames
pub const fn block_len(pixels_per_strip: usize) -> usize {
    2 * frame_len(pixels_per_strip)
}

/// Front/draw pair over one contiguous block.
pub struct DoubleBuffer<'a> {
    front: NonNull<u8>,
    draw: NonNull<u8>,
    len: usize,
    _block: PhantomData<&'a mut [u8]>,
}

impl<'a> DoubleBuffer<'a> {
    /// Split `block` into two zeroed frames.
    ///
    /// Extra bytes past [`block_len`] are left untouched.
    pub fn new(pixels_per_strip: usize, block: &'a mut [u8]) -> Result<Self> {
        let required = block_len(pixels_per_strip);
        if block.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: block.len(),
            });
        }
        let base = NonNull::from(&mut block[..required]).cast::<u8>();
        // SAFETY: `base` covers `required` bytes exclusively borrowed for 'a.
        Ok(unsafe { Self::from_raw(base, pixels_per_strip) })
    }

    /// Build over a raw block without checking its size.
    ///
    /// # Safety
    ///
    /// `base` must be valid for reads and writes of
    /// [`block_len(pixels_per_strip)`](block_len) bytes for `'a`, and nothing
    /// else may access that memory while the buffer exists.
    pub unsafe fn from_raw(base: NonNull<u8>, pixels_per_strip: usize) -> Self {
        let len = frame_len(pixels_per_strip);
        // SAFETY: the caller guarantees `2 * len` writable bytes at `base`.
        unsafe {
            base.as_ptr().write_bytes(0, 2 * len);
        }
        Self {
            front: base,
            // SAFETY: `base + len` is within (or one past) the block.
            draw: unsafe { base.add(len) },
            len,
            _block: PhantomData,
        }
    }

    /// Exchange the front and draw roles.
    pub fn swap(&mut self) {
        core::mem::swap(&mut self.front, &mut self.draw);
    }

    /// Bytes per frame
    pub const fn frame_len(&self) -> usize {
        self.len
    }

    /// Base address of the front frame, as programmed into the data channel
    pub const fn front_ptr(&self) -> *const u8 {
        self.front.as_ptr()
    }

    /// Base address of the draw frame
    pub const fn draw_ptr(&self) -> *const u8 {
        self.draw.as_ptr()
    }

    /// Frame currently owned by the transmitter
    pub fn front(&self) -> &[u8] {
        // SAFETY: both halves stay valid for 'a and are only written through
        // `draw_mut`, which needs `&mut self`.
        unsafe { core::slice::from_raw_parts(self.front.as_ptr(), self.len) }
    }

    /// Read-only view of the draw frame
    pub fn draw(&self) -> &[u8] {
        // SAFETY: see `front`.
        unsafe { core::slice::from_raw_parts(self.draw.as_ptr(), self.len) }
    }

    /// Frame the caller may fill before the next swap
    pub fn draw_mut(&mut self) -> &mut [u8] {
        // SAFETY: the draw half never aliases the front half and the
        // returned borrow is tied to `&mut self`.
        unsafe { core::slice::from_raw_parts_mut(self.draw.as_ptr(), self.len) }
    }
}
