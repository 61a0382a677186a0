#![no_std]

pub mod buffer;
pub mod config;
mod driver;
mod error;
pub mod hal;
pub mod layout;
pub mod lines;
pub mod pipeline;
#[cfg(feature = "sim")]
pub mod sim;
pub mod tracker;
pub mod waveform;

pub use buffer::{BYTES_PER_PIXEL, DoubleBuffer, block_len, frame_len};
pub use config::{ColorOrder, Config};
pub use driver::OctoWs2811;
pub use error::{Error, Result};
pub use hal::{Hardware, TimerSnapshot};
pub use lines::{STRIP_COUNT, strip_mask};
pub use tracker::{CompletionTracker, RESET_DURATION, TransmitState};
pub use waveform::{BitRate, WaveformTiming};

pub use embassy_time::{Duration, Instant};
