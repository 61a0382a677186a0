//! The driver: setup, frame launch and status.

use crate::buffer::{BYTES_PER_PIXEL, DoubleBuffer};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::hal::Hardware;
use crate::lines::{PORT_D_LINES, PORT_MASK};
use crate::pipeline::{ChannelSet, DmaChannel, Pipeline};
use crate::tracker::{CompletionTracker, TransmitState};
use crate::waveform::WaveformConfig;

/// Eight-strip WS2811 driver
///
/// # Usage
///
/// ```ignore
/// static TRACKER: CompletionTracker = CompletionTracker::new();
///
/// let mut block = [0u8; block_len(120)];
/// let mut leds = OctoWs2811::new(120, &mut block, Config::default(), hardware, &TRACKER)?;
/// leds.begin();
/// loop {
///     render(leds.draw_buffer_mut());
///     leds.show();
/// }
/// ```
pub struct OctoWs2811<'a, H: Hardware> {
    hardware: H,
    buffers: DoubleBuffer<'a>,
    pipeline: Pipeline,
    tracker: &'a CompletionTracker,
    config: Config,
    pixels_per_strip: usize,
}

impl<'a, H: Hardware> OctoWs2811<'a, H> {
    /// Record the geometry and zero both frames. Nothing is written to the
    /// hardware until [`begin`](Self::begin).
    pub fn new(
        pixels_per_strip: usize,
        block: &'a mut [u8],
        config: Config,
        hardware: H,
        tracker: &'a CompletionTracker,
    ) -> Result<Self> {
        let buffers = DoubleBuffer::new(pixels_per_strip, block)?;
        Self::with_buffers(buffers, config, hardware, tracker)
    }

    /// Same as [`new`](Self::new) over an already constructed buffer pair.
    ///
    /// The transfer count comes from the buffers' own frame length.
    pub fn with_buffers(
        buffers: DoubleBuffer<'a>,
        config: Config,
        hardware: H,
        tracker: &'a CompletionTracker,
    ) -> Result<Self> {
        let pipeline = Pipeline::new(buffers.frame_len())?;
        Ok(Self {
            hardware,
            pixels_per_strip: buffers.frame_len() / BYTES_PER_PIXEL,
            buffers,
            pipeline,
            tracker,
            config,
        })
    }

    /// Configure the port, waveforms and DMA channels.
    ///
    /// Must run once before the first [`show`](Self::show).
    pub fn begin(&mut self) {
        self.hardware.clear_port(PORT_MASK);
        for line in PORT_D_LINES {
            self.hardware.configure_output(line);
        }

        let waveforms = WaveformConfig::new(self.config.bit_rate, self.config.timing);
        self.hardware.configure_waveforms(&waveforms);

        self.pipeline
            .configure(&mut self.hardware, self.buffers.front_ptr());

        #[cfg(feature = "defmt")]
        defmt::info!(
            "octo: {} pixels per strip, {} Hz",
            self.pixels_per_strip,
            waveforms.frequency_hz
        );
    }

    /// Publish the draw buffer and start transmitting it.
    ///
    /// [`begin`](Self::begin) must have run first: without a running timer
    /// the cycle alignment never finishes, and without armed channels the
    /// frame never completes.
    ///
    /// Spins while the previous frame is on the wire and again until its
    /// reset gap has passed, so this can block for up to one frame plus
    /// [`RESET_DURATION`](crate::tracker::RESET_DURATION).
    pub fn show(&mut self) {
        while self.tracker.is_in_flight() {
            self.hardware.relax();
        }

        self.swap_buffers();

        while !self.tracker.reset_gap_elapsed(self.hardware.now()) {
            self.hardware.relax();
        }

        self.launch();
    }

    /// Non-blocking [`show`](Self::show): fails instead of spinning.
    ///
    /// The buffers are left untouched on failure.
    pub fn try_show(&mut self) -> Result<()> {
        match self.state() {
            TransmitState::Idle => {
                self.swap_buffers();
                self.launch();
                Ok(())
            }
            state => Err(Error::WouldBlock(state)),
        }
    }

    /// Whether [`show`](Self::show) would have to wait right now
    pub fn would_block(&self) -> bool {
        self.busy()
    }

    /// True while a frame is on the wire or its reset gap is elapsing
    pub fn busy(&self) -> bool {
        self.tracker.busy(self.hardware.now())
    }

    /// Current position in the frame cycle
    pub fn state(&self) -> TransmitState {
        self.tracker.state(self.hardware.now())
    }

    /// Frame to fill before the next [`show`](Self::show)
    pub fn draw_buffer_mut(&mut self) -> &mut [u8] {
        self.buffers.draw_mut()
    }

    /// Frame owned by the transmitter
    pub fn front_buffer(&self) -> &[u8] {
        self.buffers.front()
    }

    /// Pixels per strip, derived from the frame length
    pub const fn pixels_per_strip(&self) -> usize {
        self.pixels_per_strip
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub const fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Swap roles and point the data channel at the new front frame.
    ///
    /// Only called when no frame is in flight.
    fn swap_buffers(&mut self) {
        self.buffers.swap();
        self.hardware
            .set_channel_source(DmaChannel::ApplyData, self.buffers.front_ptr());
    }

    /// Start the pipeline at the beginning of a timer cycle.
    ///
    /// Timing critical: any change here must be checked on a scope, with the
    /// launch point always landing while both waveforms are low. Cycle
    /// counting alone misses flash cache and bus arbitration effects.
    fn launch(&mut self) {
        let snapshot = self.hardware.timer_snapshot();
        let hardware = &mut self.hardware;
        let tracker = self.tracker;
        critical_section::with(|_| {
            tracker.mark_in_flight();
            hardware.wait_for_cycle_start(&snapshot);
            hardware.stop_timer(&snapshot);
            // Edges latched before the stop must not trigger the first transfer
            hardware.clear_edge_flags();
            hardware.enable_channels(ChannelSet::ALL);
            hardware.restart_timer(&snapshot);
        });

        #[cfg(feature = "defmt")]
        defmt::trace!("octo: frame launched");
    }
}
