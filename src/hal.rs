//! Hardware seam.
//!
//! The driver never touches registers directly. A backend implements
//! [`Hardware`] for its timer, DMA controller and GPIO port. The `sim`
//! module, behind the `sim` feature, provides one for host tests.

use embassy_time::Instant;

use crate::lines::OutputLine;
use crate::pipeline::{ChannelSet, DmaChannel, TransferDescriptor, Trigger};
use crate::waveform::WaveformConfig;

/// Timer state captured just before the launch critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerSnapshot {
    /// Status/control register, restored to restart the timer
    pub status: u32,
    /// Compare value of the "1" waveform channel
    pub compare: u32,
}

/// Register-level operations used by the driver.
///
/// Methods map one to one onto register writes, except where noted.
pub trait Hardware {
    /// Monotonic time, at least microsecond resolution
    fn now(&self) -> Instant;

    /// Called between polls of a busy-wait loop
    fn relax(&self) {
        core::hint::spin_loop();
    }

    /// Drive the masked port bits low
    fn clear_port(&mut self, mask: u8);

    /// Put one strip's pin into output mode on the shared port
    fn configure_output(&mut self, line: OutputLine);

    /// Start both PWM waveforms. Expected to always succeed.
    fn configure_waveforms(&mut self, config: &WaveformConfig);

    /// Clock the DMA controller and clear all request enables
    fn reset_dma(&mut self);

    /// Load a channel's transfer descriptor, leaving its request disabled
    fn configure_channel(&mut self, channel: DmaChannel, descriptor: &TransferDescriptor);

    /// Route a waveform edge to the channel's DMA request line
    fn route_trigger(&mut self, channel: DmaChannel, trigger: Trigger);

    /// Unmask the major-loop completion interrupt of `channel`
    fn enable_completion_interrupt(&mut self, channel: DmaChannel);

    /// Rewrite only the source address of an idle channel
    fn set_channel_source(&mut self, channel: DmaChannel, source: *const u8);

    /// Set request enables, arming the channels
    fn enable_channels(&mut self, channels: ChannelSet);

    /// Clear pending edge-detect flags on every trigger input
    fn clear_edge_flags(&mut self);

    /// Capture the state needed to stop and restart the waveform timer
    fn timer_snapshot(&self) -> TimerSnapshot;

    /// Current waveform timer counter
    fn timer_count(&self) -> u32;

    /// Halt the waveform timer, holding both outputs
    fn stop_timer(&mut self, snapshot: &TimerSnapshot);

    /// Resume the waveform timer from `snapshot`
    fn restart_timer(&mut self, snapshot: &TimerSnapshot);

    /// Spin until the timer sits where both waveforms are low.
    ///
    /// The default waits for the counter to pass the "1" compare point,
    /// wrap, and reach it again. It was tuned against one timer/DMA
    /// combination; backends with different latency should override it and
    /// validate the result on a scope.
    fn wait_for_cycle_start(&self, snapshot: &TimerSnapshot) {
        let compare = snapshot.compare;
        while self.timer_count() <= compare {}
        while self.timer_count() > compare {}
        while self.timer_count() < compare {}
    }
}
