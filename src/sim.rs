//! Simulated hardware backend.
//!
//! Models just enough of the timer, DMA controller and port to exercise the
//! driver on a host: a free-running timer counter that advances on every read,
//! a frame that ends after `major_count` bit periods of simulated time, and
//! the channel 3 completion interrupt delivered to the [`CompletionTracker`].
//! Every hardware call is recorded in a bounded trace.
//!
//! The timer free-runs at the default 800 kHz rate from construction, the
//! way the waveform timer is already clocked when the driver takes over, so
//! an alignment wait always terminates even before `begin`.
//!
//! Simulated time only moves through [`SimBus::advance`], which the driver's
//! busy-wait loops reach through [`Hardware::relax`].

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::hal::{Hardware, TimerSnapshot};
use crate::lines::OutputLine;
use crate::pipeline::{ChannelSet, DmaChannel, TransferDescriptor, Trigger};
use crate::tracker::CompletionTracker;
use crate::waveform::{BitRate, DUTY_RESOLUTION_BITS, WaveformConfig, WaveformTiming};

/// Peripheral bus clock feeding the waveform timer
pub const BUS_CLOCK_HZ: u32 = 48_000_000;

/// Simulated time spent per busy-wait poll
pub const POLL_INTERVAL: Duration = Duration::from_micros(1);

/// Events kept in the trace; later events are dropped
pub const TRACE_CAPACITY: usize = 64;

const TIMER_ENABLED_STATUS: u32 = 0x08;

const fn timer_modulo(frequency_hz: u32) -> u32 {
    BUS_CLOCK_HZ / frequency_hz
}

/// Timer count where the "1" waveform falls
const fn one_compare(timing: WaveformTiming, modulo: u32) -> u32 {
    (timing.one_high as u32 * modulo) >> DUTY_RESOLUTION_BITS
}

const DEFAULT_MODULO: u32 = timer_modulo(BitRate::Khz800.frequency_hz());

/// One recorded hardware operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwEvent {
    PortCleared(u8),
    OutputConfigured(OutputLine),
    WaveformsConfigured(WaveformConfig),
    DmaReset,
    ChannelConfigured(DmaChannel),
    TriggerRouted(DmaChannel, Trigger),
    CompletionInterruptEnabled(DmaChannel),
    SourceSet { channel: DmaChannel, in_flight: bool },
    TimerStopped { count: u32 },
    EdgeFlagsCleared,
    ChannelsEnabled { at: Instant },
    TimerRestarted,
    FrameCompleted { at: Instant },
}

#[derive(Debug, Clone, Copy)]
struct ActiveFrame {
    ends_at_us: u64,
}

struct SimState {
    now_us: u64,
    timer_count: u32,
    timer_modulo: u32,
    compare: u32,
    timer_running: bool,
    bit_period_ns: u32,
    output_mask: u8,
    descriptors: [Option<TransferDescriptor>; 3],
    irq_enabled: bool,
    active: Option<ActiveFrame>,
    last_source: Option<usize>,
    launches: u32,
    completions: u32,
    source_writes_in_flight: u32,
    rearms_in_flight: u32,
    trace: Vec<HwEvent, TRACE_CAPACITY>,
    dropped_events: u32,
}

impl SimState {
    const fn new() -> Self {
        Self {
            now_us: 0,
            timer_count: 0,
            timer_modulo: DEFAULT_MODULO,
            compare: one_compare(WaveformTiming::DEFAULT, DEFAULT_MODULO),
            timer_running: true,
            bit_period_ns: 0,
            output_mask: 0,
            descriptors: [None; 3],
            irq_enabled: false,
            active: None,
            last_source: None,
            launches: 0,
            completions: 0,
            source_writes_in_flight: 0,
            rearms_in_flight: 0,
            trace: Vec::new(),
            dropped_events: 0,
        }
    }

    fn record(&mut self, event: HwEvent) {
        if self.trace.push(event).is_err() {
            self.dropped_events += 1;
        }
    }

    fn descriptor_mut(&mut self, channel: DmaChannel) -> &mut Option<TransferDescriptor> {
        &mut self.descriptors[usize::from(channel.number() - 1)]
    }

    fn descriptor(&self, channel: DmaChannel) -> Option<TransferDescriptor> {
        self.descriptors[usize::from(channel.number() - 1)]
    }

    /// Retire the active frame if its last bit has gone out.
    ///
    /// Returns the completion time when the interrupt would fire.
    fn complete_due_frame(&mut self) -> Option<Instant> {
        let frame = self.active?;
        if frame.ends_at_us > self.now_us {
            return None;
        }
        self.active = None;
        self.completions += 1;
        let at = Instant::from_micros(frame.ends_at_us);
        self.record(HwEvent::FrameCompleted { at });
        self.irq_enabled.then_some(at)
    }

    fn start_frame(&mut self) {
        let Some(clear_all) = self.descriptor(DmaChannel::ClearAll) else {
            return;
        };
        let source = self
            .descriptor(DmaChannel::ApplyData)
            .map_or(0, |descriptor| descriptor.source.addr());
        let frame_ns = u64::from(clear_all.major_count) * u64::from(self.bit_period_ns);
        self.active = Some(ActiveFrame {
            ends_at_us: self.now_us + frame_ns.div_ceil(1000),
        });
        self.last_source = Some(source);
        self.launches += 1;
    }
}

/// Shared simulated peripherals.
///
/// Hand [`SimHardware`] handles to the driver and keep the bus to drive time
/// and inspect what happened.
pub struct SimBus<'a> {
    state: Mutex<RefCell<SimState>>,
    tracker: &'a CompletionTracker,
}

impl<'a> SimBus<'a> {
    /// Completion interrupts are delivered to `tracker`.
    pub const fn new(tracker: &'a CompletionTracker) -> Self {
        Self {
            state: Mutex::new(RefCell::new(SimState::new())),
            tracker,
        }
    }

    /// A backend handle for the driver
    pub const fn hardware(&self) -> SimHardware<'_> {
        SimHardware { bus: self }
    }

    /// Current simulated time
    pub fn now(&self) -> Instant {
        self.with_state(|state| Instant::from_micros(state.now_us))
    }

    /// Move simulated time forward, firing the completion interrupt if the
    /// active frame finishes on the way.
    pub fn advance(&self, by: Duration) {
        let completed = self.with_state(|state| {
            state.now_us += by.as_micros();
            state.complete_due_frame()
        });
        if let Some(at) = completed {
            self.tracker.on_transfer_complete(at);
        }
    }

    /// Advance to the end of the active frame, if any
    pub fn finish_frame(&self) {
        let remaining = self.with_state(|state| {
            state
                .active
                .map(|frame| frame.ends_at_us.saturating_sub(state.now_us))
        });
        if let Some(remaining) = remaining {
            self.advance(Duration::from_micros(remaining));
        }
    }

    /// Stop delivering the completion interrupt, as if its vector were masked
    pub fn mask_completion_interrupt(&self) {
        self.with_state(|state| state.irq_enabled = false);
    }

    /// True while the DMA channels are still clocking out a frame
    pub fn is_transmitting(&self) -> bool {
        self.with_state(|state| state.active.is_some())
    }

    /// Frames launched so far
    pub fn launches(&self) -> u32 {
        self.with_state(|state| state.launches)
    }

    /// Frames the DMA finished, whether or not the interrupt was enabled
    pub fn completions(&self) -> u32 {
        self.with_state(|state| state.completions)
    }

    /// Address the data channel read from at the last launch
    pub fn last_source(&self) -> Option<usize> {
        self.with_state(|state| state.last_source)
    }

    /// Data source rewrites that happened while a frame was on the wire
    pub fn source_writes_in_flight(&self) -> u32 {
        self.with_state(|state| state.source_writes_in_flight)
    }

    /// Channel enables issued while a frame was on the wire
    pub fn rearms_in_flight(&self) -> u32 {
        self.with_state(|state| state.rearms_in_flight)
    }

    /// Port bits currently in output mode
    pub fn output_mask(&self) -> u8 {
        self.with_state(|state| state.output_mask)
    }

    /// Descriptor last loaded into `channel`
    pub fn descriptor(&self, channel: DmaChannel) -> Option<TransferDescriptor> {
        self.with_state(|state| state.descriptor(channel))
    }

    /// Compare value of the "1" waveform in timer counts
    pub fn compare(&self) -> u32 {
        self.with_state(|state| state.compare)
    }

    /// Recorded events, oldest first. Check [`dropped_events`](Self::dropped_events)
    /// before asserting on a full trace.
    pub fn trace(&self) -> Vec<HwEvent, TRACE_CAPACITY> {
        self.with_state(|state| state.trace.clone())
    }

    /// Events that did not fit in the trace since the last clear
    pub fn dropped_events(&self) -> u32 {
        self.with_state(|state| state.dropped_events)
    }

    /// Empty the trace and reset the dropped event count
    pub fn clear_trace(&self) {
        self.with_state(|state| {
            state.trace.clear();
            state.dropped_events = 0;
        });
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SimState) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.state.borrow_ref_mut(cs)))
    }
}

/// [`Hardware`] implementation backed by a [`SimBus`].
#[derive(Clone, Copy)]
pub struct SimHardware<'a> {
    bus: &'a SimBus<'a>,
}

impl SimHardware<'_> {
    fn with_state<R>(&self, f: impl FnOnce(&mut SimState) -> R) -> R {
        self.bus.with_state(f)
    }
}

impl Hardware for SimHardware<'_> {
    fn now(&self) -> Instant {
        self.bus.now()
    }

    fn relax(&self) {
        self.bus.advance(POLL_INTERVAL);
    }

    fn clear_port(&mut self, mask: u8) {
        self.with_state(|state| state.record(HwEvent::PortCleared(mask)));
    }

    fn configure_output(&mut self, line: OutputLine) {
        self.with_state(|state| {
            state.output_mask |= line.mask();
            state.record(HwEvent::OutputConfigured(line));
        });
    }

    fn configure_waveforms(&mut self, config: &WaveformConfig) {
        self.with_state(|state| {
            let modulo = timer_modulo(config.frequency_hz);
            state.timer_modulo = modulo;
            state.compare = one_compare(config.timing, modulo);
            state.bit_period_ns = config.bit_period_ns();
            state.timer_count = 0;
            state.timer_running = true;
            state.record(HwEvent::WaveformsConfigured(*config));
        });
    }

    fn reset_dma(&mut self) {
        self.with_state(|state| {
            state.descriptors = [None; 3];
            state.active = None;
            state.record(HwEvent::DmaReset);
        });
    }

    fn configure_channel(&mut self, channel: DmaChannel, descriptor: &TransferDescriptor) {
        self.with_state(|state| {
            *state.descriptor_mut(channel) = Some(*descriptor);
            state.record(HwEvent::ChannelConfigured(channel));
        });
    }

    fn route_trigger(&mut self, channel: DmaChannel, trigger: Trigger) {
        self.with_state(|state| state.record(HwEvent::TriggerRouted(channel, trigger)));
    }

    fn enable_completion_interrupt(&mut self, channel: DmaChannel) {
        self.with_state(|state| {
            if channel == DmaChannel::ClearAll {
                state.irq_enabled = true;
            }
            state.record(HwEvent::CompletionInterruptEnabled(channel));
        });
    }

    fn set_channel_source(&mut self, channel: DmaChannel, source: *const u8) {
        self.with_state(|state| {
            let in_flight = state.active.is_some();
            if in_flight {
                state.source_writes_in_flight += 1;
            }
            if let Some(descriptor) = state.descriptor_mut(channel) {
                descriptor.source = source;
            }
            state.record(HwEvent::SourceSet { channel, in_flight });
        });
    }

    fn enable_channels(&mut self, channels: ChannelSet) {
        self.with_state(|state| {
            if state.active.is_some() {
                state.rearms_in_flight += 1;
            }
            state.record(HwEvent::ChannelsEnabled {
                at: Instant::from_micros(state.now_us),
            });
            if channels.contains(DmaChannel::ClearAll) {
                state.start_frame();
            }
        });
    }

    fn clear_edge_flags(&mut self) {
        self.with_state(|state| state.record(HwEvent::EdgeFlagsCleared));
    }

    fn timer_snapshot(&self) -> TimerSnapshot {
        self.with_state(|state| TimerSnapshot {
            status: TIMER_ENABLED_STATUS,
            compare: state.compare,
        })
    }

    fn timer_count(&self) -> u32 {
        self.with_state(|state| {
            if state.timer_running {
                state.timer_count = (state.timer_count + 1) % state.timer_modulo;
            }
            state.timer_count
        })
    }

    fn stop_timer(&mut self, _snapshot: &TimerSnapshot) {
        self.with_state(|state| {
            state.timer_running = false;
            let count = state.timer_count;
            state.record(HwEvent::TimerStopped { count });
        });
    }

    fn restart_timer(&mut self, _snapshot: &TimerSnapshot) {
        self.with_state(|state| {
            state.timer_running = true;
            state.record(HwEvent::TimerRestarted);
        });
    }
}
