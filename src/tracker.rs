//! Frame completion tracking.
//!
//! Shared between the sequencer and the DMA completion interrupt. The
//! interrupt is the only writer of the completion timestamp and the only
//! place that clears the in-flight flag.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;
use embassy_time::{Duration, Instant};

/// Minimum low time after a frame before the chips latch and accept the next one.
pub const RESET_DURATION: Duration = Duration::from_micros(50);

/// Where the transmitter is in its frame cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitState {
    Idle,
    /// DMA pipeline armed or running
    InFlight,
    /// Frame finished, reset low time still elapsing
    ResetGap,
}

/// Completion state shared with the interrupt handler.
///
/// Usually placed in a `static` so the ISR can reach it:
///
/// ```ignore
/// static TRACKER: CompletionTracker = CompletionTracker::new();
///
/// #[interrupt]
/// fn DMA_CH3() {
///     dma.clear_interrupt(3);
///     TRACKER.on_transfer_complete(Instant::now());
/// }
/// ```
pub struct CompletionTracker {
    in_flight: AtomicBool,
    completed_at: Mutex<Cell<Option<Instant>>>,
}

impl CompletionTracker {
    /// Idle tracker, no frame launched yet
    pub const fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            completed_at: Mutex::new(Cell::new(None)),
        }
    }

    /// Record a launch. Called by the sequencer inside its critical section.
    pub(crate) fn mark_in_flight(&self) {
        self.in_flight.store(true, Ordering::Release);
    }

    /// Interrupt entry: the last bit of the frame has been clocked out.
    pub fn on_transfer_complete(&self, now: Instant) {
        critical_section::with(|cs| self.completed_at.borrow(cs).set(Some(now)));
        self.in_flight.store(false, Ordering::Release);
    }

    /// True from launch until the completion interrupt
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Time of the last completion interrupt, if any frame has finished
    pub fn completed_at(&self) -> Option<Instant> {
        critical_section::with(|cs| self.completed_at.borrow(cs).get())
    }

    /// True once [`RESET_DURATION`] has passed since the last completion.
    ///
    /// Also true before the first frame.
    pub fn reset_gap_elapsed(&self, now: Instant) -> bool {
        match self.completed_at() {
            None => true,
            Some(completed_at) => now
                .checked_duration_since(completed_at)
                .is_some_and(|elapsed| elapsed >= RESET_DURATION),
        }
    }

    /// Transmitter state at `now`
    pub fn state(&self, now: Instant) -> TransmitState {
        if self.is_in_flight() {
            TransmitState::InFlight
        } else if self.reset_gap_elapsed(now) {
            TransmitState::Idle
        } else {
            TransmitState::ResetGap
        }
    }

    /// True unless the state at `now` is [`TransmitState::Idle`]
    pub fn busy(&self, now: Instant) -> bool {
        self.state(now) != TransmitState::Idle
    }
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}
