//! Edge-driven EV1527 decoder state machine.
//!
//! This module provides the [`Ev1527Decoder`] struct, which turns a stream of
//! edge notifications into decoded 24-bit frames. It owns the two hardware
//! seams ([`TickSource`] and [`EdgeControl`]) plus all cross-call state, and
//! has a single entry point, [`on_edge()`](Ev1527Decoder::on_edge), intended
//! to be called from a GPIO interrupt handler once per electrical transition.
//!
//! ## Receive pipeline
//!
//! Each edge advances an alternating HIGH/LOW measurement: the falling edge
//! captures the HIGH duration, the rising edge captures the LOW duration and
//! completes a [`PulseSample`]. Completed samples run through the classifier
//! in [`crate::pulse`]: before synchronization the decoder hunts for the
//! preamble; afterwards each valid pulse contributes one bit to the 24-bit
//! accumulator. The 24th bit publishes a [`DecodedFrame`] and the decoder
//! disables its own edge notifications and tick source, so the trailing sync
//! pulse and button-hold repeats of the same transmission cannot re-trigger
//! partial decodes. Reception stays off until [`rearm()`](Ev1527Decoder::rearm).
//!
//! Every path through `on_edge()` is non-looping and constant-time, so the
//! handler always finishes well before the next edge can arrive.
//!
//! ## Sharing with the foreground
//!
//! The decoded frame and its `detected` flag are the only state meant to be
//! read outside the interrupt context. When the decoder lives in a `static`,
//! wrap all access in a critical section; the helpers in [`crate::irq`] do
//! exactly that. Frame publication happens before the self-disable, and the
//! interrupt line is quiesced by the disable, so the foreground can never
//! observe a frame that is still being written once `detected` is set.

use crate::consts::FRAME_BITS;
use crate::frame::DecodedFrame;
use crate::hw::{EdgeControl, Polarity, TickSource};
use crate::pulse::{PulseSample, Tolerances};
use core::convert::Infallible;

/// Which edge the decoder expects next.
///
/// Tracked explicitly rather than read back from the interrupt controller's
/// polarity configuration; hardware polarity selection is a pure output the
/// decoder computes, never an input it trusts.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Phase {
    /// Waiting for the first edge after (re)synchronization. That edge only
    /// marks the measurement start and produces no sample.
    AwaitingFirstEdge,
    /// Line is HIGH; the next falling edge ends the HIGH measurement.
    AwaitingFallingEdge,
    /// Line is LOW; the next rising edge ends the LOW measurement and
    /// completes a pulse sample.
    AwaitingRisingEdge,
}

/// Collapsed decoder status for foreground inspection.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Status {
    /// Armed but no measurement in progress yet.
    Unsynced,
    /// Tracking edges, hunting for a preamble.
    Syncing,
    /// Preamble found; accumulating data bits.
    Receiving,
    /// Reception disabled: after a completed frame, after an explicit
    /// [`disable()`](Ev1527Decoder::disable), or before the first
    /// [`rearm()`](Ev1527Decoder::rearm). Terminal until re-armed.
    Complete,
}

/// An edge-timing decoder for EV1527-style 24-bit RF frames.
///
/// ## Type Parameters
///
/// - `T`: The pulse-width measurement counter ([`TickSource`])
/// - `E`: The edge-interrupt line ([`EdgeControl`])
///
/// ## Example
///
/// ```rust,ignore
/// let mut decoder = Ev1527Decoder::new(ticks, edge, Tolerances::default());
/// decoder.rearm();
/// // from the GPIO ISR:
/// decoder.on_edge();
/// // from the foreground:
/// if let Some(frame) = decoder.take_frame() {
///     // ... act on frame.address() / frame.key() ...
///     decoder.rearm();
/// }
/// ```
#[derive(Debug)]
pub struct Ev1527Decoder<T, E>
where
    T: TickSource,
    E: EdgeControl,
{
    pub(crate) ticks: T,
    pub(crate) edge: E,
    tolerances: Tolerances,
    phase: Phase,
    preamble_found: bool,
    bit_index: u8,
    accumulator: u32,
    high_ticks: u32,
    frame: DecodedFrame,
    detected: bool,
    armed: bool,
}

impl<T, E> Ev1527Decoder<T, E>
where
    T: TickSource,
    E: EdgeControl,
{
    /// Creates a decoder around the given tick source and edge line.
    ///
    /// The decoder starts disarmed ([`Status::Complete`]); call
    /// [`rearm()`](Ev1527Decoder::rearm) to begin reception.
    pub const fn new(ticks: T, edge: E, tolerances: Tolerances) -> Self {
        Self {
            ticks,
            edge,
            tolerances,
            phase: Phase::AwaitingFirstEdge,
            preamble_found: false,
            bit_index: 0,
            accumulator: 0,
            high_ticks: 0,
            frame: DecodedFrame::from_raw(0),
            detected: false,
            armed: false,
        }
    }

    /// The tolerance tables this decoder classifies with.
    pub const fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Arms reception: `Complete -> Unsynced`.
    ///
    /// Clears classification state, starts and zeroes the tick source, arms
    /// the edge line for a rising edge and enables notifications. The frame
    /// register is left alone: a pending decoded frame stays readable until
    /// the next frame overwrites it.
    pub fn rearm(&mut self) {
        self.reset_classification();
        self.phase = Phase::AwaitingFirstEdge;
        self.ticks.start();
        self.ticks.reset();
        self.edge.arm(Polarity::Rising);
        self.edge.enable();
        self.armed = true;
    }

    /// Stops reception entirely, discarding any partial frame without trace.
    ///
    /// The application sees no signal about how far reception had progressed;
    /// this is accepted data loss, not an error. A previously completed frame
    /// remains readable.
    pub fn disable(&mut self) {
        self.reset_classification();
        self.phase = Phase::AwaitingFirstEdge;
        self.edge.disable();
        self.ticks.stop();
        self.armed = false;
    }

    /// Handles one edge notification. Call once per matching edge, from the
    /// interrupt handler.
    ///
    /// Alternates HIGH/LOW duration capture, re-arms the edge line for the
    /// complementary polarity, and feeds each completed pulse pair through
    /// classification.
    pub fn on_edge(&mut self) {
        match self.phase {
            Phase::AwaitingFirstEdge => {
                // Synchronization start: discard any stale measurement and
                // begin timing the first HIGH.
                self.reset_classification();
                self.ticks.reset();
                self.phase = Phase::AwaitingFallingEdge;
                self.edge.arm(Polarity::Falling);
            }
            Phase::AwaitingFallingEdge => {
                self.high_ticks = self.ticks.read();
                self.ticks.reset();
                self.phase = Phase::AwaitingRisingEdge;
                self.edge.arm(Polarity::Rising);
            }
            Phase::AwaitingRisingEdge => {
                let low_ticks = self.ticks.read();
                self.ticks.reset();
                // Default continuation: capture the next HIGH. Classification
                // below may override this on a reset.
                self.phase = Phase::AwaitingFallingEdge;
                self.edge.arm(Polarity::Falling);
                let sample = PulseSample {
                    high_ticks: self.high_ticks,
                    low_ticks,
                };
                self.classify(sample);
            }
        }
    }

    /// Runs one completed pulse pair through the transition logic.
    fn classify(&mut self, sample: PulseSample) {
        if !self.preamble_found {
            if self.tolerances.is_preamble(&sample) {
                // The preamble consumes no bit; it only opens the frame.
                self.preamble_found = true;
                self.bit_index = 0;
                self.accumulator = 0;
            }
            // Transient noise before sync does not restart edge tracking.
            return;
        }

        if !self.tolerances.in_valid_range(&sample) {
            self.soft_reset();
            return;
        }

        if sample.decode_bit() == 1 {
            self.accumulator |= 1 << self.bit_index;
        }
        self.bit_index += 1;
        if self.bit_index == FRAME_BITS {
            self.publish();
        }
    }

    /// Desynchronization: restart classification without touching hardware.
    ///
    /// Timer and edge notifications keep running; the line is re-armed for a
    /// rising edge so the next transition replays first-edge initialization
    /// and a fresh preamble can be recognized. A single corrupted pulse never
    /// requires application intervention.
    fn soft_reset(&mut self) {
        self.reset_classification();
        self.phase = Phase::AwaitingFirstEdge;
        self.edge.arm(Polarity::Rising);
    }

    /// Publishes the completed frame, then performs the hard reset.
    ///
    /// The frame register write precedes the disable, and the disable
    /// quiesces the interrupt line, so by the time reception is off the
    /// frame is already consumable and no writer can race with it.
    fn publish(&mut self) {
        self.frame = DecodedFrame::from_raw(self.accumulator);
        self.detected = true;
        #[cfg(feature = "log")]
        log::debug!(
            "frame complete: address {:#07x}, key {:#x}",
            self.frame.address(),
            self.frame.key()
        );
        self.disable();
    }

    fn reset_classification(&mut self) {
        self.preamble_found = false;
        self.bit_index = 0;
        self.accumulator = 0;
        self.high_ticks = 0;
    }

    /// The last completed frame. Meaningful only while
    /// [`detected()`](Ev1527Decoder::detected) is true, except that a
    /// consumed frame stays readable until overwritten.
    pub const fn frame(&self) -> DecodedFrame {
        self.frame
    }

    /// Whether a completed frame is waiting to be consumed.
    pub const fn detected(&self) -> bool {
        self.detected
    }

    /// Marks the pending frame as consumed. Calling this twice in a row is a
    /// no-op the second time; the frame fields are left intact either way.
    pub fn clear_detected(&mut self) {
        self.detected = false;
    }

    /// Returns the pending frame and marks it consumed, or `None` if no
    /// frame has completed since the last consumption.
    pub fn take_frame(&mut self) -> Option<DecodedFrame> {
        if self.detected {
            self.detected = false;
            Some(self.frame)
        } else {
            None
        }
    }

    /// Non-blocking read of the pending frame, in the `nb` convention.
    ///
    /// Returns [`nb::Error::WouldBlock`] until a frame completes. Does not
    /// consume the frame; pair with
    /// [`clear_detected()`](Ev1527Decoder::clear_detected).
    pub fn read_frame(&self) -> nb::Result<DecodedFrame, Infallible> {
        if self.detected {
            Ok(self.frame)
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// The collapsed state of the receive machine.
    pub const fn status(&self) -> Status {
        if !self.armed {
            Status::Complete
        } else if self.preamble_found {
            Status::Receiving
        } else if matches!(self.phase, Phase::AwaitingFirstEdge) {
            Status::Unsynced
        } else {
            Status::Syncing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tick source whose value tests set directly before each edge.
    struct TestTicks {
        value: u32,
        running: bool,
    }

    impl TickSource for TestTicks {
        fn reset(&mut self) {
            self.value = 0;
        }
        fn read(&mut self) -> u32 {
            self.value
        }
        fn start(&mut self) {
            self.running = true;
        }
        fn stop(&mut self) {
            self.running = false;
        }
    }

    /// Edge line that records the most recent arm/enable calls.
    struct TestEdge {
        armed: Polarity,
        enabled: bool,
    }

    impl EdgeControl for TestEdge {
        fn arm(&mut self, polarity: Polarity) {
            self.armed = polarity;
        }
        fn enable(&mut self) {
            self.enabled = true;
        }
        fn disable(&mut self) {
            self.enabled = false;
        }
    }

    type TestDecoder = Ev1527Decoder<TestTicks, TestEdge>;

    fn armed_decoder() -> TestDecoder {
        let mut decoder = Ev1527Decoder::new(
            TestTicks {
                value: 0,
                running: false,
            },
            TestEdge {
                armed: Polarity::Falling,
                enabled: false,
            },
            Tolerances::default(),
        );
        decoder.rearm();
        decoder
    }

    /// Delivers one HIGH/LOW pulse pair as a falling then a rising edge.
    fn feed_pulse(decoder: &mut TestDecoder, high_ticks: u32, low_ticks: u32) {
        decoder.ticks.value = high_ticks;
        decoder.on_edge();
        decoder.ticks.value = low_ticks;
        decoder.on_edge();
    }

    /// First edge plus the reference preamble pulse.
    fn sync(decoder: &mut TestDecoder) {
        decoder.on_edge();
        feed_pulse(decoder, 640, 20000);
    }

    /// Feeds the 24 data pulses encoding `raw`, bit 0 first.
    fn feed_frame_bits(decoder: &mut TestDecoder, raw: u32) {
        for i in 0..FRAME_BITS {
            if (raw >> i) & 1 == 1 {
                feed_pulse(decoder, 1800, 600);
            } else {
                feed_pulse(decoder, 600, 1800);
            }
        }
    }

    #[test]
    fn test_new_decoder_is_disarmed() {
        let mut decoder = armed_decoder();
        decoder.disable();
        assert_eq!(decoder.status(), Status::Complete);
        assert!(!decoder.detected());
        assert!(decoder.read_frame().is_err());
    }

    #[test]
    fn test_rearm_starts_timer_and_arms_rising() {
        let decoder = armed_decoder();
        assert!(decoder.ticks.running);
        assert!(decoder.edge.enabled);
        assert_eq!(decoder.edge.armed, Polarity::Rising);
        assert_eq!(decoder.status(), Status::Unsynced);
    }

    #[test]
    fn test_edges_alternate_armed_polarity() {
        let mut decoder = armed_decoder();
        decoder.on_edge(); // first (rising) edge
        assert_eq!(decoder.edge.armed, Polarity::Falling);
        assert_eq!(decoder.status(), Status::Syncing);
        decoder.ticks.value = 640;
        decoder.on_edge(); // falling: HIGH captured
        assert_eq!(decoder.edge.armed, Polarity::Rising);
        decoder.ticks.value = 20000;
        decoder.on_edge(); // rising: LOW captured, preamble classified
        assert_eq!(decoder.edge.armed, Polarity::Falling);
        assert_eq!(decoder.status(), Status::Receiving);
    }

    #[test]
    fn test_noise_before_preamble_keeps_edge_tracking() {
        let mut decoder = armed_decoder();
        decoder.on_edge();
        // Data-shaped and glitch-shaped pulses, none preamble-like
        feed_pulse(&mut decoder, 1800, 600);
        feed_pulse(&mut decoder, 20, 30);
        assert_eq!(decoder.status(), Status::Syncing);
        assert!(decoder.edge.enabled);
        // A real preamble is still recognized afterwards
        feed_pulse(&mut decoder, 640, 20000);
        assert_eq!(decoder.status(), Status::Receiving);
    }

    #[test]
    fn test_canonical_frame_decodes_and_self_disables() {
        let mut decoder = armed_decoder();
        sync(&mut decoder);
        feed_frame_bits(&mut decoder, 0x312345);

        assert_eq!(decoder.status(), Status::Complete);
        assert!(!decoder.edge.enabled);
        assert!(!decoder.ticks.running);
        assert!(decoder.detected());
        let frame = decoder.read_frame().unwrap();
        assert_eq!(frame.address(), 0x12345);
        assert_eq!(frame.key(), 0x3);
    }

    #[test]
    fn test_invalid_pulse_soft_resets_without_disabling() {
        let mut decoder = armed_decoder();
        sync(&mut decoder);
        feed_pulse(&mut decoder, 1800, 600);
        feed_pulse(&mut decoder, 600, 1800);
        // Out-of-bounds LOW mid-reception
        feed_pulse(&mut decoder, 600, 20);

        assert_eq!(decoder.status(), Status::Unsynced);
        assert!(decoder.edge.enabled);
        assert!(decoder.ticks.running);
        assert_eq!(decoder.edge.armed, Polarity::Rising);
        assert!(!decoder.detected());
    }

    #[test]
    fn test_no_stale_bits_leak_after_soft_reset() {
        let mut decoder = armed_decoder();
        sync(&mut decoder);
        // A few all-ones bits, then corruption
        feed_pulse(&mut decoder, 1800, 600);
        feed_pulse(&mut decoder, 1800, 600);
        feed_pulse(&mut decoder, 1800, 600);
        feed_pulse(&mut decoder, 600, 20);

        // Resync and receive an all-zero-address frame
        sync(&mut decoder);
        feed_frame_bits(&mut decoder, 0x100000);
        let frame = decoder.take_frame().unwrap();
        assert_eq!(frame.address(), 0x00000);
        assert_eq!(frame.key(), 0x1);
    }

    #[test]
    fn test_rearm_preserves_unconsumed_frame_until_next_completion() {
        let mut decoder = armed_decoder();
        sync(&mut decoder);
        feed_frame_bits(&mut decoder, 0x312345);
        assert!(decoder.detected());

        // Rearm without consuming; receive a partial second frame
        decoder.rearm();
        sync(&mut decoder);
        feed_pulse(&mut decoder, 1800, 600);
        feed_pulse(&mut decoder, 600, 1800);

        assert!(decoder.detected());
        assert_eq!(decoder.frame().address(), 0x12345);
        assert_eq!(decoder.frame().key(), 0x3);

        // Only a full second frame replaces the register
        feed_frame_bits(&mut decoder, 0x2ABCDE);
        // 26 bits fed in total; the frame closed at bit 24
        let frame = decoder.frame();
        assert_ne!(frame.raw(), 0x312345);
    }

    #[test]
    fn test_clear_detected_is_idempotent() {
        let mut decoder = armed_decoder();
        sync(&mut decoder);
        feed_frame_bits(&mut decoder, 0x312345);

        decoder.clear_detected();
        assert!(!decoder.detected());
        decoder.clear_detected();
        assert!(!decoder.detected());
        // Fields intact after clearing
        assert_eq!(decoder.frame().address(), 0x12345);
        assert!(decoder.take_frame().is_none());
    }

    #[test]
    fn test_disable_mid_reception_discards_partial_silently() {
        let mut decoder = armed_decoder();
        sync(&mut decoder);
        feed_pulse(&mut decoder, 1800, 600);
        decoder.disable();

        assert_eq!(decoder.status(), Status::Complete);
        assert!(!decoder.detected());
        assert!(!decoder.edge.enabled);
        assert!(!decoder.ticks.running);

        // Rearming decodes a clean frame with no residue
        decoder.rearm();
        sync(&mut decoder);
        feed_frame_bits(&mut decoder, 0x0F0F0F);
        assert_eq!(decoder.take_frame().unwrap().raw(), 0x0F0F0F);
    }
}
