//! Hardware seams: the tick source and the edge notifier.
//!
//! The decoder never touches registers. It drives two small traits and lets
//! the platform layer map them onto whatever timer and external-interrupt
//! peripheral the target has. Both traits are output-only from the decoder's
//! point of view: the decoder tracks which edge it expects in its own phase
//! state rather than reading a polarity configuration bit back from hardware,
//! which keeps the decision logic independent of any register bit layout and
//! avoids a read-after-write hazard on that register.

/// Electrical edge polarity on the receive line.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Polarity {
    /// LOW-to-HIGH transition.
    Rising,
    /// HIGH-to-LOW transition.
    Falling,
}

/// A monotonically increasing hardware counter used to measure pulse widths.
///
/// The counter must be monotonic between resets and fine-grained enough that
/// the shortest valid pulse spans many ticks; at the reference configuration
/// one tick is 0.5 µs, so a minimum-length pulse is 450 ticks. Timing jitter
/// must stay well inside the tolerance bands in [`crate::pulse::Tolerances`].
pub trait TickSource {
    /// Resets the counter to zero. Counting continues immediately.
    fn reset(&mut self);

    /// Reads the number of ticks elapsed since the last reset.
    fn read(&mut self) -> u32;

    /// Starts (or resumes) the counter's clock.
    fn start(&mut self);

    /// Stops the counter's clock, e.g. for power saving after a frame.
    fn stop(&mut self);
}

/// An external-interrupt line that raises one notification per matching edge.
///
/// The notification itself carries no payload; the decoder reads timing from
/// its [`TickSource`]. Implementations map `arm` onto the edge-select bits of
/// the interrupt controller and `enable`/`disable` onto its mask bit.
pub trait EdgeControl {
    /// Selects which edge polarity triggers the next notification.
    fn arm(&mut self, polarity: Polarity);

    /// Enables edge notifications.
    fn enable(&mut self);

    /// Disables edge notifications. Pending partial measurements are simply
    /// abandoned; the decoder treats this as accepted data loss.
    fn disable(&mut self);
}
