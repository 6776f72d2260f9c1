use crate::consts::TICKS_PER_MICROSECOND;
use crate::decoder::Ev1527Decoder;
use crate::frame::DecodedFrame;
use crate::hw::{EdgeControl, Polarity, TickSource};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

/// A software tick counter advanced by the poll loop.
///
/// Stands in for a hardware timer on targets without a free input-capture
/// counter: each poll iteration adds a fixed number of ticks, so pulse
/// widths are quantized to the poll interval. Keep the interval small
/// relative to the tolerance bands (10 µs at the reference timing leaves
/// plenty of margin on a 225 µs minimum pulse).
#[derive(Debug)]
pub struct SoftTicks {
    count: u32,
    running: bool,
    ticks_per_poll: u32,
}

impl SoftTicks {
    /// Creates a stopped counter that gains `ticks_per_poll` ticks per
    /// [`advance()`](SoftTicks::advance) while running.
    pub const fn new(ticks_per_poll: u32) -> Self {
        Self {
            count: 0,
            running: false,
            ticks_per_poll,
        }
    }

    /// Creates a counter calibrated for a poll interval in microseconds at
    /// the reference tick rate (0.5 µs/tick).
    pub const fn for_poll_interval_us(tick_us: u32) -> Self {
        Self::new(tick_us * TICKS_PER_MICROSECOND)
    }

    /// Advances the counter by one poll interval. No-op while stopped.
    pub fn advance(&mut self) {
        if self.running {
            self.count = self.count.saturating_add(self.ticks_per_poll);
        }
    }
}

impl TickSource for SoftTicks {
    fn reset(&mut self) {
        self.count = 0;
    }
    fn read(&mut self) -> u32 {
        self.count
    }
    fn start(&mut self) {
        self.running = true;
    }
    fn stop(&mut self) {
        self.running = false;
    }
}

/// A software edge line: records what the decoder armed so the poll loop can
/// deliver only matching transitions.
#[derive(Debug)]
pub struct SoftEdge {
    armed: Polarity,
    enabled: bool,
}

impl SoftEdge {
    /// Creates a disabled line armed for rising edges.
    pub const fn new() -> Self {
        Self {
            armed: Polarity::Rising,
            enabled: false,
        }
    }

    /// The polarity the decoder most recently armed.
    pub const fn armed(&self) -> Polarity {
        self.armed
    }

    /// Whether edge notifications are currently enabled.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for SoftEdge {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeControl for SoftEdge {
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

/// Runs a blocking capture loop until one frame completes, then returns it.
///
/// Samples the receive line every `tick_us` microseconds, synthesizes an
/// edge notification whenever the level changes and the transition matches
/// the armed polarity, and advances the decoder's [`SoftTicks`] once per
/// sample. Returns as soon as the decoder publishes a frame and disables
/// itself; call [`rearm()`](Ev1527Decoder::rearm) before looping again.
///
/// # Arguments
/// - `decoder`: A re-armed decoder built on [`SoftTicks`] and [`SoftEdge`].
/// - `rx`: The receiver data pin.
/// - `delay`: A delay provider, typically from the HAL.
/// - `tick_us`: The poll interval in microseconds (e.g. 10).
///
/// # Notes
/// - This loop blocks until a frame arrives; there is no timeout. Reception
///   that never completes must be bounded by the caller's own policy.
/// - `rx.is_high()` errors are treated as "level unchanged", which is
///   acceptable in typical HALs where the only error case is an
///   uninitialized peripheral.
pub fn run_edge_poll_loop<RX, D>(
    decoder: &mut Ev1527Decoder<SoftTicks, SoftEdge>,
    rx: &mut RX,
    delay: &mut D,
    tick_us: u32,
) -> DecodedFrame
where
    RX: InputPin,
    D: DelayNs,
{
    let mut last_level = rx.is_high().unwrap_or(false);
    loop {
        delay.delay_us(tick_us);
        decoder.ticks.advance();

        let level = rx.is_high().unwrap_or(last_level);
        if level != last_level {
            last_level = level;
            let polarity = if level {
                Polarity::Rising
            } else {
                Polarity::Falling
            };
            if decoder.edge.is_enabled() && decoder.edge.armed() == polarity {
                decoder.on_edge();
            }
        }

        if let Some(frame) = decoder.take_frame() {
            return frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::Tolerances;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    const TICK_US: u32 = 10;

    fn push_level(levels: &mut Vec<bool>, level: bool, duration_us: u32) {
        for _ in 0..(duration_us / TICK_US) {
            levels.push(level);
        }
    }

    /// Level samples for idle line, preamble, 24 data bits, and the edge
    /// that closes the final LOW.
    fn reference_waveform(raw: u32) -> Vec<bool> {
        let mut levels = Vec::new();
        push_level(&mut levels, false, 50);
        push_level(&mut levels, true, 320);
        push_level(&mut levels, false, 10_000);
        for i in 0..24 {
            if (raw >> i) & 1 == 1 {
                push_level(&mut levels, true, 900);
                push_level(&mut levels, false, 300);
            } else {
                push_level(&mut levels, true, 300);
                push_level(&mut levels, false, 900);
            }
        }
        push_level(&mut levels, true, TICK_US);
        levels
    }

    #[test]
    fn test_soft_ticks_advance_only_while_running() {
        let mut ticks = SoftTicks::new(20);
        ticks.advance();
        assert_eq!(ticks.read(), 0);
        ticks.start();
        ticks.advance();
        ticks.advance();
        assert_eq!(ticks.read(), 40);
        ticks.reset();
        assert_eq!(ticks.read(), 0);
        ticks.stop();
        ticks.advance();
        assert_eq!(ticks.read(), 0);
    }

    #[test]
    fn test_soft_edge_records_arm_and_enable() {
        let mut edge = SoftEdge::default();
        assert!(!edge.is_enabled());
        edge.enable();
        edge.arm(Polarity::Falling);
        assert!(edge.is_enabled());
        assert_eq!(edge.armed(), Polarity::Falling);
        edge.disable();
        assert!(!edge.is_enabled());
    }

    #[test]
    fn test_poll_loop_decodes_reference_frame() {
        let levels = reference_waveform(0x312345);
        let transactions: Vec<PinTransaction> = levels
            .iter()
            .map(|&level| {
                PinTransaction::get(if level { PinState::High } else { PinState::Low })
            })
            .collect();
        let mut rx = PinMock::new(&transactions);
        let mut delay = NoopDelay::new();

        let mut decoder = Ev1527Decoder::new(
            SoftTicks::for_poll_interval_us(TICK_US),
            SoftEdge::new(),
            Tolerances::default(),
        );
        decoder.rearm();

        let frame = run_edge_poll_loop(&mut decoder, &mut rx, &mut delay, TICK_US);
        assert_eq!(frame.address(), 0x12345);
        assert_eq!(frame.key(), 0x3);
        rx.done();
    }
}
