use crate::decoder::Ev1527Decoder;
use crate::frame::DecodedFrame;
use crate::hw::{EdgeControl, TickSource};
use crate::pulse::Tolerances;
use core::cell::RefCell;
use critical_section::Mutex;

/// Used to initialize the global static `Ev1527Decoder` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use core::cell::RefCell;
/// use critical_section::Mutex;
/// use ev1527::decoder::Ev1527Decoder;
/// use ev1527::irq::global_decoder_init;
///
/// static EV1527_DECODER: Mutex<RefCell<Option<Ev1527Decoder<MyTimer, MyInt0>>>> =
///     global_decoder_init::<MyTimer, MyInt0>();
/// ```
pub const fn global_decoder_init<T: TickSource, E: EdgeControl>()
-> Mutex<RefCell<Option<Ev1527Decoder<T, E>>>> {
    Mutex::new(RefCell::new(None))
}

/// Constructs the decoder inside the global static and arms reception.
///
/// After this returns, the edge line is enabled and the next rising edge
/// starts a measurement; wire the pin-change ISR to
/// [`global_decoder_on_edge`].
///
/// # Arguments
/// * The global static decoder cell
/// * The tick source (pulse-width measurement counter)
/// * The edge-interrupt line
/// * The tolerance tables (usually `Tolerances::default()`)
pub fn global_decoder_setup<T: TickSource, E: EdgeControl>(
    global_decoder: &'static Mutex<RefCell<Option<Ev1527Decoder<T, E>>>>,
    ticks: T,
    edge: E,
    tolerances: Tolerances,
) {
    critical_section::with(|cs| {
        let mut decoder = Ev1527Decoder::new(ticks, edge, tolerances);
        decoder.rearm();
        let _ = global_decoder.borrow(cs).replace(Some(decoder));
    });
}

/// Feeds one edge notification to the global decoder.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn EXTI0() {
///     global_decoder_on_edge(&EV1527_DECODER);
/// }
/// ```
pub fn global_decoder_on_edge<T: TickSource, E: EdgeControl>(
    global_decoder: &'static Mutex<RefCell<Option<Ev1527Decoder<T, E>>>>,
) {
    critical_section::with(|cs| {
        if let Some(decoder) = global_decoder.borrow(cs).borrow_mut().as_mut() {
            decoder.on_edge();
        }
    });
}

/// Consumes the pending frame from the global decoder, if one has completed.
///
/// The critical section makes the multi-field frame read atomic with respect
/// to the edge ISR, so a frame completing concurrently can never be observed
/// torn.
pub fn global_decoder_take_frame<T: TickSource, E: EdgeControl>(
    global_decoder: &'static Mutex<RefCell<Option<Ev1527Decoder<T, E>>>>,
) -> Option<DecodedFrame> {
    critical_section::with(|cs| {
        global_decoder
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .and_then(Ev1527Decoder::take_frame)
    })
}

/// Re-arms the global decoder after a completed frame has been consumed.
pub fn global_decoder_rearm<T: TickSource, E: EdgeControl>(
    global_decoder: &'static Mutex<RefCell<Option<Ev1527Decoder<T, E>>>>,
) {
    critical_section::with(|cs| {
        if let Some(decoder) = global_decoder.borrow(cs).borrow_mut().as_mut() {
            decoder.rearm();
        }
    });
}

#[cfg(all(test, feature = "poll-loop"))]
mod tests {
    use super::*;
    use crate::irq::{SoftEdge, SoftTicks};

    static DECODER: Mutex<RefCell<Option<Ev1527Decoder<SoftTicks, SoftEdge>>>> =
        global_decoder_init::<SoftTicks, SoftEdge>();

    #[test]
    fn test_global_setup_arms_and_take_frame_is_empty() {
        global_decoder_setup(
            &DECODER,
            SoftTicks::new(1),
            SoftEdge::new(),
            Tolerances::default(),
        );
        assert!(global_decoder_take_frame(&DECODER).is_none());
        // Edge before any pulse completes: still no frame
        global_decoder_on_edge(&DECODER);
        assert!(global_decoder_take_frame(&DECODER).is_none());
        global_decoder_rearm(&DECODER);
        assert!(global_decoder_take_frame(&DECODER).is_none());
    }
}
