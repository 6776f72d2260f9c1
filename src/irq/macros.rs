/// Declares a static global `EV1527_DECODER` instance protected by a
/// `critical_section` mutex.
///
/// This macro creates a `static` singleton suitable for interrupt-based
/// environments, where both the main thread and the pin-change ISR need to
/// safely access the shared decoder state.
///
/// # Arguments
/// - `$ticks`: The concrete tick source type (must implement `TickSource`)
/// - `$edge`: The concrete edge line type (must implement `EdgeControl`)
///
/// # Example
/// ```rust,ignore
/// init_ev1527_decoder!(MyTimer, MyInt0);
/// ```
#[macro_export]
macro_rules! init_ev1527_decoder {
    ( $ticks:ty, $edge:ty ) => {
        pub static EV1527_DECODER: $crate::critical_section::Mutex<
            core::cell::RefCell<Option<$crate::decoder::Ev1527Decoder<$ticks, $edge>>>,
        > = $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
}

/// Initializes the global `EV1527_DECODER` singleton and arms reception.
///
/// # Arguments
/// - `$ticks`: The tick source value
/// - `$edge`: The edge line value
/// - `$tolerances`: The tolerance tables (e.g., `Tolerances::default()`)
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     setup_ev1527_decoder!(timer, int0, Tolerances::default());
/// }
/// ```
///
/// # Notes
/// - Requires `init_ev1527_decoder!` to have been used earlier.
#[macro_export]
macro_rules! setup_ev1527_decoder {
    ( $ticks:expr, $edge:expr, $tolerances:expr ) => {
        $crate::irq::global_decoder_setup(&EV1527_DECODER, $ticks, $edge, $tolerances)
    };
}

/// Feeds one edge notification to the global `EV1527_DECODER`.
///
/// Invoke from the pin-change ISR for the receive line.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn EXTI0() {
///     ev1527_on_edge!();
/// }
/// ```
///
/// # Notes
/// - Safe to call before setup — it silently does nothing until the decoder
///   has been initialized.
#[macro_export]
macro_rules! ev1527_on_edge {
    () => {
        $crate::irq::global_decoder_on_edge(&EV1527_DECODER)
    };
}

/// Consumes the pending frame from the global `EV1527_DECODER`, if any.
///
/// # Example
/// ```rust,ignore
/// if let Some(frame) = ev1527_take_frame!() {
///     handle(frame.address(), frame.key());
///     ev1527_rearm!();
/// }
/// ```
#[macro_export]
macro_rules! ev1527_take_frame {
    () => {
        $crate::irq::global_decoder_take_frame(&EV1527_DECODER)
    };
}

/// Re-arms the global `EV1527_DECODER` after its frame has been consumed.
#[macro_export]
macro_rules! ev1527_rearm {
    () => {
        $crate::irq::global_decoder_rearm(&EV1527_DECODER)
    };
}
