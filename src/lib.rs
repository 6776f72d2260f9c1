//! # ev1527
//!
//! A portable, no_std Rust decoder for EV1527-style 433 MHz RF remote controls,
//! the fixed-code protocol spoken by cheap keyfob transmitters and PT2262/EV1527
//! receiver pairs.
//!
//! This decoder works entirely from edge timing:
//! - an `on_edge()` entry point intended to run inside a GPIO interrupt handler
//! - ratio-based preamble and bit classification tolerant of transmitter drift
//! - interrupt-safe access to the decoded frame with `critical-section`
//! - an optional polled capture loop built on `embedded-hal` pin/delay traits
//!
//! ## Crate features
//! | Feature              | Description |
//! |----------------------|-------------|
//! | `std`                | Disables `#![no_std]` support |
//! | `poll-loop`          | Software edge capture via `embedded_hal::digital::InputPin` and `DelayNs` |
//! | `gpio-isr` (default) | `critical_section`-guarded decoder singleton for ISR use |
//! | `defmt-0-3`          | Uses `defmt` logging |
//! | `log`                | Uses `log` logging |
//!
//! ## Protocol
//!
//! An EV1527 frame is a preamble followed by 24 data bits (20-bit address,
//! 4-bit key). The preamble is a short HIGH then a LOW 25-40 times as long;
//! data bits encode `1` as HIGH=3T/LOW=T and `0` as HIGH=T/LOW=3T. All
//! classification is done on duration ratios, so the decoder does not need to
//! know the transmitter's exact base period T.
//!
//! ## Usage
//!
//! Wire a GPIO edge interrupt and a free-running timer to the decoder, then
//! call [`on_edge()`](decoder::Ev1527Decoder::on_edge) from the pin-change ISR:
//!
//! ```rust,ignore
//! use ev1527::decoder::Ev1527Decoder;
//! use ev1527::pulse::Tolerances;
//!
//! let mut decoder = Ev1527Decoder::new(ticks, edge, Tolerances::default());
//! decoder.rearm();
//! // in the ISR: decoder.on_edge();
//! // in the foreground:
//! if let Some(frame) = decoder.take_frame() {
//!     handle(frame.address(), frame.key());
//!     decoder.rearm();
//! }
//! ```
//!
//! Or, without input-capture hardware, use the polled loop (`poll-loop`):
//!
//! ```rust,ignore
//! let frame = ev1527::irq::run_edge_poll_loop(&mut decoder, &mut rx, &mut delay, 10);
//! ```
//!
//! ## Integration Notes
//!
//! - Pulse durations are measured in timer ticks; the defaults in
//!   [`consts`] assume 0.5 µs per tick (16 MHz timer behind a /8 prescaler).
//!   Retune [`pulse::Tolerances`] with the helpers in [`irq`] for other clocks.
//! - The decoder disables itself after a completed frame so the trailing sync
//!   pulse and button-hold retransmissions cannot re-trigger it; re-enable
//!   with [`rearm()`](decoder::Ev1527Decoder::rearm) after consuming the frame.
//! - Only one decoder instance should be active at a time in interrupt-driven
//!   mode.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "gpio-isr")]
pub use critical_section;

pub mod consts;
pub mod decoder;
pub mod frame;
pub mod hw;
pub mod irq;
pub mod pulse;
