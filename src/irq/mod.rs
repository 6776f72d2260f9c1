//! Integration glue: tick-rate math, ISR singleton access, polled capture.
//!
//! The decoder core in [`crate::decoder`] is hardware-agnostic; this module
//! holds everything that binds it to a target. Two approaches are provided:
//! a `critical_section`-guarded decoder singleton for GPIO interrupt handlers
//! (`gpio-isr` feature), and a blocking poll loop that synthesizes edges from
//! an `embedded-hal` input pin for targets without an edge interrupt to spare
//! (`poll-loop` feature).
//!
//! Also contains the tick-rate calculators used to retune
//! [`Tolerances`](crate::pulse::Tolerances) for non-reference timer clocks:
//! - `tick_period_us`: runtime tick period calculator
//! - `ticks_from_us` / `const_ticks_from_us`: duration-to-ticks conversion
//!
//! Common prescalers: (16 MHz CPU clock)
//!
//! | PRESCALER | Tick period | 450-tick pulse |
//! |-----------|-------------|----------------|
//! |         8 |      0.5 µs |         225 µs |
//! |        64 |        4 µs |         1.8 ms |
//! |       256 |       16 µs |         7.2 ms |

use libm::round;

#[cfg(feature = "poll-loop")]
mod poll;
#[cfg_attr(feature = "poll-loop", allow(unused_imports))]
#[cfg(feature = "poll-loop")]
pub use poll::*;

#[cfg(feature = "gpio-isr")]
mod isr;
#[cfg_attr(feature = "gpio-isr", allow(unused_imports))]
#[cfg(feature = "gpio-isr")]
pub use isr::*;

#[cfg(feature = "gpio-isr")]
mod macros;

/// 1,000,000 picoseconds = 1 microsecond
pub const PICOSECONDS_PER_MICROSECOND: u32 = 1_000_000;
/// 10^12 picoseconds = 1 second
pub const PICOSECONDS_PER_SECOND: u64 = 1_000_000_000_000;

/// Computes the tick period of a prescaled timer, in microseconds.
///
/// # Arguments
/// - `f_cpu`: timer input clock in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
///
/// The reference tolerance tables assume 0.5 µs; at 16 MHz that is the /8
/// prescaler.
pub fn tick_period_us(f_cpu: u32, prescaler: u32) -> f32 {
    prescaler as f32 * 1_000_000.0 / f_cpu as f32
}

/// Converts a pulse duration in microseconds into timer ticks (rounds to
/// nearest integer).
///
/// # Arguments
/// - `f_cpu`: timer input clock in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
/// - `us`: duration in microseconds
pub fn ticks_from_us(f_cpu: u32, prescaler: u32, us: f32) -> u32 {
    round((us / tick_period_us(f_cpu, prescaler)) as f64) as u32
}

/// Compile-time duration-to-ticks conversion.
///
/// Works in picoseconds with integer math to preserve precision; truncates
/// toward zero.
///
/// # Arguments
/// - `f_cpu`: timer input clock in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
/// - `us`: duration in microseconds
pub const fn const_ticks_from_us(f_cpu: u32, prescaler: u32, us: f32) -> u32 {
    let tick_ps = PICOSECONDS_PER_SECOND * prescaler as u64 / f_cpu as u64;
    let duration_ps = (us as f64 * PICOSECONDS_PER_MICROSECOND as f64) as u64;
    (duration_ps / tick_ps) as u32
}
