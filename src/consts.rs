//! Constants used across the EV1527 decoder.
//!
//! All pulse durations are expressed in timer ticks. The reference timing
//! assumes a tick period of 0.5 µs (a 16 MHz timer behind a /8 prescaler);
//! for other clock configurations, scale these values with the helpers in
//! [`crate::irq`] and build a custom [`Tolerances`](crate::pulse::Tolerances).
//!
//! ## Key Concepts
//!
//! - **Valid-pulse bounds**: data bits are rejected outside `[450, 8500]`
//!   ticks, which filters both sub-glitch noise and the preamble's long LOW.
//! - **Preamble ratio band**: a preamble LOW is 25-40 times its HIGH. The
//!   ratio test tolerates transmitter clock variance far better than
//!   absolute-duration tests.
//! - **Frame geometry**: 24 bits per frame, received address-first.

/// Number of timer ticks per microsecond at the reference configuration
/// (16 MHz / 8 prescaler = 2 MHz = 0.5 µs per tick).
pub const TICKS_PER_MICROSECOND: u32 = 2;

/// Minimum duration (in ticks) of either half of a valid data pulse.
///
/// Anything shorter is an electrical glitch, not a protocol symbol.
pub const VALID_PULSE_MIN_TICKS: u32 = 450;

/// Maximum duration (in ticks) of either half of a valid data pulse.
///
/// The preamble LOW (~20000 ticks) sits far above this bound, which is why
/// the bound is only applied on the data-bit path.
pub const VALID_PULSE_MAX_TICKS: u32 = 8500;

/// Expected duration (in ticks) of the preamble HIGH pulse (~320 µs).
pub const PREAMBLE_HIGH_TICKS: u32 = 640;

/// Lower edge of the accepted preamble HIGH band (-25% of the reference).
pub const PREAMBLE_HIGH_MIN_TICKS: u32 = PREAMBLE_HIGH_TICKS * 3 / 4;

/// Upper edge of the accepted preamble HIGH band (+25% of the reference).
pub const PREAMBLE_HIGH_MAX_TICKS: u32 = PREAMBLE_HIGH_TICKS * 5 / 4;

/// Minimum LOW/HIGH duration ratio of a preamble pulse.
pub const PREAMBLE_RATIO_MIN: u32 = 25;

/// Maximum LOW/HIGH duration ratio of a preamble pulse.
pub const PREAMBLE_RATIO_MAX: u32 = 40;

/// Total number of data bits in one frame.
pub const FRAME_BITS: u8 = 24;

/// Number of address bits, received first (accumulator bits `0..=19`).
pub const ADDRESS_BITS: u32 = 20;

/// Number of key (button) bits, received last (accumulator bits `20..=23`).
pub const KEY_BITS: u32 = 4;

/// Mask selecting the address bits out of a raw 24-bit frame value.
pub const ADDRESS_MASK: u32 = (1 << ADDRESS_BITS) - 1;

/// Mask selecting the key bits after shifting out the address.
pub const KEY_MASK: u32 = (1 << KEY_BITS) - 1;
