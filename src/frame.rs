//! Decoded EV1527 frames.
//!
//! A frame is 24 bits shifted in reception order into an accumulator: bit 0
//! is the first bit received. The first 20 bits are the transmitter address,
//! the last 4 the key (button) code. Extraction is plain shift/mask on the
//! accumulator, with no overlapping-storage tricks, so the layout is
//! independent of the platform's bit and byte ordering.

use crate::consts::{ADDRESS_BITS, ADDRESS_MASK, KEY_MASK};

/// One completed 24-bit frame: a 20-bit transmitter address and 4-bit key.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct DecodedFrame {
    address: u32,
    key: u8,
}

impl DecodedFrame {
    /// Splits a raw 24-bit accumulator into address and key fields.
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            address: raw & ADDRESS_MASK,
            key: ((raw >> ADDRESS_BITS) & KEY_MASK) as u8,
        }
    }

    /// The 20-bit transmitter address (`0..=1_048_575`).
    pub const fn address(&self) -> u32 {
        self.address
    }

    /// The 4-bit key code (`0..=15`), one bit per button on most remotes.
    pub const fn key(&self) -> u8 {
        self.key
    }

    /// Recombines the fields into the raw 24-bit frame value.
    pub const fn raw(&self) -> u32 {
        ((self.key as u32) << ADDRESS_BITS) | self.address
    }
}
