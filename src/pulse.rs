//! Pulse classification for EV1527 signal recognition.
//!
//! This module decides what one measured HIGH/LOW pulse pair means: the
//! frame preamble, a data bit, or noise. All tests are ratio-based where
//! possible so the decoder does not depend on the transmitter's exact base
//! period, only on the shape of the waveform.

use crate::consts::{
    PREAMBLE_HIGH_MAX_TICKS, PREAMBLE_HIGH_MIN_TICKS, PREAMBLE_RATIO_MAX, PREAMBLE_RATIO_MIN,
    VALID_PULSE_MAX_TICKS, VALID_PULSE_MIN_TICKS,
};

/// One measured HIGH-then-LOW pulse pair, in timer ticks.
///
/// Created fresh each measurement cycle by the edge phase tracker and
/// consumed immediately by the classifier; never persisted.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct PulseSample {
    /// Duration the line was HIGH, in ticks.
    pub high_ticks: u32,
    /// Duration the line was LOW, in ticks.
    pub low_ticks: u32,
}

impl PulseSample {
    /// Decodes this pulse as a data bit: `1` iff `high >= 1.5 * low`.
    ///
    /// Logic `1` encodes HIGH=3T/LOW=T (ratio 3) and logic `0` encodes
    /// HIGH=T/LOW=3T (ratio 1/3); the 1.5 threshold cleanly separates the
    /// two without knowing T. The comparison is exact integer arithmetic
    /// (`2*high >= 3*low`), so the tie `high == 1.5*low` resolves to `1`.
    pub const fn decode_bit(&self) -> u8 {
        if (self.high_ticks as u64) * 2 >= (self.low_ticks as u64) * 3 {
            1
        } else {
            0
        }
    }
}

/// Error returned when a [`Tolerances`] band is empty (min above max).
#[derive(thiserror::Error, PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ToleranceError {
    /// The valid-pulse duration bounds are inverted.
    #[error("valid-pulse bounds are inverted (min > max)")]
    InvertedValidRange,
    /// The preamble HIGH duration band is inverted.
    #[error("preamble HIGH band is inverted (min > max)")]
    InvertedPreambleBand,
    /// The preamble LOW/HIGH ratio band is inverted.
    #[error("preamble ratio band is inverted (min > max)")]
    InvertedRatioBand,
}

/// The two tolerance tables driving pulse classification.
///
/// Defaults come from [`crate::consts`] and assume the reference 0.5 µs tick.
/// Build a custom table with [`Tolerances::new`] to retune for a different
/// timer clock or a noisy RF environment.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Tolerances {
    valid_min: u32,
    valid_max: u32,
    preamble_high_min: u32,
    preamble_high_max: u32,
    ratio_min: u32,
    ratio_max: u32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            valid_min: VALID_PULSE_MIN_TICKS,
            valid_max: VALID_PULSE_MAX_TICKS,
            preamble_high_min: PREAMBLE_HIGH_MIN_TICKS,
            preamble_high_max: PREAMBLE_HIGH_MAX_TICKS,
            ratio_min: PREAMBLE_RATIO_MIN,
            ratio_max: PREAMBLE_RATIO_MAX,
        }
    }
}

impl Tolerances {
    /// Builds a tolerance table from explicit bands, all in ticks except the
    /// dimensionless LOW/HIGH ratio band.
    ///
    /// # Errors
    /// Returns a [`ToleranceError`] if any band has its minimum above its
    /// maximum.
    pub const fn new(
        valid_min: u32,
        valid_max: u32,
        preamble_high_min: u32,
        preamble_high_max: u32,
        ratio_min: u32,
        ratio_max: u32,
    ) -> Result<Self, ToleranceError> {
        if valid_min > valid_max {
            return Err(ToleranceError::InvertedValidRange);
        }
        if preamble_high_min > preamble_high_max {
            return Err(ToleranceError::InvertedPreambleBand);
        }
        if ratio_min > ratio_max {
            return Err(ToleranceError::InvertedRatioBand);
        }
        Ok(Self {
            valid_min,
            valid_max,
            preamble_high_min,
            preamble_high_max,
            ratio_min,
            ratio_max,
        })
    }

    /// Whether both halves of the pulse are plausible data-bit durations.
    ///
    /// This bound rejects sub-glitch noise and the preamble's long LOW, so
    /// it is only applied on the data-bit path, never to preamble detection.
    pub const fn in_valid_range(&self, sample: &PulseSample) -> bool {
        sample.high_ticks >= self.valid_min
            && sample.high_ticks <= self.valid_max
            && sample.low_ticks >= self.valid_min
            && sample.low_ticks <= self.valid_max
    }

    /// Whether the pulse matches the frame preamble.
    ///
    /// The HIGH must sit in a narrow band around the expected preamble HIGH
    /// width and the LOW must be `ratio_min..=ratio_max` times the HIGH. The
    /// ratio test is evaluated in the exact rational form
    /// `ratio_min * high <= low <= ratio_max * high`, avoiding truncation.
    pub const fn is_preamble(&self, sample: &PulseSample) -> bool {
        let high = sample.high_ticks as u64;
        let low = sample.low_ticks as u64;
        sample.high_ticks >= self.preamble_high_min
            && sample.high_ticks <= self.preamble_high_max
            && low >= (self.ratio_min as u64) * high
            && low <= (self.ratio_max as u64) * high
    }
}
