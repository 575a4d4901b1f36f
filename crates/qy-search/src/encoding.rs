//! Bit-ordered coordinates.
//!
//! For finite, non-negative `f32` values the IEEE-754 bit pattern, read as a
//! `u32`, is strictly increasing in the float value. Stepping through that
//! integer is much cheaper than computing float successors and lets a
//! dimension skip ahead by any multiple, which is what partitioning and
//! sparse sampling (`step > 1`) need.
//!
//! The conversions below are only meaningful on `[0.0, 1.0]`. Negative
//! values (including `-0.0`), NaN and infinities are outside the domain.

use qy_types::{ConfigError, SearchConfig};
use std::ops::Range;

/// Encode a float in `[0.0, 1.0]` as its order-preserving integer.
#[inline]
pub fn encode(value: f32) -> u32 {
    debug_assert!(
        (0.0..=1.0).contains(&value) && value.is_sign_positive(),
        "{value} is outside the bit-ordered domain"
    );
    value.to_bits()
}

/// Inverse of [`encode`].
#[inline]
pub fn decode(encoded: u32) -> f32 {
    f32::from_bits(encoded)
}

/// Add `steps` to `encoded`, wrapping into `range`.
///
/// Returns `false` when the unwrapped sum reached `range.end`, i.e. this
/// dimension overflowed and the caller must carry into the next one. The
/// wrapped value keeps the remainder: `low + (sum - low) % (high - low)`.
///
/// `range` must be non-empty; an empty range panics on the first wrap.
#[inline]
pub fn advance_in(encoded: &mut u32, steps: u32, range: &Range<u32>) -> bool {
    debug_assert!(range.start < range.end, "empty range {range:?}");
    let sum = u64::from(*encoded) + u64::from(steps);
    let end = u64::from(range.end);
    if sum < end {
        *encoded = sum as u32;
        return true;
    }
    let low = u64::from(range.start);
    let span = end - low;
    *encoded = (low + (sum - low) % span) as u32;
    false
}

/// Float form of [`advance_in`] over `[0, bound)`.
#[inline]
pub fn advance(value: &mut f32, steps: u32, bound: f32) -> bool {
    let mut encoded = encode(*value);
    let stayed = advance_in(&mut encoded, steps, &(0..encode(bound)));
    *value = decode(encoded);
    stayed
}

/// The encoded `[low, high)` range every dimension of a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedDomain {
    pub low: u32,
    pub high: u32,
}

impl EncodedDomain {
    /// The classic domain `[0.0, 1.0)`.
    pub fn unit() -> Self {
        Self {
            low: encode(0.0),
            high: encode(1.0),
        }
    }

    pub fn from_bounds(min: f32, max: f32) -> Result<Self, ConfigError> {
        let valid = min.is_finite()
            && max.is_finite()
            && min.is_sign_positive()
            && min < max
            && max <= 1.0;
        if !valid {
            return Err(ConfigError::InvalidDomain { min, max });
        }
        Ok(Self {
            low: encode(min),
            high: encode(max),
        })
    }

    pub fn for_config(config: &SearchConfig) -> Result<Self, ConfigError> {
        Self::from_bounds(config.domain_min, config.domain_max)
    }

    /// Number of distinct encoded values in the domain.
    pub fn len(&self) -> u64 {
        u64::from(self.high - self.low)
    }

    pub fn is_empty(&self) -> bool {
        self.high <= self.low
    }

    pub fn range(&self) -> Range<u32> {
        self.low..self.high
    }

    /// Points visited along one dimension with the given step: `ceil(len / step)`.
    pub fn points_per_dimension(&self, step: u32) -> u64 {
        self.len().div_ceil(u64::from(step))
    }
}
