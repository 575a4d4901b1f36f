//! Splitting the outer dimension between workers.

use std::ops::Range;

use qy_types::ConfigError;

use crate::encoding::EncodedDomain;

/// A contiguous slice `[low, high)` of the encoded outer dimension owned by
/// one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub low: u32,
    pub high: u32,
}

impl Partition {
    pub fn range(&self) -> Range<u32> {
        self.low..self.high
    }

    pub fn len(&self) -> u64 {
        u64::from(self.high - self.low)
    }

    pub fn is_empty(&self) -> bool {
        self.high <= self.low
    }
}

/// Split the `points = ceil(len / step)` grid points of `domain` between
/// `workers` contiguous partitions.
///
/// Boundary `i` sits at `low + step * floor(points * i / workers)`, capped at
/// `high`. Every partition therefore starts on the grid `low + k * step`, so
/// a worker visits exactly the outer values a single worker would. The
/// partitions tile the domain and each is non-empty when `points >= workers`.
pub fn partition(
    domain: EncodedDomain,
    step: u32,
    workers: usize,
) -> Result<Vec<Partition>, ConfigError> {
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers);
    }
    if step == 0 {
        return Err(ConfigError::ZeroStep);
    }

    let points = u128::from(domain.points_per_dimension(step));
    let n = workers as u128;
    let boundary = |i: u128| {
        let offset = u128::from(step) * (points * i / n);
        (u128::from(domain.low) + offset).min(u128::from(domain.high)) as u32
    };

    Ok((0..n)
        .map(|i| Partition {
            index: i as usize,
            low: boundary(i),
            high: boundary(i + 1),
        })
        .collect())
}
