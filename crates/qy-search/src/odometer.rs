//! Multi-dimensional enumeration over bit-ordered coordinates.

use std::ops::Range;

use crate::encoding::{advance_in, decode};

/// A multi-digit counter over encoded coordinates.
///
/// Dimension 0 is the outer (slowest) digit and covers the worker's
/// partition; the remaining dimensions cover the whole domain. Each call to
/// [`Odometer::advance`] steps the innermost dimension and carries overflow
/// outward, exactly like incrementing a number.
///
/// An inner dimension that overflows restarts at `inner.start`, so every
/// inner cycle visits the same `ceil(len / step)` values no matter how many
/// cycles came before it or where the outer range begins.
#[derive(Debug, Clone)]
pub struct Odometer {
    step: u32,
    outer: Range<u32>,
    inner: Range<u32>,
    encoded: Vec<u32>,
    values: Vec<f32>,
}

impl Odometer {
    /// Start at `(outer.start, inner.start, ..., inner.start)`.
    ///
    /// Panics on zero dimensions, a zero step or an empty range.
    pub fn new(dimensions: usize, step: u32, outer: Range<u32>, inner: Range<u32>) -> Self {
        assert!(dimensions > 0, "odometer needs at least one dimension");
        assert!(step > 0, "odometer step must be positive");
        assert!(outer.start < outer.end, "empty outer range {outer:?}");
        assert!(inner.start < inner.end, "empty inner range {inner:?}");

        let mut encoded = vec![inner.start; dimensions];
        encoded[0] = outer.start;
        let values = encoded.iter().map(|&u| decode(u)).collect();

        Self {
            step,
            outer,
            inner,
            encoded,
            values,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.encoded.len()
    }

    /// The point the odometer currently sits on.
    #[inline]
    pub fn current(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn current_encoded(&self) -> &[u32] {
        &self.encoded
    }

    /// Move to the next point. Returns `false` once the outer dimension
    /// overflows; the odometer is exhausted from then on.
    #[inline]
    pub fn advance(&mut self) -> bool {
        for dim in (1..self.encoded.len()).rev() {
            if advance_in(&mut self.encoded[dim], self.step, &self.inner) {
                self.values[dim] = decode(self.encoded[dim]);
                return true;
            }
            self.encoded[dim] = self.inner.start;
            self.values[dim] = decode(self.inner.start);
        }
        let stayed = advance_in(&mut self.encoded[0], self.step, &self.outer);
        self.values[0] = decode(self.encoded[0]);
        stayed
    }

    /// Fraction of the outer range already passed, in `[0, 1)`.
    pub fn outer_progress(&self) -> f64 {
        let span = f64::from(self.outer.end - self.outer.start);
        f64::from(self.encoded[0] - self.outer.start) / span
    }

    /// Visit every remaining point, the current one included. The visitor
    /// sees the odometer parked on each point. Returns the number of points
    /// visited.
    pub fn for_each_point(mut self, mut visit: impl FnMut(&Odometer)) -> u64 {
        let mut visited = 0u64;
        loop {
            visit(&self);
            visited += 1;
            if !self.advance() {
                return visited;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{encode, EncodedDomain};

    #[test]
    fn single_dimension_visits_ceil_range_over_step() {
        let unit = EncodedDomain::unit();
        let step = 1 << 20;
        let odometer = Odometer::new(1, step, unit.range(), unit.range());

        let mut last = 0u32;
        let visited = odometer.for_each_point(|o| last = o.current_encoded()[0]);

        assert_eq!(visited, unit.points_per_dimension(step));
        assert_eq!(visited, u64::from(encode(1.0)).div_ceil(u64::from(step)));
        assert!(u64::from(last) + u64::from(step) >= u64::from(encode(1.0)));
        assert!(last < encode(1.0));
    }

    #[test]
    fn enumerates_lexicographically_innermost_fastest() {
        let mut seen = Vec::new();
        Odometer::new(2, 1, 0..2, 0..3).for_each_point(|o| {
            seen.push((o.current()[0].to_bits(), o.current()[1].to_bits()));
        });
        assert_eq!(seen, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn outer_range_limits_only_dimension_zero() {
        let mut seen = Vec::new();
        let visited = Odometer::new(2, 1, 5..7, 0..2).for_each_point(|o| {
            seen.push((o.current()[0].to_bits(), o.current()[1].to_bits()));
        });
        assert_eq!(visited, 4);
        assert_eq!(seen, vec![(5, 0), (5, 1), (6, 0), (6, 1)]);
    }

    #[test]
    fn inner_dimension_restarts_at_low_on_carry() {
        let mut points = Vec::new();
        let visited = Odometer::new(2, 3, 0..4, 0..10)
            .for_each_point(|o| points.push((o.current_encoded()[0], o.current_encoded()[1])));
        assert_eq!(visited, 2 * 4);
        assert_eq!(
            points,
            vec![(0, 0), (0, 3), (0, 6), (0, 9), (3, 0), (3, 3), (3, 6), (3, 9)]
        );
    }

    #[test]
    fn inner_values_do_not_depend_on_outer_start() {
        let inner_of = |outer: Range<u32>| {
            let mut seen = Vec::new();
            Odometer::new(3, 4, outer, 10..21).for_each_point(|o| {
                let e = o.current_encoded();
                if e[0] == 12 {
                    seen.push((e[1], e[2]));
                }
            });
            seen
        };
        let whole = inner_of(0..20);
        assert_eq!(whole.len(), 3 * 3);
        assert_eq!(inner_of(8..20), whole);
        assert_eq!(inner_of(12..16), whole);
    }

    #[test]
    #[should_panic(expected = "empty inner range")]
    fn empty_inner_range_is_rejected() {
        Odometer::new(2, 1, 0..4, 7..7);
    }

    #[test]
    #[should_panic(expected = "empty outer range")]
    fn empty_outer_range_is_rejected() {
        Odometer::new(1, 1, 3..3, 0..4);
    }

    #[test]
    fn three_dimensions_cover_the_full_cube() {
        let visited = Odometer::new(3, 1, 0..4, 0..4).for_each_point(|_| {});
        assert_eq!(visited, 64);
    }

    #[test]
    fn outer_progress_moves_monotonically() {
        let mut odometer = Odometer::new(1, 25, 100..200, 0..1000);
        assert_eq!(odometer.outer_progress(), 0.0);
        let mut previous = 0.0;
        while odometer.advance() {
            let now = odometer.outer_progress();
            assert!(now > previous && now < 1.0);
            previous = now;
        }
    }
}
