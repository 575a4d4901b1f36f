//! Scoring strategies.
//!
//! A scorer maps a coordinate to an `f32` where lower is better. Points
//! outside a strategy's valid input return [`SENTINEL_SCORE`] and never rank.

use std::sync::Arc;

use qy_types::{StrategyKind, SENTINEL_SCORE};

/// Conjugate of the golden ratio, `1 / phi`.
pub const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_033_988_749_894;

/// Fractional part, `t - floor(t)`.
#[inline]
pub fn fract(t: f32) -> f32 {
    t - t.floor()
}

/// Common trait for all scoring strategies.
///
/// Implementations must be pure: workers call `score` concurrently, in any
/// order, any number of times.
pub trait ScoreFunction: Send + Sync {
    /// Score one coordinate. `input.len() == self.dimensions()`.
    fn score(&self, input: &[f32]) -> f32;

    /// Number of coordinates this strategy reads.
    fn dimensions(&self) -> usize;

    /// Human-readable strategy name.
    fn name(&self) -> &str;
}

/// Build the scorer for a built-in strategy.
pub fn scorer_for(kind: StrategyKind) -> Arc<dyn ScoreFunction> {
    match kind {
        StrategyKind::Midpoint => Arc::new(Midpoint),
        StrategyKind::Coirrational => Arc::new(Coirrational),
        StrategyKind::Product => Arc::new(ProductFraction),
    }
}

// ---- 1D ----

/// Distance of `x0` from 0.5.
#[derive(Debug, Clone, Copy, Default)]
pub struct Midpoint;

impl ScoreFunction for Midpoint {
    #[inline]
    fn score(&self, input: &[f32]) -> f32 {
        (input[0] - 0.5).abs()
    }

    fn dimensions(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "midpoint"
    }
}

// ---- 2D ----

/// Two values that are maximally irrational relative to each other and to
/// the golden ratio.
///
/// Four residuals measure how far the fractional parts of `x0/x1`, `x1/x0`,
/// `x0/g` and `x1/g` sit from `g` (the golden ratio conjugate). They are
/// combined as `sqrt(e1² + e2² + e3² + e4²)`; squaring keeps any single term
/// from dominating. Coordinates below 0.0001 are excluded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coirrational;

impl Coirrational {
    pub const MIN_COORDINATE: f32 = 0.0001;
}

impl ScoreFunction for Coirrational {
    #[inline]
    fn score(&self, input: &[f32]) -> f32 {
        let (x0, x1) = (input[0], input[1]);
        if x0 < Self::MIN_COORDINATE || x1 < Self::MIN_COORDINATE {
            return SENTINEL_SCORE;
        }

        let g = GOLDEN_RATIO_CONJUGATE;
        let e1 = (fract(x0 / x1) - g).abs();
        let e2 = (fract(x1 / x0) - g).abs();
        let e3 = (fract(x0 / g) - g).abs();
        let e4 = (fract(x1 / g) - g).abs();

        (e1 * e1 + e2 * e2 + e3 * e3 + e4 * e4).sqrt()
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "coirrational"
    }
}

// ---- 3D ----

/// Distance of `fract(x0 * x1 * x2)` from 0.618.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFraction;

impl ProductFraction {
    pub const TARGET: f32 = 0.618;
}

impl ScoreFunction for ProductFraction {
    #[inline]
    fn score(&self, input: &[f32]) -> f32 {
        (fract(input[0] * input[1] * input[2]) - Self::TARGET).abs()
    }

    fn dimensions(&self) -> usize {
        3
    }

    fn name(&self) -> &str {
        "product"
    }
}

// ---- ad-hoc ----

/// Wraps a closure as a scorer, for strategies that don't merit a type.
pub struct FnScore<F> {
    name: String,
    dimensions: usize,
    func: F,
}

impl<F> FnScore<F>
where
    F: Fn(&[f32]) -> f32 + Send + Sync,
{
    pub fn new(name: impl Into<String>, dimensions: usize, func: F) -> Self {
        Self {
            name: name.into(),
            dimensions,
            func,
        }
    }
}

impl<F> ScoreFunction for FnScore<F>
where
    F: Fn(&[f32]) -> f32 + Send + Sync,
{
    #[inline]
    fn score(&self, input: &[f32]) -> f32 {
        (self.func)(input)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnScore<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnScore")
            .field("name", &self.name)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qy_types::is_live_score;

    #[test]
    fn midpoint_is_zero_at_half() {
        assert_eq!(Midpoint.score(&[0.5]), 0.0);
        assert_eq!(Midpoint.score(&[0.25]), 0.25);
        assert_eq!(Midpoint.score(&[1.0]), 0.5);
    }

    #[test]
    fn coirrational_excludes_tiny_inputs() {
        assert_eq!(Coirrational.score(&[0.00005, 0.5]), SENTINEL_SCORE);
        assert_eq!(Coirrational.score(&[0.5, 0.0]), SENTINEL_SCORE);
        assert!(is_live_score(Coirrational.score(&[0.0001, 0.5])));
    }

    #[test]
    fn coirrational_matches_formula() {
        let (x0, x1) = (0.3f32, 0.7f32);
        let g = GOLDEN_RATIO_CONJUGATE;
        let terms = [
            fract(x0 / x1) - g,
            fract(x1 / x0) - g,
            fract(x0 / g) - g,
            fract(x1 / g) - g,
        ];
        let expected = terms.iter().map(|e| e * e).sum::<f32>().sqrt();
        let got = Coirrational.score(&[x0, x1]);
        assert!((got - expected).abs() < 1e-6, "{got} vs {expected}");
    }

    #[test]
    fn coirrational_is_symmetric() {
        let a = Coirrational.score(&[0.2, 0.9]);
        let b = Coirrational.score(&[0.9, 0.2]);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn product_fraction_targets_0618() {
        assert!((ProductFraction.score(&[1.0, 1.0, 0.618]) - 0.0).abs() < 1e-6);
        assert!((ProductFraction.score(&[0.0, 0.3, 0.9]) - 0.618).abs() < 1e-6);
    }

    #[test]
    fn fract_of_values() {
        assert_eq!(fract(2.25), 0.25);
        assert_eq!(fract(0.0), 0.0);
        assert!((fract(1.618) - 0.618).abs() < 1e-6);
    }

    #[test]
    fn scorer_for_matches_kind_dimensions() {
        for kind in StrategyKind::ALL {
            let scorer = scorer_for(kind);
            assert_eq!(scorer.dimensions(), kind.dimensions());
            assert_eq!(scorer.name(), kind.as_str());
        }
    }

    #[test]
    fn closure_scorer_delegates() {
        let scorer = FnScore::new("sum", 2, |x: &[f32]| x[0] + x[1]);
        assert_eq!(scorer.score(&[0.25, 0.5]), 0.75);
        assert_eq!(scorer.dimensions(), 2);
        assert_eq!(scorer.name(), "sum");
    }
}
