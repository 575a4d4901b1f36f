//! Bounded online retention of the K lowest-scoring candidates.

use qy_types::{is_live_score, Candidate, SENTINEL_SCORE};

/// Keeps the `K` lowest-scoring candidates seen so far.
///
/// All storage is allocated up front: `K` scores and `K * D` coordinate
/// values in one flat buffer. Every slot starts at [`SENTINEL_SCORE`].
///
/// Acceptance is strictly-less-than the current worst retained score. When
/// several candidates tie at the worst retained score, the first one
/// observed stays and later equal scores are dropped. Which of several
/// equal-scoring points survives therefore depends on enumeration order,
/// and with it on the worker count.
#[derive(Debug, Clone)]
pub struct TopKTracker {
    dimensions: usize,
    scores: Vec<f32>,
    coordinates: Vec<f32>,
    /// Slot holding the highest (worst) score.
    worst: usize,
}

impl TopKTracker {
    pub fn new(keep: usize, dimensions: usize) -> Self {
        assert!(keep > 0, "tracker must retain at least one candidate");
        assert!(dimensions > 0, "tracker needs at least one dimension");
        Self {
            dimensions,
            scores: vec![SENTINEL_SCORE; keep],
            coordinates: vec![0.0; keep * dimensions],
            worst: 0,
        }
    }

    /// Score a candidate must beat to be retained.
    pub fn threshold(&self) -> f32 {
        self.scores[self.worst]
    }

    /// Number of slots holding a real score.
    pub fn live_len(&self) -> usize {
        self.scores.iter().filter(|&&s| is_live_score(s)).count()
    }

    /// Offer a candidate. Returns whether it was retained.
    #[inline]
    pub fn observe(&mut self, coordinate: &[f32], score: f32) -> bool {
        debug_assert_eq!(coordinate.len(), self.dimensions);

        if self.scores.len() == 1 {
            if score < self.scores[0] {
                self.store(0, coordinate, score);
                return true;
            }
            return false;
        }

        if !(score < self.scores[self.worst]) {
            return false;
        }
        self.store(self.worst, coordinate, score);

        let mut worst = 0;
        for (i, &s) in self.scores.iter().enumerate().skip(1) {
            if s > self.scores[worst] {
                worst = i;
            }
        }
        self.worst = worst;
        true
    }

    #[inline]
    fn store(&mut self, slot: usize, coordinate: &[f32], score: f32) {
        let start = slot * self.dimensions;
        self.coordinates[start..start + self.dimensions].copy_from_slice(coordinate);
        self.scores[slot] = score;
    }

    /// Live candidates in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f32], f32)> + '_ {
        self.scores
            .iter()
            .zip(self.coordinates.chunks_exact(self.dimensions))
            .filter(|&(&s, _)| is_live_score(s))
            .map(|(&s, c)| (c, s))
    }

    /// Feed every live candidate of `other` through [`TopKTracker::observe`].
    pub fn merge(&mut self, other: &TopKTracker) {
        debug_assert_eq!(other.dimensions, self.dimensions);
        for (coordinate, score) in other.iter() {
            self.observe(coordinate, score);
        }
    }

    /// Live candidates, ascending by score. Equal scores keep slot order.
    pub fn into_sorted(self) -> Vec<Candidate> {
        let mut results: Vec<Candidate> = self
            .iter()
            .map(|(c, s)| Candidate::new(c.to_vec(), s))
            .collect();
        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results
    }
}
