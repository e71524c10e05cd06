//! Local conditional probability along a continuous score
//!
//! Observations are sorted by score and a binary outcome is smoothed with a
//! box window over sorted neighbours:
//!
//! 1. Stable-sort observations by score; ties keep their input order.
//! 2. For every sorted position `i` in `[w, n - w)` whose outcome is `1`,
//!    add one to `z[j]` for every `j` in `[i - w, i + w)`.
//! 3. Divide `z` by `2w`.
//! 4. Keep the positions `[w, n - w)` of the sorted scores and of `z`.
//!
//! Near both ends of the kept range fewer than `2w` window centres reach a
//! position, so even a constant outcome ramps down there. Only the sorted
//! positions in `[2w - 1, n - 2w)` are reached by all `2w` centres.

use serde::Serialize;

use crate::error::{StatsError, check_len};

/// Smoothed event probability as a function of the sorted score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalProbabilityCurve {
    /// Sorted scores, trimmed by the half window on both ends.
    pub scores: Vec<f64>,
    /// Local event rate at each score.
    pub probability: Vec<f64>,
    /// Half window the curve was computed with.
    pub half_window: usize,
}

impl LocalProbabilityCurve {
    /// Estimates the curve for scores `score` and binary outcomes `outcome`.
    ///
    /// Fails unless `half_window >= 1` and `2 * half_window < n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lagmap_stats::local_prob::LocalProbabilityCurve;
    ///
    /// let score = [1.0, 5.0, 2.0, 4.0, 3.0];
    /// let outcome = [0.0, 1.0, 0.0, 1.0, 0.0];
    /// let curve = LocalProbabilityCurve::estimate(&score, &outcome, 1).unwrap();
    /// assert_eq!(curve.scores, [2.0, 3.0, 4.0]);
    /// assert_eq!(curve.probability, [0.0, 0.5, 0.5]);
    /// ```
    #[expect(clippy::cast_precision_loss, clippy::float_cmp)]
    pub fn estimate(
        score: &[f64],
        outcome: &[f64],
        half_window: usize,
    ) -> Result<Self, StatsError> {
        let n = score.len();
        check_len("local probability outcome", n, outcome.len())?;
        let w = half_window;
        if w == 0 || w.saturating_mul(2) >= n {
            return Err(StatsError::InvalidWindow { window: w, len: n });
        }

        let mut order = (0..n).collect::<Vec<_>>();
        order.sort_by(|&a, &b| score[a].total_cmp(&score[b]));

        // Window increments as a difference array: +1 at i - w, -1 at i + w.
        let mut delta = vec![0_i64; n + 1];
        for i in w..n - w {
            if outcome[order[i]] == 1.0 {
                delta[i - w] += 1;
                delta[i + w] -= 1;
            }
        }

        let width = (2 * w) as f64;
        let mut running = 0;
        let mut probability = Vec::with_capacity(n - 2 * w);
        for (j, d) in delta.iter().enumerate().take(n - w) {
            running += d;
            if j >= w {
                probability.push(running as f64 / width);
            }
        }
        let scores = order[w..n - w].iter().map(|&i| score[i]).collect();

        Ok(Self {
            scores,
            probability,
            half_window: w,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterates over `(score, probability)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.scores
            .iter()
            .copied()
            .zip(self.probability.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    /// Direct transcription of the window rule, quadratic in the window size.
    #[expect(clippy::cast_precision_loss, clippy::float_cmp)]
    fn naive(score: &[f64], outcome: &[f64], w: usize) -> Vec<f64> {
        let n = score.len();
        let mut order = (0..n).collect::<Vec<_>>();
        order.sort_by(|&a, &b| score[a].total_cmp(&score[b]));
        let mut z = vec![0.0; n];
        for i in w..n - w {
            if outcome[order[i]] == 1.0 {
                for zj in &mut z[i - w..i + w] {
                    *zj += 1.0;
                }
            }
        }
        z[w..n - w].iter().map(|v| v / (2 * w) as f64).collect()
    }

    fn random_input(rng: &mut Pcg32, n: usize) -> (Vec<f64>, Vec<f64>) {
        let score = (0..n).map(|_| rng.random_range(-3.0..3.0)).collect();
        let outcome = (0..n)
            .map(|_| if rng.random_bool(0.3) { 1.0 } else { 0.0 })
            .collect();
        (score, outcome)
    }

    #[test]
    fn test_matches_naive_window() {
        let mut rng = Pcg32::seed_from_u64(9);
        for (n, w) in [(5, 1), (10, 2), (101, 7), (400, 50), (31, 15)] {
            let (score, outcome) = random_input(&mut rng, n);
            let curve = LocalProbabilityCurve::estimate(&score, &outcome, w).unwrap();
            assert_eq!(curve.len(), n - 2 * w);
            assert_eq!(curve.probability, naive(&score, &outcome, w));
        }
    }

    #[test]
    fn test_scores_are_sorted() {
        let mut rng = Pcg32::seed_from_u64(10);
        let (score, outcome) = random_input(&mut rng, 200);
        let curve = LocalProbabilityCurve::estimate(&score, &outcome, 10).unwrap();
        assert!(curve.scores.is_sorted());
    }

    #[test]
    fn test_constant_outcome() {
        let score = (0..60_u32).map(f64::from).rev().collect::<Vec<_>>();
        for w in [1, 3, 10] {
            let n = score.len();
            let ones = vec![1.0; n];
            let curve = LocalProbabilityCurve::estimate(&score, &ones, w).unwrap();
            // Fully covered positions, shifted into the trimmed range
            for &p in &curve.probability[w - 1..n - 3 * w] {
                assert_eq!(p, 1.0);
            }
            assert!(curve.probability.iter().all(|&p| 0.0 < p && p <= 1.0));

            let zeros = vec![0.0; n];
            let curve = LocalProbabilityCurve::estimate(&score, &zeros, w).unwrap();
            assert!(curve.probability.iter().all(|&p| p == 0.0));
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let score = [0.0, 1.0, 1.0, 1.0, 2.0];
        let first = [0.0, 1.0, 0.0, 0.0, 0.0];
        let last = [0.0, 0.0, 0.0, 1.0, 0.0];
        let a = LocalProbabilityCurve::estimate(&score, &first, 1).unwrap();
        let b = LocalProbabilityCurve::estimate(&score, &last, 1).unwrap();
        // Event at sorted position 1 covers [0, 2); at position 3 covers [2, 4)
        assert_eq!(a.probability, [0.5, 0.0, 0.0]);
        assert_eq!(b.probability, [0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_invalid_window() {
        let score = [1.0, 2.0, 3.0, 4.0];
        let outcome = [0.0; 4];
        assert_eq!(
            LocalProbabilityCurve::estimate(&score, &outcome, 0),
            Err(StatsError::InvalidWindow { window: 0, len: 4 })
        );
        assert_eq!(
            LocalProbabilityCurve::estimate(&score, &outcome, 2),
            Err(StatsError::InvalidWindow { window: 2, len: 4 })
        );
        assert!(LocalProbabilityCurve::estimate(&score, &outcome, 1).is_ok());
        assert!(LocalProbabilityCurve::estimate(&score, &outcome[..3], 1).is_err());
    }
}
