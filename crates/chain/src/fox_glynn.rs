//! Poisson probabilities via the Fox-Glynn algorithm.
//!
//! Uniformisation needs the Poisson weights `e^{-lambda} lambda^k / k!` for
//! `k` in a window around the mode. Computing them directly under- and
//! overflows long before the interesting range of `lambda`; Fox-Glynn (1988)
//! instead finds a truncation window `[left, right]` whose excluded tails
//! carry at most the requested error, seeds an arbitrary weight at the mode,
//! and fills the window by the Poisson recurrence in both directions. The
//! weights are meaningful only relative to their total, which is summed
//! smallest-first to limit rounding error.

use std::f64::consts::PI;

use tracing::trace;

use crate::error::ChainError;

/// Smallest accepted truncation error; tighter requests would underflow the
/// relative weights within the window.
const MIN_EPSILON: f64 = 1e-100;

/// Seed weight planted at the mode before the recurrences run.
const MODE_WEIGHT: f64 = 1e10;

/// A truncated, unnormalised Poisson weight window.
#[derive(Debug, Clone)]
pub struct FoxGlynn {
    left: u64,
    right: u64,
    weights: Vec<f64>,
    total: f64,
    // suffix[i] = weights[i..].sum(), one longer than weights.
    suffix: Vec<f64>,
}

impl FoxGlynn {
    /// Computes the weight window for rate `lambda` with total truncated
    /// tail mass at most `epsilon` (clamped to `[1e-100, 0.5]`).
    ///
    /// # Errors
    ///
    /// [`ChainError::BadTime`] when `lambda` is negative or not finite.
    pub fn compute(lambda: f64, epsilon: f64) -> Result<Self, ChainError> {
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(ChainError::BadTime { value: lambda });
        }
        if lambda == 0.0 {
            return Ok(FoxGlynn {
                left: 0,
                right: 0,
                weights: vec![1.0],
                total: 1.0,
                suffix: vec![1.0, 0.0],
            });
        }
        let epsilon = epsilon.clamp(MIN_EPSILON, 0.5);
        let m = lambda.floor() as u64;
        let right = right_bound(lambda, epsilon, m);
        let left = left_bound(lambda, epsilon, m);

        let len = (right - left + 1) as usize;
        let mut weights = vec![0.0; len];
        let mode = (m - left) as usize;
        weights[mode] = MODE_WEIGHT;
        // Downward: w(j) = ((j + 1) / lambda) * w(j + 1).
        for idx in (0..mode).rev() {
            let j = left + idx as u64;
            weights[idx] = ((j + 1) as f64 / lambda) * weights[idx + 1];
        }
        // Upward: w(j + 1) = (lambda / (j + 1)) * w(j).
        for idx in mode..len - 1 {
            let j = left + idx as u64;
            weights[idx + 1] = (lambda / (j + 1) as f64) * weights[idx];
        }

        // Sum smallest-first: the window decays from the mode outward, so
        // advance whichever end currently holds the smaller weight.
        let (mut lo, mut hi) = (0usize, len - 1);
        let mut total = 0.0;
        while lo < hi {
            if weights[lo] <= weights[hi] {
                total += weights[lo];
                lo += 1;
            } else {
                total += weights[hi];
                hi -= 1;
            }
        }
        total += weights[lo];

        let mut suffix = vec![0.0; len + 1];
        for i in (0..len).rev() {
            suffix[i] = suffix[i + 1] + weights[i];
        }

        trace!(lambda, left, right, "fox-glynn window");
        Ok(FoxGlynn {
            left,
            right,
            weights,
            total,
            suffix,
        })
    }

    /// First retained term.
    pub fn left(&self) -> u64 {
        self.left
    }

    /// Last retained term.
    pub fn right(&self) -> u64 {
        self.right
    }

    /// Normalised Poisson probability of `k`; zero outside the window.
    pub fn prob(&self, k: u64) -> f64 {
        if k < self.left || k > self.right {
            return 0.0;
        }
        self.weights[(k - self.left) as usize] / self.total
    }

    /// Normalised mass of the window at and above `k`.
    pub fn tail_mass(&self, k: u64) -> f64 {
        if k > self.right {
            return 0.0;
        }
        let idx = k.saturating_sub(self.left) as usize;
        self.suffix[idx] / self.total
    }
}

/// Right window edge per Fox-Glynn Corollary 1, evaluated at
/// `max(lambda, 400)` so the bound holds for small rates too.
fn right_bound(lambda: f64, epsilon: f64, m: u64) -> u64 {
    let lam = lambda.max(400.0);
    let a = (1.0 + 1.0 / lam) * (1.0f64 / 16.0).exp() * std::f64::consts::SQRT_2;
    let sqrt_2lam = (2.0 * lam).sqrt();
    let mut k = 4.0f64;
    loop {
        let d = 1.0 / (1.0 - (-(2.0 / 9.0) * (k * sqrt_2lam + 1.5)).exp());
        let bound = a * d * (-k * k / 2.0).exp() / (k * (2.0 * PI).sqrt());
        if bound <= epsilon / 2.0 {
            break;
        }
        k += 1.0;
    }
    m + (k * sqrt_2lam + 1.5).ceil() as u64
}

/// Left window edge per Fox-Glynn Corollary 2; zero when `lambda < 25`,
/// where the mode is close enough to the origin to keep everything.
fn left_bound(lambda: f64, epsilon: f64, m: u64) -> u64 {
    if lambda < 25.0 {
        return 0;
    }
    let b = (1.0 + 1.0 / lambda) * (1.0 / (8.0 * lambda)).exp();
    let sqrt_lam = lambda.sqrt();
    let mut k = 1.0f64;
    loop {
        let bound = b * (-k * k / 2.0).exp() / (k * (2.0 * PI).sqrt());
        if bound <= epsilon / 2.0 {
            break;
        }
        k += 1.0;
    }
    m.saturating_sub((k * sqrt_lam + 1.5).floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::distribution::{Discrete, Poisson};

    #[test]
    fn zero_rate_is_a_point_mass() {
        let fg = FoxGlynn::compute(0.0, 1e-10).unwrap();
        assert_eq!((fg.left(), fg.right()), (0, 0));
        assert_eq!(fg.prob(0), 1.0);
        assert_eq!(fg.prob(1), 0.0);
    }

    #[test]
    fn negative_rate_rejected() {
        assert!(matches!(
            FoxGlynn::compute(-1.0, 1e-10),
            Err(ChainError::BadTime { .. })
        ));
        assert!(FoxGlynn::compute(f64::NAN, 1e-10).is_err());
    }

    #[test]
    fn small_rate_matches_exact_pmf() {
        let fg = FoxGlynn::compute(2.5, 1e-12).unwrap();
        assert_eq!(fg.left(), 0);
        let exact = Poisson::new(2.5).unwrap();
        for k in 0..=10u64 {
            assert_relative_eq!(fg.prob(k), exact.pmf(k), max_relative = 1e-9);
        }
    }

    #[test]
    fn large_rate_window_brackets_the_mass() {
        let fg = FoxGlynn::compute(1000.0, 1e-8).unwrap();
        assert!(fg.left() > 0);
        assert!(fg.right() > 1000);
        assert!(fg.left() < 1000 && 1000 < fg.right());

        let exact = Poisson::new(1000.0).unwrap();
        let covered: f64 = (fg.left()..=fg.right()).map(|k| exact.pmf(k)).sum();
        assert!(covered > 1.0 - 1e-8, "window covers {covered}");

        assert_relative_eq!(fg.prob(1000), exact.pmf(1000), max_relative = 1e-6);
    }

    #[test]
    fn window_probabilities_sum_to_one() {
        for &lambda in &[0.5, 25.0, 1000.0] {
            let fg = FoxGlynn::compute(lambda, 1e-10).unwrap();
            let sum: f64 = (fg.left()..=fg.right()).map(|k| fg.prob(k)).sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn tail_mass_counts_down() {
        let fg = FoxGlynn::compute(50.0, 1e-10).unwrap();
        assert_relative_eq!(fg.tail_mass(0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(fg.tail_mass(fg.left()), 1.0, epsilon = 1e-12);
        let mid = fg.tail_mass(50);
        assert!(mid > 0.3 && mid < 0.7);
        assert_eq!(fg.tail_mass(fg.right() + 1), 0.0);
        // Consistency with the pointwise probabilities.
        assert_relative_eq!(
            fg.tail_mass(60),
            (60..=fg.right()).map(|k| fg.prob(k)).sum::<f64>(),
            epsilon = 1e-12
        );
    }
}
