//! Shared pieces of the iteration skeleton.
//!
//! **Not part of the public API.**

use std::ops::Range;

use crate::matrix::Scalar;

/// Relaxation blend of a fresh update with the previous value.
#[inline(always)]
pub(crate) fn blend(omega: f64, raw: f64, old: f64) -> f64 {
    omega * raw + (1.0 - omega) * old
}

/// Difference between successive iterates of one component.
///
/// In relative mode the difference is scaled by the new value, unless that
/// value is zero, in which case the absolute difference is used.
#[inline(always)]
pub(crate) fn diff(new: f64, old: f64, relative: bool) -> f64 {
    let d = (new - old).abs();
    if relative && new != 0.0 {
        d / new.abs()
    } else {
        d
    }
}

/// Maximum componentwise difference over a window.
///
/// When `can_abort` is set the scan stops as soon as the running maximum
/// already rules out convergence; the returned value is then merely a lower
/// bound, which is all the caller needs on a non-final iteration.
pub(crate) fn max_diff<S: Scalar>(
    new: &[S],
    old: &[S],
    range: Range<usize>,
    relative: bool,
    precision: f64,
    can_abort: bool,
) -> f64 {
    let mut max = 0.0f64;
    for i in range {
        max = max.max(diff(new[i].to_f64(), old[i].to_f64(), relative));
        if can_abort && max >= precision {
            return max;
        }
    }
    max
}

/// Scales a window to sum 1; leaves it untouched when the sum is not
/// positive.
pub(crate) fn normalize<S: Scalar>(x: &mut [S], range: Range<usize>) {
    let sum: f64 = x[range.clone()].iter().map(|v| v.to_f64()).sum();
    if sum > 0.0 {
        for v in &mut x[range] {
            *v = S::from_f64(v.to_f64() / sum);
        }
    }
}
