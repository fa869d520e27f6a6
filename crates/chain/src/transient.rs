//! Time-bounded distributions.
//!
//! Discrete chains are stepped directly through the one-step matrix, with
//! the diagonal applied implicitly from each state's exit weight.
//! Continuous chains are uniformised: the distribution at time `t` is the
//! Poisson-weighted mixture of the discrete iterates of the uniformised
//! chain, with the weights supplied by [`FoxGlynn`](crate::FoxGlynn).
//! Accumulated variants integrate the distribution over `[0, t)` instead of
//! evaluating it at `t`.

use tracing::debug;

use crate::chain::MarkovChain;
use crate::config::{TimeDomain, TransientConfig};
use crate::error::ChainError;
use crate::fox_glynn::FoxGlynn;
use crate::scratch::TransientScratch;
use crate::vector::InitialVector;

impl MarkovChain {
    /// Distribution of a discrete chain after exactly `steps` steps.
    ///
    /// With [`TransientConfig::with_early_exit`] set, stepping stops once
    /// consecutive iterates agree to within the configured precision.
    pub fn transient_distribution(
        &self,
        steps: u64,
        initial: &InitialVector,
        opts: &TransientConfig,
    ) -> Result<Vec<f64>, ChainError> {
        let mut scratch = TransientScratch::new(self.num_states());
        self.transient_distribution_with_scratch(steps, initial, opts, &mut scratch)
    }

    /// [`MarkovChain::transient_distribution`] with caller-owned buffers.
    pub fn transient_distribution_with_scratch(
        &self,
        steps: u64,
        initial: &InitialVector,
        opts: &TransientConfig,
        scratch: &mut TransientScratch,
    ) -> Result<Vec<f64>, ChainError> {
        self.require_domain(TimeDomain::Discrete)?;
        opts.validate()?;
        let p0 = self.renumbering().permute(&initial.to_dense(self.num_states())?);
        scratch.reset(self.num_states());
        let TransientScratch { cur, nxt, .. } = scratch;
        cur.copy_from_slice(&p0);

        for k in 0..steps {
            self.step(1.0, cur, nxt);
            renormalize(nxt);
            let diff = max_abs_diff(cur, nxt);
            std::mem::swap(cur, nxt);
            if opts.early_exit() && diff < opts.precision() {
                debug!(steps = k + 1, of = steps, "iterate stabilised early");
                break;
            }
        }
        Ok(self.renumbering().restore(cur))
    }

    /// Distribution of a continuous chain at time `t`.
    ///
    /// With [`TransientConfig::with_early_exit`] set, stepping stops once
    /// the uniformised iterate stabilises to a tenth of the precision and
    /// the remaining Poisson mass is folded onto it.
    pub fn transient_distribution_at(
        &self,
        t: f64,
        initial: &InitialVector,
        opts: &TransientConfig,
    ) -> Result<Vec<f64>, ChainError> {
        let mut scratch = TransientScratch::new(self.num_states());
        self.transient_distribution_at_with_scratch(t, initial, opts, &mut scratch)
    }

    /// [`MarkovChain::transient_distribution_at`] with caller-owned buffers.
    pub fn transient_distribution_at_with_scratch(
        &self,
        t: f64,
        initial: &InitialVector,
        opts: &TransientConfig,
        scratch: &mut TransientScratch,
    ) -> Result<Vec<f64>, ChainError> {
        self.require_domain(TimeDomain::Continuous)?;
        opts.validate()?;
        check_time(t)?;
        let p0 = self.renumbering().permute(&initial.to_dense(self.num_states())?);
        let Some(q) = self.uniformization_rate() else {
            // Every state is absorbing; nothing moves.
            return Ok(self.renumbering().restore(&p0));
        };
        if t == 0.0 {
            return Ok(self.renumbering().restore(&p0));
        }

        let fg = FoxGlynn::compute(q * t, opts.precision())?;
        scratch.reset(self.num_states());
        let TransientScratch { cur, nxt, acc } = scratch;
        cur.copy_from_slice(&p0);

        if fg.left() == 0 {
            axpy(fg.prob(0), cur, acc);
        }
        let mut k = 0;
        while k < fg.right() {
            self.step(1.0 / q, cur, nxt);
            if opts.early_exit() && max_abs_diff(cur, nxt) < opts.precision() / 10.0 {
                // The iterate has reached its steady state; every later term
                // contributes the same vector.
                axpy(fg.tail_mass(k + 1), nxt, acc);
                debug!(steps = k + 1, of = fg.right(), "uniformised iterate stabilised");
                break;
            }
            std::mem::swap(cur, nxt);
            k += 1;
            if k >= fg.left() {
                axpy(fg.prob(k), cur, acc);
            }
        }
        Ok(self.renumbering().restore(acc))
    }

    /// Expected time a discrete chain spends in each state during its first
    /// `t` steps, a fractional final step included.
    pub fn accumulated_distribution(
        &self,
        t: f64,
        initial: &InitialVector,
        opts: &TransientConfig,
    ) -> Result<Vec<f64>, ChainError> {
        let mut scratch = TransientScratch::new(self.num_states());
        self.accumulated_distribution_with_scratch(t, initial, opts, &mut scratch)
    }

    /// [`MarkovChain::accumulated_distribution`] with caller-owned buffers.
    pub fn accumulated_distribution_with_scratch(
        &self,
        t: f64,
        initial: &InitialVector,
        opts: &TransientConfig,
        scratch: &mut TransientScratch,
    ) -> Result<Vec<f64>, ChainError> {
        self.require_domain(TimeDomain::Discrete)?;
        opts.validate()?;
        check_time(t)?;
        let p0 = self.renumbering().permute(&initial.to_dense(self.num_states())?);
        scratch.reset(self.num_states());
        let TransientScratch { cur, nxt, acc } = scratch;
        cur.copy_from_slice(&p0);

        let whole = t.floor();
        for _ in 0..whole as u64 {
            axpy(1.0, cur, acc);
            self.step(1.0, cur, nxt);
            renormalize(nxt);
            std::mem::swap(cur, nxt);
        }
        axpy(t - whole, cur, acc);
        Ok(self.renumbering().restore(acc))
    }

    /// Expected time a continuous chain spends in each state during
    /// `[0, t)`.
    pub fn accumulated_distribution_to(
        &self,
        t: f64,
        initial: &InitialVector,
        opts: &TransientConfig,
    ) -> Result<Vec<f64>, ChainError> {
        let mut scratch = TransientScratch::new(self.num_states());
        self.accumulated_distribution_to_with_scratch(t, initial, opts, &mut scratch)
    }

    /// [`MarkovChain::accumulated_distribution_to`] with caller-owned
    /// buffers.
    pub fn accumulated_distribution_to_with_scratch(
        &self,
        t: f64,
        initial: &InitialVector,
        opts: &TransientConfig,
        scratch: &mut TransientScratch,
    ) -> Result<Vec<f64>, ChainError> {
        self.require_domain(TimeDomain::Continuous)?;
        opts.validate()?;
        check_time(t)?;
        let p0 = self.renumbering().permute(&initial.to_dense(self.num_states())?);
        let Some(q) = self.uniformization_rate() else {
            // Every state is absorbing; each holds its mass for all of t.
            let acc: Vec<f64> = p0.iter().map(|&p| p * t).collect();
            return Ok(self.renumbering().restore(&acc));
        };
        if t == 0.0 {
            return Ok(vec![0.0; self.num_states()]);
        }

        // The sojourn integral of a uniformised chain is the sum over k of
        // P(Y > k) times the k-th iterate, divided by the uniformisation
        // rate, with Y Poisson of mean q*t.
        let fg = FoxGlynn::compute(q * t, opts.precision())?;
        scratch.reset(self.num_states());
        let TransientScratch { cur, nxt, acc } = scratch;
        cur.copy_from_slice(&p0);

        let mut cdf = 0.0;
        for k in 0..=fg.right() {
            cdf += fg.prob(k);
            let ccdf = (1.0 - cdf).max(0.0);
            if ccdf <= opts.precision() {
                break;
            }
            axpy(ccdf, cur, acc);
            self.step(1.0 / q, cur, nxt);
            std::mem::swap(cur, nxt);
        }
        for v in acc.iter_mut() {
            *v /= q;
        }
        Ok(self.renumbering().restore(acc))
    }

    /// One transition of the (possibly uniformised) one-step matrix:
    /// `nxt = cur * P`, the self-loop probability `1 - scale * exit`
    /// applied implicitly.
    pub(crate) fn step(&self, scale: f64, cur: &[f64], nxt: &mut [f64]) {
        nxt.fill(0.0);
        for i in 0..cur.len() {
            let p = cur[i];
            if p == 0.0 {
                continue;
            }
            nxt[i] += p * (1.0 - scale * self.exit_weight(i));
            let (cols, vals) = self.rows().row(i);
            for (&j, &w) in cols.iter().zip(vals) {
                nxt[j] += p * w * scale;
            }
        }
    }
}

fn check_time(t: f64) -> Result<(), ChainError> {
    if !(t.is_finite() && t >= 0.0) {
        return Err(ChainError::BadTime { value: t });
    }
    Ok(())
}

fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn axpy(a: f64, x: &[f64], y: &mut [f64]) {
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi += a * xi;
    }
}

fn renormalize(v: &mut [f64]) {
    let total: f64 = v.iter().sum();
    if total > 0.0 {
        for x in v.iter_mut() {
            *x /= total;
        }
    }
}
