//! Long-run distributions.
//!
//! For an irreducible chain the stationary distribution is the normalised
//! null vector of the transposed equation matrix. A reducible chain is
//! handled classwise: solve a linear system over the transient block for the
//! expected transient visits, push the resulting flux across the edges that
//! leave the block, then weight each recurrent class's own stationary
//! distribution by the probability of entering it.

use tracing::debug;

use perron_solver::SolverConfig;

use crate::chain::MarkovChain;
use crate::config::TimeDomain;
use crate::error::ChainError;
use crate::report::SolveReport;
use crate::vector::InitialVector;

impl MarkovChain {
    /// Computes the limiting distribution `lim p(t)` for the given initial
    /// distribution.
    ///
    /// For a periodic discrete chain this is the Cesaro limit (the
    /// stationary distribution), not a pointwise limit.
    pub fn infinity_distribution(
        &self,
        initial: &InitialVector,
        cfg: &SolverConfig,
    ) -> Result<(Vec<f64>, SolveReport), ChainError> {
        let n = self.num_states();
        let p0 = self.renumbering().permute(&initial.to_dense(n)?);
        let mut report = SolveReport::trivial();

        if self.classification().is_irreducible() {
            let mut x = vec![0.0; n];
            let out = self.solve_null_window(0..n, &mut x, cfg)?;
            report.absorb(&out);
            return Ok((self.renumbering().restore(&x), report));
        }

        let entry = self.entry_mass(&p0, cfg, &mut report)?;
        let mut result = vec![0.0; n];
        for j in self.classification().absorbing_range() {
            result[j] = entry[j];
        }
        for class in self.classification().recurrent_classes() {
            let range = self.classification().range_of_class(class);
            let reach: f64 = entry[range.clone()].iter().sum();
            if reach <= 0.0 {
                continue;
            }
            let mut x = vec![0.0; n];
            let out = self.solve_null_window(range.clone(), &mut x, cfg)?;
            report.absorb(&out);
            for j in range {
                result[j] = x[j] * reach;
            }
        }
        // The per-class solves leave the total a residual away from one.
        let total: f64 = result.iter().sum();
        if total > 0.0 {
            for v in &mut result {
                *v /= total;
            }
        }
        debug!(
            iterations = report.iterations(),
            converged = report.converged(),
            "limiting distribution"
        );
        Ok((self.renumbering().restore(&result), report))
    }

    /// Computes, per state, the probability that the chain is eventually
    /// found in that state's recurrent class or absorbing state.
    ///
    /// Transient states get zero; the entries of each recurrent class sum to
    /// the probability of being trapped by that class.
    pub fn trapping_probabilities(
        &self,
        initial: &InitialVector,
        cfg: &SolverConfig,
    ) -> Result<(Vec<f64>, SolveReport), ChainError> {
        let n = self.num_states();
        let p0 = self.renumbering().permute(&initial.to_dense(n)?);
        let mut report = SolveReport::trivial();
        let entry = self.entry_mass(&p0, cfg, &mut report)?;
        Ok((self.renumbering().restore(&entry), report))
    }

    /// Distributes the initial mass over the first recurrent or absorbing
    /// state entered, in internal order. Mass already outside the transient
    /// block stays where it is.
    pub(crate) fn entry_mass(
        &self,
        p0: &[f64],
        cfg: &SolverConfig,
        report: &mut SolveReport,
    ) -> Result<Vec<f64>, ChainError> {
        let n = self.num_states();
        let transient = self.classification().transient_range();
        let mut entry = vec![0.0; n];
        entry[transient.end..].copy_from_slice(&p0[transient.end..]);

        let trans_mass: f64 = p0[transient.clone()].iter().sum();
        if transient.is_empty() || trans_mass <= 0.0 {
            return Ok(entry);
        }

        let mut b = vec![0.0; n];
        b[transient.clone()].copy_from_slice(&p0[transient.clone()]);
        let mut x = vec![0.0; n];
        let out = self.solve_system_window(transient.clone(), &b, &mut x, cfg)?;
        report.absorb(&out);

        // The solve returns the negated expected visits (discrete) or
        // sojourn times (continuous); the flux over each escaping edge is
        // visits times edge weight in either domain.
        for i in transient.clone() {
            let visits = -x[i];
            if visits == 0.0 {
                continue;
            }
            let (cols, vals) = self.rows().row(i);
            for (&j, &w) in cols.iter().zip(vals) {
                if j >= transient.end {
                    entry[j] += visits * w;
                }
            }
        }
        Ok(entry)
    }
}

/// Convenience check used by tests and examples: true when the chain's
/// limiting behaviour is a single stationary distribution regardless of the
/// start, i.e. irreducible and (for discrete chains) aperiodic.
pub fn is_ergodic(chain: &MarkovChain) -> bool {
    let class = chain.classification();
    if !class.is_irreducible() {
        return false;
    }
    match chain.time_domain() {
        TimeDomain::Discrete => class.period(perron_classify::classify::FIRST_RECURRENT) == 1,
        TimeDomain::Continuous => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;
    use approx::assert_relative_eq;
    use perron_graph::DynamicGraph;

    #[test]
    fn trapping_probabilities_split_the_mass() {
        // 0 -> {1, 2} with equal rates; 1 and 2 absorbing.
        let mut g = DynamicGraph::new();
        g.add_nodes(3);
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(0, 2, 1.0).unwrap();
        let chain =
            MarkovChain::finish(g, &ChainConfig::new(TimeDomain::Continuous)).unwrap();
        let (probs, report) = chain
            .trapping_probabilities(&InitialVector::point_mass(0), &SolverConfig::new())
            .unwrap();
        assert!(report.converged());
        assert_relative_eq!(probs[0], 0.0);
        assert_relative_eq!(probs[1], 0.5, epsilon = 1e-9);
        assert_relative_eq!(probs[2], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn ergodicity_requires_aperiodicity() {
        // A plain 2-cycle has period 2.
        let mut g = DynamicGraph::new();
        g.add_nodes(2);
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(1, 0, 1.0).unwrap();
        let cycle = MarkovChain::finish(g, &ChainConfig::new(TimeDomain::Discrete)).unwrap();
        assert!(!is_ergodic(&cycle));

        // The same structure as a CTMC is ergodic.
        let mut g = DynamicGraph::new();
        g.add_nodes(2);
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(1, 0, 1.0).unwrap();
        let ctmc =
            MarkovChain::finish(g, &ChainConfig::new(TimeDomain::Continuous)).unwrap();
        assert!(is_ergodic(&ctmc));
    }
}
