//! Expected time spent in transient states before absorption.

use perron_solver::SolverConfig;

use crate::chain::MarkovChain;
use crate::error::ChainError;
use crate::report::SolveReport;
use crate::vector::InitialVector;

impl MarkovChain {
    /// Computes, per state, the expected time the chain spends in that state
    /// before leaving the transient block for good.
    ///
    /// Recurrent and absorbing states get zero. For a discrete chain, the
    /// entry is the expected number of visits; for a continuous chain, the
    /// expected sojourn time. Summing the vector gives the expected time to
    /// absorption from the given initial distribution.
    pub fn time_to_absorption(
        &self,
        initial: &InitialVector,
        cfg: &SolverConfig,
    ) -> Result<(Vec<f64>, SolveReport), ChainError> {
        let n = self.num_states();
        let p0 = self.renumbering().permute(&initial.to_dense(n)?);
        let transient = self.classification().transient_range();
        if transient.is_empty() {
            return Ok((vec![0.0; n], SolveReport::trivial()));
        }

        let mut b = vec![0.0; n];
        b[transient.clone()].copy_from_slice(&p0[transient.clone()]);
        let mut x = vec![0.0; n];
        let out = self.solve_system_window(transient.clone(), &b, &mut x, cfg)?;

        // The solve yields the negated visit counts / sojourn times.
        let mut times = vec![0.0; n];
        for i in transient {
            times[i] = -x[i];
        }
        Ok((self.renumbering().restore(&times), out.into()))
    }

    /// Expected total time to absorption from the given initial
    /// distribution; the sum of [`MarkovChain::time_to_absorption`].
    pub fn expected_time_to_absorption(
        &self,
        initial: &InitialVector,
        cfg: &SolverConfig,
    ) -> Result<(f64, SolveReport), ChainError> {
        let (times, report) = self.time_to_absorption(initial, cfg)?;
        Ok((times.iter().sum(), report))
    }
}
