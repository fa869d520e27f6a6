//! Simulated trajectories.
//!
//! A walk starts in one state and follows sampled transitions until it hits
//! a target state, runs out of its step or time budget, or gets stuck in an
//! absorbing state. Discrete walks advance one unit of time per step;
//! continuous walks draw exponential holding times from each state's exit
//! rate before jumping.

use rand::Rng;
use rand_distr::{Distribution, Exp};
use tracing::trace;

use crate::chain::MarkovChain;
use crate::config::TimeDomain;
use crate::error::ChainError;

/// Budget that ends a walk which never reaches a target.
#[derive(Debug, Clone, Copy)]
pub enum WalkLimit {
    /// Maximum number of transitions of a discrete chain.
    Steps(u64),
    /// Maximum elapsed time of a continuous chain.
    Time(f64),
}

/// Where and when a walk ended.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOutcome {
    state: usize,
    steps: u64,
    elapsed: f64,
    hit: bool,
}

impl WalkOutcome {
    /// State the walk ended in, in the caller's numbering.
    pub fn state(&self) -> usize {
        self.state
    }

    /// Number of transitions taken.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Time elapsed: the step count for discrete chains, the summed holding
    /// times (clamped to the budget) for continuous ones.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// True when the walk ended on a target state.
    pub fn hit(&self) -> bool {
        self.hit
    }
}

impl MarkovChain {
    /// Simulates one trajectory from `start` until it reaches a state in
    /// `targets` or exhausts `limit`.
    ///
    /// A walk that enters an absorbing state which is not a target ends
    /// there immediately with `hit == false`, regardless of remaining
    /// budget.
    ///
    /// # Errors
    ///
    /// [`ChainError::BadIndex`] for out-of-range states and
    /// [`ChainError::WrongTimeDomain`] when the limit kind does not match
    /// the chain: step budgets walk discrete chains, time budgets
    /// continuous ones.
    pub fn random_walk<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        start: usize,
        targets: &[usize],
        limit: WalkLimit,
    ) -> Result<WalkOutcome, ChainError> {
        self.check_state(start)?;
        let mut is_target = vec![false; self.num_states()];
        for &t in targets {
            self.check_state(t)?;
            is_target[self.renumbering().to_new(t)] = true;
        }
        match limit {
            WalkLimit::Steps(max_steps) => {
                self.require_domain(TimeDomain::Discrete)?;
                self.walk_discrete(rng, start, &is_target, max_steps)
            }
            WalkLimit::Time(max_time) => {
                self.require_domain(TimeDomain::Continuous)?;
                if !(max_time.is_finite() && max_time >= 0.0) {
                    return Err(ChainError::BadTime { value: max_time });
                }
                self.walk_continuous(rng, start, &is_target, max_time)
            }
        }
    }

    fn walk_discrete<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        start: usize,
        is_target: &[bool],
        max_steps: u64,
    ) -> Result<WalkOutcome, ChainError> {
        let mut state = self.renumbering().to_new(start);
        let mut steps = 0u64;
        let hit = loop {
            if is_target[state] {
                break true;
            }
            if steps >= max_steps || self.exit_weight(state) == 0.0 {
                break false;
            }
            state = self.jump(rng, state);
            steps += 1;
        };
        trace!(start, end = self.renumbering().to_old(state), steps, hit, "walk");
        Ok(WalkOutcome {
            state: self.renumbering().to_old(state),
            steps,
            elapsed: steps as f64,
            hit,
        })
    }

    fn walk_continuous<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        start: usize,
        is_target: &[bool],
        max_time: f64,
    ) -> Result<WalkOutcome, ChainError> {
        let mut state = self.renumbering().to_new(start);
        let mut steps = 0u64;
        let mut elapsed = 0.0f64;
        let hit = loop {
            if is_target[state] {
                break true;
            }
            let exit = self.exit_weight(state);
            if exit == 0.0 {
                break false;
            }
            let hold = Exp::new(exit)
                .map_err(|_| ChainError::BadRate { state, rate: exit })?
                .sample(rng);
            if elapsed + hold > max_time {
                elapsed = max_time;
                break false;
            }
            elapsed += hold;
            state = self.jump(rng, state);
            steps += 1;
        };
        trace!(start, end = self.renumbering().to_old(state), steps, elapsed, hit, "walk");
        Ok(WalkOutcome {
            state: self.renumbering().to_old(state),
            steps,
            elapsed,
            hit,
        })
    }

    /// Samples the successor of an internal state by walking the row's
    /// cumulative weights; the residual self-loop probability of a discrete
    /// state absorbs the remainder of the unit interval.
    fn jump<R: Rng + ?Sized>(&self, rng: &mut R, state: usize) -> usize {
        let total = match self.time_domain() {
            // Off-diagonal probabilities plus the implicit self-loop.
            TimeDomain::Discrete => 1.0,
            TimeDomain::Continuous => self.exit_weight(state),
        };
        let mut u = rng.random::<f64>() * total;
        let (cols, vals) = self.rows().row(state);
        for (&j, &w) in cols.iter().zip(vals) {
            if u < w {
                return j;
            }
            u -= w;
        }
        // Residual self-loop mass (discrete), or the last edge after
        // rounding left u marginally positive.
        match self.time_domain() {
            TimeDomain::Discrete => state,
            TimeDomain::Continuous => cols.last().copied().unwrap_or(state),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;
    use crate::error::ChainError;
    use perron_graph::DynamicGraph;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn line(domain: TimeDomain) -> MarkovChain {
        let mut g = DynamicGraph::new();
        g.add_nodes(3);
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(1, 2, 1.0).unwrap();
        MarkovChain::finish(g, &ChainConfig::new(domain)).unwrap()
    }

    #[test]
    fn deterministic_line_reaches_target() {
        let chain = line(TimeDomain::Discrete);
        let mut rng = StdRng::seed_from_u64(7);
        let out = chain
            .random_walk(&mut rng, 0, &[2], WalkLimit::Steps(10))
            .unwrap();
        assert!(out.hit());
        assert_eq!(out.state(), 2);
        assert_eq!(out.steps(), 2);
        assert_eq!(out.elapsed(), 2.0);
    }

    #[test]
    fn step_budget_cuts_the_walk() {
        let chain = line(TimeDomain::Discrete);
        let mut rng = StdRng::seed_from_u64(7);
        let out = chain
            .random_walk(&mut rng, 0, &[2], WalkLimit::Steps(1))
            .unwrap();
        assert!(!out.hit());
        assert_eq!(out.state(), 1);
    }

    #[test]
    fn absorbing_state_stops_early() {
        let chain = line(TimeDomain::Continuous);
        let mut rng = StdRng::seed_from_u64(1);
        // Target unreachable once the walk falls into state 2.
        let out = chain
            .random_walk(&mut rng, 2, &[0], WalkLimit::Time(1e9))
            .unwrap();
        assert!(!out.hit());
        assert_eq!(out.state(), 2);
        assert_eq!(out.steps(), 0);
    }

    #[test]
    fn continuous_walk_tracks_time() {
        let chain = line(TimeDomain::Continuous);
        let mut rng = StdRng::seed_from_u64(42);
        let out = chain
            .random_walk(&mut rng, 0, &[2], WalkLimit::Time(1e6))
            .unwrap();
        assert!(out.hit());
        assert_eq!(out.steps(), 2);
        assert!(out.elapsed() > 0.0);
    }

    #[test]
    fn time_budget_is_a_hard_cap() {
        let chain = line(TimeDomain::Continuous);
        let mut rng = StdRng::seed_from_u64(3);
        let out = chain
            .random_walk(&mut rng, 0, &[2], WalkLimit::Time(0.0))
            .unwrap();
        assert!(!out.hit());
        assert_eq!(out.state(), 0);
        assert_eq!(out.elapsed(), 0.0);
    }

    #[test]
    fn limit_kind_must_match_domain() {
        let chain = line(TimeDomain::Discrete);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            chain.random_walk(&mut rng, 0, &[2], WalkLimit::Time(1.0)),
            Err(ChainError::WrongTimeDomain { .. })
        ));
        assert!(matches!(
            chain.random_walk(&mut rng, 9, &[2], WalkLimit::Steps(1)),
            Err(ChainError::BadIndex { .. })
        ));
    }
}
