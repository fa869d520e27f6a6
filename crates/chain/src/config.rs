use std::fmt;

use perron_classify::ReachScratch;

use crate::error::ChainError;

/// Whether transitions fire at unit steps or at exponentially distributed
/// holding times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeDomain {
    /// Discrete-time chain: weights are normalised to one-step probabilities.
    Discrete,
    /// Continuous-time chain: weights are transition rates.
    Continuous,
}

impl fmt::Display for TimeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeDomain::Discrete => write!(f, "discrete-time"),
            TimeDomain::Continuous => write!(f, "continuous-time"),
        }
    }
}

/// Configuration for assembling a [`MarkovChain`](crate::MarkovChain).
#[derive(Debug, Clone)]
pub struct ChainConfig {
    time_domain: TimeDomain,
    verify_absorbing: bool,
    reach_scratch: ReachScratch,
}

impl ChainConfig {
    /// Creates a configuration for the given time domain with the remaining
    /// options at their defaults.
    pub fn new(time_domain: TimeDomain) -> Self {
        ChainConfig {
            time_domain,
            verify_absorbing: false,
            reach_scratch: ReachScratch::Bitset,
        }
    }

    /// Cross-checks the classification after assembly by walking the
    /// transposed graph backwards from every absorbing state.
    pub fn with_verify_absorbing(mut self, verify: bool) -> Self {
        self.verify_absorbing = verify;
        self
    }

    /// Selects the mark representation used by the verification walk.
    pub fn with_reach_scratch(mut self, scratch: ReachScratch) -> Self {
        self.reach_scratch = scratch;
        self
    }

    /// Time domain of the chain under construction.
    pub fn time_domain(&self) -> TimeDomain {
        self.time_domain
    }

    /// Whether the classification cross-check runs after assembly.
    pub fn verify_absorbing(&self) -> bool {
        self.verify_absorbing
    }

    /// Mark representation for the verification walk.
    pub fn reach_scratch(&self) -> ReachScratch {
        self.reach_scratch
    }

    /// Checks the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ChainError> {
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig::new(TimeDomain::Continuous)
    }
}

/// Per-call options for transient and accumulated distributions.
#[derive(Debug, Clone)]
pub struct TransientConfig {
    precision: f64,
    early_exit: bool,
}

impl TransientConfig {
    /// Creates options with precision `1e-12` and early exit disabled.
    pub fn new() -> Self {
        TransientConfig {
            precision: 1e-12,
            early_exit: false,
        }
    }

    /// Sets the truncation error budget for uniformisation and the threshold
    /// for steady-state detection.
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Stops stepping once consecutive iterates differ by less than a tenth
    /// of the precision, folding the remaining Poisson mass into the result.
    pub fn with_early_exit(mut self, early_exit: bool) -> Self {
        self.early_exit = early_exit;
        self
    }

    /// Truncation error budget.
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Whether steady-state detection may cut the iteration short.
    pub fn early_exit(&self) -> bool {
        self.early_exit
    }

    /// Checks the options for internal consistency.
    pub fn validate(&self) -> Result<(), ChainError> {
        if !(self.precision > 0.0 && self.precision < 1.0) {
            return Err(ChainError::BadPrecision {
                value: self.precision,
            });
        }
        Ok(())
    }
}

impl Default for TransientConfig {
    fn default() -> Self {
        TransientConfig::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ChainConfig::default().validate().is_ok());
        assert!(TransientConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_precision_rejected() {
        let opts = TransientConfig::new().with_precision(0.0);
        assert!(opts.validate().is_err());
    }
}
