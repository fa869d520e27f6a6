/// Reusable buffers for transient-distribution stepping.
///
/// Reuse across multiple calls to the `*_with_scratch` variants to avoid
/// repeated heap allocation when evaluating a distribution at many time
/// points over the same chain.
///
/// # Example
///
/// ```
/// use perron_chain::TransientScratch;
///
/// let mut scratch = TransientScratch::new(1000);
/// // Use with transient_distribution_with_scratch() in a loop...
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransientScratch {
    /// Current iterate.
    pub(crate) cur: Vec<f64>,
    /// Next iterate.
    pub(crate) nxt: Vec<f64>,
    /// Weighted accumulator.
    pub(crate) acc: Vec<f64>,
}

impl TransientScratch {
    /// Creates scratch buffers with capacity for `num_states` states.
    pub fn new(num_states: usize) -> Self {
        Self {
            cur: Vec::with_capacity(num_states),
            nxt: Vec::with_capacity(num_states),
            acc: Vec::with_capacity(num_states),
        }
    }

    /// Resizes all buffers to `n` entries, zero-filled.
    pub(crate) fn reset(&mut self, n: usize) {
        for buf in [&mut self.cur, &mut self.nxt, &mut self.acc] {
            buf.clear();
            buf.resize(n, 0.0);
        }
    }
}
