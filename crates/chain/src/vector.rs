//! Initial distributions over chain states.
//!
//! Callers hand in either a sparse list of `(state, mass)` pairs or a dense
//! prefix of the state vector; both are validated and expanded to a dense
//! vector before any analysis runs. Masses need not sum to one, they are
//! rescaled internally.

use crate::error::ChainError;

/// An initial distribution, kept in the form the caller supplied it.
#[derive(Debug, Clone)]
pub enum InitialVector {
    /// Strictly ascending `(state, mass)` pairs; absent states carry zero.
    Sparse(Vec<(usize, f64)>),
    /// Dense prefix of the state vector; the tail is implicitly zero.
    Dense(Vec<f64>),
}

impl InitialVector {
    /// All mass on a single state.
    pub fn point_mass(state: usize) -> Self {
        InitialVector::Sparse(vec![(state, 1.0)])
    }

    /// Sparse vector from `(state, mass)` pairs.
    pub fn sparse(pairs: &[(usize, f64)]) -> Self {
        InitialVector::Sparse(pairs.to_vec())
    }

    /// Sparse vector from single-precision pairs.
    pub fn sparse_f32(pairs: &[(usize, f32)]) -> Self {
        InitialVector::Sparse(pairs.iter().map(|&(i, v)| (i, f64::from(v))).collect())
    }

    /// Dense vector from a prefix of the state space.
    pub fn dense(values: &[f64]) -> Self {
        InitialVector::Dense(values.to_vec())
    }

    /// Dense vector from a single-precision prefix.
    pub fn dense_f32(values: &[f32]) -> Self {
        InitialVector::Dense(values.iter().map(|&v| f64::from(v)).collect())
    }

    /// Validates the vector and expands it to a dense distribution of length
    /// `num_states`, rescaled to total mass one.
    pub fn to_dense(&self, num_states: usize) -> Result<Vec<f64>, ChainError> {
        let mut dense = vec![0.0; num_states];
        match self {
            InitialVector::Sparse(pairs) => {
                let mut prev: Option<usize> = None;
                for (pos, &(index, value)) in pairs.iter().enumerate() {
                    if index >= num_states {
                        return Err(ChainError::BadIndex { index, num_states });
                    }
                    if prev.is_some_and(|p| p >= index) {
                        return Err(ChainError::UnsortedVector { position: pos });
                    }
                    if !(value.is_finite() && value >= 0.0) {
                        return Err(ChainError::BadMass { index, value });
                    }
                    dense[index] = value;
                    prev = Some(index);
                }
            }
            InitialVector::Dense(values) => {
                if values.len() > num_states {
                    return Err(ChainError::BadIndex {
                        index: values.len() - 1,
                        num_states,
                    });
                }
                for (index, &value) in values.iter().enumerate() {
                    if !(value.is_finite() && value >= 0.0) {
                        return Err(ChainError::BadMass { index, value });
                    }
                    dense[index] = value;
                }
            }
        }
        let total: f64 = dense.iter().sum();
        if total <= 0.0 {
            return Err(ChainError::NullVector);
        }
        for v in &mut dense {
            *v /= total;
        }
        Ok(dense)
    }
}
