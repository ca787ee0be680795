//! Numerical solutions produced by the propagation layer
//!
//! A [`NumericalSolution`] maps strictly increasing times to flat state
//! vectors in the conventional representation: per-body blocks in a fixed
//! body order, each expressed relative to the body's integration origin.

use nalgebra::{DVector, SVector};

use crate::errors::{IntegratedStateError, Result};
use crate::representation::StateScalar;
use crate::time::Epoch;

/// Time-ordered samples of a single quantity
pub type StateHistory<T, V> = Vec<(T, V)>;

/// Time-ordered flat state vectors of one propagation arc
#[derive(Debug, Clone)]
pub struct NumericalSolution<T, S: StateScalar> {
    samples: Vec<(T, DVector<S>)>,
}

impl<T: Epoch, S: StateScalar> NumericalSolution<T, S> {
    /// Create a solution, checking that times strictly increase and that all
    /// vectors share one length
    pub fn new(samples: Vec<(T, DVector<S>)>) -> Result<Self> {
        let state_size = match samples.first() {
            Some((_, state)) => state.len(),
            None => {
                return Err(IntegratedStateError::InvalidNumericalSolution(
                    "solution contains no samples".to_string(),
                ))
            }
        };

        for (index, window) in samples.windows(2).enumerate() {
            if window[1].0.partial_cmp(&window[0].0) != Some(std::cmp::Ordering::Greater) {
                return Err(IntegratedStateError::InvalidNumericalSolution(format!(
                    "time at sample {} ({:?}) does not follow {:?}",
                    index + 1,
                    window[1].0,
                    window[0].0
                )));
            }
        }

        if let Some((index, (_, state))) = samples
            .iter()
            .enumerate()
            .find(|(_, (_, state))| state.len() != state_size)
        {
            return Err(IntegratedStateError::InvalidNumericalSolution(format!(
                "sample {} has {} entries, expected {}",
                index,
                state.len(),
                state_size
            )));
        }

        Ok(Self { samples })
    }

    /// Length of every flat state vector
    pub fn state_size(&self) -> usize {
        self.samples[0].1.len()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; empty solutions are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over (time, flat state) pairs
    pub fn iter(&self) -> impl Iterator<Item = &(T, DVector<S>)> {
        self.samples.iter()
    }

    /// Sample times in order
    pub fn times(&self) -> Vec<T> {
        self.samples.iter().map(|(time, _)| *time).collect()
    }

    /// First sample time
    pub fn first_time(&self) -> T {
        self.samples[0].0
    }

    /// Last sample time
    pub fn last_time(&self) -> T {
        self.samples[self.samples.len() - 1].0
    }

    /// Extract the `N` entries starting at `start` from every sample
    pub fn extract_block<const N: usize>(
        &self,
        start: usize,
    ) -> Result<StateHistory<T, SVector<S, N>>> {
        self.check_range(start, N)?;
        Ok(self
            .samples
            .iter()
            .map(|(time, state)| (*time, state.fixed_rows::<N>(start).into_owned()))
            .collect())
    }

    /// Extract the entry at `index` from every sample
    pub fn extract_scalar(&self, index: usize) -> Result<StateHistory<T, S>> {
        self.check_range(index, 1)?;
        Ok(self
            .samples
            .iter()
            .map(|(time, state)| (*time, state[index]))
            .collect())
    }

    fn check_range(&self, start: usize, size: usize) -> Result<()> {
        if start + size > self.state_size() {
            return Err(IntegratedStateError::LayoutInconsistency(format!(
                "entries {}..{} requested from states of size {}",
                start,
                start + size,
                self.state_size()
            )));
        }
        Ok(())
    }
}
