//! Local Lagrange interpolation over time-ordered samples
//!
//! Each evaluation uses a stencil of `order` consecutive nodes centred on the
//! interval that brackets the requested time. Near the ends of the table the
//! stencil is shifted inward so it always holds `order` nodes (or every node,
//! when fewer samples exist). Times before the first or after the last node
//! are evaluated with the edge stencil.
//!
//! Basis weights are formed in `f64` from epoch differences, which makes the
//! interpolant reproduce every sample exactly at its own time.

use std::fmt::Debug;

use nalgebra::SVector;

use crate::errors::{IntegratedStateError, Result};
use crate::representation::StateScalar;
use crate::solution::StateHistory;
use crate::time::Epoch;

/// A value that can be combined linearly with `f64` basis weights
pub trait InterpolatedValue: Clone + Debug {
    /// Sum of `weights[i] * values[i]`
    fn weighted_sum(weights: &[f64], values: &[Self]) -> Self;
}

impl<S: StateScalar, const N: usize> InterpolatedValue for SVector<S, N> {
    fn weighted_sum(weights: &[f64], values: &[Self]) -> Self {
        let mut sum = SVector::<S, N>::zeros();
        for (weight, value) in weights.iter().zip(values) {
            sum.axpy(S::cast_from_f64(*weight), value, S::one());
        }
        sum
    }
}

macro_rules! impl_scalar_value {
    ($($scalar:ty),*) => {
        $(
            impl InterpolatedValue for $scalar {
                fn weighted_sum(weights: &[f64], values: &[Self]) -> Self {
                    weights
                        .iter()
                        .zip(values)
                        .fold(0.0, |sum, (weight, value)| sum + (*weight as $scalar) * value)
                }
            }
        )*
    };
}

impl_scalar_value!(f32, f64);

/// Piecewise Lagrange interpolant of fixed order
#[derive(Debug, Clone)]
pub struct LagrangeInterpolator<T, V> {
    times: Vec<T>,
    values: Vec<V>,
    order: usize,
}

impl<T: Epoch, V: InterpolatedValue> LagrangeInterpolator<T, V> {
    /// Build an interpolant from strictly increasing samples
    pub fn new(samples: StateHistory<T, V>, order: usize) -> Result<Self> {
        if samples.is_empty() {
            return Err(IntegratedStateError::InterpolationError(
                "cannot interpolate an empty state history".to_string(),
            ));
        }
        if order < 2 {
            return Err(IntegratedStateError::InterpolationError(format!(
                "interpolation order must be at least 2, got {}",
                order
            )));
        }

        let (times, values): (Vec<T>, Vec<V>) = samples.into_iter().unzip();

        for (index, pair) in times.windows(2).enumerate() {
            if pair[1].partial_cmp(&pair[0]) != Some(std::cmp::Ordering::Greater) {
                return Err(IntegratedStateError::InterpolationError(format!(
                    "sample times must strictly increase, but sample {} at {:?} follows {:?}",
                    index + 1,
                    pair[1],
                    pair[0]
                )));
            }
        }

        Ok(Self {
            times,
            values,
            order,
        })
    }

    /// Node times
    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// Node values
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Iterate over (time, value) nodes
    pub fn samples(&self) -> impl Iterator<Item = (T, &V)> {
        self.times.iter().copied().zip(self.values.iter())
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; empty tables are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Interpolation order
    pub fn order(&self) -> usize {
        self.order
    }

    /// Time of the first node
    pub fn first_time(&self) -> T {
        self.times[0]
    }

    /// Time of the last node
    pub fn last_time(&self) -> T {
        self.times[self.times.len() - 1]
    }

    /// First index and size of the stencil used at `time`
    fn stencil(&self, time: T) -> (usize, usize) {
        let n = self.times.len();
        let count = self.order.min(n);

        // Left node of the bracketing interval, kept inside [0, n - 2]
        let upper = self.times.partition_point(|node| *node <= time);
        let lower = upper.saturating_sub(1).min(n.saturating_sub(2));

        let start = (lower + 1).saturating_sub(count / 2).min(n - count);
        (start, count)
    }

    /// Evaluate the interpolant
    pub fn interpolate(&self, time: T) -> V {
        if self.times.len() == 1 {
            return self.values[0].clone();
        }

        let (start, count) = self.stencil(time);
        let nodes = &self.times[start..start + count];

        let offsets: Vec<f64> = nodes.iter().map(|node| time.seconds_since(*node)).collect();
        let weights: Vec<f64> = (0..count)
            .map(|j| {
                (0..count)
                    .filter(|&k| k != j)
                    .fold(1.0, |weight, k| {
                        weight * offsets[k] / nodes[j].seconds_since(nodes[k])
                    })
            })
            .collect();

        V::weighted_sum(&weights, &self.values[start..start + count])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::SplitEpoch;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use rstest::rstest;

    fn cubic(t: f64) -> f64 {
        0.5 * t * t * t - 2.0 * t * t + t - 7.0
    }

    #[test]
    fn test_rejects_empty_history() {
        let result = LagrangeInterpolator::<f64, f64>::new(Vec::new(), 6);
        assert!(matches!(
            result,
            Err(IntegratedStateError::InterpolationError(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_times() {
        let samples = vec![(0.0, 1.0), (1.0, 2.0), (1.0, 3.0)];
        assert!(LagrangeInterpolator::new(samples, 6).is_err());
    }

    #[test]
    fn test_exact_at_nodes() {
        let samples: Vec<(f64, f64)> = (0..20)
            .map(|i| {
                let t = i as f64 * 37.5 + (i * i) as f64 * 0.1;
                (t, (t * 0.013).sin() * 1.0e7 + 3.0)
            })
            .collect();
        let interpolator = LagrangeInterpolator::new(samples.clone(), 6).unwrap();
        for (t, value) in samples {
            assert_eq!(interpolator.interpolate(t), value);
        }
    }

    #[test]
    fn test_reproduces_polynomials_between_nodes() {
        // Degree 3 is represented exactly by any stencil of four or more nodes
        let samples: Vec<(f64, f64)> = (0..12).map(|i| (i as f64, cubic(i as f64))).collect();
        let interpolator = LagrangeInterpolator::new(samples, 6).unwrap();

        for &t in &[0.25, 2.5, 5.75, 10.5, 10.9] {
            assert_relative_eq!(interpolator.interpolate(t), cubic(t), epsilon = 1e-9);
        }
    }

    #[rstest]
    #[case(-1.0)]
    #[case(11.5)]
    #[case(15.0)]
    fn test_edge_stencil_outside_span(#[case] t: f64) {
        let samples: Vec<(f64, f64)> = (0..12).map(|i| (i as f64, cubic(i as f64))).collect();
        let interpolator = LagrangeInterpolator::new(samples, 6).unwrap();
        assert_relative_eq!(interpolator.interpolate(t), cubic(t), epsilon = 1e-6);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    fn test_short_tables(#[case] n: usize) {
        let samples: Vec<(f64, f64)> = (0..n)
            .map(|i| (i as f64 * 2.0, 3.0 * i as f64 + 1.0))
            .collect();
        let interpolator = LagrangeInterpolator::new(samples.clone(), 6).unwrap();
        for (t, value) in &samples {
            assert_eq!(interpolator.interpolate(*t), *value);
        }
        if n > 1 {
            assert_relative_eq!(interpolator.interpolate(1.0), 2.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_vector_values() {
        let samples: Vec<(f64, Vector3<f64>)> = (0..8)
            .map(|i| {
                let t = i as f64 * 10.0;
                (t, Vector3::new(t, 2.0 * t, -t * t))
            })
            .collect();
        let interpolator = LagrangeInterpolator::new(samples, 6).unwrap();
        let value = interpolator.interpolate(35.0);
        assert_relative_eq!(value, Vector3::new(35.0, 70.0, -1225.0), epsilon = 1e-8);
    }

    #[test]
    fn test_split_epoch_nodes() {
        let base = SplitEpoch::new(7.0e9, 0.0);
        let samples: Vec<(SplitEpoch, f64)> = (0..10)
            .map(|i| (base + i as f64 * 0.5, i as f64 * 0.25))
            .collect();
        let interpolator = LagrangeInterpolator::new(samples, 6).unwrap();
        assert_eq!(interpolator.first_time(), base);
        assert_relative_eq!(interpolator.interpolate(base + 1.25), 0.625, epsilon = 1e-12);
    }
}
