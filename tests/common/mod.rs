//! Shared fixtures for the integration tests
#![allow(dead_code)]

use nalgebra::{DVector, Vector6};

use integrated_states::ephemerides::{Ephemeris, TabulatedCartesianEphemeris};
use integrated_states::{NumericalSolution, StateHistory};

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Tabulated ephemeris with zero states, to be replaced by processing
pub fn placeholder_ephemeris(origin: &str) -> Ephemeris {
    let states: StateHistory<f64, Vector6<f64>> =
        vec![(-1.0e3, Vector6::zeros()), (1.0e3, Vector6::zeros())];
    match TabulatedCartesianEphemeris::from_states(states, origin, "ECLIPJ2000") {
        Ok(ephemeris) => Ephemeris::Tabulated(ephemeris),
        Err(err) => panic!("failed to build placeholder ephemeris: {err}"),
    }
}

/// Solution sampled at `times` with flat states produced by `state`
pub fn solution_from<F>(
    times: impl IntoIterator<Item = f64>,
    state: F,
) -> NumericalSolution<f64, f64>
where
    F: Fn(f64) -> Vec<f64>,
{
    let samples = times
        .into_iter()
        .map(|t| (t, DVector::from_vec(state(t))))
        .collect();
    NumericalSolution::new(samples).expect("valid solution")
}

/// Ten samples, ten seconds apart, starting at `start`
pub fn sample_times(start: f64) -> impl Iterator<Item = f64> {
    (0..10).map(move |i| start + i as f64 * 10.0)
}
