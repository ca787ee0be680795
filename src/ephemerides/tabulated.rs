//! Tabulated state histories and the tabulated Cartesian ephemeris
//!
//! A [`TabulatedHistory`] stores one interpolant in whichever precision and
//! time representation it was built with. Consumers read it back as `f64`
//! regardless of the stored representation.

use log::debug;
use nalgebra::{SVector, Vector6};

use crate::constants::LAGRANGE_INTERPOLATION_ORDER;
use crate::errors::Result;
use crate::interpolators::LagrangeInterpolator;
use crate::representation::{Precision, StateRepresentation, StateScalar};
use crate::solution::StateHistory;
use crate::time::{Epoch, SplitEpoch, TimeRepresentation};

/// Interpolant of an `N`-vector tagged with its representation
#[derive(Debug, Clone)]
pub enum TabulatedHistory<const N: usize> {
    /// `f64` states keyed by `f64` seconds
    Double(LagrangeInterpolator<f64, SVector<f64, N>>),
    /// `f32` states keyed by `f64` seconds
    Single(LagrangeInterpolator<f64, SVector<f32, N>>),
    /// `f64` states keyed by split epochs
    SplitDouble(LagrangeInterpolator<SplitEpoch, SVector<f64, N>>),
    /// `f32` states keyed by split epochs
    SplitSingle(LagrangeInterpolator<SplitEpoch, SVector<f32, N>>),
}

fn widen<const N: usize>(state: &SVector<f32, N>) -> SVector<f64, N> {
    state.map(|value| value.cast_to_f64())
}

fn narrow_samples<T: Epoch, S: StateScalar, const N: usize>(
    samples: &[(SplitEpoch, SVector<f64, N>)],
) -> StateHistory<T, SVector<S, N>> {
    samples
        .iter()
        .map(|(time, state)| (T::from_split(*time), state.map(S::cast_from_f64)))
        .collect()
}

impl<const N: usize> TabulatedHistory<N> {
    /// Store an interpolant built with any supported representation
    pub fn from_interpolator<T: Epoch, S: StateScalar>(
        interpolator: LagrangeInterpolator<T, SVector<S, N>>,
    ) -> Self {
        S::wrap_history(interpolator)
    }

    /// Build and store an interpolant from samples
    pub fn from_states<T: Epoch, S: StateScalar>(
        history: StateHistory<T, SVector<S, N>>,
    ) -> Result<Self> {
        let interpolator = LagrangeInterpolator::new(history, LAGRANGE_INTERPOLATION_ORDER)?;
        Ok(Self::from_interpolator(interpolator))
    }

    /// Representation the interpolant was stored with
    pub fn representation(&self) -> StateRepresentation {
        match self {
            TabulatedHistory::Double(_) => StateRepresentation::of::<f64, f64>(),
            TabulatedHistory::Single(_) => StateRepresentation::of::<f64, f32>(),
            TabulatedHistory::SplitDouble(_) => StateRepresentation::of::<SplitEpoch, f64>(),
            TabulatedHistory::SplitSingle(_) => StateRepresentation::of::<SplitEpoch, f32>(),
        }
    }

    /// Interpolated state at `time`, widened to `f64`
    pub fn state<T: Epoch>(&self, time: T) -> SVector<f64, N> {
        match self {
            TabulatedHistory::Double(i) => i.interpolate(time.seconds_since_j2000()),
            TabulatedHistory::Single(i) => widen(&i.interpolate(time.seconds_since_j2000())),
            TabulatedHistory::SplitDouble(i) => i.interpolate(time.to_split()),
            TabulatedHistory::SplitSingle(i) => widen(&i.interpolate(time.to_split())),
        }
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        match self {
            TabulatedHistory::Double(i) => i.len(),
            TabulatedHistory::Single(i) => i.len(),
            TabulatedHistory::SplitDouble(i) => i.len(),
            TabulatedHistory::SplitSingle(i) => i.len(),
        }
    }

    /// Always false; interpolants hold at least one sample
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First and last sample time in seconds since J2000
    pub fn time_bounds(&self) -> (f64, f64) {
        match self {
            TabulatedHistory::Double(i) => (i.first_time(), i.last_time()),
            TabulatedHistory::Single(i) => (i.first_time(), i.last_time()),
            TabulatedHistory::SplitDouble(i) => {
                (i.first_time().to_seconds(), i.last_time().to_seconds())
            }
            TabulatedHistory::SplitSingle(i) => {
                (i.first_time().to_seconds(), i.last_time().to_seconds())
            }
        }
    }

    /// Stored samples, converted without loss to split epochs and `f64`
    pub fn samples(&self) -> StateHistory<SplitEpoch, SVector<f64, N>> {
        match self {
            TabulatedHistory::Double(i) => i.samples().map(|(t, v)| (t.to_split(), *v)).collect(),
            TabulatedHistory::Single(i) => {
                i.samples().map(|(t, v)| (t.to_split(), widen(v))).collect()
            }
            TabulatedHistory::SplitDouble(i) => i.samples().map(|(t, v)| (t, *v)).collect(),
            TabulatedHistory::SplitSingle(i) => i.samples().map(|(t, v)| (t, widen(v))).collect(),
        }
    }

    /// Rebuild the interpolant in another representation
    pub fn cast_to(&self, target: StateRepresentation) -> Result<Self> {
        if target == self.representation() {
            return Ok(self.clone());
        }
        debug!("Casting {} history to {}", self.representation(), target);

        let samples = self.samples();
        match (target.time, target.precision) {
            (TimeRepresentation::Seconds, Precision::Double) => {
                Self::from_states(narrow_samples::<f64, f64, N>(&samples))
            }
            (TimeRepresentation::Seconds, Precision::Single) => {
                Self::from_states(narrow_samples::<f64, f32, N>(&samples))
            }
            (TimeRepresentation::Split, Precision::Double) => {
                Self::from_states(narrow_samples::<SplitEpoch, f64, N>(&samples))
            }
            (TimeRepresentation::Split, Precision::Single) => {
                Self::from_states(narrow_samples::<SplitEpoch, f32, N>(&samples))
            }
        }
    }
}

/// Cartesian ephemeris interpolated from tabulated states
#[derive(Debug, Clone)]
pub struct TabulatedCartesianEphemeris {
    history: TabulatedHistory<6>,
    reference_frame_origin: String,
    reference_frame_orientation: String,
}

impl TabulatedCartesianEphemeris {
    /// Create an ephemeris from a stored history
    pub fn new(
        history: TabulatedHistory<6>,
        reference_frame_origin: impl Into<String>,
        reference_frame_orientation: impl Into<String>,
    ) -> Self {
        Self {
            history,
            reference_frame_origin: reference_frame_origin.into(),
            reference_frame_orientation: reference_frame_orientation.into(),
        }
    }

    /// Create an ephemeris by interpolating tabulated states
    pub fn from_states<T: Epoch, S: StateScalar>(
        history: StateHistory<T, Vector6<S>>,
        reference_frame_origin: impl Into<String>,
        reference_frame_orientation: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(
            TabulatedHistory::from_states(history)?,
            reference_frame_origin,
            reference_frame_orientation,
        ))
    }

    /// The stored interpolant
    pub fn history(&self) -> &TabulatedHistory<6> {
        &self.history
    }

    /// Representation of the stored interpolant
    pub fn representation(&self) -> StateRepresentation {
        self.history.representation()
    }

    /// Name of the frame origin the states are relative to
    pub fn reference_frame_origin(&self) -> &str {
        &self.reference_frame_origin
    }

    /// Name of the frame orientation the states are expressed in
    pub fn reference_frame_orientation(&self) -> &str {
        &self.reference_frame_orientation
    }

    /// State at `seconds` since J2000
    pub fn cartesian_state(&self, seconds: f64) -> Vector6<f64> {
        self.history.state(seconds)
    }

    /// State at an epoch of any supported time representation
    pub fn cartesian_state_at<T: Epoch>(&self, time: T) -> Vector6<f64> {
        self.history.state(time)
    }

    /// Install a new interpolant, handing back the one it replaces
    pub fn reset_interpolator(&mut self, history: TabulatedHistory<6>) -> TabulatedHistory<6> {
        std::mem::replace(&mut self.history, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_states(count: usize) -> StateHistory<f64, Vector6<f64>> {
        (0..count)
            .map(|i| {
                let t = i as f64 * 60.0;
                (t, Vector6::new(t, 2.0 * t, 3.0, 1.0, 2.0, 0.0))
            })
            .collect()
    }

    #[test]
    fn test_representation_follows_inputs() {
        let history = TabulatedHistory::<6>::from_states(linear_states(8)).unwrap();
        assert_eq!(history.representation(), StateRepresentation::DOUBLE_SECONDS);

        let single: StateHistory<SplitEpoch, Vector6<f32>> = linear_states(8)
            .into_iter()
            .map(|(t, v)| (SplitEpoch::from_seconds(t), v.map(|x| x as f32)))
            .collect();
        let history = TabulatedHistory::<6>::from_states(single).unwrap();
        assert!(matches!(history, TabulatedHistory::SplitSingle(_)));
        assert_eq!(history.time_bounds(), (0.0, 420.0));
    }

    #[test]
    fn test_cast_keeps_samples() {
        let history = TabulatedHistory::<6>::from_states(linear_states(8)).unwrap();
        let target = StateRepresentation::new(Precision::Single, TimeRepresentation::Split);
        let cast = history.cast_to(target).unwrap();

        assert_eq!(cast.representation(), target);
        assert_eq!(cast.len(), 8);
        assert_relative_eq!(cast.state(90.0), history.state(90.0), epsilon = 1e-4);
    }

    #[test]
    fn test_reset_interpolator_returns_previous() {
        let mut ephemeris =
            TabulatedCartesianEphemeris::from_states(linear_states(4), "SSB", "ECLIPJ2000")
                .unwrap();
        let replacement: StateHistory<f64, Vector6<f64>> = (0..4)
            .map(|i| (i as f64 * 60.0, Vector6::from_element(-1.0)))
            .collect();

        let previous =
            ephemeris.reset_interpolator(TabulatedHistory::from_states(replacement).unwrap());

        assert_eq!(previous.state(60.0)[0], 60.0);
        assert_eq!(ephemeris.cartesian_state(60.0), Vector6::from_element(-1.0));
        assert_eq!(ephemeris.reference_frame_origin(), "SSB");
    }
}
