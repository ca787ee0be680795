//! Numeric precision of integrated states and stored interpolants

use std::fmt;

use nalgebra::{RealField, SVector};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::ephemerides::TabulatedHistory;
use crate::interpolators::LagrangeInterpolator;
use crate::time::{Epoch, TimeRepresentation};

/// Floating point precision of state entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// `f32`
    Single,
    /// `f64`
    Double,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Single => write!(f, "single precision"),
            Precision::Double => write!(f, "double precision"),
        }
    }
}

/// Scalar type of a flat state vector
pub trait StateScalar: RealField + Copy + AsPrimitive<f64> {
    /// Precision tag of this scalar type
    const PRECISION: Precision;

    /// Cast from `f64`, narrowing where needed
    fn cast_from_f64(value: f64) -> Self;

    /// Widen to `f64`
    fn cast_to_f64(self) -> f64 {
        self.as_()
    }

    /// Store an interpolant with this scalar type in the matching precision slot
    fn wrap_history<T: Epoch, const N: usize>(
        interpolator: LagrangeInterpolator<T, SVector<Self, N>>,
    ) -> TabulatedHistory<N>;
}

impl StateScalar for f64 {
    const PRECISION: Precision = Precision::Double;

    fn cast_from_f64(value: f64) -> Self {
        value
    }

    fn wrap_history<T: Epoch, const N: usize>(
        interpolator: LagrangeInterpolator<T, SVector<Self, N>>,
    ) -> TabulatedHistory<N> {
        T::wrap_double_history(interpolator)
    }
}

impl StateScalar for f32 {
    const PRECISION: Precision = Precision::Single;

    fn cast_from_f64(value: f64) -> Self {
        value.as_()
    }

    fn wrap_history<T: Epoch, const N: usize>(
        interpolator: LagrangeInterpolator<T, SVector<Self, N>>,
    ) -> TabulatedHistory<N> {
        T::wrap_single_history(interpolator)
    }
}

/// Precision and time representation of a state history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateRepresentation {
    /// Scalar precision of the state entries
    pub precision: Precision,
    /// Representation of the independent variable
    pub time: TimeRepresentation,
}

impl StateRepresentation {
    /// `f64` states keyed by `f64` seconds
    pub const DOUBLE_SECONDS: StateRepresentation = StateRepresentation {
        precision: Precision::Double,
        time: TimeRepresentation::Seconds,
    };

    /// Create a representation descriptor
    pub fn new(precision: Precision, time: TimeRepresentation) -> Self {
        Self { precision, time }
    }

    /// Representation of histories keyed by `T` holding `S` entries
    pub fn of<T: Epoch, S: StateScalar>() -> Self {
        Self::new(S::PRECISION, T::REPRESENTATION)
    }
}

impl fmt::Display for StateRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} states keyed by {}", self.precision, self.time)
    }
}
