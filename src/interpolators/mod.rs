//! Interpolant builder for integrated state histories
//!
//! Turns discrete, time-ordered samples into continuous functions of time.
//! Every quantity kind uses the same fixed-order Lagrange scheme.

pub mod lagrange;

use nalgebra::{SVector, Vector6};

use crate::constants::LAGRANGE_INTERPOLATION_ORDER;
use crate::errors::Result;
use crate::representation::StateScalar;
use crate::solution::StateHistory;
use crate::time::Epoch;

pub use lagrange::{InterpolatedValue, LagrangeInterpolator};

/// Scalar-first quaternion followed by angular velocity
pub type Vector7<S> = SVector<S, 7>;

/// Interpolant of Cartesian position and velocity
pub fn create_state_interpolator<T: Epoch, S: StateScalar>(
    history: StateHistory<T, Vector6<S>>,
) -> Result<LagrangeInterpolator<T, Vector6<S>>> {
    LagrangeInterpolator::new(history, LAGRANGE_INTERPOLATION_ORDER)
}

/// Interpolant of rotational state (quaternion and angular velocity)
pub fn create_rotational_state_interpolator<T: Epoch, S: StateScalar>(
    history: StateHistory<T, Vector7<S>>,
) -> Result<LagrangeInterpolator<T, Vector7<S>>> {
    LagrangeInterpolator::new(history, LAGRANGE_INTERPOLATION_ORDER)
}

/// Interpolant of body mass
pub fn create_mass_interpolator(
    history: StateHistory<f64, f64>,
) -> Result<LagrangeInterpolator<f64, f64>> {
    LagrangeInterpolator::new(history, LAGRANGE_INTERPOLATION_ORDER)
}
