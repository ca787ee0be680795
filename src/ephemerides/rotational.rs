//! Rotational ephemerides
//!
//! Rotational states are seven-vectors: a scalar-first quaternion rotating
//! from the body-fixed target frame to the base frame, followed by the
//! angular velocity of the body expressed in the body-fixed frame.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::interpolators::Vector7;

use super::tabulated::TabulatedHistory;

/// Rotational state that does not change with time
#[derive(Debug, Clone)]
pub struct ConstantRotationalEphemeris {
    state: Vector7<f64>,
    base_frame_orientation: String,
    target_frame_orientation: String,
}

impl ConstantRotationalEphemeris {
    /// Create a constant rotational ephemeris
    pub fn new(
        state: Vector7<f64>,
        base_frame_orientation: impl Into<String>,
        target_frame_orientation: impl Into<String>,
    ) -> Self {
        Self {
            state,
            base_frame_orientation: base_frame_orientation.into(),
            target_frame_orientation: target_frame_orientation.into(),
        }
    }
}

/// Rotational state interpolated from tabulated states
#[derive(Debug, Clone)]
pub struct TabulatedRotationalEphemeris {
    history: TabulatedHistory<7>,
    base_frame_orientation: String,
    target_frame_orientation: String,
}

impl TabulatedRotationalEphemeris {
    /// Create a tabulated rotational ephemeris
    pub fn new(
        history: TabulatedHistory<7>,
        base_frame_orientation: impl Into<String>,
        target_frame_orientation: impl Into<String>,
    ) -> Self {
        Self {
            history,
            base_frame_orientation: base_frame_orientation.into(),
            target_frame_orientation: target_frame_orientation.into(),
        }
    }

    /// The stored interpolant
    pub fn history(&self) -> &TabulatedHistory<7> {
        &self.history
    }

    /// Install a new interpolant, handing back the one it replaces
    pub fn reset_interpolator(&mut self, history: TabulatedHistory<7>) -> TabulatedHistory<7> {
        std::mem::replace(&mut self.history, history)
    }
}

/// Orientation of a body as a function of time
#[derive(Debug, Clone)]
pub enum RotationalEphemeris {
    Constant(ConstantRotationalEphemeris),
    Tabulated(TabulatedRotationalEphemeris),
}

impl RotationalEphemeris {
    /// Short description of the representation, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            RotationalEphemeris::Constant(_) => "constant rotational ephemeris",
            RotationalEphemeris::Tabulated(_) => "tabulated rotational ephemeris",
        }
    }

    pub fn base_frame_orientation(&self) -> &str {
        match self {
            RotationalEphemeris::Constant(e) => &e.base_frame_orientation,
            RotationalEphemeris::Tabulated(e) => &e.base_frame_orientation,
        }
    }

    pub fn target_frame_orientation(&self) -> &str {
        match self {
            RotationalEphemeris::Constant(e) => &e.target_frame_orientation,
            RotationalEphemeris::Tabulated(e) => &e.target_frame_orientation,
        }
    }

    /// Quaternion and angular velocity at `seconds` since J2000
    pub fn rotational_state(&self, seconds: f64) -> Vector7<f64> {
        match self {
            RotationalEphemeris::Constant(e) => e.state,
            RotationalEphemeris::Tabulated(e) => e.history.state(seconds),
        }
    }

    /// Rotation from the body-fixed frame to the base frame
    ///
    /// Interpolated quaternions are not unit length in general and are
    /// normalized here.
    pub fn rotation_to_base_frame(&self, seconds: f64) -> UnitQuaternion<f64> {
        let state = self.rotational_state(seconds);
        UnitQuaternion::from_quaternion(Quaternion::new(state[0], state[1], state[2], state[3]))
    }

    /// Angular velocity in the body-fixed frame
    pub fn angular_velocity(&self, seconds: f64) -> Vector3<f64> {
        self.rotational_state(seconds).fixed_rows::<3>(4).into_owned()
    }
}
