//! Translational and rotational ephemerides held by bodies
//!
//! These are the representations the integrated-state processors replace.
//! Translational ephemerides carry the frame origin and orientation their
//! states are expressed in; chaining origins is done by the body collection.

pub mod multi_arc;
pub mod rotational;
pub mod tabulated;

use nalgebra::Vector6;

use crate::errors::Result;

pub use multi_arc::MultiArcEphemeris;
pub use rotational::{
    ConstantRotationalEphemeris, RotationalEphemeris, TabulatedRotationalEphemeris,
};
pub use tabulated::{TabulatedCartesianEphemeris, TabulatedHistory};

/// Cartesian state that does not change with time
#[derive(Debug, Clone)]
pub struct ConstantEphemeris {
    state: Vector6<f64>,
    reference_frame_origin: String,
    reference_frame_orientation: String,
}

impl ConstantEphemeris {
    pub fn new(
        state: Vector6<f64>,
        reference_frame_origin: impl Into<String>,
        reference_frame_orientation: impl Into<String>,
    ) -> Self {
        Self {
            state,
            reference_frame_origin: reference_frame_origin.into(),
            reference_frame_orientation: reference_frame_orientation.into(),
        }
    }
}

/// Position and velocity of a body as a function of time
#[derive(Debug, Clone)]
pub enum Ephemeris {
    /// Fixed state, typically for bodies at a frame origin
    Constant(ConstantEphemeris),
    /// Interpolated over a single time span
    Tabulated(TabulatedCartesianEphemeris),
    /// Interpolated per propagation arc
    MultiArc(MultiArcEphemeris),
}

impl Ephemeris {
    /// Short description of the representation, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Ephemeris::Constant(_) => "constant ephemeris",
            Ephemeris::Tabulated(_) => "tabulated ephemeris",
            Ephemeris::MultiArc(_) => "multi-arc ephemeris",
        }
    }

    /// Name of the frame origin the states are relative to
    pub fn reference_frame_origin(&self) -> &str {
        match self {
            Ephemeris::Constant(e) => &e.reference_frame_origin,
            Ephemeris::Tabulated(e) => e.reference_frame_origin(),
            Ephemeris::MultiArc(e) => e.reference_frame_origin(),
        }
    }

    /// Name of the frame orientation the states are expressed in
    pub fn reference_frame_orientation(&self) -> &str {
        match self {
            Ephemeris::Constant(e) => &e.reference_frame_orientation,
            Ephemeris::Tabulated(e) => e.reference_frame_orientation(),
            Ephemeris::MultiArc(e) => e.reference_frame_orientation(),
        }
    }

    /// State relative to the frame origin at `seconds` since J2000
    pub fn cartesian_state(&self, seconds: f64) -> Result<Vector6<f64>> {
        match self {
            Ephemeris::Constant(e) => Ok(e.state),
            Ephemeris::Tabulated(e) => Ok(e.cartesian_state(seconds)),
            Ephemeris::MultiArc(e) => e.cartesian_state(seconds),
        }
    }

    /// Span covered by tabulated data, if any
    pub fn time_bounds(&self) -> Option<(f64, f64)> {
        match self {
            Ephemeris::Constant(_) => None,
            Ephemeris::Tabulated(e) => Some(e.history().time_bounds()),
            Ephemeris::MultiArc(e) => e.time_bounds(),
        }
    }
}
