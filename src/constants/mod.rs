//! Constants for state layout and interpolation

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;

// Per-body widths in the flat state vector
/// Cartesian position and velocity
pub const TRANSLATIONAL_STATE_SIZE: usize = 6;
/// Scalar-first quaternion followed by the angular velocity vector
pub const ROTATIONAL_STATE_SIZE: usize = 7;
/// Body mass
pub const MASS_STATE_SIZE: usize = 1;

/// Order of the Lagrange interpolants built from integrated states
pub const LAGRANGE_INTERPOLATION_ORDER: usize = 6;

// Frames
/// Origin at which chains of ephemeris origins terminate
pub const GLOBAL_FRAME_ORIGIN: &str = "SSB";
