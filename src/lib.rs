//! Integrated states: installing numerically integrated states into an
//! astrodynamics environment
//!
//! An ODE solver propagating several bodies at once produces one flat state
//! vector per time step. This crate decomposes those vectors according to the
//! propagation settings (translational, rotational, mass, custom and hybrid
//! compositions), interpolates each body's history and installs the result as
//! the body's ephemeris, rotational ephemeris or mass function.
//!
//! ```no_run
//! use integrated_states::frames::ReferenceFrameManager;
//! use integrated_states::propagation::{
//!     create_integrated_state_processors, reset_integrated_states, ProcessorSettings,
//!     PropagatorSettings,
//! };
//! # fn run(
//! #     bodies: &mut integrated_states::BodyCollection,
//! #     solution: &integrated_states::NumericalSolution<f64, f64>,
//! # ) -> integrated_states::Result<()> {
//! let settings = PropagatorSettings::translational(["Earth", "Mars"], ["SSB", "Earth"]);
//! let processors = create_integrated_state_processors(
//!     &settings,
//!     bodies,
//!     &ReferenceFrameManager::new(),
//!     &ProcessorSettings::default(),
//!     0,
//! )?;
//! reset_integrated_states(solution, &processors, bodies)?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod environment;
pub mod ephemerides;
pub mod errors;
pub mod frames;
pub mod interpolators;
pub mod propagation;
pub mod representation;
pub mod solution;
pub mod time;

// Re-export commonly used types
pub use environment::{Body, BodyCollection};
pub use errors::{IntegratedStateError, Result};
pub use propagation::{IntegratedStateType, PropagatorSettings, StateLayout};
pub use solution::{NumericalSolution, StateHistory};
pub use time::{Epoch, SplitEpoch};
