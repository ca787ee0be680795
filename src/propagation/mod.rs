//! Processing of numerically integrated states
//!
//! [`StateLayout`] describes how a propagation settings tree decomposes the
//! flat state vector. [`create_integrated_state_processors`] builds one
//! processor per segment and returns them as [`StateProcessors`] together with
//! the layout; [`reset_integrated_states`] checks a solution against that
//! layout and installs it into the body collection with all of them.

pub mod factory;
pub mod layout;
pub mod processors;
pub mod reset;
pub mod settings;

pub use factory::create_integrated_state_processors;
pub use layout::{StateLayout, StateSegment};
pub use processors::{
    reset_integrated_multi_arc_states_with_equal_arc_dynamics, reset_integrated_states,
    BodyMassStateProcessor, IntegratedStateProcessor, ProcessorMap, RotationalStateProcessor,
    StateProcessors, TranslationalStateProcessor,
};
pub use reset::{
    check_translational_states_feasibility, convert_numerical_solution_to_ephemeris_input,
    get_single_body_state_history, reset_integrated_body_mass, reset_integrated_ephemerides,
    reset_integrated_ephemeris_of_body, reset_integrated_rotational_ephemerides,
    reset_multi_arc_integrated_ephemerides,
};
pub use settings::{
    EphemerisResetPolicy, IntegratedStateType, ProcessorSettings, PropagatorSettings,
};
