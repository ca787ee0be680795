//! Multi-arc processing with equal dynamics in every arc

mod common;

use approx::assert_relative_eq;
use nalgebra::Vector6;

use common::{sample_times, solution_from};
use integrated_states::ephemerides::{ConstantEphemeris, Ephemeris, MultiArcEphemeris};
use integrated_states::frames::ReferenceFrameManager;
use integrated_states::propagation::{
    create_integrated_state_processors, reset_integrated_multi_arc_states_with_equal_arc_dynamics,
    ProcessorSettings, StateProcessors,
};
use integrated_states::{
    Body, BodyCollection, IntegratedStateError, IntegratedStateType, NumericalSolution,
    PropagatorSettings,
};

const ARC_START_TIMES: [f64; 3] = [0.0, 100.0, 200.0];

/// Spacecraft orbiting Earth, with Earth fixed 1000 m from the SSB
fn environment() -> BodyCollection {
    let mut bodies = BodyCollection::new();
    bodies.insert(Body::new("Earth").with_ephemeris(Ephemeris::Constant(ConstantEphemeris::new(
        Vector6::new(1000.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        "SSB",
        "ECLIPJ2000",
    ))));
    bodies.insert(
        Body::new("Spacecraft")
            .with_ephemeris(Ephemeris::MultiArc(MultiArcEphemeris::empty("SSB", "ECLIPJ2000")))
            .with_constant_mass(500.0),
    );
    bodies
}

/// Arc `k` moves along x at `k + 1` m/s from the arc start
fn arc_solutions(state_size: usize) -> Vec<NumericalSolution<f64, f64>> {
    ARC_START_TIMES
        .iter()
        .enumerate()
        .map(|(arc, &start)| {
            let speed = arc as f64 + 1.0;
            solution_from(sample_times(start), move |t| {
                let mut state = vec![speed * (t - start), 0.0, 0.0, speed, 0.0, 0.0];
                state.resize(state_size, 500.0 - t);
                state
            })
        })
        .collect()
}

fn processors(settings: &PropagatorSettings, bodies: &BodyCollection) -> StateProcessors<f64, f64> {
    create_integrated_state_processors(
        settings,
        bodies,
        &ReferenceFrameManager::new(),
        &ProcessorSettings::default(),
        0,
    )
    .unwrap()
}

fn multi_arc_ephemeris(bodies: &BodyCollection) -> &MultiArcEphemeris {
    match bodies.get("Spacecraft").unwrap().ephemeris() {
        Some(Ephemeris::MultiArc(ephemeris)) => ephemeris,
        other => panic!("unexpected ephemeris {other:?}"),
    }
}

#[test]
fn test_arcs_replaced_in_one_step() {
    let mut bodies = environment();
    let settings = PropagatorSettings::translational(["Spacecraft"], ["Earth"]);
    let processors = processors(&settings, &bodies);

    reset_integrated_multi_arc_states_with_equal_arc_dynamics(
        &arc_solutions(6),
        &processors,
        &ARC_START_TIMES,
        &mut bodies,
    )
    .unwrap();

    let ephemeris = multi_arc_ephemeris(&bodies);
    assert_eq!(ephemeris.arc_count(), 3);
    assert_eq!(ephemeris.arc_start_times(), &ARC_START_TIMES);
    assert_eq!(ephemeris.reference_frame_origin(), "SSB");
    assert_eq!(ephemeris.arc_index(150.0), Some(1));

    // States are moved from Earth to the SSB
    for (t, arc) in [(20.0, 0.0), (130.0, 1.0), (250.0, 2.0)] {
        let start = ARC_START_TIMES[arc as usize];
        let state = ephemeris.cartesian_state(t).unwrap();
        assert_relative_eq!(state[0], 1000.0 + (arc + 1.0) * (t - start), epsilon = 1e-8);
        assert_relative_eq!(state[3], arc + 1.0, epsilon = 1e-10);
    }
    assert_eq!(bodies.get("Spacecraft").unwrap().ephemeris_dependent_updates(), 1);
    assert_eq!(
        bodies.get("Spacecraft").unwrap().ephemeris_time_bounds(),
        Some((0.0, 290.0))
    );
}

#[test]
fn test_arc_count_must_match_start_times() {
    let mut bodies = environment();
    let settings = PropagatorSettings::translational(["Spacecraft"], ["SSB"]);
    let processors = processors(&settings, &bodies);

    let result = reset_integrated_multi_arc_states_with_equal_arc_dynamics(
        &arc_solutions(6),
        &processors,
        &ARC_START_TIMES[..2],
        &mut bodies,
    );
    assert!(matches!(result, Err(IntegratedStateError::InvalidArcs(_))));
    assert_eq!(multi_arc_ephemeris(&bodies).arc_count(), 0);
}

#[test]
fn test_arc_width_must_match_layout() {
    let mut bodies = environment();
    let settings = PropagatorSettings::translational(["Spacecraft"], ["SSB"]);
    let processors = processors(&settings, &bodies);

    let mut solutions = arc_solutions(6);
    solutions[2] = arc_solutions(7).remove(2);
    let result = reset_integrated_multi_arc_states_with_equal_arc_dynamics(
        &solutions,
        &processors,
        &ARC_START_TIMES,
        &mut bodies,
    );
    assert!(matches!(result, Err(IntegratedStateError::LayoutInconsistency(_))));
    assert_eq!(multi_arc_ephemeris(&bodies).arc_count(), 0);
}

#[test]
fn test_only_translational_processors_support_arcs() {
    for settings in [
        PropagatorSettings::rotational(["Spacecraft"]),
        PropagatorSettings::mass(["Spacecraft"]),
    ] {
        let mut bodies = environment();
        let size = settings.state_size().unwrap();
        let processors = processors(&settings, &bodies);

        let result = reset_integrated_multi_arc_states_with_equal_arc_dynamics(
            &arc_solutions(size),
            &processors,
            &ARC_START_TIMES,
            &mut bodies,
        );
        match result {
            Err(IntegratedStateError::UnsupportedOperation { state_type, .. }) => {
                assert_eq!(state_type, settings.state_type());
                assert_ne!(state_type, IntegratedStateType::Translational);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
