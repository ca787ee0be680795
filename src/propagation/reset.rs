//! Installing integrated states into the bodies of the environment
//!
//! Translational states are re-expressed relative to each body's ephemeris
//! origin before they are interpolated. Bodies are processed strictly in
//! sequence, and a failure part way through leaves the bodies processed
//! before it updated.

use log::{debug, error, warn};
use nalgebra::Vector6;

use crate::constants::{MASS_STATE_SIZE, ROTATIONAL_STATE_SIZE, TRANSLATIONAL_STATE_SIZE};
use crate::ephemerides::{
    Ephemeris, RotationalEphemeris, TabulatedCartesianEphemeris, TabulatedHistory,
};
use crate::environment::{BodyCollection, BodyMassFunction};
use crate::errors::{IntegratedStateError, Result};
use crate::frames::{check_update_order, FrameTranslationFunction, FrameTranslationFunctions};
use crate::interpolators::{
    create_mass_interpolator, create_rotational_state_interpolator, create_state_interpolator,
};
use crate::representation::{StateRepresentation, StateScalar};
use crate::solution::{NumericalSolution, StateHistory};
use crate::time::Epoch;

use super::settings::EphemerisResetPolicy;

/// Fail under the strict policy, log and carry on under the lenient one
fn apply_policy(policy: EphemerisResetPolicy, err: IntegratedStateError) -> Result<()> {
    match policy {
        EphemerisResetPolicy::Strict => Err(err),
        EphemerisResetPolicy::Lenient => {
            error!("{}; ephemeris left unchanged", err);
            Ok(())
        }
    }
}

/// Cast a freshly built history to the representation already installed
fn conform_history<const N: usize>(
    body: &str,
    history: TabulatedHistory<N>,
    installed: StateRepresentation,
) -> Result<TabulatedHistory<N>> {
    if history.representation() == installed {
        return Ok(history);
    }
    warn!(
        "Ephemeris of body {} holds {}, casting integrated {}",
        body,
        installed,
        history.representation()
    );
    history.cast_to(installed)
}

/// Check that a solution holds the segment and that the segment fits the bodies
fn check_segment<T: Epoch, S: StateScalar>(
    solution: &NumericalSolution<T, S>,
    start_index_and_size: (usize, usize),
    body_count: usize,
    single_body_size: usize,
) -> Result<()> {
    let (start_index, size) = start_index_and_size;
    if solution.state_size() < start_index + size {
        return Err(IntegratedStateError::LayoutInconsistency(format!(
            "solution has {} entries, segment needs entries {}..{}",
            solution.state_size(),
            start_index,
            start_index + size
        )));
    }
    if size != single_body_size * body_count {
        return Err(IntegratedStateError::LayoutInconsistency(format!(
            "segment size {} does not match {} bodies of size {}",
            size, body_count, single_body_size
        )));
    }
    Ok(())
}

/// The update order to use, falling back to the body order when none is given
fn effective_update_order<'a>(
    update_order: &'a [String],
    bodies_to_integrate: &'a [String],
) -> Result<&'a [String]> {
    if update_order.is_empty() {
        return Ok(bodies_to_integrate);
    }
    check_update_order(update_order, bodies_to_integrate)?;
    Ok(update_order)
}

/// Extract the translational block of one body, relative to its ephemeris origin
pub fn convert_numerical_solution_to_ephemeris_input<T: Epoch, S: StateScalar>(
    body_index: usize,
    start_index: usize,
    solution: &NumericalSolution<T, S>,
    translation: Option<&FrameTranslationFunction<T, S>>,
    bodies: &BodyCollection,
) -> Result<StateHistory<T, Vector6<S>>> {
    let block_start = start_index + TRANSLATIONAL_STATE_SIZE * body_index;
    let block = solution.extract_block::<TRANSLATIONAL_STATE_SIZE>(block_start)?;

    match translation {
        None => Ok(block),
        Some(translation) => block
            .into_iter()
            .map(|(time, state)| -> Result<(T, Vector6<S>)> {
                Ok((time, state - translation(bodies, time)?))
            })
            .collect(),
    }
}

/// State history of one integrated body, relative to its ephemeris origin
pub fn get_single_body_state_history<T: Epoch, S: StateScalar>(
    bodies_to_integrate: &[String],
    start_index: usize,
    body: &str,
    solution: &NumericalSolution<T, S>,
    translations: &FrameTranslationFunctions<T, S>,
    bodies: &BodyCollection,
) -> Result<StateHistory<T, Vector6<S>>> {
    let body_index = bodies_to_integrate
        .iter()
        .position(|name| name == body)
        .ok_or_else(|| IntegratedStateError::BodyNotFound {
            body: body.to_string(),
            context: "bodies to integrate".to_string(),
        })?;
    convert_numerical_solution_to_ephemeris_input(
        body_index,
        start_index,
        solution,
        translations.get(body),
        bodies,
    )
}

/// Replace the tabulated ephemeris of one body with interpolated states
pub fn reset_integrated_ephemeris_of_body<T: Epoch, S: StateScalar>(
    bodies: &mut BodyCollection,
    body: &str,
    states: StateHistory<T, Vector6<S>>,
    policy: EphemerisResetPolicy,
) -> Result<()> {
    let history = TabulatedHistory::from_interpolator(create_state_interpolator(states)?);

    match bodies.get_mut(body)?.ephemeris_mut() {
        None => apply_policy(
            policy,
            IntegratedStateError::MissingEphemeris {
                body: body.to_string(),
                kind: "ephemeris",
            },
        ),
        Some(Ephemeris::Tabulated(ephemeris)) => {
            let history = conform_history(body, history, ephemeris.representation())?;
            ephemeris.reset_interpolator(history);
            debug!("Reset tabulated ephemeris of body {}", body);
            Ok(())
        }
        Some(other) => apply_policy(
            policy,
            IntegratedStateError::WrongEphemerisType {
                body: body.to_string(),
                expected: "tabulated ephemeris",
                found: other.kind_name(),
            },
        ),
    }
}

/// Install translational states of all integrated bodies
///
/// Bodies are reset in `update_order` (or in the order of
/// `bodies_to_integrate` when it is empty), followed by one refresh of the
/// ephemeris-dependent quantities of every body.
pub fn reset_integrated_ephemerides<T: Epoch, S: StateScalar>(
    bodies: &mut BodyCollection,
    solution: &NumericalSolution<T, S>,
    start_index_and_size: (usize, usize),
    bodies_to_integrate: &[String],
    update_order: &[String],
    translations: &FrameTranslationFunctions<T, S>,
    policy: EphemerisResetPolicy,
) -> Result<()> {
    check_segment(
        solution,
        start_index_and_size,
        bodies_to_integrate.len(),
        TRANSLATIONAL_STATE_SIZE,
    )?;
    let order = effective_update_order(update_order, bodies_to_integrate)?;

    for body in order {
        let states = get_single_body_state_history(
            bodies_to_integrate,
            start_index_and_size.0,
            body,
            solution,
            translations,
            bodies,
        )?;
        reset_integrated_ephemeris_of_body(bodies, body, states, policy)?;
    }

    bodies.update_ephemeris_dependent_quantities();
    Ok(())
}

/// Install translational states of all integrated bodies, one arc per solution
///
/// Each body must carry a multi-arc ephemeris, whose arcs and arc start times
/// are replaced together. Its frame origin and orientation are kept.
#[allow(clippy::too_many_arguments)]
pub fn reset_multi_arc_integrated_ephemerides<T: Epoch, S: StateScalar>(
    bodies: &mut BodyCollection,
    solutions: &[NumericalSolution<T, S>],
    arc_start_times: &[f64],
    start_index_and_size: (usize, usize),
    bodies_to_integrate: &[String],
    update_order: &[String],
    translations: &FrameTranslationFunctions<T, S>,
    policy: EphemerisResetPolicy,
) -> Result<()> {
    if solutions.is_empty() || solutions.len() != arc_start_times.len() {
        return Err(IntegratedStateError::InvalidArcs(format!(
            "{} arc solutions given with {} arc start times",
            solutions.len(),
            arc_start_times.len()
        )));
    }
    for solution in solutions {
        check_segment(
            solution,
            start_index_and_size,
            bodies_to_integrate.len(),
            TRANSLATIONAL_STATE_SIZE,
        )?;
    }
    let order = effective_update_order(update_order, bodies_to_integrate)?;

    for body in order {
        let (origin, orientation, installed) = match bodies.get(body)?.ephemeris() {
            Some(Ephemeris::MultiArc(ephemeris)) => (
                ephemeris.reference_frame_origin().to_string(),
                ephemeris.reference_frame_orientation().to_string(),
                ephemeris.arcs().first().map(TabulatedCartesianEphemeris::representation),
            ),
            None => {
                apply_policy(
                    policy,
                    IntegratedStateError::MissingEphemeris {
                        body: body.clone(),
                        kind: "multi-arc ephemeris",
                    },
                )?;
                continue;
            }
            Some(other) => {
                apply_policy(
                    policy,
                    IntegratedStateError::WrongEphemerisType {
                        body: body.clone(),
                        expected: "multi-arc ephemeris",
                        found: other.kind_name(),
                    },
                )?;
                continue;
            }
        };

        let mut arcs = Vec::with_capacity(solutions.len());
        for solution in solutions {
            let states = get_single_body_state_history(
                bodies_to_integrate,
                start_index_and_size.0,
                body,
                solution,
                translations,
                bodies,
            )?;
            let mut history =
                TabulatedHistory::from_interpolator(create_state_interpolator(states)?);
            if let Some(installed) = installed {
                history = conform_history(body, history, installed)?;
            }
            arcs.push(TabulatedCartesianEphemeris::new(
                history,
                origin.as_str(),
                orientation.as_str(),
            ));
        }

        if let Some(Ephemeris::MultiArc(ephemeris)) = bodies.get_mut(body)?.ephemeris_mut() {
            ephemeris.reset_single_arc_ephemerides(arcs, arc_start_times.to_vec())?;
            debug!(
                "Reset {} arcs of multi-arc ephemeris of body {}",
                arc_start_times.len(),
                body
            );
        }
    }

    bodies.update_ephemeris_dependent_quantities();
    Ok(())
}

/// Install rotational states of all integrated bodies
///
/// Rotational blocks are read from `start_index + 7 * body_index`.
pub fn reset_integrated_rotational_ephemerides<T: Epoch, S: StateScalar>(
    bodies: &mut BodyCollection,
    solution: &NumericalSolution<T, S>,
    start_index_and_size: (usize, usize),
    bodies_to_integrate: &[String],
    policy: EphemerisResetPolicy,
) -> Result<()> {
    check_segment(
        solution,
        start_index_and_size,
        bodies_to_integrate.len(),
        ROTATIONAL_STATE_SIZE,
    )?;

    for (body_index, body) in bodies_to_integrate.iter().enumerate() {
        let states = solution.extract_block::<ROTATIONAL_STATE_SIZE>(
            start_index_and_size.0 + ROTATIONAL_STATE_SIZE * body_index,
        )?;
        let history =
            TabulatedHistory::from_interpolator(create_rotational_state_interpolator(states)?);

        match bodies.get_mut(body)?.rotational_ephemeris_mut() {
            None => apply_policy(
                policy,
                IntegratedStateError::MissingEphemeris {
                    body: body.clone(),
                    kind: "rotational ephemeris",
                },
            )?,
            Some(RotationalEphemeris::Tabulated(ephemeris)) => {
                let history = conform_history(body, history, ephemeris.history().representation())?;
                ephemeris.reset_interpolator(history);
                debug!("Reset tabulated rotational ephemeris of body {}", body);
            }
            Some(other) => apply_policy(
                policy,
                IntegratedStateError::WrongEphemerisType {
                    body: body.clone(),
                    expected: "tabulated rotational ephemeris",
                    found: other.kind_name(),
                },
            )?,
        }
    }

    bodies.update_ephemeris_dependent_quantities();
    Ok(())
}

/// Install integrated masses as tabulated mass functions
///
/// Masses are stored as `f64` keyed by `f64` seconds whatever the solution's
/// representation.
pub fn reset_integrated_body_mass<T: Epoch, S: StateScalar>(
    bodies: &mut BodyCollection,
    solution: &NumericalSolution<T, S>,
    start_index_and_size: (usize, usize),
    bodies_to_integrate: &[String],
) -> Result<()> {
    check_segment(
        solution,
        start_index_and_size,
        bodies_to_integrate.len(),
        MASS_STATE_SIZE,
    )?;

    for (body_index, body) in bodies_to_integrate.iter().enumerate() {
        let masses: StateHistory<f64, f64> = solution
            .extract_scalar(start_index_and_size.0 + body_index)?
            .into_iter()
            .map(|(time, mass)| (time.seconds_since_j2000(), mass.cast_to_f64()))
            .collect();
        let interpolator = create_mass_interpolator(masses)?;
        bodies
            .get_mut(body)?
            .set_mass_function(BodyMassFunction::Tabulated(interpolator));
        debug!("Reset mass function of body {}", body);
    }
    Ok(())
}

/// Check that translational states can be installed for the given bodies
///
/// Every body must exist, carry an ephemeris and appear only once.
pub fn check_translational_states_feasibility(
    bodies_to_integrate: &[String],
    bodies: &BodyCollection,
) -> Result<()> {
    for (index, name) in bodies_to_integrate.iter().enumerate() {
        let body = bodies.get(name)?;
        if body.ephemeris().is_none() {
            return Err(IntegratedStateError::MissingEphemeris {
                body: name.clone(),
                kind: "ephemeris",
            });
        }
        if bodies_to_integrate[..index].contains(name) {
            return Err(IntegratedStateError::InconsistentSettings(format!(
                "body {} is integrated more than once",
                name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemerides::{ConstantEphemeris, TabulatedRotationalEphemeris};
    use crate::environment::Body;
    use crate::interpolators::Vector7;
    use nalgebra::DVector;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn tabulated(origin: &str) -> Ephemeris {
        let states: StateHistory<f64, Vector6<f64>> =
            vec![(0.0, Vector6::zeros()), (100.0, Vector6::zeros())];
        let ephemeris =
            TabulatedCartesianEphemeris::from_states(states, origin, "ECLIPJ2000").unwrap();
        Ephemeris::Tabulated(ephemeris)
    }

    fn solution(size: usize) -> NumericalSolution<f64, f64> {
        NumericalSolution::new(
            (0..8)
                .map(|i| {
                    let t = i as f64 * 10.0;
                    (t, DVector::from_fn(size, |row, _| t + row as f64))
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_conversion_applies_translation() {
        let mut bodies = BodyCollection::new();
        bodies.insert(Body::new("Sun").with_ephemeris(Ephemeris::Constant(ConstantEphemeris::new(
            Vector6::from_element(1.0),
            "SSB",
            "ECLIPJ2000",
        ))));
        let solution = solution(12);
        let manager = crate::frames::ReferenceFrameManager::new();
        let translation: FrameTranslationFunction<f64, f64> =
            crate::frames::FrameTranslationProvider::translation_function(
                &manager, "Mars", "SSB", "Sun",
            )
            .unwrap();

        let states = convert_numerical_solution_to_ephemeris_input(
            1,
            0,
            &solution,
            Some(&translation),
            &bodies,
        )
        .unwrap();
        assert_eq!(states.len(), 8);
        assert_eq!(states[2].1[0], 20.0 + 6.0 - 1.0);
        assert_eq!(states[2].1[5], 20.0 + 11.0 - 1.0);
    }

    #[test]
    fn test_state_history_of_unknown_body() {
        let result = get_single_body_state_history(
            &names(&["Earth"]),
            0,
            "Mars",
            &solution(6),
            &FrameTranslationFunctions::new(),
            &BodyCollection::new(),
        );
        assert!(matches!(
            result,
            Err(IntegratedStateError::BodyNotFound { .. })
        ));
    }

    #[test]
    fn test_size_mismatch() {
        let mut bodies = BodyCollection::new();
        bodies.insert(Body::new("Earth").with_ephemeris(tabulated("SSB")));
        bodies.insert(Body::new("Mars").with_ephemeris(tabulated("SSB")));

        let result = reset_integrated_ephemerides(
            &mut bodies,
            &solution(12),
            (0, 10),
            &names(&["Earth", "Mars"]),
            &[],
            &FrameTranslationFunctions::new(),
            EphemerisResetPolicy::Strict,
        );
        assert!(matches!(
            result,
            Err(IntegratedStateError::LayoutInconsistency(_))
        ));

        let result = reset_integrated_ephemerides(
            &mut bodies,
            &solution(10),
            (0, 12),
            &names(&["Earth", "Mars"]),
            &[],
            &FrameTranslationFunctions::new(),
            EphemerisResetPolicy::Strict,
        );
        assert!(matches!(
            result,
            Err(IntegratedStateError::LayoutInconsistency(_))
        ));
    }

    #[test]
    fn test_policy_on_wrong_ephemeris_type() {
        let mut bodies = BodyCollection::new();
        bodies.insert(Body::new("Earth").with_ephemeris(Ephemeris::Constant(ConstantEphemeris::new(
            Vector6::zeros(),
            "SSB",
            "ECLIPJ2000",
        ))));

        let states = solution(6).extract_block::<6>(0).unwrap();
        let result = reset_integrated_ephemeris_of_body(
            &mut bodies,
            "Earth",
            states.clone(),
            EphemerisResetPolicy::Strict,
        );
        assert!(matches!(
            result,
            Err(IntegratedStateError::WrongEphemerisType { .. })
        ));

        assert!(reset_integrated_ephemeris_of_body(
            &mut bodies,
            "Earth",
            states,
            EphemerisResetPolicy::Lenient
        )
        .is_ok());
    }

    #[test]
    fn test_rotational_reset_reads_from_start_index() {
        let identity = Vector7::from_column_slice(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let history =
            TabulatedHistory::from_states(vec![(0.0, identity), (70.0, identity)]).unwrap();
        let mut bodies = BodyCollection::new();
        bodies.insert(Body::new("Vehicle").with_rotational_ephemeris(RotationalEphemeris::Tabulated(
            TabulatedRotationalEphemeris::new(history, "ECLIPJ2000", "Vehicle_Fixed"),
        )));

        reset_integrated_rotational_ephemerides(
            &mut bodies,
            &solution(10),
            (3, 7),
            &names(&["Vehicle"]),
            EphemerisResetPolicy::Strict,
        )
        .unwrap();

        let vehicle = bodies.get("Vehicle").unwrap();
        let state = vehicle.rotational_ephemeris().unwrap().rotational_state(30.0);
        assert_eq!(state[0], 33.0);
        assert_eq!(state[6], 39.0);
        assert_eq!(vehicle.ephemeris_dependent_updates(), 1);
    }

    #[test]
    fn test_mass_reset() {
        let mut bodies = BodyCollection::new();
        bodies.insert(Body::new("Vehicle").with_constant_mass(1000.0));

        let vehicle = names(&["Vehicle"]);
        let result = reset_integrated_body_mass(&mut bodies, &solution(3), (1, 2), &vehicle);
        assert!(matches!(
            result,
            Err(IntegratedStateError::LayoutInconsistency(_))
        ));

        reset_integrated_body_mass(&mut bodies, &solution(3), (2, 1), &vehicle).unwrap();
        assert_eq!(bodies.get("Vehicle").unwrap().mass(40.0), Some(42.0));
    }

    #[test]
    fn test_feasibility() {
        let mut bodies = BodyCollection::new();
        bodies.insert(Body::new("Earth").with_ephemeris(tabulated("SSB")));
        bodies.insert(Body::new("Spacecraft"));

        assert!(check_translational_states_feasibility(&names(&["Earth"]), &bodies).is_ok());
        assert!(matches!(
            check_translational_states_feasibility(&names(&["Spacecraft"]), &bodies),
            Err(IntegratedStateError::MissingEphemeris { .. })
        ));
        assert!(matches!(
            check_translational_states_feasibility(&names(&["Venus"]), &bodies),
            Err(IntegratedStateError::BodyNotFound { .. })
        ));
        let duplicated = names(&["Earth", "Earth"]);
        assert!(check_translational_states_feasibility(&duplicated, &bodies).is_err());
    }
}
