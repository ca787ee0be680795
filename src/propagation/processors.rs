//! Integrated state processors, one per segment of the flat state vector
//!
//! A processor owns a segment descriptor and the bodies of that segment.
//! The body collection is handed to each processing call; processors keep
//! only what they resolved at construction (update order and frame
//! translations).

use std::collections::BTreeMap;

use crate::constants::{MASS_STATE_SIZE, ROTATIONAL_STATE_SIZE, TRANSLATIONAL_STATE_SIZE};
use crate::environment::BodyCollection;
use crate::errors::{IntegratedStateError, Result};
use crate::frames::{check_update_order, FrameTranslationFunctions, FrameTranslationProvider};
use crate::representation::StateScalar;
use crate::solution::NumericalSolution;
use crate::time::Epoch;

use super::layout::{check_translational_settings, StateLayout};
use super::reset::{
    reset_integrated_body_mass, reset_integrated_ephemerides,
    reset_integrated_rotational_ephemerides, reset_multi_arc_integrated_ephemerides,
};
use super::settings::{EphemerisResetPolicy, IntegratedStateType};

/// Installs one segment of integrated states into the environment
pub trait IntegratedStateProcessor<T: Epoch, S: StateScalar> {
    /// Kind of state held by the segment
    fn state_type(&self) -> IntegratedStateType;

    /// First index and size of the segment
    fn start_index_and_size(&self) -> (usize, usize);

    /// Bodies of the segment, in propagation order
    fn bodies_to_integrate(&self) -> &[String];

    /// Install the states of a single-arc solution
    fn process_integrated_states(
        &self,
        bodies: &mut BodyCollection,
        solution: &NumericalSolution<T, S>,
    ) -> Result<()>;

    /// Install the states of a multi-arc solution
    fn process_integrated_multi_arc_states(
        &self,
        _bodies: &mut BodyCollection,
        _solutions: &[NumericalSolution<T, S>],
        _arc_start_times: &[f64],
    ) -> Result<()> {
        Err(IntegratedStateError::UnsupportedOperation {
            state_type: self.state_type(),
            operation: "reset multi-arc states",
        })
    }
}

/// Processors grouped by state type, applied in state type order
pub type ProcessorMap<T, S> =
    BTreeMap<IntegratedStateType, Vec<Box<dyn IntegratedStateProcessor<T, S>>>>;

/// The processors of a propagation settings tree and the layout they cover
pub struct StateProcessors<T, S> {
    processors: ProcessorMap<T, S>,
    layout: StateLayout,
}

impl<T: Epoch, S: StateScalar> StateProcessors<T, S> {
    pub fn new(processors: ProcessorMap<T, S>, layout: StateLayout) -> Self {
        Self { processors, layout }
    }

    /// Segments of the flat state vector the processors were built for
    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    /// Number of flat state entries the settings occupy
    pub fn state_size(&self) -> usize {
        self.layout.total_size()
    }

    pub fn processor_map(&self) -> &ProcessorMap<T, S> {
        &self.processors
    }

    /// Processors of one state type
    pub fn of_type(
        &self,
        state_type: IntegratedStateType,
    ) -> &[Box<dyn IntegratedStateProcessor<T, S>>] {
        self.processors
            .get(&state_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All processors, in state type order
    pub fn iter(&self) -> impl Iterator<Item = &dyn IntegratedStateProcessor<T, S>> {
        self.processors.values().flatten().map(|processor| processor.as_ref())
    }

    pub fn len(&self) -> usize {
        self.processors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that a solution's flat vectors end where the layout ends
    pub fn check_solution(&self, solution: &NumericalSolution<T, S>) -> Result<()> {
        self.layout.check_solution(solution.state_size())
    }
}

/// Resets tabulated (or multi-arc) ephemerides from translational states
pub struct TranslationalStateProcessor<T, S> {
    start_index: usize,
    size: usize,
    bodies_to_integrate: Vec<String>,
    central_bodies: Vec<String>,
    ephemeris_update_order: Vec<String>,
    frame_translations: FrameTranslationFunctions<T, S>,
    reset_policy: EphemerisResetPolicy,
}

impl<T: Epoch, S: StateScalar> TranslationalStateProcessor<T, S> {
    /// Create a processor, resolving the update order and frame translations
    /// against the current ephemerides of `bodies`
    pub fn new(
        start_index: usize,
        bodies_to_integrate: Vec<String>,
        central_bodies: Vec<String>,
        bodies: &BodyCollection,
        frame_provider: &dyn FrameTranslationProvider<T, S>,
        reset_policy: EphemerisResetPolicy,
    ) -> Result<Self> {
        check_translational_settings(&bodies_to_integrate, &central_bodies)?;

        let ephemeris_origins = frame_provider.ephemeris_origins(bodies, &bodies_to_integrate)?;
        let ephemeris_update_order = frame_provider.resolve_update_order(
            &bodies_to_integrate,
            &central_bodies,
            &ephemeris_origins,
        )?;
        check_update_order(&ephemeris_update_order, &bodies_to_integrate)?;

        let mut frame_translations = FrameTranslationFunctions::new();
        for ((body, central), origin) in bodies_to_integrate
            .iter()
            .zip(&central_bodies)
            .zip(&ephemeris_origins)
        {
            if let Some(translation) = frame_provider.translation_function(body, central, origin) {
                frame_translations.insert(body.clone(), translation);
            }
        }

        Ok(Self {
            start_index,
            size: TRANSLATIONAL_STATE_SIZE * bodies_to_integrate.len(),
            bodies_to_integrate,
            central_bodies,
            ephemeris_update_order,
            frame_translations,
            reset_policy,
        })
    }

    pub fn central_bodies(&self) -> &[String] {
        &self.central_bodies
    }

    /// Order in which ephemerides are reset
    pub fn ephemeris_update_order(&self) -> &[String] {
        &self.ephemeris_update_order
    }

    /// Whether states of `body` are translated to another origin
    pub fn has_frame_translation(&self, body: &str) -> bool {
        self.frame_translations.contains_key(body)
    }
}

impl<T: Epoch, S: StateScalar> IntegratedStateProcessor<T, S>
    for TranslationalStateProcessor<T, S>
{
    fn state_type(&self) -> IntegratedStateType {
        IntegratedStateType::Translational
    }

    fn start_index_and_size(&self) -> (usize, usize) {
        (self.start_index, self.size)
    }

    fn bodies_to_integrate(&self) -> &[String] {
        &self.bodies_to_integrate
    }

    fn process_integrated_states(
        &self,
        bodies: &mut BodyCollection,
        solution: &NumericalSolution<T, S>,
    ) -> Result<()> {
        reset_integrated_ephemerides(
            bodies,
            solution,
            (self.start_index, self.size),
            &self.bodies_to_integrate,
            &self.ephemeris_update_order,
            &self.frame_translations,
            self.reset_policy,
        )
    }

    fn process_integrated_multi_arc_states(
        &self,
        bodies: &mut BodyCollection,
        solutions: &[NumericalSolution<T, S>],
        arc_start_times: &[f64],
    ) -> Result<()> {
        reset_multi_arc_integrated_ephemerides(
            bodies,
            solutions,
            arc_start_times,
            (self.start_index, self.size),
            &self.bodies_to_integrate,
            &self.ephemeris_update_order,
            &self.frame_translations,
            self.reset_policy,
        )
    }
}

/// Resets tabulated rotational ephemerides from rotational states
#[derive(Debug, Clone)]
pub struct RotationalStateProcessor {
    start_index: usize,
    size: usize,
    bodies_to_integrate: Vec<String>,
    reset_policy: EphemerisResetPolicy,
}

impl RotationalStateProcessor {
    pub fn new(
        start_index: usize,
        bodies_to_integrate: Vec<String>,
        reset_policy: EphemerisResetPolicy,
    ) -> Self {
        Self {
            start_index,
            size: ROTATIONAL_STATE_SIZE * bodies_to_integrate.len(),
            bodies_to_integrate,
            reset_policy,
        }
    }
}

impl<T: Epoch, S: StateScalar> IntegratedStateProcessor<T, S> for RotationalStateProcessor {
    fn state_type(&self) -> IntegratedStateType {
        IntegratedStateType::Rotational
    }

    fn start_index_and_size(&self) -> (usize, usize) {
        (self.start_index, self.size)
    }

    fn bodies_to_integrate(&self) -> &[String] {
        &self.bodies_to_integrate
    }

    fn process_integrated_states(
        &self,
        bodies: &mut BodyCollection,
        solution: &NumericalSolution<T, S>,
    ) -> Result<()> {
        reset_integrated_rotational_ephemerides(
            bodies,
            solution,
            (self.start_index, self.size),
            &self.bodies_to_integrate,
            self.reset_policy,
        )
    }
}

/// Installs tabulated mass functions from integrated masses
#[derive(Debug, Clone)]
pub struct BodyMassStateProcessor {
    start_index: usize,
    size: usize,
    bodies_to_integrate: Vec<String>,
}

impl BodyMassStateProcessor {
    pub fn new(start_index: usize, bodies_to_integrate: Vec<String>) -> Self {
        Self {
            start_index,
            size: MASS_STATE_SIZE * bodies_to_integrate.len(),
            bodies_to_integrate,
        }
    }
}

impl<T: Epoch, S: StateScalar> IntegratedStateProcessor<T, S> for BodyMassStateProcessor {
    fn state_type(&self) -> IntegratedStateType {
        IntegratedStateType::Mass
    }

    fn start_index_and_size(&self) -> (usize, usize) {
        (self.start_index, self.size)
    }

    fn bodies_to_integrate(&self) -> &[String] {
        &self.bodies_to_integrate
    }

    fn process_integrated_states(
        &self,
        bodies: &mut BodyCollection,
        solution: &NumericalSolution<T, S>,
    ) -> Result<()> {
        reset_integrated_body_mass(
            bodies,
            solution,
            (self.start_index, self.size),
            &self.bodies_to_integrate,
        )
    }
}

/// Install a single-arc solution with every processor, in state type order
///
/// The solution's flat vectors must end exactly where the processors' layout
/// ends.
pub fn reset_integrated_states<T: Epoch, S: StateScalar>(
    solution: &NumericalSolution<T, S>,
    processors: &StateProcessors<T, S>,
    bodies: &mut BodyCollection,
) -> Result<()> {
    processors.check_solution(solution)?;
    for processor in processors.iter() {
        processor.process_integrated_states(bodies, solution)?;
    }
    Ok(())
}

/// Install a multi-arc solution with every processor, in state type order
///
/// Every arc solution is checked against the layout before any body changes.
pub fn reset_integrated_multi_arc_states_with_equal_arc_dynamics<T: Epoch, S: StateScalar>(
    solutions: &[NumericalSolution<T, S>],
    processors: &StateProcessors<T, S>,
    arc_start_times: &[f64],
    bodies: &mut BodyCollection,
) -> Result<()> {
    for solution in solutions {
        processors.check_solution(solution)?;
    }
    for processor in processors.iter() {
        processor.process_integrated_multi_arc_states(bodies, solutions, arc_start_times)?;
    }
    Ok(())
}
