//! Processor factory: builds the processors for a propagation settings tree

use log::debug;

use crate::environment::BodyCollection;
use crate::errors::{IntegratedStateError, Result};
use crate::frames::FrameTranslationProvider;
use crate::representation::StateScalar;
use crate::time::Epoch;

use super::layout::{StateLayout, StateSegment};
use super::processors::{
    BodyMassStateProcessor, IntegratedStateProcessor, ProcessorMap, RotationalStateProcessor,
    StateProcessors, TranslationalStateProcessor,
};
use super::reset::check_translational_states_feasibility;
use super::settings::{IntegratedStateType, ProcessorSettings, PropagatorSettings};

fn single_processor<T: Epoch, S: StateScalar>(
    processor: Box<dyn IntegratedStateProcessor<T, S>>,
) -> ProcessorMap<T, S> {
    let mut processors = ProcessorMap::new();
    processors.insert(processor.state_type(), vec![processor]);
    processors
}

/// Create the processors for `settings`, whose states start at `start_index`
///
/// Segment offsets come from the [`StateLayout`] of the settings, which the
/// returned set carries. Custom settings occupy their declared size but
/// produce no processor. Every hybrid entry other than a custom one must
/// produce exactly one processor.
pub fn create_integrated_state_processors<T: Epoch, S: StateScalar>(
    settings: &PropagatorSettings,
    bodies: &BodyCollection,
    frame_provider: &dyn FrameTranslationProvider<T, S>,
    processor_settings: &ProcessorSettings,
    start_index: usize,
) -> Result<StateProcessors<T, S>> {
    let layout = StateLayout::from_settings_at(settings, start_index)?;
    let create_leaf = |sub: &PropagatorSettings, segment: &StateSegment| {
        create_leaf_processors(sub, segment, bodies, frame_provider, processor_settings)
    };

    let processors = match settings {
        PropagatorSettings::Hybrid { sub_settings } => {
            let processors = sub_settings
                .iter()
                .flatten()
                .zip(layout.segments())
                .enumerate()
                .try_fold(
                    ProcessorMap::new(),
                    |mut processors, (index, (sub, segment))| -> Result<ProcessorMap<T, S>> {
                        let sub_processors = create_leaf(sub, segment)?;
                        check_hybrid_entry(index, sub.state_type(), &sub_processors)?;
                        for (state_type, list) in sub_processors {
                            processors.entry(state_type).or_insert_with(Vec::new).extend(list);
                        }
                        Ok(processors)
                    },
                )?;
            debug!(
                "Created processors for {} hybrid entries covering {} states",
                sub_settings.len(),
                layout.total_size()
            );
            processors
        }
        leaf => {
            let segment = layout.segments().first().ok_or_else(|| {
                IntegratedStateError::LayoutInconsistency(format!(
                    "no segment laid out for {} settings",
                    leaf.state_type()
                ))
            })?;
            create_leaf(leaf, segment)?
        }
    };
    Ok(StateProcessors::new(processors, layout))
}

/// Processors of one non-hybrid node occupying `segment`
fn create_leaf_processors<T: Epoch, S: StateScalar>(
    settings: &PropagatorSettings,
    segment: &StateSegment,
    bodies: &BodyCollection,
    frame_provider: &dyn FrameTranslationProvider<T, S>,
    processor_settings: &ProcessorSettings,
) -> Result<ProcessorMap<T, S>> {
    match settings {
        PropagatorSettings::Translational {
            bodies_to_integrate,
            central_bodies,
        } => {
            check_translational_states_feasibility(bodies_to_integrate, bodies)?;
            let processor = TranslationalStateProcessor::new(
                segment.start_index,
                bodies_to_integrate.clone(),
                central_bodies.clone(),
                bodies,
                frame_provider,
                processor_settings.translational_reset_policy,
            )?;
            Ok(single_processor(Box::new(processor)))
        }
        PropagatorSettings::Rotational {
            bodies_to_integrate,
        } => Ok(single_processor(Box::new(RotationalStateProcessor::new(
            segment.start_index,
            bodies_to_integrate.clone(),
            processor_settings.rotational_reset_policy,
        )))),
        PropagatorSettings::Mass {
            bodies_to_integrate,
        } => Ok(single_processor(Box::new(BodyMassStateProcessor::new(
            segment.start_index,
            bodies_to_integrate.clone(),
        )))),
        PropagatorSettings::Custom { .. } => Ok(ProcessorMap::new()),
        PropagatorSettings::Hybrid { .. } => Err(IntegratedStateError::NestedHybrid { index: 0 }),
    }
}

/// A hybrid entry must yield one processor of one type, or none if custom
fn check_hybrid_entry<T: Epoch, S: StateScalar>(
    index: usize,
    state_type: IntegratedStateType,
    processors: &ProcessorMap<T, S>,
) -> Result<()> {
    let processor_count: usize = processors.values().map(Vec::len).sum();
    let reason = if processors.len() > 1 {
        format!("{} state types found", processors.len())
    } else if processor_count > 1 {
        format!("{} {} processors found", processor_count, state_type)
    } else if processor_count == 0 && state_type != IntegratedStateType::Custom {
        format!("no processor found for {} settings", state_type)
    } else {
        return Ok(());
    };
    Err(IntegratedStateError::AmbiguousHybridComposition { index, reason })
}
