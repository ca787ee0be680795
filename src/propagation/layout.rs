//! Decomposition of the flat state vector into per-kind segments

use std::fmt;

use serde::Serialize;

use crate::errors::{IntegratedStateError, Result};

use super::settings::{IntegratedStateType, PropagatorSettings};

/// Contiguous range of the flat state vector holding one kind of state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSegment {
    pub state_type: IntegratedStateType,
    pub start_index: usize,
    pub size: usize,
    /// Bodies whose blocks fill the segment, in propagation order
    pub bodies: Vec<String>,
}

impl StateSegment {
    /// One past the last index of the segment
    pub fn end_index(&self) -> usize {
        self.start_index + self.size
    }
}

/// Ordered, non-overlapping segments covering the flat state vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateLayout {
    start_index: usize,
    segments: Vec<StateSegment>,
}

/// Check the settings of a translational node
pub(crate) fn check_translational_settings(
    bodies_to_integrate: &[String],
    central_bodies: &[String],
) -> Result<()> {
    if bodies_to_integrate.len() != central_bodies.len() {
        return Err(IntegratedStateError::InconsistentSettings(format!(
            "{} bodies to integrate but {} central bodies",
            bodies_to_integrate.len(),
            central_bodies.len()
        )));
    }
    Ok(())
}

impl StateLayout {
    /// Compute the layout of `settings`, starting at index 0
    pub fn from_settings(settings: &PropagatorSettings) -> Result<Self> {
        Self::from_settings_at(settings, 0)
    }

    /// Compute the layout of `settings` placed at `start_index`
    ///
    /// A hybrid node yields one segment per entry, in entry order.
    pub fn from_settings_at(settings: &PropagatorSettings, start_index: usize) -> Result<Self> {
        let (segments, _) = Self::segments_from(settings, start_index)?;
        Ok(Self {
            start_index,
            segments,
        })
    }

    /// Segments of one node and the index following them
    fn segments_from(
        settings: &PropagatorSettings,
        start_index: usize,
    ) -> Result<(Vec<StateSegment>, usize)> {
        match settings {
            PropagatorSettings::Hybrid { sub_settings } => sub_settings.iter().enumerate().try_fold(
                (Vec::new(), start_index),
                |(mut segments, offset), (index, entry)| match entry {
                    None => Err(IntegratedStateError::MissingHybridEntry { index }),
                    Some(PropagatorSettings::Hybrid { .. }) => {
                        Err(IntegratedStateError::NestedHybrid { index })
                    }
                    Some(sub) => {
                        let (sub_segments, next) = Self::segments_from(sub, offset)?;
                        segments.extend(sub_segments);
                        Ok((segments, next))
                    }
                },
            ),
            other => {
                if let PropagatorSettings::Translational {
                    bodies_to_integrate,
                    central_bodies,
                } = other
                {
                    check_translational_settings(bodies_to_integrate, central_bodies)?;
                }
                let size = other.state_size()?;
                let segment = StateSegment {
                    state_type: other.state_type(),
                    start_index,
                    size,
                    bodies: other.bodies_to_integrate().to_vec(),
                };
                Ok((vec![segment], start_index + size))
            }
        }
    }

    pub fn segments(&self) -> &[StateSegment] {
        &self.segments
    }

    /// Sum of all segment sizes
    pub fn total_size(&self) -> usize {
        self.segments.iter().map(|segment| segment.size).sum()
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// One past the last index covered by the layout
    pub fn end_index(&self) -> usize {
        self.start_index + self.total_size()
    }

    /// Segments holding states of one kind
    pub fn segments_of(
        &self,
        state_type: IntegratedStateType,
    ) -> impl Iterator<Item = &StateSegment> {
        self.segments
            .iter()
            .filter(move |segment| segment.state_type == state_type)
    }

    /// Check that the layout ends exactly at the end of flat state vectors
    /// of `state_size` entries
    pub fn check_solution(&self, state_size: usize) -> Result<()> {
        if self.end_index() != state_size {
            return Err(IntegratedStateError::LayoutInconsistency(format!(
                "segments cover entries {}..{} but the state vector has {}",
                self.start_index,
                self.end_index(),
                state_size
            )));
        }
        Ok(())
    }
}

impl fmt::Display for StateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<14} {:>6} {:>6}  bodies", "kind", "start", "size")?;
        for segment in &self.segments {
            writeln!(
                f,
                "{:<14} {:>6} {:>6}  {}",
                segment.state_type.to_string(),
                segment.start_index,
                segment.size,
                segment.bodies.join(", ")
            )?;
        }
        write!(f, "total size: {}", self.total_size())
    }
}
