//! Multi-arc ephemeris: one tabulated ephemeris per propagation arc
//!
//! An arc covers the interval from its start time up to the start time of the
//! next arc. The last arc extends indefinitely, and times before the first
//! arc start fall to the first arc.

use nalgebra::Vector6;

use crate::errors::{IntegratedStateError, Result};

use super::tabulated::TabulatedCartesianEphemeris;

/// Arc-indexed Cartesian ephemeris
#[derive(Debug, Clone)]
pub struct MultiArcEphemeris {
    arcs: Vec<TabulatedCartesianEphemeris>,
    arc_start_times: Vec<f64>,
    reference_frame_origin: String,
    reference_frame_orientation: String,
}

fn check_arcs(arc_count: usize, arc_start_times: &[f64]) -> Result<()> {
    if arc_count != arc_start_times.len() {
        return Err(IntegratedStateError::InvalidArcs(format!(
            "{} arc ephemerides given with {} arc start times",
            arc_count,
            arc_start_times.len()
        )));
    }
    if let Some(pair) = arc_start_times.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(IntegratedStateError::InvalidArcs(format!(
            "arc start time {} does not follow {}",
            pair[1], pair[0]
        )));
    }
    Ok(())
}

impl MultiArcEphemeris {
    /// Create a multi-arc ephemeris from arcs and their start times
    pub fn new(
        arcs: Vec<TabulatedCartesianEphemeris>,
        arc_start_times: Vec<f64>,
        reference_frame_origin: impl Into<String>,
        reference_frame_orientation: impl Into<String>,
    ) -> Result<Self> {
        check_arcs(arcs.len(), &arc_start_times)?;
        Ok(Self {
            arcs,
            arc_start_times,
            reference_frame_origin: reference_frame_origin.into(),
            reference_frame_orientation: reference_frame_orientation.into(),
        })
    }

    /// Placeholder with no arcs, to be filled by a multi-arc reset
    pub fn empty(
        reference_frame_origin: impl Into<String>,
        reference_frame_orientation: impl Into<String>,
    ) -> Self {
        Self {
            arcs: Vec::new(),
            arc_start_times: Vec::new(),
            reference_frame_origin: reference_frame_origin.into(),
            reference_frame_orientation: reference_frame_orientation.into(),
        }
    }

    /// Replace every arc and every arc start time at once
    ///
    /// On error the existing arcs are left untouched.
    pub fn reset_single_arc_ephemerides(
        &mut self,
        arcs: Vec<TabulatedCartesianEphemeris>,
        arc_start_times: Vec<f64>,
    ) -> Result<()> {
        check_arcs(arcs.len(), &arc_start_times)?;
        self.arcs = arcs;
        self.arc_start_times = arc_start_times;
        Ok(())
    }

    pub fn arcs(&self) -> &[TabulatedCartesianEphemeris] {
        &self.arcs
    }

    pub fn arc_start_times(&self) -> &[f64] {
        &self.arc_start_times
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn reference_frame_origin(&self) -> &str {
        &self.reference_frame_origin
    }

    pub fn reference_frame_orientation(&self) -> &str {
        &self.reference_frame_orientation
    }

    /// Index of the arc covering `seconds`
    pub fn arc_index(&self, seconds: f64) -> Option<usize> {
        if self.arcs.is_empty() {
            return None;
        }
        Some(
            self.arc_start_times
                .partition_point(|start| *start <= seconds)
                .saturating_sub(1),
        )
    }

    /// State at `seconds` since J2000 from the covering arc
    pub fn cartesian_state(&self, seconds: f64) -> Result<Vector6<f64>> {
        let index = self.arc_index(seconds).ok_or_else(|| {
            IntegratedStateError::InterpolationError(format!(
                "multi-arc ephemeris relative to {} has no arcs",
                self.reference_frame_origin
            ))
        })?;
        Ok(self.arcs[index].cartesian_state(seconds))
    }

    /// Start of the first arc and end of the last arc's data
    pub fn time_bounds(&self) -> Option<(f64, f64)> {
        let first = self.arc_start_times.first()?;
        let last = self.arcs.last()?;
        Some((*first, last.history().time_bounds().1))
    }
}
