//! Bodies and the body collection that integrated states are installed into
//!
//! A [`BodyCollection`] is the shared, mutable environment. Processors never
//! hold on to it; every processing call receives it explicitly.

use std::collections::BTreeMap;

use log::debug;
use nalgebra::Vector6;

use crate::constants::GLOBAL_FRAME_ORIGIN;
use crate::ephemerides::{Ephemeris, RotationalEphemeris};
use crate::errors::{IntegratedStateError, Result};
use crate::interpolators::LagrangeInterpolator;

/// Mass of a body as a function of time
#[derive(Debug, Clone)]
pub enum BodyMassFunction {
    Constant(f64),
    Tabulated(LagrangeInterpolator<f64, f64>),
}

impl BodyMassFunction {
    /// Mass at `seconds` since J2000
    pub fn mass(&self, seconds: f64) -> f64 {
        match self {
            BodyMassFunction::Constant(mass) => *mass,
            BodyMassFunction::Tabulated(interpolator) => interpolator.interpolate(seconds),
        }
    }
}

/// A body and the environment models attached to it
#[derive(Debug, Clone)]
pub struct Body {
    name: String,
    ephemeris: Option<Ephemeris>,
    rotational_ephemeris: Option<RotationalEphemeris>,
    mass_function: Option<BodyMassFunction>,
    /// Span covered by the installed ephemeris, refreshed on update
    ephemeris_time_bounds: Option<(f64, f64)>,
    /// Number of ephemeris-dependent refreshes performed
    ephemeris_dependent_updates: usize,
}

impl Body {
    /// Create a body with no models attached
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ephemeris: None,
            rotational_ephemeris: None,
            mass_function: None,
            ephemeris_time_bounds: None,
            ephemeris_dependent_updates: 0,
        }
    }

    pub fn with_ephemeris(mut self, ephemeris: Ephemeris) -> Self {
        self.ephemeris = Some(ephemeris);
        self
    }

    pub fn with_rotational_ephemeris(mut self, rotational_ephemeris: RotationalEphemeris) -> Self {
        self.rotational_ephemeris = Some(rotational_ephemeris);
        self
    }

    pub fn with_constant_mass(mut self, mass: f64) -> Self {
        self.mass_function = Some(BodyMassFunction::Constant(mass));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ephemeris(&self) -> Option<&Ephemeris> {
        self.ephemeris.as_ref()
    }

    pub fn ephemeris_mut(&mut self) -> Option<&mut Ephemeris> {
        self.ephemeris.as_mut()
    }

    pub fn rotational_ephemeris(&self) -> Option<&RotationalEphemeris> {
        self.rotational_ephemeris.as_ref()
    }

    pub fn rotational_ephemeris_mut(&mut self) -> Option<&mut RotationalEphemeris> {
        self.rotational_ephemeris.as_mut()
    }

    pub fn mass_function(&self) -> Option<&BodyMassFunction> {
        self.mass_function.as_ref()
    }

    /// Install a mass function, handing back the one it replaces
    pub fn set_mass_function(
        &mut self,
        mass_function: BodyMassFunction,
    ) -> Option<BodyMassFunction> {
        self.mass_function.replace(mass_function)
    }

    /// Mass at `seconds` since J2000, if a mass function is attached
    pub fn mass(&self, seconds: f64) -> Option<f64> {
        self.mass_function.as_ref().map(|m| m.mass(seconds))
    }

    pub fn ephemeris_time_bounds(&self) -> Option<(f64, f64)> {
        self.ephemeris_time_bounds
    }

    pub fn ephemeris_dependent_updates(&self) -> usize {
        self.ephemeris_dependent_updates
    }

    /// Recompute quantities derived from the installed ephemeris
    pub fn update_ephemeris_dependent_quantities(&mut self) {
        self.ephemeris_time_bounds = self.ephemeris.as_ref().and_then(Ephemeris::time_bounds);
        self.ephemeris_dependent_updates += 1;
    }
}

/// Named bodies making up the simulation environment
#[derive(Debug, Clone)]
pub struct BodyCollection {
    bodies: BTreeMap<String, Body>,
    global_frame_origin: String,
}

impl Default for BodyCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyCollection {
    /// Create an empty collection whose global frame is centred on the SSB
    pub fn new() -> Self {
        Self::with_global_frame_origin(GLOBAL_FRAME_ORIGIN)
    }

    pub fn with_global_frame_origin(origin: impl Into<String>) -> Self {
        Self {
            bodies: BTreeMap::new(),
            global_frame_origin: origin.into(),
        }
    }

    /// Add a body, replacing any body of the same name
    pub fn insert(&mut self, body: Body) -> Option<Body> {
        self.bodies.insert(body.name.clone(), body)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bodies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }

    pub fn global_frame_origin(&self) -> &str {
        &self.global_frame_origin
    }

    pub fn get(&self, name: &str) -> Result<&Body> {
        self.bodies
            .get(name)
            .ok_or_else(|| IntegratedStateError::BodyNotFound {
                body: name.to_string(),
                context: "body collection".to_string(),
            })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Body> {
        self.bodies
            .get_mut(name)
            .ok_or_else(|| IntegratedStateError::BodyNotFound {
                body: name.to_string(),
                context: "body collection".to_string(),
            })
    }

    /// Refresh the ephemeris-dependent quantities of every body
    pub fn update_ephemeris_dependent_quantities(&mut self) {
        debug!(
            "Updating ephemeris-dependent quantities of {} bodies",
            self.bodies.len()
        );
        for body in self.bodies.values_mut() {
            body.update_ephemeris_dependent_quantities();
        }
    }

    /// State of a body or frame origin relative to the global frame origin
    ///
    /// Follows the chain of ephemeris origins until the global origin is
    /// reached, summing the states along the way.
    pub fn state_in_global_frame(&self, name: &str, seconds: f64) -> Result<Vector6<f64>> {
        let mut state = Vector6::zeros();
        let mut chain: Vec<String> = Vec::new();
        let mut current = name;

        while current != self.global_frame_origin {
            if chain.iter().any(|visited| visited == current) {
                chain.push(current.to_string());
                return Err(IntegratedStateError::CyclicFrameDependency(chain));
            }
            chain.push(current.to_string());

            let body = self
                .bodies
                .get(current)
                .ok_or_else(|| IntegratedStateError::FrameNotFound(current.to_string()))?;
            let ephemeris =
                body.ephemeris
                    .as_ref()
                    .ok_or_else(|| IntegratedStateError::MissingEphemeris {
                        body: current.to_string(),
                        kind: "ephemeris",
                    })?;

            state += ephemeris.cartesian_state(seconds)?;
            current = ephemeris.reference_frame_origin();
        }

        Ok(state)
    }

    /// State of `target` relative to `observer`
    pub fn relative_state(
        &self,
        target: &str,
        observer: &str,
        seconds: f64,
    ) -> Result<Vector6<f64>> {
        if target == observer {
            return Ok(Vector6::zeros());
        }
        Ok(self.state_in_global_frame(target, seconds)?
            - self.state_in_global_frame(observer, seconds)?)
    }
}
