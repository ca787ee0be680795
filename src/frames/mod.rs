//! Frame translation between integration origins and ephemeris origins
//!
//! Translational states are integrated relative to a central body, while the
//! ephemeris that receives them may be expressed relative to another origin.
//! The provider supplies, per body, the offset between the two origins and an
//! order in which bodies can be updated so that every body whose translation
//! reads another integrated body is updated after it.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use nalgebra::Vector6;

use crate::environment::BodyCollection;
use crate::errors::{IntegratedStateError, Result};
use crate::representation::StateScalar;
use crate::time::Epoch;

/// State of a body's ephemeris origin relative to its integration origin
///
/// The body collection is passed at call time so the offset always reflects
/// the ephemerides installed so far.
pub type FrameTranslationFunction<T, S> = Box<dyn Fn(&BodyCollection, T) -> Result<Vector6<S>>>;

/// Translation functions per body; bodies without an entry need none
pub type FrameTranslationFunctions<T, S> = BTreeMap<String, FrameTranslationFunction<T, S>>;

/// Supplies frame translations and update orders to the translational processor
pub trait FrameTranslationProvider<T: Epoch, S: StateScalar> {
    /// Ephemeris origin of every integrated body, in the given order
    fn ephemeris_origins(
        &self,
        bodies: &BodyCollection,
        bodies_to_integrate: &[String],
    ) -> Result<Vec<String>> {
        bodies_to_integrate
            .iter()
            .map(|name| {
                let body = bodies.get(name)?;
                body.ephemeris()
                    .map(|ephemeris| ephemeris.reference_frame_origin().to_string())
                    .ok_or_else(|| IntegratedStateError::MissingEphemeris {
                        body: name.clone(),
                        kind: "ephemeris",
                    })
            })
            .collect()
    }

    /// Order in which the integrated bodies' ephemerides are to be reset
    fn resolve_update_order(
        &self,
        bodies_to_integrate: &[String],
        central_bodies: &[String],
        ephemeris_origins: &[String],
    ) -> Result<Vec<String>>;

    /// Translation for one body, or `None` when both origins coincide
    fn translation_function(
        &self,
        body: &str,
        central_body: &str,
        ephemeris_origin: &str,
    ) -> Option<FrameTranslationFunction<T, S>>;
}

/// Frame translation provider backed by the body collection's ephemerides
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceFrameManager;

impl ReferenceFrameManager {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Epoch, S: StateScalar> FrameTranslationProvider<T, S> for ReferenceFrameManager {
    fn resolve_update_order(
        &self,
        bodies_to_integrate: &[String],
        central_bodies: &[String],
        ephemeris_origins: &[String],
    ) -> Result<Vec<String>> {
        determine_ephemeris_update_order(bodies_to_integrate, central_bodies, ephemeris_origins)
    }

    fn translation_function(
        &self,
        body: &str,
        central_body: &str,
        ephemeris_origin: &str,
    ) -> Option<FrameTranslationFunction<T, S>> {
        if central_body == ephemeris_origin {
            return None;
        }
        debug!(
            "Body {} is integrated about {} but its ephemeris is relative to {}",
            body, central_body, ephemeris_origin
        );

        let origin = ephemeris_origin.to_string();
        let central = central_body.to_string();
        Some(Box::new(move |bodies: &BodyCollection, time: T| -> Result<Vector6<S>> {
            let offset = bodies.relative_state(&origin, &central, time.seconds_since_j2000())?;
            Ok(offset.map(S::cast_from_f64))
        }))
    }
}

/// Order the integrated bodies so that each follows the bodies it depends on
///
/// A body depends on its central body and on its ephemeris origin when
/// either of those is itself integrated. Among bodies whose dependencies are
/// satisfied, the original order is kept.
pub fn determine_ephemeris_update_order(
    bodies_to_integrate: &[String],
    central_bodies: &[String],
    ephemeris_origins: &[String],
) -> Result<Vec<String>> {
    if central_bodies.len() != bodies_to_integrate.len()
        || ephemeris_origins.len() != bodies_to_integrate.len()
    {
        return Err(IntegratedStateError::InconsistentSettings(format!(
            "{} bodies to integrate with {} central bodies and {} ephemeris origins",
            bodies_to_integrate.len(),
            central_bodies.len(),
            ephemeris_origins.len()
        )));
    }

    let integrated: BTreeSet<&str> = bodies_to_integrate.iter().map(String::as_str).collect();
    let dependencies: Vec<Vec<&str>> = bodies_to_integrate
        .iter()
        .zip(central_bodies.iter().zip(ephemeris_origins))
        .map(|(body, (central, origin))| {
            [central.as_str(), origin.as_str()]
                .into_iter()
                .filter(|dependency| {
                    *dependency != body.as_str() && integrated.contains(dependency)
                })
                .collect()
        })
        .collect();

    let mut placed: BTreeSet<&str> = BTreeSet::new();
    let mut order: Vec<String> = Vec::with_capacity(bodies_to_integrate.len());
    while order.len() < bodies_to_integrate.len() {
        let next = bodies_to_integrate
            .iter()
            .zip(&dependencies)
            .find(|(body, deps)| {
                !placed.contains(body.as_str()) && deps.iter().all(|d| placed.contains(d))
            });

        match next {
            Some((body, _)) => {
                placed.insert(body.as_str());
                order.push(body.clone());
            }
            None => {
                let remaining = bodies_to_integrate
                    .iter()
                    .filter(|body| !placed.contains(body.as_str()))
                    .cloned()
                    .collect();
                return Err(IntegratedStateError::CyclicFrameDependency(remaining));
            }
        }
    }

    debug!("Ephemeris update order: {:?}", order);
    Ok(order)
}

/// Check that an update order is a permutation of the integrated bodies
pub fn check_update_order(update_order: &[String], bodies_to_integrate: &[String]) -> Result<()> {
    if update_order.len() != bodies_to_integrate.len() {
        return Err(IntegratedStateError::InvalidUpdateOrder(format!(
            "order holds {} bodies but {} are integrated",
            update_order.len(),
            bodies_to_integrate.len()
        )));
    }

    let mut seen = BTreeSet::new();
    for body in update_order {
        if !bodies_to_integrate.contains(body) {
            return Err(IntegratedStateError::InvalidUpdateOrder(format!(
                "{} is not an integrated body",
                body
            )));
        }
        if !seen.insert(body.as_str()) {
            return Err(IntegratedStateError::InvalidUpdateOrder(format!(
                "{} appears more than once",
                body
            )));
        }
    }
    Ok(())
}
