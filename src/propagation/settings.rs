//! Propagation settings consumed by the state layout builder and the
//! processor factory
//!
//! Settings are plain serde types and can be loaded from JSON:
//!
//! ```json
//! {
//!   "type": "hybrid",
//!   "sub_settings": [
//!     {"type": "translational", "bodies_to_integrate": ["Earth", "Mars"],
//!      "central_bodies": ["SSB", "Earth"]},
//!     {"type": "mass", "bodies_to_integrate": ["Earth", "Mars"]}
//!   ]
//! }
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{MASS_STATE_SIZE, ROTATIONAL_STATE_SIZE, TRANSLATIONAL_STATE_SIZE};
use crate::errors::{io_err, IntegratedStateError, Result};

/// Kind of quantity held by a segment of the flat state vector
///
/// The derived ordering is the order in which processors are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratedStateType {
    Translational,
    Rotational,
    Mass,
    Custom,
    Hybrid,
}

impl IntegratedStateType {
    const KNOWN_TAGS: [&'static str; 5] =
        ["translational", "rotational", "mass", "custom", "hybrid"];

    /// Width of one body's block in the flat state vector
    pub fn single_body_size(&self) -> Result<usize> {
        match self {
            IntegratedStateType::Translational => Ok(TRANSLATIONAL_STATE_SIZE),
            IntegratedStateType::Rotational => Ok(ROTATIONAL_STATE_SIZE),
            IntegratedStateType::Mass => Ok(MASS_STATE_SIZE),
            other => Err(no_fixed_size(*other, "single body size")),
        }
    }

    /// Order of the differential equation governing one body's state
    pub fn differential_equation_order(&self) -> Result<usize> {
        match self {
            IntegratedStateType::Translational => Ok(2),
            IntegratedStateType::Rotational | IntegratedStateType::Mass => Ok(1),
            other => Err(no_fixed_size(*other, "differential equation order")),
        }
    }

    /// Number of entries in the highest derivative of one body's state
    pub fn acceleration_size(&self) -> Result<usize> {
        match self {
            IntegratedStateType::Translational | IntegratedStateType::Rotational => Ok(3),
            IntegratedStateType::Mass => Ok(1),
            other => Err(no_fixed_size(*other, "acceleration size")),
        }
    }
}

fn no_fixed_size(state_type: IntegratedStateType, what: &str) -> IntegratedStateError {
    IntegratedStateError::UnknownStateType(format!("{} has no {}", state_type, what))
}

impl fmt::Display for IntegratedStateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntegratedStateType::Translational => "translational",
            IntegratedStateType::Rotational => "rotational",
            IntegratedStateType::Mass => "mass",
            IntegratedStateType::Custom => "custom",
            IntegratedStateType::Hybrid => "hybrid",
        };
        write!(f, "{}", name)
    }
}

/// Propagation settings node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropagatorSettings {
    /// Position and velocity of each body relative to its central body
    Translational {
        bodies_to_integrate: Vec<String>,
        central_bodies: Vec<String>,
    },
    /// Quaternion and angular velocity of each body
    Rotational { bodies_to_integrate: Vec<String> },
    /// Mass of each body
    Mass { bodies_to_integrate: Vec<String> },
    /// User-defined states; opaque to this crate
    Custom {
        #[serde(default)]
        state_size: usize,
    },
    /// Ordered concatenation of other settings; entries may be null
    Hybrid { sub_settings: Vec<Option<PropagatorSettings>> },
}

impl PropagatorSettings {
    pub fn translational<S: Into<String>>(
        bodies_to_integrate: impl IntoIterator<Item = S>,
        central_bodies: impl IntoIterator<Item = S>,
    ) -> Self {
        PropagatorSettings::Translational {
            bodies_to_integrate: bodies_to_integrate.into_iter().map(Into::into).collect(),
            central_bodies: central_bodies.into_iter().map(Into::into).collect(),
        }
    }

    pub fn rotational<S: Into<String>>(bodies_to_integrate: impl IntoIterator<Item = S>) -> Self {
        PropagatorSettings::Rotational {
            bodies_to_integrate: bodies_to_integrate.into_iter().map(Into::into).collect(),
        }
    }

    pub fn mass<S: Into<String>>(bodies_to_integrate: impl IntoIterator<Item = S>) -> Self {
        PropagatorSettings::Mass {
            bodies_to_integrate: bodies_to_integrate.into_iter().map(Into::into).collect(),
        }
    }

    pub fn custom(state_size: usize) -> Self {
        PropagatorSettings::Custom { state_size }
    }

    pub fn hybrid(sub_settings: Vec<PropagatorSettings>) -> Self {
        PropagatorSettings::Hybrid {
            sub_settings: sub_settings.into_iter().map(Some).collect(),
        }
    }

    /// Kind tag of this node
    pub fn state_type(&self) -> IntegratedStateType {
        match self {
            PropagatorSettings::Translational { .. } => IntegratedStateType::Translational,
            PropagatorSettings::Rotational { .. } => IntegratedStateType::Rotational,
            PropagatorSettings::Mass { .. } => IntegratedStateType::Mass,
            PropagatorSettings::Custom { .. } => IntegratedStateType::Custom,
            PropagatorSettings::Hybrid { .. } => IntegratedStateType::Hybrid,
        }
    }

    /// Integrated bodies of a non-hybrid node (empty for custom and hybrid)
    pub fn bodies_to_integrate(&self) -> &[String] {
        match self {
            PropagatorSettings::Translational {
                bodies_to_integrate,
                ..
            }
            | PropagatorSettings::Rotational {
                bodies_to_integrate,
            }
            | PropagatorSettings::Mass {
                bodies_to_integrate,
            } => bodies_to_integrate,
            PropagatorSettings::Custom { .. } | PropagatorSettings::Hybrid { .. } => &[],
        }
    }

    /// Number of entries the node occupies in the flat state vector
    pub fn state_size(&self) -> Result<usize> {
        match self {
            PropagatorSettings::Custom { state_size } => Ok(*state_size),
            PropagatorSettings::Hybrid { sub_settings } => sub_settings
                .iter()
                .enumerate()
                .try_fold(0, |total, (index, entry)| match entry {
                    Some(settings) => Ok(total + settings.state_size()?),
                    None => Err(IntegratedStateError::MissingHybridEntry { index }),
                }),
            other => Ok(other.state_type().single_body_size()? * other.bodies_to_integrate().len()),
        }
    }

    /// Parse settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        check_state_type_tags(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Load settings from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Self::from_json_str(&json)
    }
}

/// Reject nodes whose kind tag is not a known state type
fn check_state_type_tags(value: &Value) -> Result<()> {
    if let Some(tag) = value.get("type").and_then(Value::as_str) {
        if !IntegratedStateType::KNOWN_TAGS.contains(&tag) {
            return Err(IntegratedStateError::UnknownStateType(tag.to_string()));
        }
    }
    if let Some(entries) = value.get("sub_settings").and_then(Value::as_array) {
        for entry in entries {
            check_state_type_tags(entry)?;
        }
    }
    Ok(())
}

/// What to do when a body lacks a resettable representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EphemerisResetPolicy {
    /// Fail the processing call
    Strict,
    /// Log the problem and continue with the next body
    Lenient,
}

/// Options of the integrated state processors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorSettings {
    pub translational_reset_policy: EphemerisResetPolicy,
    pub rotational_reset_policy: EphemerisResetPolicy,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            translational_reset_policy: EphemerisResetPolicy::Strict,
            rotational_reset_policy: EphemerisResetPolicy::Lenient,
        }
    }
}

impl ProcessorSettings {
    /// Fail on missing or incompatible representations of every kind
    pub fn strict() -> Self {
        Self {
            translational_reset_policy: EphemerisResetPolicy::Strict,
            rotational_reset_policy: EphemerisResetPolicy::Strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(IntegratedStateType::Translational, 6, 2, 3)]
    #[case(IntegratedStateType::Rotational, 7, 1, 3)]
    #[case(IntegratedStateType::Mass, 1, 1, 1)]
    fn test_state_type_sizes(
        #[case] state_type: IntegratedStateType,
        #[case] size: usize,
        #[case] order: usize,
        #[case] acceleration: usize,
    ) {
        assert_eq!(state_type.single_body_size().unwrap(), size);
        assert_eq!(state_type.differential_equation_order().unwrap(), order);
        assert_eq!(state_type.acceleration_size().unwrap(), acceleration);
    }

    #[test]
    fn test_custom_has_no_fixed_size() {
        assert!(matches!(
            IntegratedStateType::Custom.single_body_size(),
            Err(IntegratedStateError::UnknownStateType(_))
        ));
    }

    #[test]
    fn test_parse_hybrid_settings() {
        let json = r#"{
            "type": "hybrid",
            "sub_settings": [
                {"type": "translational", "bodies_to_integrate": ["Earth", "Mars"],
                 "central_bodies": ["SSB", "Earth"]},
                {"type": "custom"},
                null,
                {"type": "mass", "bodies_to_integrate": ["Earth", "Mars"]}
            ]
        }"#;
        let settings = PropagatorSettings::from_json_str(json).unwrap();
        match &settings {
            PropagatorSettings::Hybrid { sub_settings } => {
                assert_eq!(sub_settings.len(), 4);
                assert_eq!(sub_settings[1], Some(PropagatorSettings::custom(0)));
                assert!(sub_settings[2].is_none());
            }
            other => panic!("unexpected settings {other:?}"),
        }
        assert!(matches!(
            settings.state_size(),
            Err(IntegratedStateError::MissingHybridEntry { index: 2 })
        ));
    }

    #[test]
    fn test_unknown_tag() {
        let json = r#"{"type": "hybrid", "sub_settings": [{"type": "thermal"}]}"#;
        match PropagatorSettings::from_json_str(json) {
            Err(IntegratedStateError::UnknownStateType(tag)) => assert_eq!(tag, "thermal"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_state_size() {
        let settings = PropagatorSettings::hybrid(vec![
            PropagatorSettings::translational(["Earth", "Mars"], ["SSB", "Earth"]),
            PropagatorSettings::rotational(["Earth"]),
            PropagatorSettings::custom(4),
        ]);
        assert_eq!(settings.state_size().unwrap(), 12 + 7 + 4);
    }

    #[test]
    fn test_processor_settings_defaults() {
        let settings: ProcessorSettings =
            serde_json::from_str(r#"{"rotational_reset_policy": "strict"}"#).unwrap();
        assert_eq!(settings, ProcessorSettings::strict());
        assert_eq!(
            ProcessorSettings::default().rotational_reset_policy,
            EphemerisResetPolicy::Lenient
        );
    }
}
