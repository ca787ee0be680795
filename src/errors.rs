//! Error types for integrated state processing
//!
//! Every failure raised while building state processors or installing
//! integrated states into the environment is fatal for the call that raised
//! it. Bodies processed before the failure keep their new representations.

use std::path::PathBuf;

use thiserror::Error;

use crate::propagation::IntegratedStateType;

/// Main error type for integrated state processing
#[derive(Error, Debug)]
pub enum IntegratedStateError {
    /// Segment sizes disagree with the flat state vector or with a body count
    #[error("Layout inconsistency: {0}")]
    LayoutInconsistency(String),

    /// A propagator settings node reports a kind this layer does not know
    #[error("Unknown integrated state type: {0}")]
    UnknownStateType(String),

    /// A hybrid entry produced zero (non-custom) or several processors
    #[error("Ambiguous hybrid composition at entry {index}: {reason}")]
    AmbiguousHybridComposition {
        /// Position of the entry in the hybrid settings
        index: usize,
        /// What was found instead of a single processor
        reason: String,
    },

    /// A hybrid settings node contains another hybrid settings node
    #[error("Hybrid propagator settings cannot contain hybrid settings (entry {index})")]
    NestedHybrid {
        /// Position of the nested entry
        index: usize,
    },

    /// A hybrid settings entry is null
    #[error("Hybrid propagator settings entry {index} is not defined")]
    MissingHybridEntry {
        /// Position of the missing entry
        index: usize,
    },

    /// A body identifier is absent from the list it was looked up in
    #[error("Body {body} not found in {context}")]
    BodyNotFound {
        /// The requested body
        body: String,
        /// The list or collection that was searched
        context: String,
    },

    /// The body carries no representation of the kind that is to be reset
    #[error("No {kind} found for body {body}")]
    MissingEphemeris {
        /// The body being reset
        body: String,
        /// The representation that was expected
        kind: &'static str,
    },

    /// The body carries a representation that cannot be reset in place
    #[error("Cannot reset {expected} of body {body}: body has a {found}")]
    WrongEphemerisType {
        /// The body being reset
        body: String,
        /// The representation that can be reset
        expected: &'static str,
        /// The representation the body actually has
        found: &'static str,
    },

    /// The requested processing is not available for this state type
    #[error("Cannot {operation} for {state_type} states")]
    UnsupportedOperation {
        /// State type of the processor
        state_type: IntegratedStateType,
        /// The operation that was requested
        operation: &'static str,
    },

    /// An ephemeris update order is not a permutation of the integrated bodies
    #[error("Invalid ephemeris update order: {0}")]
    InvalidUpdateOrder(String),

    /// Ephemeris origins of the integrated bodies depend on each other cyclically
    #[error("Cyclic frame origin dependency between bodies {0:?}")]
    CyclicFrameDependency(Vec<String>),

    /// Propagator settings contradict themselves
    #[error("Inconsistent propagator settings: {0}")]
    InconsistentSettings(String),

    /// Arc solutions and arc start times disagree
    #[error("Invalid arcs: {0}")]
    InvalidArcs(String),

    /// The numerical solution violates the container invariants
    #[error("Invalid numerical solution: {0}")]
    InvalidNumericalSolution(String),

    /// An interpolant could not be built or evaluated
    #[error("Interpolation error: {0}")]
    InterpolationError(String),

    /// A frame origin is neither a body nor the global frame origin
    #[error("Frame origin {0} not found")]
    FrameNotFound(String),

    /// Settings could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Error when a file I/O operation fails
    #[error("File I/O error on {path:?}: {source}")]
    Io {
        /// The path of the file that caused the error
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Result type for integrated state operations
pub type Result<T> = std::result::Result<T, IntegratedStateError>;

/// Helper function to convert a std::io::Error to IntegratedStateError
pub fn io_err(path: impl Into<PathBuf>, err: std::io::Error) -> IntegratedStateError {
    IntegratedStateError::Io {
        path: path.into(),
        source: err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = IntegratedStateError::BodyNotFound {
            body: "Mars".to_string(),
            context: "bodies to integrate".to_string(),
        };
        assert_eq!(err.to_string(), "Body Mars not found in bodies to integrate");

        let err = IntegratedStateError::UnsupportedOperation {
            state_type: IntegratedStateType::Rotational,
            operation: "reset multi-arc states",
        };
        assert_eq!(
            err.to_string(),
            "Cannot reset multi-arc states for rotational states"
        );
    }

    #[test]
    fn test_io_err_keeps_path() {
        let err = io_err(
            "settings.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        match err {
            IntegratedStateError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("settings.json"))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
