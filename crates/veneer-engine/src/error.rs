//! Error types for proxy synthesis
//!
//! Synthesis errors are configuration failures: fatal, surfaced
//! synchronously to the caller requesting synthesis, never retried by the
//! engine, and never cached. Retrying with the same descriptors
//! reproduces the same error.

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Synthesis-time failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    /// The target type is not an interface
    #[error("the target type must be an interface: {name} is a {kind}")]
    NotAnInterface {
        /// Target type name
        name: String,
        /// The kind it actually is
        kind: String,
    },

    /// The target type is an unbound generic definition
    #[error("the target type cannot be a generic definition: {name}")]
    UnboundGeneric {
        /// Target type name
        name: String,
    },

    /// More than one base method structurally matches one interface method
    #[error("ambiguous match for {method}: {candidates} methods on {base} share its signature")]
    AmbiguousMatch {
        /// The interface method being planned
        method: String,
        /// The base type whose methods were searched
        base: String,
        /// Number of structurally matching candidates
        candidates: usize,
    },
}
