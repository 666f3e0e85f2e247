//! Error types for proxy dispatch
//!
//! `DispatchError` is shared between the engine and dynamic invoker
//! implementors: the engine raises the structural failures, invokers
//! raise `Failed` (or any other variant they find fitting), and the
//! engine propagates invoker errors to the caller unchanged.

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Call-time dispatch failures
///
/// These are failures of one specific call. They never invalidate the
/// synthesized type or other methods on the same proxy instance.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// The method has no matching base method and the base declares no
    /// dynamic invocation capability
    #[error("method not implemented: {method}")]
    NotImplemented {
        /// The unimplementable method
        method: String,
    },

    /// No method with this name is declared on the proxy's interface
    #[error("no such method: {name}")]
    UnknownMethod {
        /// Requested method name
        name: String,
    },

    /// More than one slot answers to this name and arity
    #[error("ambiguous call: {name} with {arity} argument(s) matches multiple methods")]
    AmbiguousCall {
        /// Requested method name
        name: String,
        /// Supplied argument count
        arity: usize,
    },

    /// No property with this name is declared on the proxy's interface
    #[error("no such property: {name}")]
    UnknownProperty {
        /// Requested property name
        name: String,
    },

    /// The property declares no getter
    #[error("property is not readable: {name}")]
    PropertyNotReadable {
        /// Property name
        name: String,
    },

    /// The property declares no setter
    #[error("property is not writable: {name}")]
    PropertyNotWritable {
        /// Property name
        name: String,
    },

    /// Wrong number of arguments for the method
    #[error("{method}: expected {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Method name
        method: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Wrong number of type arguments for a generic method
    #[error("{method}: expected {expected} type argument(s), got {got}")]
    TypeArityMismatch {
        /// Method name
        method: String,
        /// Declared generic-parameter count
        expected: usize,
        /// Supplied type-argument count
        got: usize,
    },

    /// A type argument is not a concrete type
    #[error("{method}: type argument {position} is not concrete")]
    TypeArgumentNotConcrete {
        /// Method name
        method: String,
        /// Offending type-argument position
        position: usize,
    },

    /// A value does not conform to the declared type
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Declared type
        expected: String,
        /// Actual value type
        got: String,
    },

    /// No forwarded constructor accepts the supplied arguments
    #[error("no constructor accepts the supplied {arity} argument(s)")]
    NoMatchingConstructor {
        /// Supplied argument count
        arity: usize,
    },

    /// More than one forwarded constructor accepts the supplied arguments
    #[error("ambiguous constructor: {candidates} candidates accept the supplied arguments")]
    AmbiguousConstructor {
        /// Number of conforming constructors
        candidates: usize,
    },

    /// The base type advertised the dynamic invocation capability but the
    /// instance provides no invoker
    #[error("base instance of {type_name} provides no dynamic invoker")]
    MissingInvoker {
        /// Base type name
        type_name: String,
    },

    /// Failure raised by a dynamic invoker or base method body
    #[error("{0}")]
    Failed(String),
}

impl From<String> for DispatchError {
    fn from(s: String) -> Self {
        DispatchError::Failed(s)
    }
}

impl From<&str> for DispatchError {
    fn from(s: &str) -> Self {
        DispatchError::Failed(s.to_string())
    }
}
