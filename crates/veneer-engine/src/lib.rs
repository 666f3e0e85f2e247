//! Veneer proxy engine
//!
//! Veneer synthesizes, at runtime, adapter types that implement a
//! described interface by delegating to a described base type:
//! - methods with a structurally matching base method **forward** to it
//!   directly;
//! - methods without a match route through the base's single
//!   **dynamic invocation** entry point, when the base declares that
//!   capability;
//! - everything else fails lazily with a not-implemented error, leaving
//!   sibling methods usable.
//!
//! The pieces:
//! - [`descriptor`]: interface/base descriptors and their builders
//! - [`signature`]: structural signature matching
//! - [`plan`]: per-method dispatch planning
//! - [`synth`]: blueprint construction and materialized proxy types
//! - [`sink`]: the type-definition sink definitions are written into
//! - [`instance`]: live proxies and call dispatch
//! - [`cache`]: the exactly-once-per-key synthesis cache
//!
//! # Example
//!
//! ```ignore
//! use veneer_engine::{BaseDescriptor, InterfaceDescriptor, ProxyBinder};
//! use veneer_sdk::{MethodSig, TypeRef, Value};
//!
//! let iface = InterfaceDescriptor::builder("IGreeter")
//!     .method(MethodSig::new("greet").returns(TypeRef::named("string")))
//!     .build();
//! let base = BaseDescriptor::builder("Greeter")
//!     .constructor(vec![], |_| Ok(std::sync::Arc::new(MyGreeter)))
//!     .method(
//!         MethodSig::new("greet").returns(TypeRef::named("string")),
//!         |_, _, _| Ok(Value::str("hello")),
//!     )
//!     .build();
//!
//! let binder = ProxyBinder::new();
//! let proxy_type = binder.get_or_create(&iface, &base)?;
//! let proxy = proxy_type.instantiate(&[])?;
//! assert_eq!(proxy.call("greet", &[])?, Value::str("hello"));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cache;
pub mod descriptor;
pub mod error;
pub mod instance;
pub mod plan;
pub mod signature;
pub mod sink;
pub mod synth;

pub use cache::ProxyBinder;
pub use descriptor::{
    BaseDescriptor, ConstructorDescriptor, InterfaceDescriptor, MethodBody, PropertySig,
    ReachableMethod, TypeKind, TypeToken,
};
pub use error::{SynthesisError, SynthesisResult};
pub use instance::ProxyInstance;
pub use plan::MethodPlan;
pub use sink::{InProcessTypeSink, TypeSink};
pub use synth::{
    DispatchStrategy, MethodSlot, PropertyBinding, SynthesizedType, TypeBlueprint,
};

// The SDK types appear throughout the engine's public surface; re-export
// the crate so consumers need a single dependency.
pub use veneer_sdk as sdk;
