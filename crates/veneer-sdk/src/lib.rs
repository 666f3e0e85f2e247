//! Veneer SDK - Lightweight contracts for dynamically-invokable base types
//!
//! This crate provides the minimal vocabulary shared between the veneer
//! synthesis engine and authors of base types:
//! - [`Value`]: the universal boxed value moved through the dynamic
//!   dispatch channel
//! - [`TypeRef`] / [`MethodSig`]: structural signature descriptions
//! - [`DynamicInvoker`] / [`MethodIdentity`]: the single-operation
//!   dynamic invocation contract
//! - [`BaseInstance`]: what a forwarded constructor produces
//! - [`FromValue`] / [`IntoValue`]: exact, coercion-free conversions
//!
//! A base type that wants to receive calls for interface methods it does
//! not declare implements [`DynamicInvoker`] and reports it from
//! [`BaseInstance::invoker`]; everything else is data.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod convert;
pub mod error;
pub mod invoker;
pub mod sig;
pub mod value;

pub use convert::{FromValue, IntoValue};
pub use error::{DispatchError, DispatchResult};
pub use invoker::{BaseInstance, DynamicInvoker, FnInvoker, MethodIdentity};
pub use sig::{MethodSig, TypeRef, GETTER_PREFIX, SETTER_PREFIX};
pub use value::{ObjectValue, Value, ValueKind};
