//! Dynamic invocation contract
//!
//! A base type opts into dynamic dispatch by having its instances expose a
//! [`DynamicInvoker`]: one `invoke` operation receiving the identity of
//! the interface method being called and the ordered, boxed argument
//! list. The synthesizer routes an interface method here only when no
//! structurally matching base method exists and the base declared the
//! capability.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::DispatchResult;
use crate::sig::{MethodSig, TypeRef};
use crate::value::Value;

/// Runtime identity of an interface method, as delivered to a dynamic
/// invoker.
///
/// For generic methods the identity is specialized: `type_args` holds the
/// concrete type arguments the call site supplied, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodIdentity {
    /// Name of the interface that declares the method
    pub interface: String,
    /// The method's structural signature
    pub method: Arc<MethodSig>,
    /// Concrete type arguments for a generic method; empty otherwise
    pub type_args: Vec<TypeRef>,
}

impl MethodIdentity {
    /// Method name shorthand
    pub fn name(&self) -> &str {
        &self.method.name
    }

    /// The method's return type with generic parameters substituted by
    /// the call site's type arguments.
    pub fn resolved_return_type(&self) -> TypeRef {
        self.method.return_type.resolve(&self.type_args)
    }
}

impl fmt::Display for MethodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.interface, self.method.name)?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        write!(f, "(")?;
        for (i, param) in self.method.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.resolve(&self.type_args))?;
        }
        write!(f, ")")
    }
}

/// The dynamic invocation capability a base type may declare.
///
/// `invoke` receives every call for which synthesis found no structural
/// match: the specialized method identity plus the boxed arguments in
/// call-site order. Whatever it returns is unboxed against the declared
/// return type; whatever it raises is propagated to the caller unchanged.
pub trait DynamicInvoker: Send + Sync {
    /// Handle one dynamically dispatched call
    fn invoke(&self, method: &MethodIdentity, args: Vec<Value>) -> DispatchResult<Value>;
}

/// Adapter turning a closure into a [`DynamicInvoker`]
pub struct FnInvoker<F>(F);

impl<F> FnInvoker<F>
where
    F: Fn(&MethodIdentity, Vec<Value>) -> DispatchResult<Value> + Send + Sync,
{
    /// Wrap a closure as an invoker
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> DynamicInvoker for FnInvoker<F>
where
    F: Fn(&MethodIdentity, Vec<Value>) -> DispatchResult<Value> + Send + Sync,
{
    fn invoke(&self, method: &MethodIdentity, args: Vec<Value>) -> DispatchResult<Value> {
        (self.0)(method, args)
    }
}

/// A live instance of a base type, as produced by a forwarded constructor.
///
/// Base method bodies receive the instance through this trait and recover
/// their concrete state via [`BaseInstance::as_any`]. Instances of types
/// that declared the dynamic invocation capability return their invoker
/// from [`BaseInstance::invoker`].
pub trait BaseInstance: Send + Sync {
    /// Downcast access to the concrete instance state
    fn as_any(&self) -> &dyn Any;

    /// The instance's dynamic invoker, when the base type declares the
    /// capability
    fn invoker(&self) -> Option<&dyn DynamicInvoker> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_display() {
        let identity = MethodIdentity {
            interface: "ITube".to_string(),
            method: Arc::new(
                MethodSig::new("receive")
                    .with_type_params(1)
                    .with_param(TypeRef::param(0))
                    .returns(TypeRef::param(0)),
            ),
            type_args: vec![TypeRef::named("i32")],
        };
        assert_eq!(identity.to_string(), "ITube::receive<i32>(i32)");
        assert_eq!(identity.resolved_return_type(), TypeRef::named("i32"));
    }

    #[test]
    fn test_fn_invoker() {
        let invoker = FnInvoker::new(|method, args| {
            assert_eq!(method.name(), "poke");
            Ok(args.into_iter().next().unwrap_or(Value::Null))
        });

        let identity = MethodIdentity {
            interface: "IAny".to_string(),
            method: Arc::new(MethodSig::new("poke").with_param(TypeRef::named("i32"))),
            type_args: Vec::new(),
        };
        let result = invoker.invoke(&identity, vec![Value::i32(5)]).unwrap();
        assert_eq!(result, Value::i32(5));
    }
}
