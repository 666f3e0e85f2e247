//! Proxy instances and call dispatch
//!
//! A [`ProxyInstance`] couples one base instance with the slot table of
//! its synthesized type. Every call is validated against the slot's
//! signature — argument count, type-argument count, and exact kind
//! conformance — before the slot's strategy runs. Forwarded calls return
//! the base method's result unchanged; dynamically invoked calls carry
//! the specialized method identity and boxed arguments to the base's
//! invoker and unbox the result against the declared return type.

use std::sync::Arc;

use veneer_sdk::error::{DispatchError, DispatchResult};
use veneer_sdk::invoker::{BaseInstance, MethodIdentity};
use veneer_sdk::sig::TypeRef;
use veneer_sdk::value::Value;

use crate::synth::{DispatchStrategy, MethodSlot, SynthesizedType};

/// Check that a value conforms to a declared type.
///
/// Primitive kinds are exact — no widening, no truncation, no implicit
/// conversion. `Null` conforms to any non-primitive named type
/// (reference semantics) and to no primitive kind. Unresolved generic
/// parameters are unconstrained.
pub(crate) fn conforms(value: &Value, ty: &TypeRef) -> DispatchResult<()> {
    let ok = match ty {
        TypeRef::Unit => value.is_null(),
        TypeRef::Param(_) => true,
        TypeRef::Named(name) => {
            if ty.is_primitive() {
                value.type_name() == name.as_ref()
            } else {
                value.is_null() || value.type_name() == name.as_ref()
            }
        }
    };
    if ok {
        Ok(())
    } else {
        Err(DispatchError::TypeMismatch {
            expected: ty.to_string(),
            got: value.type_name().to_string(),
        })
    }
}

impl SynthesizedType {
    /// Instantiate through the forwarded constructor conforming to the
    /// supplied arguments.
    ///
    /// Exactly one constructor must accept the argument list: zero is
    /// [`DispatchError::NoMatchingConstructor`], more than one is
    /// [`DispatchError::AmbiguousConstructor`].
    pub fn instantiate(self: &Arc<Self>, args: &[Value]) -> DispatchResult<ProxyInstance> {
        let mut conforming = self.constructors().iter().enumerate().filter(|(_, ctor)| {
            ctor.params().len() == args.len()
                && ctor
                    .params()
                    .iter()
                    .zip(args.iter())
                    .all(|(param, arg)| conforms(arg, param).is_ok())
        });

        match (conforming.next(), conforming.next()) {
            (Some((index, _)), None) => self.instantiate_with(index, args),
            (None, _) => Err(DispatchError::NoMatchingConstructor { arity: args.len() }),
            (Some(_), Some(_)) => {
                let candidates = self
                    .constructors()
                    .iter()
                    .filter(|ctor| {
                        ctor.params().len() == args.len()
                            && ctor
                                .params()
                                .iter()
                                .zip(args.iter())
                                .all(|(param, arg)| conforms(arg, param).is_ok())
                    })
                    .count();
                Err(DispatchError::AmbiguousConstructor { candidates })
            }
        }
    }

    /// Instantiate through the forwarded constructor at `index`,
    /// forwarding all arguments in order to the base factory.
    pub fn instantiate_with(
        self: &Arc<Self>,
        index: usize,
        args: &[Value],
    ) -> DispatchResult<ProxyInstance> {
        let ctor = self
            .constructors()
            .get(index)
            .ok_or(DispatchError::NoMatchingConstructor { arity: args.len() })?;

        if ctor.params().len() != args.len() {
            return Err(DispatchError::ArityMismatch {
                method: format!("{}::new", self.name()),
                expected: ctor.params().len(),
                got: args.len(),
            });
        }
        for (param, arg) in ctor.params().iter().zip(args.iter()) {
            conforms(arg, param)?;
        }

        let base = (ctor.factory)(args)?;
        Ok(ProxyInstance {
            ty: self.clone(),
            base,
        })
    }
}

/// A live proxy: one base instance behind the synthesized slot table
pub struct ProxyInstance {
    ty: Arc<SynthesizedType>,
    base: Arc<dyn BaseInstance>,
}

impl ProxyInstance {
    /// The synthesized type this instance belongs to
    pub fn synthesized_type(&self) -> &Arc<SynthesizedType> {
        &self.ty
    }

    /// The underlying base instance
    pub fn base(&self) -> &Arc<dyn BaseInstance> {
        &self.base
    }

    /// Downcast access to the base instance's concrete state
    pub fn base_as<T: 'static>(&self) -> Option<&T> {
        self.base.as_any().downcast_ref::<T>()
    }

    /// Call a non-generic interface method by name
    pub fn call(&self, name: &str, args: &[Value]) -> DispatchResult<Value> {
        self.call_generic(name, &[], args)
    }

    /// Call an interface method by name, supplying concrete type
    /// arguments for a generic method.
    ///
    /// Resolution considers name and argument count; several slots
    /// agreeing on both is reported as ambiguous rather than resolved
    /// silently.
    pub fn call_generic(
        &self,
        name: &str,
        type_args: &[TypeRef],
        args: &[Value],
    ) -> DispatchResult<Value> {
        let named = self.ty.slots_named(name);
        if named.is_empty() {
            return Err(DispatchError::UnknownMethod {
                name: name.to_string(),
            });
        }

        let mut by_arity = named
            .iter()
            .copied()
            .filter(|&index| self.ty.slots()[index].sig().params.len() == args.len());

        match (by_arity.next(), by_arity.next()) {
            (Some(index), None) => self.call_slot(index, type_args, args),
            (Some(_), Some(_)) => Err(DispatchError::AmbiguousCall {
                name: name.to_string(),
                arity: args.len(),
            }),
            (None, _) => Err(DispatchError::ArityMismatch {
                method: name.to_string(),
                expected: self.ty.slots()[named[0]].sig().params.len(),
                got: args.len(),
            }),
        }
    }

    /// Call the dispatch slot at `index` directly
    pub fn call_slot(
        &self,
        index: usize,
        type_args: &[TypeRef],
        args: &[Value],
    ) -> DispatchResult<Value> {
        let slot = &self.ty.slots()[index];
        self.validate_call(slot, type_args, args)?;

        match &slot.strategy {
            DispatchStrategy::Forward { body, .. } => {
                // Signatures already match; the result passes through
                // unchanged with no re-boxing.
                body(self.base.as_ref(), type_args, args)
            }
            DispatchStrategy::DynamicInvoke => self.dynamic_invoke(slot, type_args, args),
            DispatchStrategy::Unimplemented => Err(DispatchError::NotImplemented {
                method: slot.sig().to_string(),
            }),
        }
    }

    /// Read a property through its wired getter slot. `index` holds the
    /// index arguments for indexed properties and is empty otherwise.
    pub fn get(&self, property: &str, index: &[Value]) -> DispatchResult<Value> {
        let binding = self
            .ty
            .property(property)
            .ok_or_else(|| DispatchError::UnknownProperty {
                name: property.to_string(),
            })?;
        let slot = binding
            .getter()
            .ok_or_else(|| DispatchError::PropertyNotReadable {
                name: property.to_string(),
            })?;
        self.call_slot(slot, &[], index)
    }

    /// Write a property through its wired setter slot
    pub fn set(&self, property: &str, index: &[Value], value: Value) -> DispatchResult<()> {
        let binding = self
            .ty
            .property(property)
            .ok_or_else(|| DispatchError::UnknownProperty {
                name: property.to_string(),
            })?;
        let slot = binding
            .setter()
            .ok_or_else(|| DispatchError::PropertyNotWritable {
                name: property.to_string(),
            })?;

        let mut args = index.to_vec();
        args.push(value);
        self.call_slot(slot, &[], &args)?;
        Ok(())
    }

    fn validate_call(
        &self,
        slot: &MethodSlot,
        type_args: &[TypeRef],
        args: &[Value],
    ) -> DispatchResult<()> {
        let sig = slot.sig();

        if type_args.len() != sig.type_param_count {
            return Err(DispatchError::TypeArityMismatch {
                method: sig.name.clone(),
                expected: sig.type_param_count,
                got: type_args.len(),
            });
        }
        for (position, arg) in type_args.iter().enumerate() {
            if !matches!(arg, TypeRef::Named(_)) {
                return Err(DispatchError::TypeArgumentNotConcrete {
                    method: sig.name.clone(),
                    position,
                });
            }
        }

        if args.len() != sig.params.len() {
            return Err(DispatchError::ArityMismatch {
                method: sig.name.clone(),
                expected: sig.params.len(),
                got: args.len(),
            });
        }
        for (param, arg) in sig.params.iter().zip(args.iter()) {
            conforms(arg, &param.resolve(type_args))?;
        }

        Ok(())
    }

    fn dynamic_invoke(
        &self,
        slot: &MethodSlot,
        type_args: &[TypeRef],
        args: &[Value],
    ) -> DispatchResult<Value> {
        let invoker = self
            .base
            .invoker()
            .ok_or_else(|| DispatchError::MissingInvoker {
                type_name: self.ty.base().name().to_string(),
            })?;

        // The identity is specialized with the call site's type
        // arguments before it crosses into the invoker.
        let identity = MethodIdentity {
            interface: slot.declared_by().to_string(),
            method: slot.sig.clone(),
            type_args: type_args.to_vec(),
        };

        // Invoker failures propagate to the caller unchanged.
        let result = invoker.invoke(&identity, args.to_vec())?;

        match slot.sig().return_type.resolve(type_args) {
            TypeRef::Unit => Ok(Value::Null),
            return_type => {
                conforms(&result, &return_type)?;
                Ok(result)
            }
        }
    }
}

impl std::fmt::Debug for ProxyInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyInstance")
            .field("type", &self.ty.name())
            .finish()
    }
}
