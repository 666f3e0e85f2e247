//! Type synthesis
//!
//! The synthesizer turns an (interface, base) descriptor pair into a
//! [`TypeBlueprint`]: forwarded constructors, one dispatch slot per
//! reachable interface method, and property bindings wiring accessor
//! slots. The blueprint is handed to a [`TypeSink`](crate::sink::TypeSink)
//! exactly once per synthesis, which materializes the final
//! [`SynthesizedType`].
//!
//! Preconditions are checked up front: the target must be an interface
//! and must not be an unbound generic definition. Violations are fatal
//! configuration errors surfaced to the caller — never cached, always
//! reproducible.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use veneer_sdk::sig::{MethodSig, TypeRef};

use crate::descriptor::{
    BaseDescriptor, ConstructorDescriptor, InterfaceDescriptor, MethodBody, TypeKind,
};
use crate::error::{SynthesisError, SynthesisResult};
use crate::plan::{self, MethodPlan};

/// How one synthesized slot dispatches its calls
#[derive(Clone)]
pub enum DispatchStrategy {
    /// Call the matched base method directly; its result is returned
    /// unchanged
    Forward {
        /// Signature of the matched base method
        target: Arc<MethodSig>,
        /// The matched base method's body
        body: MethodBody,
    },
    /// Package identity and arguments and route through the base's
    /// dynamic invocation entry point
    DynamicInvoke,
    /// Fail with the not-implemented error when invoked
    Unimplemented,
}

impl std::fmt::Debug for DispatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchStrategy::Forward { target, .. } => {
                write!(f, "Forward({target})")
            }
            DispatchStrategy::DynamicInvoke => write!(f, "DynamicInvoke"),
            DispatchStrategy::Unimplemented => write!(f, "Unimplemented"),
        }
    }
}

/// One interface method's implementation on a synthesized type
#[derive(Debug, Clone)]
pub struct MethodSlot {
    pub(crate) declared_by: Arc<str>,
    pub(crate) sig: Arc<MethodSig>,
    pub(crate) strategy: DispatchStrategy,
}

impl MethodSlot {
    /// Name of the interface that declares this method
    pub fn declared_by(&self) -> &str {
        &self.declared_by
    }

    /// The implemented method's signature
    pub fn sig(&self) -> &MethodSig {
        &self.sig
    }

    /// The chosen dispatch strategy
    pub fn strategy(&self) -> &DispatchStrategy {
        &self.strategy
    }
}

/// A property on a synthesized type with its wired accessor slots
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) index_params: Vec<TypeRef>,
    pub(crate) getter: Option<usize>,
    pub(crate) setter: Option<usize>,
}

impl PropertyBinding {
    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property type
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Index parameter types; empty for plain properties
    pub fn index_params(&self) -> &[TypeRef] {
        &self.index_params
    }

    /// Slot index of the wired getter, if any
    pub fn getter(&self) -> Option<usize> {
        self.getter
    }

    /// Slot index of the wired setter, if any
    pub fn setter(&self) -> Option<usize> {
        self.setter
    }
}

/// The complete definition of a synthesized type, as handed to a
/// [`TypeSink`](crate::sink::TypeSink)
pub struct TypeBlueprint {
    /// Name of the type to define
    pub name: String,
    /// The interface the type implements
    pub interface: Arc<InterfaceDescriptor>,
    /// The base type the type extends
    pub base: Arc<BaseDescriptor>,
    /// Forwarded constructors, one per base constructor
    pub constructors: Vec<ConstructorDescriptor>,
    /// One slot per reachable interface method
    pub slots: Vec<MethodSlot>,
    /// Property bindings with wired accessor slots
    pub properties: Vec<PropertyBinding>,
}

impl std::fmt::Debug for TypeBlueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeBlueprint")
            .field("name", &self.name)
            .field("interface", &self.interface)
            .field("base", &self.base)
            .field("constructors", &self.constructors.len())
            .field("slots", &self.slots)
            .field("properties", &self.properties)
            .finish()
    }
}

/// A materialized proxy type: the adapter implementing one interface by
/// delegating to one base type.
///
/// Synthesized types are immutable. The synthesis cache owns them for
/// the process lifetime; instances are created and dropped freely through
/// the forwarded constructors.
pub struct SynthesizedType {
    type_id: u64,
    name: String,
    interface: Arc<InterfaceDescriptor>,
    base: Arc<BaseDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    slots: Vec<MethodSlot>,
    slot_names: FxHashMap<String, Vec<usize>>,
    properties: Vec<PropertyBinding>,
    property_names: FxHashMap<String, usize>,
}

impl SynthesizedType {
    /// Materialize a blueprint into a synthesized type.
    ///
    /// `type_id` is the sink-assigned identity of the new type. Custom
    /// [`TypeSink`](crate::sink::TypeSink) implementations delegate here
    /// after recording whatever bookkeeping they need.
    pub fn from_blueprint(blueprint: TypeBlueprint, type_id: u64) -> Arc<Self> {
        let mut slot_names: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (index, slot) in blueprint.slots.iter().enumerate() {
            slot_names
                .entry(slot.sig.name.clone())
                .or_default()
                .push(index);
        }

        let mut property_names = FxHashMap::default();
        for (index, property) in blueprint.properties.iter().enumerate() {
            property_names.insert(property.name.clone(), index);
        }

        Arc::new(Self {
            type_id,
            name: blueprint.name,
            interface: blueprint.interface,
            base: blueprint.base,
            constructors: blueprint.constructors,
            slots: blueprint.slots,
            slot_names,
            properties: blueprint.properties,
            property_names,
        })
    }

    /// Sink-assigned type identity
    pub fn type_id(&self) -> u64 {
        self.type_id
    }

    /// Name of the synthesized type
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The implemented interface
    pub fn interface(&self) -> &Arc<InterfaceDescriptor> {
        &self.interface
    }

    /// The extended base type
    pub fn base(&self) -> &Arc<BaseDescriptor> {
        &self.base
    }

    /// Forwarded constructors
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// Dispatch slots, one per reachable interface method
    pub fn slots(&self) -> &[MethodSlot] {
        &self.slots
    }

    /// Slot indices answering to `name`
    pub fn slots_named(&self, name: &str) -> &[usize] {
        self.slot_names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Property bindings
    pub fn properties(&self) -> &[PropertyBinding] {
        &self.properties
    }

    /// Look up a property binding by name
    pub fn property(&self, name: &str) -> Option<&PropertyBinding> {
        self.property_names
            .get(name)
            .map(|&index| &self.properties[index])
    }
}

impl std::fmt::Debug for SynthesizedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesizedType")
            .field("type_id", &self.type_id)
            .field("name", &self.name)
            .field("interface", &self.interface.name())
            .field("base", &self.base.name())
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// Check the synthesis preconditions on a target interface
pub(crate) fn validate_target(interface: &InterfaceDescriptor) -> SynthesisResult<()> {
    if interface.kind() != TypeKind::Interface {
        return Err(SynthesisError::NotAnInterface {
            name: interface.name().to_string(),
            kind: interface.kind().as_str().to_string(),
        });
    }
    if interface.is_generic_definition() {
        return Err(SynthesisError::UnboundGeneric {
            name: interface.name().to_string(),
        });
    }
    Ok(())
}

/// Build the blueprint for one (interface, base) pair.
///
/// Walks every reachable interface method exactly once, plans its
/// dispatch, and wires accessor slots onto the scaffolded properties.
pub fn build_blueprint(
    interface: &Arc<InterfaceDescriptor>,
    base: &Arc<BaseDescriptor>,
) -> SynthesisResult<TypeBlueprint> {
    validate_target(interface)?;

    // Forward every base constructor unchanged; the proxy has no state of
    // its own beyond what the base provides.
    let constructors = base.constructors().to_vec();

    let mut properties: Vec<PropertyBinding> = interface
        .properties()
        .iter()
        .map(|property| PropertyBinding {
            name: property.name.clone(),
            ty: property.ty.clone(),
            index_params: property.index_params.clone(),
            getter: None,
            setter: None,
        })
        .collect();

    let mut slots = Vec::new();
    for reachable in interface.reachable_methods() {
        let strategy = match plan::plan_method(&reachable.sig, base)? {
            MethodPlan::Forward(index) => {
                let target = &base.methods()[index];
                DispatchStrategy::Forward {
                    target: Arc::new(target.sig().clone()),
                    body: target.body.clone(),
                }
            }
            MethodPlan::DynamicInvoke => DispatchStrategy::DynamicInvoke,
            MethodPlan::Unimplemented => DispatchStrategy::Unimplemented,
        };

        let slot_index = slots.len();
        let sig = Arc::new(reachable.sig);

        if let Some((property_name, is_getter)) = sig.accessor_property() {
            if let Some(binding) = properties.iter_mut().find(|p| p.name == property_name) {
                if is_getter {
                    binding.getter = Some(slot_index);
                } else {
                    binding.setter = Some(slot_index);
                }
            }
        }

        slots.push(MethodSlot {
            declared_by: reachable.declared_by,
            sig,
            strategy,
        });
    }

    Ok(TypeBlueprint {
        name: format!("{}Proxy", interface.name()),
        interface: interface.clone(),
        base: base.clone(),
        constructors,
        slots,
        properties,
    })
}
