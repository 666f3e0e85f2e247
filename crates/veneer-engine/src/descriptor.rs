//! Interface and base-type descriptors
//!
//! Descriptors are the explicit, immutable data the synthesizer works
//! from: an [`InterfaceDescriptor`] describes the surface a proxy must
//! implement, a [`BaseDescriptor`] describes the concrete type the proxy
//! delegates to — its constructors (with factories), its full flattened
//! method set (with callable bodies), and whether its instances satisfy
//! the dynamic invocation contract.
//!
//! Both are built once through their builders, handed around as `Arc`s,
//! and identified by a process-unique [`TypeToken`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use veneer_sdk::error::DispatchResult;
use veneer_sdk::invoker::BaseInstance;
use veneer_sdk::sig::{MethodSig, TypeRef};
use veneer_sdk::value::Value;

use crate::signature;

/// Process-unique identity of a descriptor, used as a cache key component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeToken(u64);

impl TypeToken {
    /// Allocate the next token
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        TypeToken(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw token value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Kind of a described type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// An interface — the only kind synthesis accepts as a target
    Interface,
    /// A class
    Class,
    /// A value struct
    Struct,
}

impl TypeKind {
    /// Lowercase kind name for error messages
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeKind::Interface => "interface",
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
        }
    }
}

/// A property declared on an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySig {
    /// Property name
    pub name: String,
    /// Property type
    pub ty: TypeRef,
    /// Index parameter types; empty for plain properties
    pub index_params: Vec<TypeRef>,
    /// Whether the property declares a getter
    pub has_getter: bool,
    /// Whether the property declares a setter
    pub has_setter: bool,
}

impl PropertySig {
    /// A read-only property
    pub fn read_only(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            index_params: Vec::new(),
            has_getter: true,
            has_setter: false,
        }
    }

    /// A read-write property
    pub fn read_write(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            index_params: Vec::new(),
            has_getter: true,
            has_setter: true,
        }
    }

    /// Add index parameters, making this an indexed property
    pub fn indexed(mut self, index_params: Vec<TypeRef>) -> Self {
        self.index_params = index_params;
        self
    }
}

/// An interface method together with the interface that declares it
#[derive(Debug, Clone)]
pub struct ReachableMethod {
    /// Name of the declaring interface
    pub declared_by: Arc<str>,
    /// The method's signature
    pub sig: MethodSig,
}

/// Identity and surface of the interface a proxy must implement
#[derive(Debug)]
pub struct InterfaceDescriptor {
    token: TypeToken,
    name: Arc<str>,
    kind: TypeKind,
    is_generic_definition: bool,
    properties: Vec<PropertySig>,
    methods: Vec<MethodSig>,
    extends: Vec<Arc<InterfaceDescriptor>>,
}

impl InterfaceDescriptor {
    /// Start building an interface descriptor
    pub fn builder(name: impl Into<Arc<str>>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            kind: TypeKind::Interface,
            is_generic_definition: false,
            properties: Vec::new(),
            methods: Vec::new(),
            extends: Vec::new(),
        }
    }

    /// Process-unique identity
    pub fn token(&self) -> TypeToken {
        self.token
    }

    /// Interface name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the described type
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether this is an unbound generic definition
    pub fn is_generic_definition(&self) -> bool {
        self.is_generic_definition
    }

    /// Properties declared on this interface
    pub fn properties(&self) -> &[PropertySig] {
        &self.properties
    }

    /// Methods declared directly on this interface, accessors included
    pub fn methods(&self) -> &[MethodSig] {
        &self.methods
    }

    /// Interfaces this interface extends
    pub fn extends(&self) -> &[Arc<InterfaceDescriptor>] {
        &self.extends
    }

    /// Every method reachable from this interface — its own and those of
    /// every transitively extended interface — exactly once each.
    ///
    /// Structural duplicates are collapsed: a method reachable through
    /// two inheritance paths, or declared with an identical signature on
    /// two extended interfaces, appears once, attributed to the first
    /// declaring interface in declaration order.
    pub fn reachable_methods(&self) -> Vec<ReachableMethod> {
        let mut collected: Vec<ReachableMethod> = Vec::new();
        self.collect_methods(&mut collected);
        collected
    }

    fn collect_methods(&self, collected: &mut Vec<ReachableMethod>) {
        for sig in &self.methods {
            let duplicate = collected
                .iter()
                .any(|seen| signature::matches(&seen.sig, sig));
            if !duplicate {
                collected.push(ReachableMethod {
                    declared_by: self.name.clone(),
                    sig: sig.clone(),
                });
            }
        }
        for parent in &self.extends {
            parent.collect_methods(collected);
        }
    }
}

/// Builder for [`InterfaceDescriptor`]
pub struct InterfaceBuilder {
    name: Arc<str>,
    kind: TypeKind,
    is_generic_definition: bool,
    properties: Vec<PropertySig>,
    methods: Vec<MethodSig>,
    extends: Vec<Arc<InterfaceDescriptor>>,
}

impl InterfaceBuilder {
    /// Override the described kind. Synthesis rejects anything that is
    /// not [`TypeKind::Interface`].
    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark as an unbound generic definition. Synthesis rejects these.
    pub fn generic_definition(mut self) -> Self {
        self.is_generic_definition = true;
        self
    }

    /// Declare a method
    pub fn method(mut self, sig: MethodSig) -> Self {
        self.methods.push(sig);
        self
    }

    /// Declare a property.
    ///
    /// The property's accessor methods are declared alongside it, the way
    /// runtime reflection would list them: `get_{name}` when it has a
    /// getter, `set_{name}` when it has a setter.
    pub fn property(mut self, property: PropertySig) -> Self {
        if property.has_getter {
            self.methods.push(MethodSig::getter(
                &property.name,
                property.ty.clone(),
                &property.index_params,
            ));
        }
        if property.has_setter {
            self.methods.push(MethodSig::setter(
                &property.name,
                property.ty.clone(),
                &property.index_params,
            ));
        }
        self.properties.push(property);
        self
    }

    /// Record an extended interface; its methods become reachable
    pub fn extends(mut self, parent: Arc<InterfaceDescriptor>) -> Self {
        self.extends.push(parent);
        self
    }

    /// Finish building
    pub fn build(self) -> Arc<InterfaceDescriptor> {
        Arc::new(InterfaceDescriptor {
            token: TypeToken::next(),
            name: self.name,
            kind: self.kind,
            is_generic_definition: self.is_generic_definition,
            properties: self.properties,
            methods: self.methods,
            extends: self.extends,
        })
    }
}

/// Callable body of a base method: receives the base instance, the call
/// site's concrete type arguments, and the arguments in order.
pub type MethodBody =
    Arc<dyn Fn(&dyn BaseInstance, &[TypeRef], &[Value]) -> DispatchResult<Value> + Send + Sync>;

/// Factory behind a base constructor: receives the arguments in order and
/// produces the base instance.
pub type ConstructorFactory =
    Arc<dyn Fn(&[Value]) -> DispatchResult<Arc<dyn BaseInstance>> + Send + Sync>;

/// A method on a base type: signature plus callable body
#[derive(Clone)]
pub struct BaseMethod {
    pub(crate) sig: MethodSig,
    pub(crate) body: MethodBody,
}

impl BaseMethod {
    /// The method's signature
    pub fn sig(&self) -> &MethodSig {
        &self.sig
    }
}

/// A constructor on a base type: parameter list plus instance factory
#[derive(Clone)]
pub struct ConstructorDescriptor {
    pub(crate) params: Vec<TypeRef>,
    pub(crate) factory: ConstructorFactory,
}

impl ConstructorDescriptor {
    /// The constructor's parameter types
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }
}

/// Identity and surface of the concrete type a proxy delegates to
pub struct BaseDescriptor {
    token: TypeToken,
    name: Arc<str>,
    constructors: Vec<ConstructorDescriptor>,
    methods: Vec<BaseMethod>,
    is_invoker: bool,
}

impl BaseDescriptor {
    /// Start building a base descriptor
    pub fn builder(name: impl Into<Arc<str>>) -> BaseBuilder {
        BaseBuilder {
            name: name.into(),
            constructors: Vec::new(),
            methods: Vec::new(),
            is_invoker: false,
        }
    }

    /// Process-unique identity
    pub fn token(&self) -> TypeToken {
        self.token
    }

    /// Base type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base's constructors
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// The base's full flattened method set, inherited methods included
    pub fn methods(&self) -> &[BaseMethod] {
        &self.methods
    }

    /// Whether instances satisfy the dynamic invocation contract
    pub fn is_invoker(&self) -> bool {
        self.is_invoker
    }
}

impl std::fmt::Debug for BaseDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseDescriptor")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("constructors", &self.constructors.len())
            .field("methods", &self.methods.len())
            .field("is_invoker", &self.is_invoker)
            .finish()
    }
}

/// Builder for [`BaseDescriptor`]
pub struct BaseBuilder {
    name: Arc<str>,
    constructors: Vec<ConstructorDescriptor>,
    methods: Vec<BaseMethod>,
    is_invoker: bool,
}

impl BaseBuilder {
    /// Declare a constructor with its parameter list and instance factory
    pub fn constructor<F>(mut self, params: Vec<TypeRef>, factory: F) -> Self
    where
        F: Fn(&[Value]) -> DispatchResult<Arc<dyn BaseInstance>> + Send + Sync + 'static,
    {
        self.constructors.push(ConstructorDescriptor {
            params,
            factory: Arc::new(factory),
        });
        self
    }

    /// Declare a method with its signature and body
    pub fn method<F>(mut self, sig: MethodSig, body: F) -> Self
    where
        F: Fn(&dyn BaseInstance, &[TypeRef], &[Value]) -> DispatchResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.methods.push(BaseMethod {
            sig,
            body: Arc::new(body),
        });
        self
    }

    /// Declare that instances satisfy the dynamic invocation contract
    pub fn dynamic_invoker(mut self) -> Self {
        self.is_invoker = true;
        self
    }

    /// Finish building
    pub fn build(self) -> Arc<BaseDescriptor> {
        Arc::new(BaseDescriptor {
            token: TypeToken::next(),
            name: self.name,
            constructors: self.constructors,
            methods: self.methods,
            is_invoker: self.is_invoker,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let a = InterfaceDescriptor::builder("IA").build();
        let b = InterfaceDescriptor::builder("IA").build();
        assert_ne!(a.token(), b.token());
    }

    #[test]
    fn test_property_declares_accessors() {
        let iface = InterfaceDescriptor::builder("ICounter")
            .property(PropertySig::read_write("Count", TypeRef::named("i32")))
            .build();

        let names: Vec<&str> = iface.methods().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["get_Count", "set_Count"]);
        assert!(iface.methods().iter().all(|m| m.is_accessor));
    }

    #[test]
    fn test_read_only_property_has_no_setter() {
        let iface = InterfaceDescriptor::builder("IVersioned")
            .property(PropertySig::read_only("Version", TypeRef::named("string")))
            .build();
        assert_eq!(iface.methods().len(), 1);
        assert_eq!(iface.methods()[0].name, "get_Version");
    }

    #[test]
    fn test_reachable_methods_transitive() {
        let grandparent = InterfaceDescriptor::builder("IPing")
            .method(MethodSig::new("ping"))
            .build();
        let parent = InterfaceDescriptor::builder("IEcho")
            .method(MethodSig::new("echo").with_param(TypeRef::named("string")))
            .extends(grandparent)
            .build();
        let child = InterfaceDescriptor::builder("IService")
            .method(MethodSig::new("run"))
            .extends(parent)
            .build();

        let reachable = child.reachable_methods();
        let names: Vec<&str> = reachable.iter().map(|m| m.sig.name.as_str()).collect();
        assert_eq!(names, vec!["run", "echo", "ping"]);
        assert_eq!(&*reachable[2].declared_by, "IPing");
    }

    #[test]
    fn test_reachable_methods_diamond_dedup() {
        let root = InterfaceDescriptor::builder("IRoot")
            .method(MethodSig::new("ping"))
            .build();
        let left = InterfaceDescriptor::builder("ILeft")
            .extends(root.clone())
            .build();
        let right = InterfaceDescriptor::builder("IRight")
            .extends(root)
            .build();
        let both = InterfaceDescriptor::builder("IBoth")
            .extends(left)
            .extends(right)
            .build();

        let reachable = both.reachable_methods();
        assert_eq!(reachable.len(), 1);
        assert_eq!(reachable[0].sig.name, "ping");
        assert_eq!(&*reachable[0].declared_by, "IRoot");
    }

    #[test]
    fn test_identical_sigs_across_interfaces_collapse() {
        let left = InterfaceDescriptor::builder("ILeft")
            .method(MethodSig::new("close"))
            .build();
        let right = InterfaceDescriptor::builder("IRight")
            .method(MethodSig::new("close"))
            .build();
        let both = InterfaceDescriptor::builder("IBoth")
            .extends(left)
            .extends(right)
            .build();

        let reachable = both.reachable_methods();
        assert_eq!(reachable.len(), 1);
        assert_eq!(&*reachable[0].declared_by, "ILeft");
    }
}
