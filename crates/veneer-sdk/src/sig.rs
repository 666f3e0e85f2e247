//! Signature vocabulary — type references and method signatures
//!
//! Signatures are plain data. A [`TypeRef`] names a concrete type, refers
//! to one of the enclosing method's generic parameters by position, or is
//! the unit (void) type. Because generic parameters are positional by
//! construction, two signatures that spell a type parameter differently
//! still compare equal when the positions align.
//!
//! Property accessors are ordinary methods carrying the accessor flag and
//! the `get_`/`set_` name prefix; [`MethodSig::getter`] and
//! [`MethodSig::setter`] encode that convention.

use std::fmt;
use std::sync::Arc;

/// Name prefix for property getter methods
pub const GETTER_PREFIX: &str = "get_";

/// Name prefix for property setter methods
pub const SETTER_PREFIX: &str = "set_";

/// Canonical names of the primitive (value-carrying, non-reference) kinds
const PRIMITIVE_NAMES: &[&str] = &[
    "bool", "i32", "i64", "u32", "u64", "f32", "f64", "string",
];

/// A type reference inside a method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// The unit (void) type
    Unit,
    /// A concrete type, by canonical name
    Named(Arc<str>),
    /// The enclosing method's generic parameter at this position
    Param(usize),
}

impl TypeRef {
    /// Reference a concrete type by name
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Reference the enclosing method's generic parameter at `position`
    pub const fn param(position: usize) -> Self {
        TypeRef::Param(position)
    }

    /// Whether this reference names a primitive value kind
    pub fn is_primitive(&self) -> bool {
        match self {
            TypeRef::Named(name) => PRIMITIVE_NAMES.contains(&name.as_ref()),
            _ => false,
        }
    }

    /// Whether this reference is fully concrete (no generic parameter)
    pub const fn is_concrete(&self) -> bool {
        !matches!(self, TypeRef::Param(_))
    }

    /// Substitute generic parameter references with the given concrete
    /// type arguments. References past the end of `type_args` are left
    /// untouched; callers validate arity separately.
    pub fn resolve(&self, type_args: &[TypeRef]) -> TypeRef {
        match self {
            TypeRef::Param(position) => type_args
                .get(*position)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Unit => write!(f, "()"),
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::Param(position) => write!(f, "T{position}"),
        }
    }
}

/// A structural method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSig {
    /// Method name (accessors carry the `get_`/`set_` prefix)
    pub name: String,
    /// Declared return type
    pub return_type: TypeRef,
    /// Ordered parameter types
    pub params: Vec<TypeRef>,
    /// Number of generic parameters this method declares
    pub type_param_count: usize,
    /// Marks property accessor methods as distinct from ordinary methods
    pub is_accessor: bool,
}

impl MethodSig {
    /// Create a new signature with unit return and no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: TypeRef::Unit,
            params: Vec::new(),
            type_param_count: 0,
            is_accessor: false,
        }
    }

    /// Set the return type
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    /// Append a parameter
    pub fn with_param(mut self, ty: TypeRef) -> Self {
        self.params.push(ty);
        self
    }

    /// Declare `count` generic parameters
    pub fn with_type_params(mut self, count: usize) -> Self {
        self.type_param_count = count;
        self
    }

    /// Mark as a property accessor
    pub fn accessor(mut self) -> Self {
        self.is_accessor = true;
        self
    }

    /// Getter signature for `property`: `get_{property}(index..) -> ty`
    pub fn getter(property: &str, ty: TypeRef, index_params: &[TypeRef]) -> Self {
        Self {
            name: format!("{GETTER_PREFIX}{property}"),
            return_type: ty,
            params: index_params.to_vec(),
            type_param_count: 0,
            is_accessor: true,
        }
    }

    /// Setter signature for `property`: `set_{property}(index.., ty)`
    pub fn setter(property: &str, ty: TypeRef, index_params: &[TypeRef]) -> Self {
        let mut params = index_params.to_vec();
        params.push(ty);
        Self {
            name: format!("{SETTER_PREFIX}{property}"),
            return_type: TypeRef::Unit,
            params,
            type_param_count: 0,
            is_accessor: true,
        }
    }

    /// If this is an accessor, the property name it accesses and whether
    /// it is the getter.
    pub fn accessor_property(&self) -> Option<(&str, bool)> {
        if !self.is_accessor {
            return None;
        }
        if let Some(property) = self.name.strip_prefix(GETTER_PREFIX) {
            Some((property, true))
        } else {
            self.name
                .strip_prefix(SETTER_PREFIX)
                .map(|property| (property, false))
        }
    }
}

impl fmt::Display for MethodSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.type_param_count > 0 {
            write!(f, "<")?;
            for position in 0..self.type_param_count {
                if position > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "T{position}")?;
            }
            write!(f, ">")?;
        }
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ")")?;
        if self.return_type != TypeRef::Unit {
            write!(f, " -> {}", self.return_type)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_primitive() {
        assert!(TypeRef::named("i32").is_primitive());
        assert!(TypeRef::named("string").is_primitive());
        assert!(!TypeRef::named("Connection").is_primitive());
        assert!(!TypeRef::param(0).is_primitive());
        assert!(!TypeRef::Unit.is_primitive());
    }

    #[test]
    fn test_type_ref_concrete() {
        assert!(TypeRef::named("i32").is_concrete());
        assert!(TypeRef::Unit.is_concrete());
        assert!(!TypeRef::param(0).is_concrete());
    }

    #[test]
    fn test_type_ref_resolve() {
        let args = vec![TypeRef::named("i32"), TypeRef::named("string")];
        assert_eq!(TypeRef::param(0).resolve(&args), TypeRef::named("i32"));
        assert_eq!(TypeRef::param(1).resolve(&args), TypeRef::named("string"));
        assert_eq!(TypeRef::named("bool").resolve(&args), TypeRef::named("bool"));
        // Out-of-range positions are left for arity validation
        assert_eq!(TypeRef::param(5).resolve(&args), TypeRef::param(5));
    }

    #[test]
    fn test_sig_builder() {
        let sig = MethodSig::new("send")
            .returns(TypeRef::named("bool"))
            .with_param(TypeRef::named("string"))
            .with_param(TypeRef::named("i32"));

        assert_eq!(sig.name, "send");
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.return_type, TypeRef::named("bool"));
        assert_eq!(sig.type_param_count, 0);
        assert!(!sig.is_accessor);
    }

    #[test]
    fn test_accessor_sigs() {
        let getter = MethodSig::getter("Count", TypeRef::named("i32"), &[]);
        assert_eq!(getter.name, "get_Count");
        assert!(getter.is_accessor);
        assert_eq!(getter.accessor_property(), Some(("Count", true)));

        let setter = MethodSig::setter("Count", TypeRef::named("i32"), &[]);
        assert_eq!(setter.name, "set_Count");
        assert_eq!(setter.params, vec![TypeRef::named("i32")]);
        assert_eq!(setter.return_type, TypeRef::Unit);
        assert_eq!(setter.accessor_property(), Some(("Count", false)));

        // Indexed property: index parameters precede the value
        let indexed = MethodSig::setter(
            "Item",
            TypeRef::named("string"),
            &[TypeRef::named("i32")],
        );
        assert_eq!(
            indexed.params,
            vec![TypeRef::named("i32"), TypeRef::named("string")]
        );
    }

    #[test]
    fn test_non_accessor_has_no_property() {
        let sig = MethodSig::new("get_Count").returns(TypeRef::named("i32"));
        assert_eq!(sig.accessor_property(), None);
    }

    #[test]
    fn test_display() {
        let sig = MethodSig::new("echo")
            .with_type_params(1)
            .with_param(TypeRef::param(0))
            .returns(TypeRef::param(0));
        assert_eq!(sig.to_string(), "echo<T0>(T0) -> T0");
    }
}
