//! Value — tagged universal value representation
//!
//! `Value` is the boxed representation every argument and return value
//! takes on its way through the dynamic invocation channel. Primitives are
//! stored inline; strings are owned; arbitrary reference values are packed
//! as reference-counted `Any` payloads tagged with their class name.
//!
//! Packing is lossless and unpacking is exact: an `I32` is only ever an
//! `I32`. There is no numeric widening, no truncation, and no implicit
//! conversion anywhere in this module.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Discriminant of a [`Value`], used for exact conformance checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The null reference
    Null,
    /// Boolean
    Bool,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// Owned string
    Str,
    /// Reference value packed with its class name
    Object,
}

impl ValueKind {
    /// Canonical type name of this kind, matching the names used in
    /// signature [`TypeRef`](crate::sig::TypeRef)s.
    pub const fn canonical_name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Str => "string",
            ValueKind::Object => "object",
        }
    }
}

/// A reference value packed for transport: the payload plus the class name
/// it is known under in signatures.
#[derive(Clone)]
pub struct ObjectValue {
    class_name: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    /// Class name this payload is known under
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Reference-counted payload
    pub fn payload(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.payload
    }
}

/// Universal value for the dynamic dispatch channel
#[derive(Clone)]
pub enum Value {
    /// The null reference
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 32-bit unsigned integer
    U32(u32),
    /// 64-bit unsigned integer
    U64(u64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// Owned string
    Str(String),
    /// Packed reference value
    Object(ObjectValue),
}

impl Value {
    /// Create a null value
    #[inline]
    pub const fn null() -> Self {
        Value::Null
    }

    /// Create a boolean value
    #[inline]
    pub const fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an i32 value
    #[inline]
    pub const fn i32(i: i32) -> Self {
        Value::I32(i)
    }

    /// Create an i64 value
    #[inline]
    pub const fn i64(i: i64) -> Self {
        Value::I64(i)
    }

    /// Create a u32 value
    #[inline]
    pub const fn u32(u: u32) -> Self {
        Value::U32(u)
    }

    /// Create a u64 value
    #[inline]
    pub const fn u64(u: u64) -> Self {
        Value::U64(u)
    }

    /// Create an f32 value
    #[inline]
    pub const fn f32(f: f32) -> Self {
        Value::F32(f)
    }

    /// Create an f64 value
    #[inline]
    pub const fn f64(f: f64) -> Self {
        Value::F64(f)
    }

    /// Create a string value
    #[inline]
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Pack an arbitrary reference value under `class_name`.
    ///
    /// The payload round-trips exactly: [`Value::downcast`] with the same
    /// `T` recovers the original allocation.
    pub fn object<T: Any + Send + Sync>(class_name: impl Into<Arc<str>>, value: T) -> Self {
        Value::Object(ObjectValue {
            class_name: class_name.into(),
            payload: Arc::new(value),
        })
    }

    /// Pack an already reference-counted payload under `class_name`.
    pub fn object_arc(
        class_name: impl Into<Arc<str>>,
        payload: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Value::Object(ObjectValue {
            class_name: class_name.into(),
            payload,
        })
    }

    /// Kind discriminant of this value
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::I32(_) => ValueKind::I32,
            Value::I64(_) => ValueKind::I64,
            Value::U32(_) => ValueKind::U32,
            Value::U64(_) => ValueKind::U64,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Str(_) => ValueKind::Str,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Type name of this value as it appears in signatures: the canonical
    /// primitive name, or the class name for packed objects.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Object(obj) => obj.class_name(),
            other => other.kind().canonical_name(),
        }
    }

    /// Check if this is the null value
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract boolean value
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract i32 value
    #[inline]
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract i64 value
    #[inline]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract u32 value
    #[inline]
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Value::U32(u) => Some(*u),
            _ => None,
        }
    }

    /// Extract u64 value
    #[inline]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(u) => Some(*u),
            _ => None,
        }
    }

    /// Extract f32 value
    #[inline]
    pub const fn as_f32(&self) -> Option<f32> {
        match self {
            Value::F32(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract f64 value
    #[inline]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract the packed object, if any
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Recover a packed payload as its concrete type.
    ///
    /// Returns `None` if this is not an object value or the payload is not
    /// a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Value::Object(obj) => obj.payload.clone().downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            // Object equality is identity: same allocation, same class name
            (Value::Object(a), Value::Object(b)) => {
                a.class_name == b.class_name && Arc::ptr_eq(&a.payload, &b.payload)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Value::Null"),
            Value::Bool(b) => write!(f, "Value::Bool({b})"),
            Value::I32(i) => write!(f, "Value::I32({i})"),
            Value::I64(i) => write!(f, "Value::I64({i})"),
            Value::U32(u) => write!(f, "Value::U32({u})"),
            Value::U64(u) => write!(f, "Value::U64({u})"),
            Value::F32(v) => write!(f, "Value::F32({v})"),
            Value::F64(v) => write!(f, "Value::F64({v})"),
            Value::Str(s) => write!(f, "Value::Str({s:?})"),
            Value::Object(obj) => write!(f, "Value::Object({})", obj.class_name()),
        }
    }
}
