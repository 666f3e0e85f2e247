//! Traits for converting between Rust types and universal values
//!
//! `IntoValue` packs a Rust value for the dispatch channel; `FromValue`
//! unpacks with an exact kind check. There is deliberately no blanket
//! numeric coercion: `i32::from_value` on an `I64` fails.

use crate::error::{DispatchError, DispatchResult};
use crate::value::Value;

/// Pack a Rust value into a [`Value`]
pub trait IntoValue {
    /// Convert to a universal value
    fn into_value(self) -> Value;
}

/// Unpack a [`Value`] into a Rust type, failing on kind mismatch
pub trait FromValue: Sized {
    /// Convert from a universal value
    fn from_value(value: &Value) -> DispatchResult<Self>;
}

fn mismatch(expected: &str, value: &Value) -> DispatchError {
    DispatchError::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name().to_string(),
    }
}

macro_rules! impl_primitive_convert {
    ($($ty:ty => $ctor:ident, $extract:ident, $name:literal;)*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$ctor(self)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: &Value) -> DispatchResult<Self> {
                    value.$extract().ok_or_else(|| mismatch($name, value))
                }
            }
        )*
    };
}

impl_primitive_convert! {
    bool => bool, as_bool, "bool";
    i32 => i32, as_i32, "i32";
    i64 => i64, as_i64, "i64";
    u32 => u32, as_u32, "u32";
    u64 => u64, as_u64, "u64";
    f32 => f32, as_f32, "f32";
    f64 => f64, as_f64, "f64";
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::str(self)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> DispatchResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", value))
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl FromValue for () {
    fn from_value(value: &Value) -> DispatchResult<Self> {
        if value.is_null() {
            Ok(())
        } else {
            Err(mismatch("null", value))
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> DispatchResult<Self> {
        Ok(value.clone())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(inner) => inner.into_value(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_roundtrip() {
        assert_eq!(i32::from_value(&42i32.into_value()).unwrap(), 42);
        assert_eq!(u64::from_value(&7u64.into_value()).unwrap(), 7);
        assert!(bool::from_value(&true.into_value()).unwrap());
        assert_eq!(
            String::from_value(&"hello".into_value()).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_no_coercion() {
        let err = i64::from_value(&Value::i32(1)).unwrap_err();
        assert_eq!(
            err,
            DispatchError::TypeMismatch {
                expected: "i64".to_string(),
                got: "i32".to_string(),
            }
        );
        assert!(f64::from_value(&Value::f32(1.0)).is_err());
        assert!(u32::from_value(&Value::i32(1)).is_err());
    }

    #[test]
    fn test_unit_and_option() {
        assert!(().into_value().is_null());
        assert!(<()>::from_value(&Value::Null).is_ok());
        assert!(<()>::from_value(&Value::i32(0)).is_err());
        assert!(Option::<i32>::None.into_value().is_null());
        assert_eq!(Some(3i32).into_value(), Value::i32(3));
    }
}
