//! The tree of values the codec encodes and decodes.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use crate::Timestamp;

/// A value that stands in for a domain [`Value`] at encode time.
///
/// The encoder calls [`ConvertibleToValue::to_value`] and encodes the result
/// in its place, converting again if the result is itself convertible.
///
/// ```
/// use notepack::{encode, ConvertibleToValue, Value};
///
/// #[derive(Debug)]
/// struct UserId(u32);
///
/// impl ConvertibleToValue for UserId {
///     fn to_value(&self) -> Option<Value> {
///         Some(Value::from(format!("user-{}", self.0)))
///     }
/// }
///
/// let bytes = encode(&Value::convertible(UserId(7))).unwrap();
/// assert_eq!(bytes, encode(&Value::from("user-7")).unwrap());
/// ```
pub trait ConvertibleToValue: fmt::Debug + Send + Sync {
    /// The value to encode in place of `self`, or `None` when `self` has no
    /// encodable representation.
    fn to_value(&self) -> Option<Value>;
}

/// An extension payload the codec does not interpret.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    pub kind: i8,
    pub data: Vec<u8>,
}

impl Extension {
    pub fn new(kind: i8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    /// Any integer that fits in `i64`.
    Integer(i64),
    /// Integers above `i64::MAX`. Compares equal to an `Integer` of the same
    /// numeric value.
    UInteger(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    /// Key/value pairs in wire order. Keys may be any value.
    Map(Vec<(Value, Value)>),
    Timestamp(Timestamp),
    /// Extension payload of a type this codec does not interpret.
    Extension(Extension),
    /// Encode-only; the decoder never produces it.
    Convertible(Arc<dyn ConvertibleToValue>),
}

impl Value {
    pub fn convertible(hook: impl ConvertibleToValue + 'static) -> Self {
        Value::Convertible(Arc::new(hook))
    }

    /// Builds a map from string keys.
    pub fn map<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (Value::Str(k.into()), v.into()))
                .collect(),
        )
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric value of `Integer` and `UInteger`.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Integer(i) => Some(*i as i128),
            Value::UInteger(u) => Some(*u as i128),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// First value stored under the string key `key`, if `self` is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (
                Value::Integer(_) | Value::UInteger(_),
                Value::Integer(_) | Value::UInteger(_),
            ) => self.as_i128() == other.as_i128(),
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Extension(a), Value::Extension(b)) => a == b,
            (Value::Convertible(a), Value::Convertible(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Integer(v as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                match i64::try_from(v) {
                    Ok(i) => Value::Integer(i),
                    Err(_) => Value::UInteger(v as u64),
                }
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<SystemTime> for Value {
    fn from(time: SystemTime) -> Self {
        Value::Timestamp(time.into())
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(time: chrono::DateTime<chrono::Utc>) -> Self {
        Value::Timestamp(time.into())
    }
}

impl From<Extension> for Value {
    fn from(ext: Extension) -> Self {
        Value::Extension(ext)
    }
}
