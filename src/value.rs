//! Component values and their binary/JSON classification.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::DataType;

mod sealed {
    pub trait Sealed {}
}

/// Fixed-width numeric element of a typed array.
///
/// Arrays of these are sent as their in-memory representation: every element
/// contributes its native-endian bytes, so the host receives
/// `len * WIDTH` bytes rather than `len` numbers.
pub trait TypedArrayElement: sealed::Sealed + Copy {
    const WIDTH: usize;

    fn extend_ne_bytes(self, out: &mut Vec<u8>);
}

macro_rules! typed_array_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl TypedArrayElement for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                #[inline]
                fn extend_ne_bytes(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

typed_array_element!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

/// A value reported back to the host.
///
/// `Bytes` covers both typed arrays (already flattened to bytes) and raw byte
/// buffers; `Json` is forwarded untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    Bytes(Vec<u8>),
    Json(Value),
}

impl ComponentValue {
    /// Byte view over a typed array.
    pub fn from_typed_array<T: TypedArrayElement>(items: &[T]) -> Self {
        let mut out = Vec::with_capacity(items.len() * T::WIDTH);
        for &item in items {
            item.extend_ne_bytes(&mut out);
        }
        ComponentValue::Bytes(out)
    }

    /// Wrap an untyped byte buffer.
    pub fn from_buffer(buf: impl Into<Vec<u8>>) -> Self {
        ComponentValue::Bytes(buf.into())
    }

    /// Serialize any serde value as a JSON component value.
    pub fn json<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        Ok(ComponentValue::Json(serde_json::to_value(value)?))
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ComponentValue::Bytes(_) => DataType::Bytes,
            ComponentValue::Json(_) => DataType::Json,
        }
    }

    /// Split into the `value` / `dataType` pair carried by `setComponentValue`.
    /// Bytes travel as a JSON array of `u8`.
    pub fn into_wire(self) -> (Value, DataType) {
        let data_type = self.data_type();
        let value = match self {
            ComponentValue::Bytes(bytes) => {
                Value::Array(bytes.into_iter().map(Value::from).collect())
            }
            ComponentValue::Json(v) => v,
        };
        (value, data_type)
    }
}

impl<T: TypedArrayElement> From<Vec<T>> for ComponentValue {
    fn from(items: Vec<T>) -> Self {
        ComponentValue::from_typed_array(&items)
    }
}

impl<T: TypedArrayElement> From<&[T]> for ComponentValue {
    fn from(items: &[T]) -> Self {
        ComponentValue::from_typed_array(items)
    }
}

impl From<Value> for ComponentValue {
    fn from(v: Value) -> Self {
        ComponentValue::Json(v)
    }
}

impl From<String> for ComponentValue {
    fn from(s: String) -> Self {
        ComponentValue::Json(Value::String(s))
    }
}

impl From<&str> for ComponentValue {
    fn from(s: &str) -> Self {
        ComponentValue::Json(Value::String(s.to_string()))
    }
}

impl From<bool> for ComponentValue {
    fn from(b: bool) -> Self {
        ComponentValue::Json(Value::Bool(b))
    }
}

macro_rules! json_number {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for ComponentValue {
            fn from(n: $t) -> Self {
                ComponentValue::Json(Value::from(n))
            }
        }
    )*};
}

// a lone number is a JSON value; only sequences of numbers are binary
json_number!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);
