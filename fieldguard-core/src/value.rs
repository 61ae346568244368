// Field values as seen by validators

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// An uploaded file handle.
///
/// Only the metadata a validator needs is carried; the file content is never
/// read by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Original file name
    pub name: String,

    /// Declared content type, e.g. `image/png`
    pub content_type: String,

    /// File size in bytes
    pub size: u64,
}

impl UploadedFile {
    /// Create a new file handle
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
        }
    }

    /// Check if the declared content type is an image type
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// A resolved field value.
///
/// Borrowed from the record it was resolved from, so resolving a field never
/// copies strings or file handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// No value (`None`, JSON `null`)
    Absent,
    /// A string
    Text(&'a str),
    /// A signed integer
    Integer(i64),
    /// An unsigned integer
    Unsigned(u64),
    /// A floating point number
    Float(f64),
    /// A boolean
    Bool(bool),
    /// A sequence, carrying its length
    List(usize),
    /// A map, carrying its number of entries
    Map(usize),
    /// An uploaded file
    File(&'a UploadedFile),
}

impl<'a> Value<'a> {
    /// Whether the value counts as "not provided".
    ///
    /// Both `Absent` and the empty string are absent. Every built-in
    /// validator except [`Required`](crate::Required) passes on absent input.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent | Value::Text(""))
    }

    /// Get the string, if this is a text value
    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the file handle, if this is a file value
    pub fn as_file(&self) -> Option<&'a UploadedFile> {
        match *self {
            Value::File(f) => Some(f),
            _ => None,
        }
    }

    /// Short name of the value kind, used in log events
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Unsigned(_) => "unsigned",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::File(_) => "file",
        }
    }
}

/// Conversion from a record field to a [`Value`].
///
/// Implemented for the field types a record is expected to hold. The
/// `Record` derive calls this for every field it exposes.
pub trait ToValue {
    fn to_value(&self) -> Value<'_>;
}

impl ToValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl ToValue for std::borrow::Cow<'_, str> {
    fn to_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

macro_rules! signed_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value<'_> {
                Value::Integer(i64::from(*self))
            }
        })*
    };
}

macro_rules! unsigned_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value<'_> {
                Value::Unsigned(u64::from(*self))
            }
        })*
    };
}

signed_to_value!(i8, i16, i32, i64);
unsigned_to_value!(u8, u16, u32, u64);

impl ToValue for isize {
    fn to_value(&self) -> Value<'_> {
        Value::Integer(*self as i64)
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value<'_> {
        Value::Unsigned(*self as u64)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value<'_> {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ToValue for UploadedFile {
    fn to_value(&self) -> Value<'_> {
        Value::File(self)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Absent,
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

// Collections only expose their size

impl<T> ToValue for Vec<T> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.len())
    }
}

impl<T> ToValue for [T] {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.len())
    }
}

impl<T, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value<'_> {
        Value::List(N)
    }
}

impl<T> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.len())
    }
}

impl<T, S> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.len())
    }
}

impl<T> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.len())
    }
}

impl<K, V, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value<'_> {
        Value::Map(self.len())
    }
}

impl<K, V> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value<'_> {
        Value::Map(self.len())
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value<'_> {
        use serde_json::Value as Json;

        match self {
            Json::Null => Value::Absent,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Unsigned(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::List(items.len()),
            Json::Object(map) => Value::Map(map.len()),
        }
    }
}
