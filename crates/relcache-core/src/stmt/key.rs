use super::Value;

use std::fmt;

/// A primary-key value.
///
/// Keys index records within a cache table. Only scalar JSON values can be
/// keys: strings, integers and booleans. `1` and `"1"` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Bool(bool),
    I64(i64),
    U64(u64),
    String(String),
}

impl Key {
    /// Converts a JSON value into a key. Returns `None` for null, floats,
    /// objects and arrays.
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Bool(v) => Some(Key::Bool(*v)),
            Value::Number(num) => {
                if let Some(v) = num.as_i64() {
                    Some(Key::I64(v))
                } else {
                    num.as_u64().map(Key::U64)
                }
            }
            Value::String(v) => Some(Key::String(v.clone())),
            _ => None,
        }
    }

    /// The key as the JSON value stored in a foreign-key field.
    pub fn to_value(&self) -> Value {
        match self {
            Key::Bool(v) => Value::Bool(*v),
            Key::I64(v) => Value::from(*v),
            Key::U64(v) => Value::from(*v),
            Key::String(v) => Value::String(v.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(v) => write!(f, "{v}"),
            Key::I64(v) => write!(f, "{v}"),
            Key::U64(v) => write!(f, "{v}"),
            Key::String(v) => f.write_str(v),
        }
    }
}

// Keys are object keys in serialized caches.
impl serde::Serialize for Key {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::Bool(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::I64(value.into())
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::I64(value)
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Key::I64(v),
            Err(_) => Key::U64(value),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::String(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::String(value)
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}
