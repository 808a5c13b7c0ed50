use std::borrow::Cow;
use std::fmt::Display;

use im::OrdMap;
use itertools::Itertools;

use crate::common::{ReadExecutor, Value};
use crate::errors::{ErrorKind, LarderError, LarderResult};
use crate::FIELD_SEPARATOR;

/// A record held by the in-memory backing store.
///
/// Fields are kept in a persistent ordered map, so cloning a document is
/// O(1) and a clone is never affected by later writes to the original.
/// Keys containing the configured field separator (default `.`) address
/// embedded documents: `location.latitude` reads the `latitude` field of
/// the document stored under `location`.
#[derive(Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document { data: OrdMap::new() }
    }

    /// Associates `value` with `key`, creating embedded documents along an
    /// embedded path as needed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldName` if the key or any path segment is empty.
    pub fn put<'a, T: Into<Value>>(&mut self, key: impl Into<Cow<'a, str>>, value: T) -> LarderResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(LarderError::new(
                "Document does not support empty key",
                ErrorKind::InvalidFieldName,
            ));
        }

        let value = value.into();
        if FIELD_SEPARATOR.read_with(|sep| key.contains(sep.as_str())) {
            let splits: Vec<String> =
                FIELD_SEPARATOR.read_with(|sep| key.split(sep.as_str()).map(str::to_string).collect());
            let splits: Vec<&str> = splits.iter().map(String::as_str).collect();
            self.deep_put(&splits, value)
        } else {
            self.data = self.data.update(key.to_string(), value);
            Ok(())
        }
    }

    /// Stores `value` under the top-level field `key` exactly as written.
    ///
    /// Unlike [put](Document::put) the key is never split into an embedded
    /// path, so the write succeeds whatever separator is configured. `key`
    /// must not be empty.
    pub fn put_field<T: Into<Value>>(&mut self, key: &str, value: T) {
        debug_assert!(!key.is_empty(), "field names cannot be empty");
        self.data = self.data.update(key.to_string(), value.into());
    }

    /// Returns the value stored under `key`, or [Value::Null] when the key
    /// or any segment of an embedded path is missing.
    pub fn get(&self, key: &str) -> Value {
        match self.data.get(key) {
            Some(value) => value.clone(),
            None => {
                if FIELD_SEPARATOR.read_with(|sep| key.contains(sep.as_str())) {
                    self.deep_get(key)
                } else {
                    Value::Null
                }
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        !self.get(key).is_null()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the top-level field names in order.
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    fn deep_get(&self, key: &str) -> Value {
        let splits: Vec<String> =
            FIELD_SEPARATOR.read_with(|sep| key.split(sep.as_str()).map(str::to_string).collect());

        let mut current = Value::Document(self.clone());
        for segment in &splits {
            current = match current {
                Value::Document(doc) => match doc.data.get(segment.as_str()) {
                    Some(value) => value.clone(),
                    None => return Value::Null,
                },
                _ => return Value::Null,
            };
        }
        current
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> LarderResult<()> {
        let key = match splits.first() {
            Some(key) if !key.is_empty() => *key,
            _ => {
                log::error!("Document does not support empty embedded key segment");
                return Err(LarderError::new(
                    "Document does not support empty embedded key segment",
                    ErrorKind::InvalidFieldName,
                ));
            }
        };

        if splits.len() == 1 {
            self.data = self.data.update(key.to_string(), value);
            return Ok(());
        }

        let mut nested = match self.data.get(key) {
            Some(Value::Document(doc)) => doc.clone(),
            _ => Document::new(),
        };
        nested.deep_put(&splits[1..], value)?;
        self.data = self.data.update(key.to_string(), Value::Document(nested));
        Ok(())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.data.iter().map(|(k, v)| format!("{}: {}", k, v)).join(", ")
        )
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

/// Builds a [Document] from `key: value` pairs. Values may be nested
/// documents in braces, arrays in brackets, or any expression convertible
/// into a [Value].
///
/// ```rust
/// use larder::doc;
///
/// let donation = doc! {
///     title: "Day-old bread",
///     categories: ["BAKERY_PASTRY"],
///     location: { latitude: 45.5017, longitude: (-73.5673) },
/// };
/// assert_eq!(donation.get("location.latitude").as_f64(), Some(45.5017));
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::store::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::store::Document::new();
            $(
                doc.put_field(stringify!($key).trim_matches('"'), $crate::doc_value!($value));
            )*
            doc
        }
    };
}

/// Helper macro converting the values of a [doc!] invocation.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
