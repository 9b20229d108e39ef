//! Reading JSON text.
//!
//! Parsing happens in one step into a [`Value`] tree.  Decoders generated for
//! a type then take the tree apart.
//!
//! ```rust
//! let value = jsongen::from_str(r#"{"id": 1, "tags": ["a"]}"#).unwrap();
//! assert_eq!(value.get("tags").and_then(|v| v.as_array()).map(|x| x.len()), Some(1));
//! ```
use crate::error::{Error, ErrorKind};
use crate::value::Value;

/// Types that can be rebuilt from a JSON value.
///
/// Like [`Encode`](crate::Encode) this is normally generated.
pub trait Decode: Sized {
    /// Converts a JSON value into `Self`.
    fn decode(value: &Value) -> Result<Self, Error>;
}

/// Parses JSON text into a value tree.
///
/// Nesting 128 or more arrays or objects deep is rejected.  When an object
/// repeats a key the last value wins and the key keeps its first position.
pub fn from_str(input: &str) -> Result<Value, Error> {
    serde_json::from_str::<Value>(input)
        .map_err(|err| Error::new(ErrorKind::Syntax, err.to_string()))
}

/// Parses JSON text and decodes it into `T`.
pub fn from_json<T: Decode>(input: &str) -> Result<T, Error> {
    T::decode(&from_str(input)?)
}
