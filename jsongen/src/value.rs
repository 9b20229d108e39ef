//! The JSON value tree.
//!
//! Generated decoders never look at text.  Input is first parsed into a
//! [`Value`] by [`from_str`](crate::from_str) and the decoder then walks the
//! tree, pulling out the keys it expects.
//!
//! The tree is `serde_json`'s.  Objects keep insertion order and numbers keep
//! unsigned, signed and floating point values apart, so a `u64` or `i64`
//! never passes through floating point on its way to a field.
pub use serde_json::{Number, Value};

/// An insertion ordered JSON object.
pub type Map = serde_json::Map<String, Value>;

/// Returns the human readable name of a value's kind.
///
/// These names show up in type mismatch errors.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
