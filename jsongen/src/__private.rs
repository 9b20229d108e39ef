//! Helpers called from generated code.  Not a stable interface.
//!
//! Every helper takes the JSON key of the field it works for so errors name
//! the offending field.
use crate::de::Decode;
use crate::enums::JsonStr;
use crate::error::{Error, ErrorKind};
use crate::impls;
use crate::value::{kind_name, Map, Value};

pub use std::boxed::Box;
pub use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
pub use std::default::Default;
pub use std::option::Option::{self, None, Some};
pub use std::result::Result::{self, Err, Ok};
pub use std::string::String;
pub use std::vec::Vec;

/// Opens the JSON object a struct is decoded from.
pub fn object<'a>(value: &'a Value, type_name: &str) -> Result<&'a Map, Error> {
    value.as_object().ok_or_else(|| {
        Error::new(
            ErrorKind::TypeMismatch,
            format!(
                "expected object for {}, found {}",
                type_name,
                kind_name(value)
            ),
        )
    })
}

/// Looks up a key that must be present.
pub fn required<'a>(
    object: &'a Map,
    type_name: &str,
    field: &'static str,
) -> Result<&'a Value, Error> {
    object
        .get(field)
        .ok_or_else(|| Error::missing_field(type_name, field))
}

pub fn boolean(value: &Value, field: &'static str) -> Result<bool, Error> {
    impls::decode_bool(value).map_err(|e| e.with_field(field))
}

pub fn integer<T>(value: &Value, field: &'static str) -> Result<T, Error>
where
    T: TryFrom<u64> + TryFrom<i64>,
{
    impls::decode_integer(value).map_err(|e| e.with_field(field))
}

pub fn float64(value: &Value, field: &'static str) -> Result<f64, Error> {
    impls::decode_f64(value).map_err(|e| e.with_field(field))
}

pub fn float32(value: &Value, field: &'static str) -> Result<f32, Error> {
    impls::decode_f32(value).map_err(|e| e.with_field(field))
}

pub fn string(value: &Value, field: &'static str) -> Result<String, Error> {
    impls::decode_str(value)
        .map(|s| s.to_string())
        .map_err(|e| e.with_field(field))
}

pub fn character(value: &Value, field: &'static str) -> Result<char, Error> {
    impls::decode_str(value)
        .and_then(impls::decode_char_str)
        .map_err(|e| e.with_field(field))
}

pub fn char_key(key: &str, field: &'static str) -> Result<char, Error> {
    impls::decode_char_str(key).map_err(|e| e.with_field(field))
}

/// Decodes a fieldless enum from its variant name.
pub fn variant_of<T: JsonStr>(value: &Value) -> Result<T, Error> {
    variant_from_str(impls::decode_str(value)?)
}

pub fn variant<T: JsonStr>(value: &Value, field: &'static str) -> Result<T, Error> {
    variant_of(value).map_err(|e| e.with_field(field))
}

pub fn variant_key<T: JsonStr>(key: &str, field: &'static str) -> Result<T, Error> {
    variant_from_str(key).map_err(|e| e.with_field(field))
}

fn variant_from_str<T: JsonStr>(s: &str) -> Result<T, Error> {
    T::from_json_str(s).ok_or_else(|| {
        Error::new(
            ErrorKind::UnknownVariant,
            format!(
                "unknown variant {:?}, expected one of {}",
                s,
                T::VARIANTS.join(", ")
            ),
        )
    })
}

pub fn array<'a>(value: &'a Value, field: &'static str) -> Result<&'a [Value], Error> {
    impls::decode_array(value).map_err(|e| e.with_field(field))
}

/// Moves decoded elements into a fixed size array.
pub fn fixed_array<T, const N: usize>(
    items: Vec<T>,
    field: &'static str,
) -> Result<[T; N], Error> {
    impls::into_fixed_array(items).map_err(|e| e.with_field(field))
}

pub fn map<'a>(value: &'a Value, field: &'static str) -> Result<&'a Map, Error> {
    impls::decode_object(value).map_err(|e| e.with_field(field))
}

/// Delegates to the decoder of another type.
pub fn nested<T: Decode>(value: &Value, field: &'static str) -> Result<T, Error> {
    T::decode(value).map_err(|e| e.with_field(field))
}
