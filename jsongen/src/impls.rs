use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

use crate::de::Decode;
use crate::error::{Error, ErrorKind};
use crate::ser::{Encode, JsonWriter};
use crate::value::{Map, Value};

pub(crate) fn decode_bool(value: &Value) -> Result<bool, Error> {
    value
        .as_bool()
        .ok_or_else(|| Error::type_mismatch("bool", value))
}

pub(crate) fn decode_integer<T>(value: &Value) -> Result<T, Error>
where
    T: TryFrom<u64> + TryFrom<i64>,
{
    let number = match value {
        Value::Number(n) if !n.is_f64() => n,
        other => return Err(Error::type_mismatch("integer", other)),
    };
    let converted = if let Some(v) = number.as_u64() {
        <T as TryFrom<u64>>::try_from(v).ok()
    } else if let Some(v) = number.as_i64() {
        <T as TryFrom<i64>>::try_from(v).ok()
    } else {
        None
    };
    converted.ok_or_else(|| {
        Error::new(
            ErrorKind::OutOfRange,
            format!(
                "{} is out of range for {}",
                number,
                std::any::type_name::<T>()
            ),
        )
    })
}

pub(crate) fn decode_f64(value: &Value) -> Result<f64, Error> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::type_mismatch("number", value)),
        other => Err(Error::type_mismatch("number", other)),
    }
}

/// Narrows to `f32`, rejecting finite values that would become infinite.
pub(crate) fn decode_f32(value: &Value) -> Result<f32, Error> {
    let wide = decode_f64(value)?;
    let narrow = wide as f32;
    if wide.is_finite() && !narrow.is_finite() {
        return Err(Error::new(
            ErrorKind::OutOfRange,
            format!("{} is out of range for f32", wide),
        ));
    }
    Ok(narrow)
}

pub(crate) fn decode_str(value: &Value) -> Result<&str, Error> {
    value
        .as_str()
        .ok_or_else(|| Error::type_mismatch("string", value))
}

pub(crate) fn decode_char_str(s: &str) -> Result<char, Error> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::new(
            ErrorKind::TypeMismatch,
            format!("expected single character string, found {:?}", s),
        )),
    }
}

pub(crate) fn decode_array(value: &Value) -> Result<&[Value], Error> {
    value
        .as_array()
        .map(|items| items.as_slice())
        .ok_or_else(|| Error::type_mismatch("array", value))
}

pub(crate) fn into_fixed_array<T, const N: usize>(items: Vec<T>) -> Result<[T; N], Error> {
    let len = items.len();
    <[T; N]>::try_from(items).map_err(|_| {
        Error::new(
            ErrorKind::TypeMismatch,
            format!("expected array of length {}, found length {}", N, len),
        )
    })
}

pub(crate) fn decode_object(value: &Value) -> Result<&Map, Error> {
    value
        .as_object()
        .ok_or_else(|| Error::type_mismatch("object", value))
}

impl Encode for bool {
    fn encode(&self, out: &mut JsonWriter) {
        out.write_bool(*self);
    }
}

impl Decode for bool {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_bool(value)
    }
}

macro_rules! int_impl {
    ($ty:ty) => {
        impl Encode for $ty {
            fn encode(&self, out: &mut JsonWriter) {
                out.write_int(*self);
            }
        }

        impl Decode for $ty {
            fn decode(value: &Value) -> Result<Self, Error> {
                decode_integer(value)
            }
        }
    };
}

int_impl!(u8);
int_impl!(u16);
int_impl!(u32);
int_impl!(u64);
int_impl!(usize);
int_impl!(i8);
int_impl!(i16);
int_impl!(i32);
int_impl!(i64);
int_impl!(isize);

impl Encode for f32 {
    fn encode(&self, out: &mut JsonWriter) {
        out.write_f32(*self);
    }
}

impl Decode for f32 {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_f32(value)
    }
}

impl Encode for f64 {
    fn encode(&self, out: &mut JsonWriter) {
        out.write_f64(*self);
    }
}

impl Decode for f64 {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_f64(value)
    }
}

impl Encode for str {
    fn encode(&self, out: &mut JsonWriter) {
        out.write_str(self);
    }
}

impl Encode for String {
    fn encode(&self, out: &mut JsonWriter) {
        out.write_str(self);
    }
}

impl Decode for String {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_str(value).map(|s| s.to_string())
    }
}

impl Encode for char {
    fn encode(&self, out: &mut JsonWriter) {
        out.write_char(*self);
    }
}

impl Decode for char {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_char_str(decode_str(value)?)
    }
}

impl<'a, T: Encode + ?Sized> Encode for &'a T {
    fn encode(&self, out: &mut JsonWriter) {
        (**self).encode(out);
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, out: &mut JsonWriter) {
        (**self).encode(out);
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(value: &Value) -> Result<Self, Error> {
        T::decode(value).map(Box::new)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, out: &mut JsonWriter) {
        match self {
            Some(value) => value.encode(out),
            None => out.write_null(),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }
}

fn encode_seq<'a, T: Encode + 'a>(items: impl Iterator<Item = &'a T>, out: &mut JsonWriter) {
    out.begin_array();
    for item in items {
        item.encode(out);
    }
    out.end_array();
}

fn encode_map<'a, K: AsRef<str> + 'a, V: Encode + 'a>(
    entries: impl Iterator<Item = (&'a K, &'a V)>,
    out: &mut JsonWriter,
) {
    out.begin_object();
    for (key, value) in entries {
        out.key(key.as_ref());
        value.encode(out);
    }
    out.end_object();
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, out: &mut JsonWriter) {
        encode_seq(self.iter(), out);
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, out: &mut JsonWriter) {
        encode_seq(self.iter(), out);
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode(value: &Value) -> Result<Self, Error> {
        let items = decode_array(value)?
            .iter()
            .map(T::decode)
            .collect::<Result<Vec<T>, Error>>()?;
        into_fixed_array(items)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, out: &mut JsonWriter) {
        encode_seq(self.iter(), out);
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_array(value)?.iter().map(T::decode).collect()
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn encode(&self, out: &mut JsonWriter) {
        encode_seq(self.iter(), out);
    }
}

impl<T: Decode> Decode for VecDeque<T> {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_array(value)?.iter().map(T::decode).collect()
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode(&self, out: &mut JsonWriter) {
        encode_seq(self.iter(), out);
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_array(value)?.iter().map(T::decode).collect()
    }
}

impl<T: Encode, S> Encode for HashSet<T, S> {
    fn encode(&self, out: &mut JsonWriter) {
        encode_seq(self.iter(), out);
    }
}

impl<T: Decode + Eq + Hash, S: BuildHasher + Default> Decode for HashSet<T, S> {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_array(value)?.iter().map(T::decode).collect()
    }
}

impl<K: AsRef<str>, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, out: &mut JsonWriter) {
        encode_map(self.iter(), out);
    }
}

impl<V: Decode> Decode for BTreeMap<String, V> {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_object(value)?
            .iter()
            .map(|(k, v)| Ok((k.clone(), V::decode(v)?)))
            .collect()
    }
}

impl<K: AsRef<str>, V: Encode, S> Encode for HashMap<K, V, S> {
    fn encode(&self, out: &mut JsonWriter) {
        encode_map(self.iter(), out);
    }
}

impl<V: Decode, S: BuildHasher + Default> Decode for HashMap<String, V, S> {
    fn decode(value: &Value) -> Result<Self, Error> {
        decode_object(value)?
            .iter()
            .map(|(k, v)| Ok((k.clone(), V::decode(v)?)))
            .collect()
    }
}

impl Encode for Value {
    fn encode(&self, out: &mut JsonWriter) {
        match self {
            Value::Null => out.write_null(),
            Value::Bool(v) => out.write_bool(*v),
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    out.write_int(v);
                } else if let Some(v) = n.as_i64() {
                    out.write_int(v);
                } else {
                    out.write_f64(n.as_f64().unwrap_or(f64::NAN));
                }
            }
            Value::String(v) => out.write_str(v),
            Value::Array(items) => encode_seq(items.iter(), out),
            Value::Object(map) => encode_map(map.iter(), out),
        }
    }
}

impl Decode for Value {
    fn decode(value: &Value) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_json, to_string};

    #[test]
    fn test_integer_range() {
        assert_eq!(from_json::<u8>("255").unwrap(), 255);
        let err = from_json::<u8>("256").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        let err = from_json::<u32>("-1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(from_json::<i64>("-9223372036854775808").unwrap(), i64::MIN);
        assert_eq!(from_json::<u64>("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn test_integer_rejects_float() {
        let err = from_json::<i32>("1.0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "expected integer, found float");
    }

    #[test]
    fn test_float_accepts_integer() {
        assert_eq!(from_json::<f64>("3").unwrap(), 3.0);
        assert_eq!(from_json::<f32>("-2").unwrap(), -2.0);
    }

    #[test]
    fn test_f32_range() {
        assert!(from_json::<f32>("3e38").unwrap().is_finite());
        let err = from_json::<f32>("1e39").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(err.message().ends_with("is out of range for f32"));
        let err = from_json::<f32>("-1e39").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(from_json::<f64>("1e39").unwrap(), 1e39);
    }

    #[test]
    fn test_fixed_arrays() {
        let grid = [[1u8, 2], [3, 4]];
        let json = to_string(&grid);
        assert_eq!(json, "[[1,2],[3,4]]");
        assert_eq!(from_json::<[[u8; 2]; 2]>(&json).unwrap(), grid);
        let err = from_json::<[u8; 3]>("[1,2]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "expected array of length 3, found length 2");
    }

    #[test]
    fn test_char() {
        assert_eq!(from_json::<char>(r#""ß""#).unwrap(), 'ß');
        assert_eq!(
            from_json::<char>(r#""ab""#).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(to_string(&'"'), r#""\"""#);
    }

    #[test]
    fn test_containers() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), vec![Some(1u32), None]);
        map.insert("a".to_string(), vec![]);
        let json = to_string(&map);
        assert_eq!(json, r#"{"a":[],"b":[1,null]}"#);
        assert_eq!(
            from_json::<BTreeMap<String, Vec<Option<u32>>>>(&json).unwrap(),
            map
        );
    }

    #[test]
    fn test_value_roundtrip() {
        let text = r#"{"z":1,"a":[true,null,-2,0.5,"x"]}"#;
        let value = crate::from_str(text).unwrap();
        assert_eq!(to_string(&value), text);
    }
}
