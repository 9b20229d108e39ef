//! Mapping from shapes to conversion strategies.
//!
//! A strategy says how a value of some shape is converted in both
//! directions.  The mapping is total over the supported shapes and fails for
//! everything else, so the emitter never sees a shape it cannot handle.
use crate::shape::{CollectionKind, MapKind, PrimitiveKind, StringKind, TypeRef, TypeShape};

/// The string representation used for string-like values and map keys.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum StringForm {
    Text,
    Char,
    /// A fieldless enum written as its variant name.
    Enum(TypeRef),
}

/// How a value is converted to and from JSON.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Strategy {
    /// Written as a number or boolean.
    DirectPrimitive { kind: PrimitiveKind, boxed: bool },
    /// Written as a string.
    StringConversion(StringForm),
    /// Handed to the encoder or decoder of another type.
    RecursiveCall(TypeRef),
    /// Written as an array, one element at a time.
    IterateCollection {
        kind: CollectionKind,
        element: Box<Strategy>,
    },
    /// Written as an object, the keys converted through `key`.
    IterateMap {
        kind: MapKind,
        key: StringForm,
        value: Box<Strategy>,
    },
    /// `null` when absent, the inner strategy otherwise.
    NullGuard(Box<Strategy>),
}

/// Why a shape has no strategy.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum ResolveError {
    UnsupportedShape { declared: String, reason: String },
    UnsupportedKeyShape { key: String },
}

/// Finds the strategy for a shape.
///
/// Pure and deterministic: the same shape always resolves the same way.
pub fn resolve(shape: &TypeShape) -> Result<Strategy, ResolveError> {
    Ok(match shape {
        TypeShape::Primitive(kind) => Strategy::DirectPrimitive {
            kind: *kind,
            boxed: false,
        },
        TypeShape::BoxedPrimitive(kind) => Strategy::DirectPrimitive {
            kind: *kind,
            boxed: true,
        },
        TypeShape::StringLike(StringKind::Text) => Strategy::StringConversion(StringForm::Text),
        TypeShape::StringLike(StringKind::Char) => Strategy::StringConversion(StringForm::Char),
        TypeShape::Enum { target, .. } => {
            Strategy::StringConversion(StringForm::Enum(target.clone()))
        }
        TypeShape::NestedObject(target) => Strategy::RecursiveCall(target.clone()),
        TypeShape::Collection(kind, element) => Strategy::IterateCollection {
            kind: *kind,
            element: Box::new(resolve(element)?),
        },
        TypeShape::Map(kind, key, value) => Strategy::IterateMap {
            kind: *kind,
            key: key_form(key)?,
            value: Box::new(resolve(value)?),
        },
        TypeShape::Nullable(inner) => Strategy::NullGuard(Box::new(resolve(inner)?)),
        TypeShape::Unsupported { declared, reason } => {
            return Err(ResolveError::UnsupportedShape {
                declared: declared.clone(),
                reason: reason.clone(),
            })
        }
    })
}

/// Map keys must have a direct string form.
fn key_form(key: &TypeShape) -> Result<StringForm, ResolveError> {
    match resolve(key) {
        Ok(Strategy::StringConversion(StringForm::Enum(target))) if target.boxed => {}
        Ok(Strategy::StringConversion(form)) => return Ok(form),
        _ => {}
    }
    Err(ResolveError::UnsupportedKeyShape {
        key: key.describe(),
    })
}
