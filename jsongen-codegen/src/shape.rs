//! Classification of declared field types into shapes.
//!
//! A shape is the part of a declared type that matters for JSON: is it a
//! number, a string, a sequence, an object with string keys, a reference to
//! another generated type, or something that may be absent.  Classification
//! only looks at the type's syntax plus the index of types taking part in the
//! current pass.  It never fails on an unsupported type; those come back as
//! [`TypeShape::Unsupported`] and the strategy resolver rejects them.
use std::collections::{BTreeMap, BTreeSet};

use quote::ToTokens;

use crate::Scope;

/// The primitive kinds written as JSON numbers or booleans.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
}

impl PrimitiveKind {
    fn from_ident(name: &str) -> Option<PrimitiveKind> {
        Some(match name {
            "bool" => PrimitiveKind::Bool,
            "i8" => PrimitiveKind::I8,
            "i16" => PrimitiveKind::I16,
            "i32" => PrimitiveKind::I32,
            "i64" => PrimitiveKind::I64,
            "isize" => PrimitiveKind::Isize,
            "u8" => PrimitiveKind::U8,
            "u16" => PrimitiveKind::U16,
            "u32" => PrimitiveKind::U32,
            "u64" => PrimitiveKind::U64,
            "usize" => PrimitiveKind::Usize,
            "f32" => PrimitiveKind::F32,
            "f64" => PrimitiveKind::F64,
            _ => return None,
        })
    }

    /// The Rust type name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::Isize => "isize",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::Usize => "usize",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }
}

/// Types written as JSON strings without further structure.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum StringKind {
    Text,
    Char,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum CollectionKind {
    /// A fixed size array `[T; N]`.  The length is checked when decoding.
    Array,
    Vec,
    VecDeque,
    BTreeSet,
    HashSet,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum MapKind {
    BTreeMap,
    HashMap,
}

/// Where a referenced type comes from.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum RefOrigin {
    /// A type of the current generation pass.  Its model is in the registry.
    Batch,
    /// A generic parameter of the type being generated.
    Generic,
    /// A type implementing the traits by other means.
    External,
}

/// A by-name reference to another type.
///
/// References never embed the referenced model, which is what keeps
/// self-referential and mutually recursive types finite.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TypeRef {
    /// Lookup key into the registry: the last path segment.
    pub name: String,
    /// The declared type without a surrounding `Box`.
    pub ty: syn::Type,
    pub boxed: bool,
    pub origin: RefOrigin,
}

/// The JSON relevant classification of a declared type.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum TypeShape {
    Primitive(PrimitiveKind),
    BoxedPrimitive(PrimitiveKind),
    StringLike(StringKind),
    Enum { target: TypeRef, values: Vec<String> },
    NestedObject(TypeRef),
    Collection(CollectionKind, Box<TypeShape>),
    Map(MapKind, Box<TypeShape>, Box<TypeShape>),
    Nullable(Box<TypeShape>),
    Unsupported { declared: String, reason: String },
}

impl TypeShape {
    /// A short human readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TypeShape::Primitive(kind) => kind.name().to_string(),
            TypeShape::BoxedPrimitive(kind) => format!("Box<{}>", kind.name()),
            TypeShape::StringLike(StringKind::Text) => "String".into(),
            TypeShape::StringLike(StringKind::Char) => "char".into(),
            TypeShape::Enum { target, .. } => format!("enum {}", target.name),
            TypeShape::NestedObject(target) => format!("type {}", target.name),
            TypeShape::Collection(CollectionKind::Array, element) => {
                format!("array of {}", element.describe())
            }
            TypeShape::Collection(_, element) => format!("collection of {}", element.describe()),
            TypeShape::Map(_, key, value) => {
                format!("map of {} to {}", key.describe(), value.describe())
            }
            TypeShape::Nullable(inner) => format!("optional {}", inner.describe()),
            TypeShape::Unsupported { declared, .. } => declared.clone(),
        }
    }
}

/// What a pass knows about one of its types before models are built.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum IndexEntry {
    Struct,
    /// A fieldless enum with the JSON names of its variants.
    Enum(Vec<String>),
}

/// Names of all types taking part in a generation pass.
#[derive(Debug, Default, Clone)]
pub struct TypeIndex {
    entries: BTreeMap<String, IndexEntry>,
}

impl TypeIndex {
    pub fn new() -> TypeIndex {
        TypeIndex::default()
    }

    pub fn insert(&mut self, name: String, entry: IndexEntry) {
        self.entries.insert(name, entry);
    }

    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.get(name)
    }
}

/// A declared type naming something outside the pass.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Unresolved {
    pub name: String,
}

/// Everything classification needs to know about its surroundings.
pub struct ShapeContext<'a> {
    pub index: &'a TypeIndex,
    pub scope: Scope,
    pub generics: BTreeSet<String>,
    pub external: &'a BTreeSet<String>,
}

impl<'a> ShapeContext<'a> {
    /// Classifies a declared type.
    pub fn classify(&self, ty: &syn::Type) -> Result<TypeShape, Unresolved> {
        match ty {
            syn::Type::Group(group) => self.classify(&group.elem),
            syn::Type::Paren(paren) => self.classify(&paren.elem),
            syn::Type::Path(path) if path.qself.is_none() => self.classify_path(ty, &path.path),
            syn::Type::Array(array) => self.collection(CollectionKind::Array, &array.elem),
            other => Ok(unsupported(other, "type has no JSON representation")),
        }
    }

    fn classify_path(&self, ty: &syn::Type, path: &syn::Path) -> Result<TypeShape, Unresolved> {
        let segment = match path.segments.last() {
            Some(segment) => segment,
            None => return Ok(unsupported(ty, "empty path")),
        };
        let name = segment.ident.to_string();
        let args = match type_args(&segment.arguments) {
            Some(args) => args,
            None => return Ok(unsupported(ty, "unsupported generic arguments")),
        };

        if path.segments.len() == 1 && args.is_empty() && self.generics.contains(&name) {
            return Ok(TypeShape::NestedObject(TypeRef {
                name,
                ty: ty.clone(),
                boxed: false,
                origin: RefOrigin::Generic,
            }));
        }

        if args.is_empty() {
            if let Some(kind) = PrimitiveKind::from_ident(&name) {
                return Ok(TypeShape::Primitive(kind));
            }
        }

        match (name.as_str(), args.as_slice()) {
            ("String", []) => Ok(TypeShape::StringLike(StringKind::Text)),
            ("char", []) => Ok(TypeShape::StringLike(StringKind::Char)),
            ("Box", [inner]) => Ok(match self.classify(inner)? {
                TypeShape::Primitive(kind) => TypeShape::BoxedPrimitive(kind),
                TypeShape::NestedObject(target) if !target.boxed => {
                    TypeShape::NestedObject(TypeRef { boxed: true, ..target })
                }
                TypeShape::Enum { target, values } if !target.boxed => TypeShape::Enum {
                    target: TypeRef { boxed: true, ..target },
                    values,
                },
                _ => unsupported(ty, "only primitives and named types can be boxed"),
            }),
            ("Option", [inner]) => Ok(match self.classify(inner)? {
                TypeShape::Nullable(_) => {
                    unsupported(ty, "nested options cannot be told apart in JSON")
                }
                shape => TypeShape::Nullable(Box::new(shape)),
            }),
            ("Vec", [element]) => self.collection(CollectionKind::Vec, element),
            ("VecDeque", [element]) => self.collection(CollectionKind::VecDeque, element),
            ("BTreeSet", [element]) => self.collection(CollectionKind::BTreeSet, element),
            ("HashSet", [element]) => self.collection(CollectionKind::HashSet, element),
            ("BTreeMap", [key, value]) => self.map(MapKind::BTreeMap, key, value),
            ("HashMap", [key, value]) => self.map(MapKind::HashMap, key, value),
            ("Box" | "Option" | "Vec" | "VecDeque" | "BTreeSet" | "HashSet" | "BTreeMap"
            | "HashMap", _) => Ok(unsupported(ty, "unexpected number of type arguments")),
            _ => self.named(ty, name),
        }
    }

    fn collection(
        &self,
        kind: CollectionKind,
        element: &syn::Type,
    ) -> Result<TypeShape, Unresolved> {
        Ok(TypeShape::Collection(kind, Box::new(self.classify(element)?)))
    }

    fn map(
        &self,
        kind: MapKind,
        key: &syn::Type,
        value: &syn::Type,
    ) -> Result<TypeShape, Unresolved> {
        Ok(TypeShape::Map(
            kind,
            Box::new(self.classify(key)?),
            Box::new(self.classify(value)?),
        ))
    }

    fn named(&self, ty: &syn::Type, name: String) -> Result<TypeShape, Unresolved> {
        let target = |origin| TypeRef {
            name: name.clone(),
            ty: ty.clone(),
            boxed: false,
            origin,
        };
        match self.index.get(&name) {
            Some(IndexEntry::Struct) => Ok(TypeShape::NestedObject(target(RefOrigin::Batch))),
            Some(IndexEntry::Enum(values)) => Ok(TypeShape::Enum {
                target: target(RefOrigin::Batch),
                values: values.clone(),
            }),
            None if self.external.contains(&name) || self.scope == Scope::Open => {
                Ok(TypeShape::NestedObject(target(RefOrigin::External)))
            }
            None => Err(Unresolved { name }),
        }
    }
}

/// Extracts the type arguments of a path segment.
///
/// Returns `None` for arguments that are not plain types (parenthesized
/// arguments, associated type bindings, consts).  Lifetimes are skipped.
fn type_args(arguments: &syn::PathArguments) -> Option<Vec<&syn::Type>> {
    match arguments {
        syn::PathArguments::None => Some(Vec::new()),
        syn::PathArguments::AngleBracketed(args) => {
            let mut rv = Vec::new();
            for arg in &args.args {
                match arg {
                    syn::GenericArgument::Type(ty) => rv.push(ty),
                    syn::GenericArgument::Lifetime(_) => {}
                    _ => return None,
                }
            }
            Some(rv)
        }
        syn::PathArguments::Parenthesized(_) => None,
    }
}

fn unsupported(ty: &syn::Type, reason: &str) -> TypeShape {
    TypeShape::Unsupported {
        declared: type_text(ty),
        reason: reason.to_string(),
    }
}

/// Renders a type compactly for messages.
pub fn type_text(ty: &syn::Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" <", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace("& ", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_in(
        index: &TypeIndex,
        scope: Scope,
        ty: syn::Type,
    ) -> Result<TypeShape, Unresolved> {
        let external = BTreeSet::new();
        let cx = ShapeContext {
            index,
            scope,
            generics: ["T".to_string()].into_iter().collect(),
            external: &external,
        };
        cx.classify(&ty)
    }

    fn index() -> TypeIndex {
        let mut index = TypeIndex::new();
        index.insert("Point".into(), IndexEntry::Struct);
        index.insert("Color".into(), IndexEntry::Enum(vec!["red".into()]));
        index
    }

    #[test]
    fn test_primitives_and_strings() {
        let index = index();
        let shape = classify_in(&index, Scope::Closed, syn::parse_quote!(u16)).unwrap();
        assert_eq!(shape, TypeShape::Primitive(PrimitiveKind::U16));
        let shape = classify_in(&index, Scope::Closed, syn::parse_quote!(Box<f64>)).unwrap();
        assert_eq!(shape, TypeShape::BoxedPrimitive(PrimitiveKind::F64));
        let ty = syn::parse_quote!(std::string::String);
        let shape = classify_in(&index, Scope::Closed, ty).unwrap();
        assert_eq!(shape, TypeShape::StringLike(StringKind::Text));
    }

    #[test]
    fn test_containers() {
        let index = index();
        let shape = classify_in(
            &index,
            Scope::Closed,
            syn::parse_quote!(Option<Vec<BTreeMap<String, Color>>>),
        )
        .unwrap();
        assert_eq!(shape.describe(), "optional collection of map of String to enum Color");
    }

    #[test]
    fn test_fixed_arrays() {
        let index = index();
        let shape = classify_in(&index, Scope::Closed, syn::parse_quote!([[f32; 3]; 3])).unwrap();
        assert_eq!(shape.describe(), "array of array of f32");
        match shape {
            TypeShape::Collection(CollectionKind::Array, inner) => {
                assert_eq!(
                    *inner,
                    TypeShape::Collection(
                        CollectionKind::Array,
                        Box::new(TypeShape::Primitive(PrimitiveKind::F32))
                    )
                );
            }
            other => panic!("unexpected shape {:?}", other),
        }
        let ty = syn::parse_quote!(Option<[Point; 2]>);
        let shape = classify_in(&index, Scope::Closed, ty).unwrap();
        assert_eq!(shape.describe(), "optional array of type Point");
    }

    #[test]
    fn test_references() {
        let index = index();
        match classify_in(&index, Scope::Closed, syn::parse_quote!(Box<Point>)).unwrap() {
            TypeShape::NestedObject(target) => {
                assert_eq!(target.name, "Point");
                assert!(target.boxed);
                assert_eq!(target.origin, RefOrigin::Batch);
            }
            other => panic!("unexpected shape {:?}", other),
        }
        match classify_in(&index, Scope::Closed, syn::parse_quote!(T)).unwrap() {
            TypeShape::NestedObject(target) => assert_eq!(target.origin, RefOrigin::Generic),
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_unknown_types_depend_on_scope() {
        let index = index();
        let ty = syn::parse_quote!(Vec<Missing>);
        let err = classify_in(&index, Scope::Closed, ty).unwrap_err();
        assert_eq!(err.name, "Missing");
        match classify_in(&index, Scope::Open, syn::parse_quote!(Missing)).unwrap() {
            TypeShape::NestedObject(target) => assert_eq!(target.origin, RefOrigin::External),
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_unsupported() {
        let index = index();
        for ty in [
            syn::parse_quote!(&'static str),
            syn::parse_quote!((u8, u8)),
            syn::parse_quote!([u8]),
            syn::parse_quote!(Box<[u8; 4]>),
            syn::parse_quote!(Option<Option<u8>>),
            syn::parse_quote!(HashMap<String, u8, MyHasher>),
            syn::parse_quote!(Box<Vec<u8>>),
        ] {
            let shape = classify_in(&index, Scope::Closed, ty).unwrap();
            assert!(matches!(shape, TypeShape::Unsupported { .. }), "{:?}", shape);
        }
    }
}
