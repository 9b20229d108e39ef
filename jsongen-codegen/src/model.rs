//! Building type models from introspection records.
//!
//! A model is the complete, validated description of one type: every
//! serializable field in declaration order with its JSON key, shape and
//! strategy.  Once a model exists, emission can no longer fail because of
//! the type itself, only because a referenced type failed to generate.
use std::collections::{BTreeMap, BTreeSet};

use proc_macro2::Span;
use syn::spanned::Spanned;

use crate::attr::{ident_name, ContainerAttrs, FieldAttrs, VariantAttrs};
use crate::error::{GenerateError, GenerateErrorKind};
use crate::shape::{IndexEntry, ShapeContext, TypeIndex, TypeShape};
use crate::strategy::{resolve, ResolveError, Strategy};
use crate::Config;

/// One serializable field of a struct.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub ident: syn::Ident,
    /// The field name as declared, without a raw `r#` prefix.
    pub source_name: String,
    pub json_key: String,
    pub shape: TypeShape,
    pub nullable: bool,
    /// A missing key decodes to `Default::default()`.
    pub default: bool,
    pub strategy: Strategy,
}

#[derive(Debug, Clone)]
pub struct VariantDescriptor {
    pub ident: syn::Ident,
    pub json_name: String,
}

#[derive(Debug, Clone)]
pub enum ModelBody {
    Struct {
        /// Serializable fields in declaration order.
        fields: Vec<FieldDescriptor>,
        /// Fields excluded from JSON.  Decoding fills them with defaults.
        skipped: Vec<syn::Ident>,
    },
    Enum {
        variants: Vec<VariantDescriptor>,
    },
}

/// The validated description of one type.
#[derive(Debug, Clone)]
pub struct TypeModel {
    pub type_name: String,
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub crate_path: syn::Path,
    pub skip_nulls: bool,
    pub body: ModelBody,
}

impl TypeModel {
    pub fn fields(&self) -> &[FieldDescriptor] {
        match self.body {
            ModelBody::Struct { ref fields, .. } => fields,
            ModelBody::Enum { .. } => &[],
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.body, ModelBody::Enum { .. })
    }
}

/// The environment a model is built in.
pub struct BuildContext<'a> {
    pub index: &'a TypeIndex,
    pub config: &'a Config,
}

/// Indexes the types of a pass by name.
///
/// Enum entries carry their JSON variant names.  Attribute errors are not
/// reported here, building the model reports them.
pub fn index_of(inputs: &[syn::DeriveInput]) -> TypeIndex {
    let mut index = TypeIndex::new();
    for input in inputs {
        let entry = match &input.data {
            syn::Data::Enum(data) => {
                let container = ContainerAttrs::of(input).unwrap_or_default();
                IndexEntry::Enum(
                    data.variants
                        .iter()
                        .map(|variant| {
                            VariantAttrs::of(variant)
                                .unwrap_or_default()
                                .name(&variant.ident, &container)
                        })
                        .collect(),
                )
            }
            _ => IndexEntry::Struct,
        };
        index.insert(ident_name(&input.ident), entry);
    }
    index
}

/// Builds the model of a single type.
pub fn build(input: &syn::DeriveInput, cx: &BuildContext<'_>) -> Result<TypeModel, GenerateError> {
    let type_name = ident_name(&input.ident);
    let container =
        ContainerAttrs::of(input).map_err(|err| GenerateError::attribute(&type_name, None, err))?;

    let body = match &input.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => build_struct(input, &type_name, &container, fields, cx)?,
        syn::Data::Struct(_) => {
            return Err(unsupported_type(
                &type_name,
                "only structs with named fields are supported",
                input.ident.span(),
            ))
        }
        syn::Data::Enum(data) => build_enum(input, &type_name, &container, data)?,
        syn::Data::Union(_) => {
            return Err(unsupported_type(
                &type_name,
                "unions are not supported",
                input.ident.span(),
            ))
        }
    };

    Ok(TypeModel {
        type_name,
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        crate_path: container
            .crate_path()
            .cloned()
            .unwrap_or_else(|| cx.config.crate_path.clone()),
        skip_nulls: container.skip_nulls(),
        body,
    })
}

fn build_struct(
    input: &syn::DeriveInput,
    type_name: &str,
    container: &ContainerAttrs,
    fields: &syn::FieldsNamed,
    cx: &BuildContext<'_>,
) -> Result<ModelBody, GenerateError> {
    let shapes = ShapeContext {
        index: cx.index,
        scope: cx.config.scope,
        generics: input
            .generics
            .type_params()
            .map(|param| param.ident.to_string())
            .collect(),
        external: &cx.config.external,
    };

    let mut seen = BTreeMap::new();
    let mut rv = Vec::new();
    let mut skipped = Vec::new();

    for field in &fields.named {
        let ident = match field.ident {
            Some(ref ident) => ident,
            None => continue,
        };
        let source_name = ident_name(ident);
        let attrs = FieldAttrs::of(field)
            .map_err(|err| GenerateError::attribute(type_name, Some(&source_name), err))?;
        if attrs.skip() {
            skipped.push(ident.clone());
            continue;
        }

        let json_key = attrs.name(ident, container);
        if let Some(previous) = seen.insert(json_key.clone(), source_name.clone()) {
            return Err(GenerateError::new(
                GenerateErrorKind::DuplicateKey,
                type_name,
                Some(&source_name),
                format!(
                    "JSON key \"{}\" is already used by field `{}`",
                    json_key, previous
                ),
                ident.span(),
            ));
        }

        let shape = shapes.classify(&field.ty).map_err(|unresolved| {
            GenerateError::new(
                GenerateErrorKind::UnresolvedNestedType,
                type_name,
                Some(&source_name),
                format!(
                    "type `{}` is not part of this generation pass",
                    unresolved.name
                ),
                field.ty.span(),
            )
        })?;
        let strategy = resolve(&shape).map_err(|err| match err {
            ResolveError::UnsupportedShape { declared, reason } => GenerateError::new(
                GenerateErrorKind::UnsupportedShape,
                type_name,
                Some(&source_name),
                format!("`{}` is not supported: {}", declared, reason),
                field.ty.span(),
            ),
            ResolveError::UnsupportedKeyShape { key } => GenerateError::new(
                GenerateErrorKind::UnsupportedKeyShape,
                type_name,
                Some(&source_name),
                format!("map keys must be strings, found {}", key),
                field.ty.span(),
            ),
        })?;

        rv.push(FieldDescriptor {
            ident: ident.clone(),
            source_name,
            json_key,
            nullable: matches!(shape, TypeShape::Nullable(_)),
            default: attrs.has_default(),
            shape,
            strategy,
        });
    }

    Ok(ModelBody::Struct {
        fields: rv,
        skipped,
    })
}

fn build_enum(
    input: &syn::DeriveInput,
    type_name: &str,
    container: &ContainerAttrs,
    data: &syn::DataEnum,
) -> Result<ModelBody, GenerateError> {
    if input.generics.params.iter().next().is_some() {
        return Err(unsupported_type(
            type_name,
            "generic enums are not supported",
            input.generics.span(),
        ));
    }

    let mut seen = BTreeSet::new();
    let mut variants = Vec::new();

    for variant in &data.variants {
        let source_name = ident_name(&variant.ident);
        if !matches!(variant.fields, syn::Fields::Unit) {
            return Err(GenerateError::new(
                GenerateErrorKind::UnsupportedShape,
                type_name,
                Some(&source_name),
                "only fieldless variants are supported",
                variant.span(),
            ));
        }
        let attrs = VariantAttrs::of(variant)
            .map_err(|err| GenerateError::attribute(type_name, Some(&source_name), err))?;
        let json_name = attrs.name(&variant.ident, container);
        if !seen.insert(json_name.clone()) {
            return Err(GenerateError::new(
                GenerateErrorKind::DuplicateKey,
                type_name,
                Some(&source_name),
                format!("variant name \"{}\" is used twice", json_name),
                variant.ident.span(),
            ));
        }
        variants.push(VariantDescriptor {
            ident: variant.ident.clone(),
            json_name,
        });
    }

    Ok(ModelBody::Enum { variants })
}

fn unsupported_type(type_name: &str, message: &str, span: Span) -> GenerateError {
    GenerateError::new(
        GenerateErrorKind::UnsupportedShape,
        type_name,
        None,
        message,
        span,
    )
}
