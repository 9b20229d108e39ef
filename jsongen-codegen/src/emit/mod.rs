//! The code emission engine.
//!
//! Turns a [`TypeModel`] into the source of its encoder and decoder.  The
//! output depends on nothing but the model and the set of registered type
//! names, so emitting the same model twice produces identical text.
use proc_macro2::{Span, TokenStream};
use quote::quote;

use crate::error::{GenerateError, GenerateErrorKind};
use crate::model::{FieldDescriptor, ModelBody, TypeModel};
use crate::registry::Registry;
use crate::shape::{RefOrigin, TypeRef};
use crate::strategy::{Strategy, StringForm};

mod decode;
mod encode;

/// The generated source for one type.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    pub type_name: String,
    /// `impl Encode`.
    pub encoder: TokenStream,
    /// `impl Decode`.
    pub decoder: TokenStream,
    /// `impl JsonStr`, for enums only.
    pub names: Option<TokenStream>,
}

impl GeneratedUnit {
    /// All impls of the unit inside an anonymous const block.
    pub fn to_tokens(&self) -> TokenStream {
        let encoder = &self.encoder;
        let decoder = &self.decoder;
        let names = &self.names;
        quote! {
            const _: () = {
                #names
                #encoder
                #decoder
            };
        }
    }

    /// Renders the unit as source text.
    pub fn render(&self) -> String {
        self.to_tokens().to_string()
    }
}

/// Emits the encoder and decoder for a model.
///
/// Fails with [`GenerateErrorKind::UnresolvedNestedType`] if a field refers
/// to a type of the pass that did not make it into the registry, or whose
/// registered model is not the kind the field was classified against.
pub fn emit(model: &TypeModel, registry: &Registry) -> Result<GeneratedUnit, GenerateError> {
    for field in model.fields() {
        check_references(model, field, &field.strategy, registry)?;
    }

    Ok(match &model.body {
        ModelBody::Struct { fields, skipped } => GeneratedUnit {
            type_name: model.type_name.clone(),
            encoder: encode::struct_encoder(model, fields),
            decoder: decode::struct_decoder(model, fields, skipped),
            names: None,
        },
        ModelBody::Enum { variants } => GeneratedUnit {
            type_name: model.type_name.clone(),
            encoder: encode::enum_encoder(model),
            decoder: decode::enum_decoder(model),
            names: Some(encode::enum_names(model, variants)),
        },
    })
}

fn check_references(
    model: &TypeModel,
    field: &FieldDescriptor,
    strategy: &Strategy,
    registry: &Registry,
) -> Result<(), GenerateError> {
    let check = |target: &TypeRef, want_enum: bool| {
        if target.origin != RefOrigin::Batch {
            return Ok(());
        }
        let message = match registry.get(&target.name) {
            Some(built) if built.is_enum() == want_enum => return Ok(()),
            Some(built) => format!(
                "type `{}` was registered as {}",
                target.name,
                if built.is_enum() { "an enum" } else { "a struct" }
            ),
            None => format!("type `{}` did not generate", target.name),
        };
        Err(GenerateError::new(
            GenerateErrorKind::UnresolvedNestedType,
            &model.type_name,
            Some(&field.source_name),
            message,
            field.ident.span(),
        ))
    };

    match strategy {
        Strategy::DirectPrimitive { .. } => Ok(()),
        Strategy::StringConversion(form) => match form {
            StringForm::Enum(target) => check(target, true),
            _ => Ok(()),
        },
        Strategy::RecursiveCall(target) => check(target, false),
        Strategy::IterateCollection { element, .. } => {
            check_references(model, field, element, registry)
        }
        Strategy::IterateMap { key, value, .. } => {
            if let StringForm::Enum(target) = key {
                check(target, true)?;
            }
            check_references(model, field, value, registry)
        }
        Strategy::NullGuard(inner) => check_references(model, field, inner, registry),
    }
}

/// Names of loop and match bindings at a nesting depth.
///
/// Nested containers each get their own bindings so inner code never
/// refers to an outer binding by accident.
fn binding(prefix: &str, depth: usize) -> syn::Ident {
    syn::Ident::new(&format!("__{}{}", prefix, depth), Span::call_site())
}

/// The path of a referenced type as written in generated code.
fn ref_type(target: &TypeRef) -> TokenStream {
    let ty = &target.ty;
    quote!(#ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{build, index_of, BuildContext};
    use crate::Config;

    fn emit_all(inputs: &[syn::DeriveInput]) -> Vec<Result<GeneratedUnit, GenerateError>> {
        let index = index_of(inputs);
        let config = Config::default();
        let cx = BuildContext {
            index: &index,
            config: &config,
        };
        let models = inputs.iter().map(|x| build(x, &cx)).collect::<Vec<_>>();
        let mut registry = Registry::new();
        for model in models.iter().flatten() {
            registry.insert(model.clone());
        }
        models
            .into_iter()
            .map(|model| model.and_then(|model| emit(&model, &registry)))
            .collect()
    }

    fn point() -> syn::DeriveInput {
        syn::parse_quote! {
            struct Point {
                y: i32,
                x: i32,
                tags: Vec<Option<String>>,
                meta: std::collections::BTreeMap<String, Vec<Point>>,
            }
        }
    }

    #[test]
    fn test_emission_is_deterministic() {
        let first = emit_all(&[point()]).remove(0).unwrap().render();
        let second = emit_all(&[point()]).remove(0).unwrap().render();
        assert_eq!(first, second);
    }

    #[test]
    fn test_keys_in_declaration_order() {
        let unit = emit_all(&[point()]).remove(0).unwrap();
        let encoder = unit.encoder.to_string();
        let positions = ["\"y\"", "\"x\"", "\"tags\"", "\"meta\""]
            .iter()
            .map(|key| encoder.find(key).unwrap())
            .collect::<Vec<_>>();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_nested_bindings_are_distinct() {
        let unit = emit_all(&[point()]).remove(0).unwrap();
        let encoder = unit.encoder.to_string();
        assert!(encoder.contains("__e0"));
        assert!(encoder.contains("__n1"));
        assert!(encoder.contains("__e1"));
        let decoder = unit.decoder.to_string();
        assert!(decoder.contains("__k0"));
        assert!(decoder.contains("__e1"));
    }

    #[test]
    fn test_failed_reference_does_not_generate() {
        let employee: syn::DeriveInput = syn::parse_quote! {
            struct Employee {
                name: String,
                manager: Option<Box<Employee>>,
                role: Role,
            }
        };
        let role: syn::DeriveInput = syn::parse_quote! {
            enum Role { Staff, Lead(u8) }
        };
        let mut results = emit_all(&[employee, role]);
        let role = results.pop().unwrap().unwrap_err();
        assert_eq!(role.kind(), GenerateErrorKind::UnsupportedShape);
        let employee = results.pop().unwrap().unwrap_err();
        assert_eq!(employee.kind(), GenerateErrorKind::UnresolvedNestedType);
        assert_eq!(employee.field(), Some("role"));
        assert_eq!(employee.message(), "type `Role` did not generate");
    }

    #[test]
    fn test_units_are_anonymous_consts() {
        let unit = emit_all(&[point()]).remove(0).unwrap();
        let rendered = unit.render();
        assert!(rendered.starts_with("const _ : () = {"));
        assert!(!rendered.contains("allow"));
    }

    #[test]
    fn test_reference_to_a_different_kind() {
        let owner: syn::DeriveInput = syn::parse_quote! {
            struct Owner { tag: Tag }
        };
        let first: syn::DeriveInput = syn::parse_quote! {
            struct Tag { id: u8 }
        };
        let second: syn::DeriveInput = syn::parse_quote! {
            enum Tag { A, B }
        };
        let results = emit_all(&[owner, first, second]);
        let err = results[0].as_ref().unwrap_err();
        assert_eq!(err.kind(), GenerateErrorKind::UnresolvedNestedType);
        assert_eq!(err.message(), "type `Tag` was registered as a struct");
    }

    #[test]
    fn test_enum_unit() {
        let input: syn::DeriveInput = syn::parse_quote! {
            #[json(rename_all = "snake_case")]
            enum Level { Low, VeryHigh }
        };
        let unit = emit_all(&[input]).remove(0).unwrap();
        let names = unit.names.unwrap().to_string();
        assert!(names.contains("\"very_high\""));
        assert!(unit.decoder.to_string().contains("variant_of"));
    }
}
