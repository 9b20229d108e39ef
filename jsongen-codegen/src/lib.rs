//! The generator behind `jsongen`.
//!
//! This crate turns type declarations into JSON encoders and decoders at
//! compile time.  It is a plain library so the generator can be driven and
//! tested outside of a proc macro; `jsongen-derive` is a thin wrapper around
//! [`derive`] and [`batch`].
//!
//! A generation pass runs in phases:
//!
//! 1. every type of the pass is indexed by name,
//! 2. a [`TypeModel`] is built per type, resolving a [`Strategy`] for each
//!    field,
//! 3. the successfully built models are put into a fresh [`Registry`],
//! 4. each model is emitted as a [`GeneratedUnit`].
//!
//! A type that fails in any phase yields a [`GenerateError`] and never
//! blocks the other types of the pass, except for types that refer to it.
//!
//! ```rust
//! use jsongen_codegen::{Config, Generator};
//!
//! let inputs: Vec<syn::DeriveInput> = vec![
//!     syn::parse_quote! {
//!         struct Node {
//!             value: u32,
//!             children: Vec<Node>,
//!         }
//!     },
//!     syn::parse_quote! {
//!         struct Broken {
//!             slot: (u8, u8),
//!         }
//!     },
//! ];
//! let pass = Generator::new(Config::default()).generate(&inputs);
//! assert!(pass.results()[0].is_ok());
//! assert!(pass.results()[1].is_err());
//! ```
use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};

mod attr;
mod bound;
mod case;
mod emit;
mod error;
mod model;
mod registry;
mod shape;
mod strategy;

pub use self::case::RenameRule;
pub use self::emit::{emit, GeneratedUnit};
pub use self::error::{GenerateError, GenerateErrorKind};
pub use self::model::{
    build, index_of, BuildContext, FieldDescriptor, ModelBody, TypeModel, VariantDescriptor,
};
pub use self::registry::Registry;
pub use self::shape::{
    CollectionKind, IndexEntry, MapKind, PrimitiveKind, RefOrigin, ShapeContext, StringKind,
    TypeIndex, TypeRef, TypeShape, Unresolved,
};
pub use self::strategy::{resolve, ResolveError, Strategy, StringForm};

/// How types outside of a pass are treated.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Scope {
    /// Unknown types are assumed to implement the traits themselves.
    Open,
    /// Unknown types are errors unless listed in [`Config::external`].
    Closed,
}

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the runtime crate in generated code.  Overridden per type by
    /// `#[json(crate = "...")]`.
    pub crate_path: syn::Path,
    pub scope: Scope,
    /// Names of types with hand written `Encode`/`Decode` impls that a closed
    /// pass accepts.
    pub external: BTreeSet<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            crate_path: syn::parse_quote!(::jsongen),
            scope: Scope::Closed,
            external: BTreeSet::new(),
        }
    }
}

/// Runs generation passes.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: Config,
}

impl Generator {
    pub fn new(config: Config) -> Generator {
        Generator { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one generation pass over a batch of types.
    pub fn generate(&self, inputs: &[syn::DeriveInput]) -> Pass {
        let index = index_of(inputs);
        let cx = BuildContext {
            index: &index,
            config: &self.config,
        };

        let mut models = Vec::with_capacity(inputs.len());
        for input in inputs {
            let model = build(input, &cx);
            if let Ok(ref model) = model {
                tracing::debug!(
                    type_name = %model.type_name,
                    fields = model.fields().len(),
                    is_enum = model.is_enum(),
                    "built type model"
                );
            }
            models.push(model);
        }

        let mut registry = Registry::new();
        for model in models.iter_mut() {
            let duplicate = match &*model {
                Ok(built) if !registry.insert(built.clone()) => Some(GenerateError::new(
                    GenerateErrorKind::DuplicateKey,
                    &built.type_name,
                    None,
                    "type is declared more than once in this pass",
                    built.ident.span(),
                )),
                _ => None,
            };
            if let Some(err) = duplicate {
                *model = Err(err);
            }
        }

        let results = models
            .into_iter()
            .map(|model| model.and_then(|model| emit(&model, &registry)))
            .map(|result| {
                match result {
                    Ok(ref unit) => tracing::debug!(type_name = %unit.type_name, "emitted unit"),
                    Err(ref err) => tracing::warn!(
                        type_name = err.type_name(),
                        kind = %err.kind(),
                        field = err.field(),
                        "generation failed: {}",
                        err.message()
                    ),
                }
                result
            })
            .collect();

        Pass { results, registry }
    }
}

/// The outcome of one generation pass.
#[derive(Debug)]
pub struct Pass {
    results: Vec<Result<GeneratedUnit, GenerateError>>,
    registry: Registry,
}

impl Pass {
    /// One result per input type, in input order.
    pub fn results(&self) -> &[Result<GeneratedUnit, GenerateError>] {
        &self.results
    }

    pub fn into_results(self) -> Vec<Result<GeneratedUnit, GenerateError>> {
        self.results
    }

    /// The models that were built in this pass.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn errors(&self) -> impl Iterator<Item = &GenerateError> {
        self.results.iter().filter_map(|x| x.as_ref().err())
    }

    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    /// All generated units followed by a `compile_error!` per failed type.
    pub fn to_tokens(&self) -> TokenStream {
        let mut rv = TokenStream::new();
        for result in &self.results {
            rv.extend(match result {
                Ok(unit) => unit.to_tokens(),
                Err(err) => err.to_syn_error().to_compile_error(),
            });
        }
        rv
    }
}

/// Generates the impls for a single derived type.
///
/// The pass is open: types the declaration refers to are expected to
/// implement `Encode` and `Decode` on their own.
pub fn derive(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let generator = Generator::new(Config {
        scope: Scope::Open,
        ..Config::default()
    });
    let mut results = generator
        .generate(std::slice::from_ref(input))
        .into_results();
    match results.pop() {
        Some(Ok(unit)) => Ok(unit.to_tokens()),
        Some(Err(err)) => Err(err.into()),
        None => Ok(TokenStream::new()),
    }
}

/// The items of a `json_types!` invocation.
struct Batch {
    items: Vec<syn::Item>,
}

impl Parse for Batch {
    fn parse(input: ParseStream) -> syn::Result<Batch> {
        let mut items = Vec::new();
        while !input.is_empty() {
            items.push(input.parse()?);
        }
        Ok(Batch { items })
    }
}

/// Generates impls for a batch of struct and enum declarations in one closed
/// pass.
///
/// The declarations are emitted again with their `#[json(...)]` attributes
/// removed, followed by the generated units and the errors of types that
/// failed.
pub fn batch(input: TokenStream) -> syn::Result<TokenStream> {
    let Batch { mut items } = syn::parse2(input)?;

    let inputs = items
        .iter()
        .map(derive_input)
        .collect::<syn::Result<Vec<_>>>()?;
    for item in items.iter_mut() {
        strip_item(item);
    }

    let pass = Generator::default().generate(&inputs);
    let generated = pass.to_tokens();

    Ok(quote! {
        #(#items)*
        #generated
    })
}

fn derive_input(item: &syn::Item) -> syn::Result<syn::DeriveInput> {
    match item {
        syn::Item::Struct(item) => Ok(syn::DeriveInput {
            attrs: item.attrs.clone(),
            vis: item.vis.clone(),
            ident: item.ident.clone(),
            generics: item.generics.clone(),
            data: syn::Data::Struct(syn::DataStruct {
                struct_token: item.struct_token,
                fields: item.fields.clone(),
                semi_token: item.semi_token,
            }),
        }),
        syn::Item::Enum(item) => Ok(syn::DeriveInput {
            attrs: item.attrs.clone(),
            vis: item.vis.clone(),
            ident: item.ident.clone(),
            generics: item.generics.clone(),
            data: syn::Data::Enum(syn::DataEnum {
                enum_token: item.enum_token,
                brace_token: item.brace_token,
                variants: item.variants.clone(),
            }),
        }),
        other => Err(syn::Error::new_spanned(
            other,
            "json_types! only accepts struct and enum declarations",
        )),
    }
}

fn strip_item(item: &mut syn::Item) {
    match item {
        syn::Item::Struct(item) => {
            attr::strip_json_attrs(&mut item.attrs);
            for field in item.fields.iter_mut() {
                attr::strip_json_attrs(&mut field.attrs);
            }
        }
        syn::Item::Enum(item) => {
            attr::strip_json_attrs(&mut item.attrs);
            for variant in item.variants.iter_mut() {
                attr::strip_json_attrs(&mut variant.attrs);
                for field in variant.fields.iter_mut() {
                    attr::strip_json_attrs(&mut field.attrs);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(items: TokenStream) -> Vec<syn::DeriveInput> {
        let Batch { items } = syn::parse2(items).unwrap();
        items.iter().map(|x| derive_input(x).unwrap()).collect()
    }

    #[test]
    fn test_mutual_recursion() {
        let inputs = inputs(quote! {
            struct Department {
                name: String,
                head: Option<Box<Person>>,
            }
            struct Person {
                name: String,
                department: Option<Department>,
                reports: Vec<Person>,
            }
        });
        let pass = Generator::default().generate(&inputs);
        assert!(pass.is_ok());
        assert_eq!(pass.registry().names().collect::<Vec<_>>(), vec!["Department", "Person"]);
    }

    #[test]
    fn test_failures_are_isolated() {
        let inputs = inputs(quote! {
            struct Good {
                id: u64,
            }
            struct BadKey {
                counts: BTreeMap<u32, u32>,
            }
            struct Unknown {
                other: Missing,
            }
            struct AlsoGood {
                good: Good,
            }
        });
        let pass = Generator::default().generate(&inputs);
        let kinds = pass
            .results()
            .iter()
            .map(|x| x.as_ref().err().map(|err| err.kind()))
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(GenerateErrorKind::UnsupportedKeyShape),
                Some(GenerateErrorKind::UnresolvedNestedType),
                None,
            ]
        );
        assert_eq!(pass.registry().len(), 2);
    }

    #[test]
    fn test_passes_do_not_share_state() {
        let generator = Generator::default();
        let first = inputs(quote! {
            struct Shared { id: u8 }
        });
        let second = inputs(quote! {
            struct User { shared: Shared }
        });
        assert!(generator.generate(&first).is_ok());
        let pass = generator.generate(&second);
        let err = pass.errors().next().unwrap();
        assert_eq!(err.kind(), GenerateErrorKind::UnresolvedNestedType);
    }

    #[test]
    fn test_external_types_in_closed_scope() {
        let generator = Generator::new(Config {
            external: ["Timestamp".to_string()].into_iter().collect(),
            ..Config::default()
        });
        let pass = generator.generate(&inputs(quote! {
            struct Event { at: Timestamp }
        }));
        assert!(pass.is_ok());
    }

    #[test]
    fn test_duplicate_type_names() {
        let pass = Generator::default().generate(&inputs(quote! {
            struct Twice { a: u8 }
            struct Twice { b: u8 }
        }));
        let kinds = pass
            .results()
            .iter()
            .map(|x| x.is_ok())
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec![true, false]);
    }

    #[test]
    fn test_derive_is_open() {
        let input: syn::DeriveInput = syn::parse_quote! {
            struct Event {
                at: chrono::DateTime<chrono::Utc>,
            }
        };
        assert!(derive(&input).is_ok());
    }

    #[test]
    fn test_derive_reports_generation_errors() {
        let input: syn::DeriveInput = syn::parse_quote! {
            struct Event {
                at: &'static str,
            }
        };
        let err = derive(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            concat!(
                "unsupported shape in `Event.at`: ",
                "`&'static str` is not supported: type has no JSON representation"
            )
        );
    }

    #[test]
    fn test_batch_strips_attributes() {
        let output = batch(quote! {
            #[json(rename_all = "camelCase")]
            pub struct Config {
                #[json(default)]
                pub retry_count: u32,
            }
        })
        .unwrap()
        .to_string();
        assert!(!output.contains("# [json"));
        assert!(output.contains("\"retryCount\""));
        assert!(output.contains("const _ : () ="));
        assert!(!output.contains("_JSONGEN"));
    }

    #[test]
    fn test_batch_rejects_other_items() {
        assert!(batch(quote! { fn main() {} }).is_err());
    }
}
