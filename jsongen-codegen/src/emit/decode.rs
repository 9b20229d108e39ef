use proc_macro2::TokenStream;
use quote::quote;

use super::{binding, ref_type};
use crate::bound::{crate_item, where_clause_with_bound};
use crate::model::{FieldDescriptor, TypeModel};
use crate::shape::{CollectionKind, MapKind, PrimitiveKind};
use crate::strategy::{Strategy, StringForm};

pub(super) fn struct_decoder(
    model: &TypeModel,
    fields: &[FieldDescriptor],
    skipped: &[syn::Ident],
) -> TokenStream {
    let krate = &model.crate_path;
    let ident = &model.ident;
    let type_name = &model.type_name;
    let (impl_generics, ty_generics, _) = model.generics.split_for_impl();
    let bounded_where_clause =
        where_clause_with_bound(&model.generics, &crate_item(krate, "Decode"));

    let fieldname = fields.iter().map(|f| &f.ident);
    let init = fields.iter().map(|f| read_field(model, f));

    quote! {
        impl #impl_generics #krate::Decode for #ident #ty_generics #bounded_where_clause {
            fn decode(__value: &#krate::Value) -> #krate::__private::Result<Self, #krate::Error> {
                let __object = #krate::__private::object(__value, #type_name)?;
                #krate::__private::Ok(Self {
                    #(#fieldname: #init,)*
                    #(#skipped: #krate::__private::Default::default(),)*
                })
            }
        }
    }
}

fn read_field(model: &TypeModel, field: &FieldDescriptor) -> TokenStream {
    let krate = &model.crate_path;
    let type_name = &model.type_name;
    let key = &field.json_key;
    let v = binding("v", 0);
    let convert = read_value(krate, &field.strategy, quote!(#v), key, 0);

    if field.default {
        quote! {
            match __object.get(#key) {
                #krate::__private::Some(#v) => #convert,
                #krate::__private::None => #krate::__private::Default::default(),
            }
        }
    } else if field.nullable {
        quote! {
            match __object.get(#key) {
                #krate::__private::Some(#v) => #convert,
                #krate::__private::None => #krate::__private::None,
            }
        }
    } else {
        quote! {
            {
                let #v = #krate::__private::required(__object, #type_name, #key)?;
                #convert
            }
        }
    }
}

/// Converts the `&Value` expression `v` into the field's type.
///
/// The produced expression uses `?` and is only valid inside a function or
/// closure returning `Result<_, Error>`.
fn read_value(
    krate: &syn::Path,
    strategy: &Strategy,
    v: TokenStream,
    key: &str,
    depth: usize,
) -> TokenStream {
    let private = quote!(#krate::__private);

    match strategy {
        Strategy::DirectPrimitive { kind, boxed } => {
            let read = match kind {
                PrimitiveKind::Bool => quote!(#private::boolean(#v, #key)?),
                PrimitiveKind::F32 => quote!(#private::float32(#v, #key)?),
                PrimitiveKind::F64 => quote!(#private::float64(#v, #key)?),
                int => {
                    let ty = syn::Ident::new(int.name(), proc_macro2::Span::call_site());
                    quote!(#private::integer::<#ty>(#v, #key)?)
                }
            };
            boxed_if(&private, *boxed, read)
        }
        Strategy::StringConversion(StringForm::Text) => quote!(#private::string(#v, #key)?),
        Strategy::StringConversion(StringForm::Char) => quote!(#private::character(#v, #key)?),
        Strategy::StringConversion(StringForm::Enum(target)) => {
            let ty = ref_type(target);
            boxed_if(
                &private,
                target.boxed,
                quote!(#private::variant::<#ty>(#v, #key)?),
            )
        }
        Strategy::RecursiveCall(target) => {
            let ty = ref_type(target);
            boxed_if(
                &private,
                target.boxed,
                quote!(#private::nested::<#ty>(#v, #key)?),
            )
        }
        Strategy::IterateCollection { kind, element } => {
            let e = binding("e", depth);
            let inner = read_value(krate, element, quote!(#e), key, depth + 1);
            let collection = match kind {
                CollectionKind::Array | CollectionKind::Vec => quote!(#private::Vec<_>),
                CollectionKind::VecDeque => quote!(#private::VecDeque<_>),
                CollectionKind::BTreeSet => quote!(#private::BTreeSet<_>),
                CollectionKind::HashSet => quote!(#private::HashSet<_>),
            };
            let items = quote! {
                #private::array(#v, #key)?
                    .iter()
                    .map(|#e| -> #private::Result<_, #krate::Error> {
                        #private::Ok(#inner)
                    })
                    .collect::<#private::Result<#collection, #krate::Error>>()?
            };
            match kind {
                CollectionKind::Array => quote!(#private::fixed_array(#items, #key)?),
                _ => items,
            }
        }
        Strategy::IterateMap { kind, key: form, value } => {
            let k = binding("k", depth);
            let e = binding("e", depth);
            let read_key = match form {
                StringForm::Text => quote!(#private::String::clone(#k)),
                StringForm::Char => quote!(#private::char_key(#k, #key)?),
                StringForm::Enum(target) => {
                    let ty = ref_type(target);
                    quote!(#private::variant_key::<#ty>(#k, #key)?)
                }
            };
            let inner = read_value(krate, value, quote!(#e), key, depth + 1);
            let map = match kind {
                MapKind::BTreeMap => quote!(#private::BTreeMap<_, _>),
                MapKind::HashMap => quote!(#private::HashMap<_, _>),
            };
            quote! {
                #private::map(#v, #key)?
                    .iter()
                    .map(|(#k, #e)| -> #private::Result<_, #krate::Error> {
                        #private::Ok((#read_key, #inner))
                    })
                    .collect::<#private::Result<#map, #krate::Error>>()?
            }
        }
        Strategy::NullGuard(inner) => {
            let n = binding("n", depth);
            let inner = read_value(krate, inner, quote!(#n), key, depth + 1);
            quote! {
                match #v {
                    #krate::Value::Null => #private::None,
                    #n => #private::Some(#inner),
                }
            }
        }
    }
}

fn boxed_if(private: &TokenStream, boxed: bool, read: TokenStream) -> TokenStream {
    if boxed {
        quote!(#private::Box::new(#read))
    } else {
        read
    }
}

pub(super) fn enum_decoder(model: &TypeModel) -> TokenStream {
    let krate = &model.crate_path;
    let ident = &model.ident;

    quote! {
        impl #krate::Decode for #ident {
            fn decode(__value: &#krate::Value) -> #krate::__private::Result<Self, #krate::Error> {
                #krate::__private::variant_of::<Self>(__value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_kind_is_spelled_out() {
        let krate: syn::Path = syn::parse_quote!(::jsongen);
        let tokens = read_value(
            &krate,
            &Strategy::DirectPrimitive {
                kind: PrimitiveKind::I16,
                boxed: false,
            },
            quote!(__v0),
            "count",
            0,
        );
        assert_eq!(
            tokens.to_string(),
            ":: jsongen :: __private :: integer :: < i16 > (__v0 , \"count\") ?"
        );
    }

    #[test]
    fn test_nullable_collection() {
        let krate: syn::Path = syn::parse_quote!(::jsongen);
        let strategy = Strategy::NullGuard(Box::new(Strategy::IterateCollection {
            kind: CollectionKind::HashSet,
            element: Box::new(Strategy::StringConversion(StringForm::Text)),
        }));
        let tokens = read_value(&krate, &strategy, quote!(__v0), "tags", 0).to_string();
        assert!(tokens.contains(":: jsongen :: Value :: Null => :: jsongen :: __private :: None"));
        assert!(tokens.contains("array (__n0 , \"tags\") ?"));
        assert!(tokens.contains("map (| __e1 |"));
        assert!(tokens.contains("HashSet < _ >"));
    }

    #[test]
    fn test_fixed_array_checks_length() {
        let krate: syn::Path = syn::parse_quote!(::jsongen);
        let strategy = Strategy::IterateCollection {
            kind: CollectionKind::Array,
            element: Box::new(Strategy::IterateCollection {
                kind: CollectionKind::Array,
                element: Box::new(Strategy::DirectPrimitive {
                    kind: PrimitiveKind::U8,
                    boxed: false,
                }),
            }),
        };
        let tokens = read_value(&krate, &strategy, quote!(__v0), "grid", 0).to_string();
        assert!(tokens.starts_with(":: jsongen :: __private :: fixed_array (:: jsongen"));
        assert_eq!(tokens.matches("fixed_array").count(), 2);
        assert!(tokens.contains("map (| __e1 |"));
        assert!(tokens.ends_with(", \"grid\") ?"));
    }
}
