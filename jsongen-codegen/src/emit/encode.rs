use proc_macro2::TokenStream;
use quote::quote;

use super::binding;
use crate::bound::{crate_item, where_clause_with_bound};
use crate::model::{FieldDescriptor, TypeModel, VariantDescriptor};
use crate::shape::PrimitiveKind;
use crate::strategy::{Strategy, StringForm};

pub(super) fn struct_encoder(model: &TypeModel, fields: &[FieldDescriptor]) -> TokenStream {
    let krate = &model.crate_path;
    let ident = &model.ident;
    let (impl_generics, ty_generics, _) = model.generics.split_for_impl();
    let bounded_where_clause =
        where_clause_with_bound(&model.generics, &crate_item(krate, "Encode"));

    let writes = fields.iter().map(|field| write_field(model, field));

    quote! {
        impl #impl_generics #krate::Encode for #ident #ty_generics #bounded_where_clause {
            fn encode(&self, __out: &mut #krate::JsonWriter) {
                __out.begin_object();
                #(#writes)*
                __out.end_object();
            }
        }
    }
}

fn write_field(model: &TypeModel, field: &FieldDescriptor) -> TokenStream {
    let krate = &model.crate_path;
    let ident = &field.ident;
    let key = &field.json_key;

    match &field.strategy {
        Strategy::NullGuard(inner) if model.skip_nulls => {
            let n = binding("n", 0);
            let value = write_value(krate, inner, quote!(#n), 1);
            quote! {
                if let #krate::__private::Some(#n) = &self.#ident {
                    __out.key(#key);
                    #value
                }
            }
        }
        strategy => {
            let value = write_value(krate, strategy, quote!(&self.#ident), 0);
            quote! {
                __out.key(#key);
                #value
            }
        }
    }
}

/// Writes the value behind the reference expression `v`.
fn write_value(
    krate: &syn::Path,
    strategy: &Strategy,
    v: TokenStream,
    depth: usize,
) -> TokenStream {
    match strategy {
        Strategy::DirectPrimitive { kind, boxed } => {
            let v = if *boxed { quote!(**#v) } else { quote!(*#v) };
            match kind {
                PrimitiveKind::Bool => quote!(__out.write_bool(#v);),
                PrimitiveKind::F32 => quote!(__out.write_f32(#v);),
                PrimitiveKind::F64 => quote!(__out.write_f64(#v);),
                _ => quote!(__out.write_int(#v);),
            }
        }
        Strategy::StringConversion(StringForm::Text) => quote!(__out.write_str(#v);),
        Strategy::StringConversion(StringForm::Char) => quote!(__out.write_char(*#v);),
        Strategy::StringConversion(StringForm::Enum(target)) => {
            let v = if target.boxed { quote!(&**#v) } else { v };
            quote!(__out.write_str(#krate::JsonStr::as_json_str(#v));)
        }
        Strategy::RecursiveCall(target) => {
            let v = if target.boxed { quote!(&**#v) } else { v };
            quote!(#krate::Encode::encode(#v, __out);)
        }
        Strategy::IterateCollection { element, .. } => {
            let e = binding("e", depth);
            let inner = write_value(krate, element, quote!(#e), depth + 1);
            quote! {
                __out.begin_array();
                for #e in #v {
                    #inner
                }
                __out.end_array();
            }
        }
        Strategy::IterateMap { key, value, .. } => {
            let k = binding("k", depth);
            let e = binding("e", depth);
            let write_key = match key {
                StringForm::Text => quote!(__out.key(#k);),
                StringForm::Char => quote!(__out.key((*#k).encode_utf8(&mut [0u8; 4]));),
                StringForm::Enum(_) => quote!(__out.key(#krate::JsonStr::as_json_str(#k));),
            };
            let inner = write_value(krate, value, quote!(#e), depth + 1);
            quote! {
                __out.begin_object();
                for (#k, #e) in #v {
                    #write_key
                    #inner
                }
                __out.end_object();
            }
        }
        Strategy::NullGuard(inner) => {
            let n = binding("n", depth);
            let inner = write_value(krate, inner, quote!(#n), depth + 1);
            quote! {
                match #v {
                    #krate::__private::Some(#n) => {
                        #inner
                    }
                    #krate::__private::None => __out.write_null(),
                }
            }
        }
    }
}

pub(super) fn enum_encoder(model: &TypeModel) -> TokenStream {
    let krate = &model.crate_path;
    let ident = &model.ident;

    quote! {
        impl #krate::Encode for #ident {
            fn encode(&self, __out: &mut #krate::JsonWriter) {
                __out.write_str(#krate::JsonStr::as_json_str(self));
            }
        }
    }
}

pub(super) fn enum_names(model: &TypeModel, variants: &[VariantDescriptor]) -> TokenStream {
    let krate = &model.crate_path;
    let ident = &model.ident;
    let variant = &variants.iter().map(|v| &v.ident).collect::<Vec<_>>();
    let name = &variants.iter().map(|v| &v.json_name).collect::<Vec<_>>();

    quote! {
        impl #krate::JsonStr for #ident {
            const VARIANTS: &'static [&'static str] = &[#(#name),*];

            fn as_json_str(&self) -> &'static str {
                match *self {
                    #(#ident::#variant => #name,)*
                }
            }

            fn from_json_str(__s: &str) -> #krate::__private::Option<Self> {
                match __s {
                    #(#name => #krate::__private::Some(#ident::#variant),)*
                    _ => #krate::__private::None,
                }
            }
        }
    }
}
