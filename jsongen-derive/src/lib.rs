extern crate proc_macro;

use proc_macro::TokenStream;
use syn::parse_macro_input;

#[proc_macro_derive(Json, attributes(json))]
pub fn derive_json(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    jsongen_codegen::derive(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[proc_macro]
pub fn json_types(input: TokenStream) -> TokenStream {
    jsongen_codegen::batch(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
