/// Returns the where clause of `generics` with `param: bound` added for
/// every type parameter.
pub fn where_clause_with_bound(generics: &syn::Generics, bound: &syn::Path) -> syn::WhereClause {
    let new_predicates = generics
        .type_params()
        .map::<syn::WherePredicate, _>(|param| {
            let param = &param.ident;
            syn::parse_quote!(#param : #bound)
        });

    let mut generics = generics.clone();
    let where_clause = generics.make_where_clause();
    where_clause.predicates.extend(new_predicates);
    where_clause.clone()
}

/// Joins the runtime crate path with the name of one of its items.
pub fn crate_item(crate_path: &syn::Path, item: &str) -> syn::Path {
    let mut path = crate_path.clone();
    path.segments
        .push(syn::PathSegment::from(syn::Ident::new(item, proc_macro2::Span::call_site())));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;

    #[test]
    fn test_bounds_every_type_param() {
        let generics: syn::Generics = syn::parse_quote!(<'a, T: Clone, U>);
        let bound = crate_item(&syn::parse_quote!(::jsongen), "Encode");
        let clause = where_clause_with_bound(&generics, &bound);
        assert_eq!(
            clause.to_token_stream().to_string(),
            "where T : :: jsongen :: Encode , U : :: jsongen :: Encode"
        );
    }
}
