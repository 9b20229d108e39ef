//! Parsing of `#[json(...)]` attributes.
use crate::case::RenameRule;

/// Collects the nested items of all `#[json(...)]` attributes.
fn json_metas(attrs: &[syn::Attribute]) -> syn::Result<Vec<syn::NestedMeta>> {
    let mut rv = Vec::new();

    for attr in attrs {
        if !attr.path.is_ident("json") {
            continue;
        }

        match attr.parse_meta()? {
            syn::Meta::List(list) => rv.extend(list.nested),
            other => return Err(syn::Error::new_spanned(other, "unsupported attribute")),
        }
    }

    Ok(rv)
}

fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    meta: &syn::NestedMeta,
    name: &str,
) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(
            meta,
            format!("duplicate {} attribute", name),
        ));
    }
    *slot = Some(value);
    Ok(())
}

fn set_flag(slot: &mut bool, meta: &syn::NestedMeta, name: &str) -> syn::Result<()> {
    if *slot {
        return Err(syn::Error::new_spanned(
            meta,
            format!("duplicate {} attribute", name),
        ));
    }
    *slot = true;
    Ok(())
}

fn str_value<'a>(value: &'a syn::MetaNameValue) -> syn::Result<&'a syn::LitStr> {
    match &value.lit {
        syn::Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new_spanned(other, "expected string literal")),
    }
}

/// Attributes on a struct or enum.
#[derive(Debug, Default)]
pub struct ContainerAttrs {
    rename_all: Option<RenameRule>,
    skip_nulls: bool,
    crate_path: Option<syn::Path>,
}

impl ContainerAttrs {
    pub fn of(input: &syn::DeriveInput) -> syn::Result<ContainerAttrs> {
        let mut rv = ContainerAttrs::default();

        for meta in json_metas(&input.attrs)? {
            match &meta {
                syn::NestedMeta::Meta(syn::Meta::NameValue(value))
                    if value.path.is_ident("rename_all") =>
                {
                    let lit = str_value(value)?;
                    let rule = lit
                        .value()
                        .parse()
                        .map_err(|msg: String| syn::Error::new_spanned(lit, msg))?;
                    set_once(&mut rv.rename_all, rule, &meta, "rename_all")?;
                }
                syn::NestedMeta::Meta(syn::Meta::NameValue(value))
                    if value.path.is_ident("crate") =>
                {
                    let path = str_value(value)?.parse::<syn::Path>()?;
                    set_once(&mut rv.crate_path, path, &meta, "crate")?;
                }
                syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("skip_nulls") => {
                    set_flag(&mut rv.skip_nulls, &meta, "skip_nulls")?;
                }
                _ => return Err(syn::Error::new_spanned(&meta, "unsupported attribute")),
            }
        }

        Ok(rv)
    }

    pub fn rename_all(&self) -> Option<RenameRule> {
        self.rename_all
    }

    pub fn skip_nulls(&self) -> bool {
        self.skip_nulls
    }

    pub fn crate_path(&self) -> Option<&syn::Path> {
        self.crate_path.as_ref()
    }
}

/// Attributes on a named struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    default: bool,
}

impl FieldAttrs {
    pub fn of(field: &syn::Field) -> syn::Result<FieldAttrs> {
        let mut rv = FieldAttrs::default();

        for meta in json_metas(&field.attrs)? {
            match &meta {
                syn::NestedMeta::Meta(syn::Meta::NameValue(value))
                    if value.path.is_ident("rename") =>
                {
                    let name = str_value(value)?.value();
                    set_once(&mut rv.rename, name, &meta, "rename")?;
                }
                syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("skip") => {
                    set_flag(&mut rv.skip, &meta, "skip")?;
                }
                syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("default") => {
                    set_flag(&mut rv.default, &meta, "default")?;
                }
                _ => return Err(syn::Error::new_spanned(&meta, "unsupported attribute")),
            }
        }

        Ok(rv)
    }

    /// The JSON key of the field.
    pub fn name(&self, field: &syn::Ident, container: &ContainerAttrs) -> String {
        if let Some(ref rename) = self.rename {
            return rename.clone();
        }
        let name = ident_name(field);
        match container.rename_all() {
            Some(rule) => rule.apply_to_field(&name),
            None => name,
        }
    }

    pub fn skip(&self) -> bool {
        self.skip
    }

    pub fn has_default(&self) -> bool {
        self.default
    }
}

/// Attributes on a fieldless enum variant.
#[derive(Debug, Default)]
pub struct VariantAttrs {
    rename: Option<String>,
}

impl VariantAttrs {
    pub fn of(variant: &syn::Variant) -> syn::Result<VariantAttrs> {
        let mut rv = VariantAttrs::default();

        for meta in json_metas(&variant.attrs)? {
            match &meta {
                syn::NestedMeta::Meta(syn::Meta::NameValue(value))
                    if value.path.is_ident("rename") =>
                {
                    let name = str_value(value)?.value();
                    set_once(&mut rv.rename, name, &meta, "rename")?;
                }
                _ => return Err(syn::Error::new_spanned(&meta, "unsupported attribute")),
            }
        }

        Ok(rv)
    }

    /// The JSON name of the variant.
    pub fn name(&self, variant: &syn::Ident, container: &ContainerAttrs) -> String {
        if let Some(ref rename) = self.rename {
            return rename.clone();
        }
        let name = ident_name(variant);
        match container.rename_all() {
            Some(rule) => rule.apply_to_variant(&name),
            None => name,
        }
    }
}

/// The name of an identifier without a raw `r#` prefix.
pub fn ident_name(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Removes `#[json(...)]` attributes so items can be re-emitted as plain Rust.
pub fn strip_json_attrs(attrs: &mut Vec<syn::Attribute>) {
    attrs.retain(|attr| !attr.path.is_ident("json"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_attrs() {
        let input: syn::DeriveInput = syn::parse_quote! {
            #[json(rename_all = "camelCase")]
            struct Test {
                user_id: u64,
                #[json(rename = "NAME")]
                user_name: String,
                #[json(skip)]
                cache: u32,
                #[json(default)]
                r#type: u8,
            }
        };
        let container = ContainerAttrs::of(&input).unwrap();
        let fields = match input.data {
            syn::Data::Struct(data) => data.fields,
            _ => unreachable!(),
        };
        let names = fields
            .iter()
            .map(|f| FieldAttrs::of(f).unwrap().name(f.ident.as_ref().unwrap(), &container))
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["userId", "NAME", "cache", "type"]);

        let attrs = fields.iter().map(|f| FieldAttrs::of(f).unwrap()).collect::<Vec<_>>();
        assert!(attrs[2].skip());
        assert!(attrs[3].has_default());
        assert!(!attrs[0].skip());
        assert!(!attrs[0].has_default());
    }

    #[test]
    fn test_container_attrs() {
        let input: syn::DeriveInput = syn::parse_quote! {
            #[json(skip_nulls, crate = "my::json")]
            struct Test {}
        };
        let attrs = ContainerAttrs::of(&input).unwrap();
        assert!(attrs.skip_nulls());
        let expected: syn::Path = syn::parse_quote!(my::json);
        assert_eq!(attrs.crate_path(), Some(&expected));
    }

    #[test]
    fn test_rejects_unknown_and_duplicates() {
        let input: syn::DeriveInput = syn::parse_quote! {
            #[json(flatten)]
            struct Test {}
        };
        assert!(ContainerAttrs::of(&input).is_err());

        let input: syn::DeriveInput = syn::parse_quote! {
            struct Test {
                #[json(rename = "a", rename = "b")]
                value: u8,
            }
        };
        let field = match input.data {
            syn::Data::Struct(data) => data.fields.into_iter().next().unwrap(),
            _ => unreachable!(),
        };
        let err = FieldAttrs::of(&field).unwrap_err();
        assert_eq!(err.to_string(), "duplicate rename attribute");

        let input: syn::DeriveInput = syn::parse_quote! {
            #[json(rename_all = "Title Case")]
            struct Test {}
        };
        let err = ContainerAttrs::of(&input).unwrap_err();
        assert_eq!(err.to_string(), "unknown rename rule \"Title Case\"");
    }
}
