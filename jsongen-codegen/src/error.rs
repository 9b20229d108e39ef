//! Generation time diagnostics.
use std::fmt;

use proc_macro2::Span;

/// Describes the kind of generation failure.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum GenerateErrorKind {
    /// A declared type has no JSON representation.
    UnsupportedShape,
    /// A map key does not resolve to a string.
    UnsupportedKeyShape,
    /// Two fields (or variants) of one type map to the same JSON key.
    DuplicateKey,
    /// A field references a type that is not part of the generation pass.
    UnresolvedNestedType,
    /// A `#[json(...)]` attribute could not be understood.
    InvalidAttribute,
}

impl fmt::Display for GenerateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GenerateErrorKind::UnsupportedShape => "unsupported shape",
            GenerateErrorKind::UnsupportedKeyShape => "unsupported map key",
            GenerateErrorKind::DuplicateKey => "duplicate key",
            GenerateErrorKind::UnresolvedNestedType => "unresolved nested type",
            GenerateErrorKind::InvalidAttribute => "invalid attribute",
        })
    }
}

/// A failure to generate code for one type.
///
/// Generation for the type is aborted, other types of the same pass are not
/// affected.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind} in `{type_name}{}`: {message}", field_suffix(.field))]
pub struct GenerateError {
    kind: GenerateErrorKind,
    type_name: String,
    field: Option<String>,
    message: String,
    span: Span,
}

fn field_suffix(field: &Option<String>) -> String {
    field
        .as_ref()
        .map(|field| format!(".{}", field))
        .unwrap_or_default()
}

impl GenerateError {
    pub(crate) fn new<M: Into<String>>(
        kind: GenerateErrorKind,
        type_name: &str,
        field: Option<&str>,
        message: M,
        span: Span,
    ) -> GenerateError {
        GenerateError {
            kind,
            type_name: type_name.to_string(),
            field: field.map(|x| x.to_string()),
            message: message.into(),
            span,
        }
    }

    /// Wraps an attribute parse error.
    pub(crate) fn attribute(
        type_name: &str,
        field: Option<&str>,
        err: syn::Error,
    ) -> GenerateError {
        GenerateError::new(
            GenerateErrorKind::InvalidAttribute,
            type_name,
            field,
            err.to_string(),
            err.span(),
        )
    }

    pub fn kind(&self) -> GenerateErrorKind {
        self.kind
    }

    /// The type generation failed for.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The offending field or variant, if the failure is tied to one.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Converts into a `syn` error pointing at the offending declaration.
    pub fn to_syn_error(&self) -> syn::Error {
        syn::Error::new(self.span, self.to_string())
    }
}

impl From<GenerateError> for syn::Error {
    fn from(err: GenerateError) -> syn::Error {
        err.to_syn_error()
    }
}
