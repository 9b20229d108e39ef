//! Error interface.
use std::borrow::Cow;
use std::fmt;

use crate::value::{kind_name, Value};

/// Describes the kind of error.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ErrorKind {
    /// A required key was not present in the JSON object.
    MissingField,
    /// The JSON value had a different kind than the field expects.
    TypeMismatch,
    /// A number did not fit the target integer type.
    OutOfRange,
    /// A string did not name any variant of the target enum.
    UnknownVariant,
    /// The input text is not valid JSON.
    Syntax,
}

/// An error for jsongen.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    field: Option<Cow<'static, str>>,
    msg: Cow<'static, str>,
}

impl Error {
    /// Creates a new error.
    pub fn new<M: Into<Cow<'static, str>>>(kind: ErrorKind, msg: M) -> Error {
        Error {
            kind,
            field: None,
            msg: msg.into(),
        }
    }

    /// Creates the error raised when a required key is absent.
    pub fn missing_field(type_name: &str, field: &'static str) -> Error {
        Error::new(
            ErrorKind::MissingField,
            format!("missing field '{}' in {}", field, type_name),
        )
        .with_field(field)
    }

    /// Creates the error raised when a value has the wrong JSON kind.
    pub fn type_mismatch(expected: &str, found: &Value) -> Error {
        Error::new(
            ErrorKind::TypeMismatch,
            format!("expected {}, found {}", expected, kind_name(found)),
        )
    }

    /// Attaches the JSON key of the field that failed.
    ///
    /// The innermost field wins: if the error already names a field this is
    /// a no-op, so nested decoders keep the most precise location.
    pub fn with_field(mut self, field: &'static str) -> Error {
        if self.field.is_none() {
            self.field = Some(Cow::Borrowed(field));
        }
        self
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the JSON key of the offending field if known.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the bare message without kind or field.
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(ref field) => write!(f, "{:?}: field '{}': {}", self.kind, field, self.msg),
            None => write!(f, "{:?}: {}", self.kind, self.msg),
        }
    }
}

impl std::error::Error for Error {}
