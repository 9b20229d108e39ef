//! Support for generating encoders and decoders.
//!
//! When the `derive` feature is enabled (the default) two macros are
//! provided.  Both produce the same code; they differ in how much of the
//! program they can see.
//!
//! * `#[derive(Json)]` looks at a single type.  Any field type it does not
//!   recognize is assumed to implement [`Encode`](crate::Encode) and
//!   [`Decode`](crate::Decode) itself, and the compiler checks that.
//! * `json_types! { ... }` runs one generation pass over every struct and
//!   enum inside it.  Field types must be primitives, supported containers,
//!   generic parameters, or types of the same block.  Anything else is
//!   reported as an unresolved type.
//!
//! # Example
//!
//! ```
//! jsongen::json_types! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Employee {
//!         name: String,
//!         manager: Option<Box<Employee>>,
//!         role: Role,
//!     }
//!
//!     #[derive(Debug, PartialEq)]
//!     #[json(rename_all = "lowercase")]
//!     pub enum Role {
//!         Engineer,
//!         Manager,
//!     }
//! }
//!
//! let json = r#"{"name":"ada","manager":null,"role":"engineer"}"#;
//! let ada: Employee = jsongen::from_json(json).unwrap();
//! assert_eq!(ada.role, Role::Engineer);
//! assert_eq!(jsongen::to_string(&ada), json);
//! ```
//!
//! # Supported Field Types
//!
//! * `bool`, all integer types up to 64 bit, `f32`, `f64`, and boxed versions
//! * `String` and `char`
//! * fieldless enums, written as their variant name
//! * other structs, by calling their generated encoder and decoder
//! * `Vec`, `VecDeque`, `BTreeSet`, `HashSet`
//! * fixed size arrays `[T; N]`, including nested ones.  Decoding fails with
//!   a type mismatch when the JSON array has a different length.
//! * `BTreeMap` and `HashMap` with `String` or `char` keys, and keys of enums
//!   declared in the same `json_types!` block
//! * `Option`, written as `null` when absent
//!
//! Byte buffers get no special treatment: `Vec<u8>` and `[u8; N]` are
//! arrays of numbers like any other collection.
//!
//! # Customization
//!
//! ## Struct Attributes
//!
//! * `#[json(rename_all = "...")]`: renames all fields at once to a
//!   specific name style.  The possible values are `"lowercase"`, `"UPPERCASE"`,
//!   `"PascalCase"`, `"camelCase"`, `"snake_case"`, `"SCREAMING_SNAKE_CASE"`,
//!   `"kebab-case"`, and `"SCREAMING-KEBAB-CASE"`.
//! * `#[json(skip_nulls)]`: optional fields that are `None` are left out of
//!   the object instead of being written as `null`.
//! * `#[json(crate = "...")]`: path of this crate in generated code, for
//!   when it is re-exported under another name.
//!
//! ## Enum Attributes
//!
//! * `#[json(rename_all = "...")]`: renames all variants at once.
//!
//! ## Field Attributes
//!
//! * `#[json(rename = "...")]`: uses another JSON key.
//! * `#[json(skip)]`: leaves the field out of the JSON entirely.  On decode it
//!   is filled from [`Default`].
//! * `#[json(default)]`: a missing key decodes to [`Default::default`] instead
//!   of failing with [`MissingField`](crate::ErrorKind::MissingField).
//!
//! ## Enum Variant Attributes
//!
//! * `#[json(rename = "...")]`: renames the variant.

/// Generates [`Encode`](crate::Encode) and [`Decode`](crate::Decode) for a type.
pub use jsongen_derive::Json;

/// Declares types and generates their encoders and decoders in one pass.
pub use jsongen_derive::json_types;
