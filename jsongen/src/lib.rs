//! JSON encoders and decoders generated at compile time.
//!
//! `jsongen` does not inspect values at runtime to find out how to write
//! them.  Instead a macro looks at the declared fields of a type once, picks
//! an encoding strategy for every field, and emits a dedicated
//! [`Encode`] and [`Decode`] implementation.
//!
//! ```rust
//! use jsongen::Json;
//!
//! #[derive(Json, Debug, PartialEq)]
//! pub struct User {
//!     id: u64,
//!     #[json(rename = "userName")]
//!     name: String,
//!     email: Option<String>,
//!     tags: Vec<String>,
//! }
//!
//! let user = User {
//!     id: 1,
//!     name: "ada".into(),
//!     email: None,
//!     tags: vec!["admin".into()],
//! };
//! let json = jsongen::to_string(&user);
//! assert_eq!(json, r#"{"id":1,"userName":"ada","email":null,"tags":["admin"]}"#);
//! assert_eq!(jsongen::from_json::<User>(&json).unwrap(), user);
//! ```
//!
//! See [`derive`] for the supported attributes.

mod de;
mod enums;
mod error;
mod impls;
mod ser;
mod value;

#[cfg(feature = "derive")]
pub mod derive;

#[doc(hidden)]
pub mod __private;

pub use self::de::{from_json, from_str, Decode};
pub use self::enums::JsonStr;
pub use self::error::{Error, ErrorKind};
pub use self::ser::{to_string, Encode, JsonWriter};
pub use self::value::{Map, Number, Value};

#[cfg(feature = "derive")]
pub use self::derive::{json_types, Json};
