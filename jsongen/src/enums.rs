/// Fieldless enums that are represented by the name of their variant.
///
/// Generated for every fieldless enum.  Names are compared case-sensitively
/// and there is no fallback: a string that names no variant is an error.
pub trait JsonStr: Sized {
    /// The JSON names of all variants in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Returns the JSON name of this variant.
    fn as_json_str(&self) -> &'static str;

    /// Looks up a variant by its JSON name.
    fn from_json_str(s: &str) -> Option<Self>;
}
