//! Writing JSON text.
//!
//! Generated encoders drive a [`JsonWriter`] directly: they open an object,
//! write each key followed by its value, and close the object again.  The
//! writer keeps track of whether a container already holds an element so a
//! separator is written between elements and never after the last one.
//!
//! ```rust
//! use jsongen::JsonWriter;
//!
//! let mut w = JsonWriter::new();
//! w.begin_object();
//! w.key("id");
//! w.write_int(42u32);
//! w.key("tags");
//! w.begin_array();
//! w.write_str("a");
//! w.write_str("b");
//! w.end_array();
//! w.end_object();
//! assert_eq!(w.finish(), r#"{"id":42,"tags":["a","b"]}"#);
//! ```

/// Types that can be written as JSON.
///
/// Implementations are normally generated by `#[derive(Json)]` or the
/// `json_types!` macro.  Writing one by hand is the supported way to plug a
/// custom representation into generated code.
pub trait Encode {
    /// Writes `self` as exactly one JSON value.
    fn encode(&self, out: &mut JsonWriter);
}

/// Serializes a value to a JSON string.
pub fn to_string<T: Encode + ?Sized>(value: &T) -> String {
    let mut out = JsonWriter::new();
    value.encode(&mut out);
    out.finish()
}

/// An append-only JSON text builder.
#[derive(Debug, Default)]
pub struct JsonWriter {
    out: String,
    // one entry per open container: `true` while it is still empty
    first: Vec<bool>,
    after_key: bool,
}

impl JsonWriter {
    /// Creates an empty writer.
    pub fn new() -> JsonWriter {
        JsonWriter::default()
    }

    /// Returns the text written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consumes the writer and returns the text.
    pub fn finish(self) -> String {
        self.out
    }

    pub fn begin_object(&mut self) {
        self.before_value();
        self.out.push('{');
        self.first.push(true);
    }

    pub fn end_object(&mut self) {
        self.first.pop();
        self.out.push('}');
    }

    pub fn begin_array(&mut self) {
        self.before_value();
        self.out.push('[');
        self.first.push(true);
    }

    pub fn end_array(&mut self) {
        self.first.pop();
        self.out.push(']');
    }

    /// Writes an object key.  The next value written belongs to it.
    pub fn key(&mut self, key: &str) {
        self.separate();
        self.write_escaped_str(key);
        self.out.push(':');
        self.after_key = true;
    }

    pub fn write_null(&mut self) {
        self.before_value();
        self.out.push_str("null");
    }

    pub fn write_bool(&mut self, value: bool) {
        self.before_value();
        self.out.push_str(if value { "true" } else { "false" });
    }

    /// Writes an integer exactly.
    pub fn write_int<I: itoa::Integer>(&mut self, value: I) {
        self.before_value();
        self.out.push_str(itoa::Buffer::new().format(value));
    }

    /// Writes a float.
    ///
    /// Uses the shortest text that reads back to the same value.  Integral
    /// values keep their `.0` so they stay distinguishable from integers.
    /// JSON has no representation for NaN or the infinities, those become
    /// `null`.
    pub fn write_f64(&mut self, value: f64) {
        self.before_value();
        if value.is_finite() {
            self.out.push_str(ryu::Buffer::new().format_finite(value));
        } else {
            self.out.push_str("null");
        }
    }

    /// Writes a float with `f32` precision.  See [`write_f64`](Self::write_f64).
    pub fn write_f32(&mut self, value: f32) {
        self.before_value();
        if value.is_finite() {
            self.out.push_str(ryu::Buffer::new().format_finite(value));
        } else {
            self.out.push_str("null");
        }
    }

    /// Writes a quoted and escaped string.
    pub fn write_str(&mut self, value: &str) {
        self.before_value();
        self.write_escaped_str(value);
    }

    /// Writes a single character as a one character string.
    pub fn write_char(&mut self, value: char) {
        self.write_str(value.encode_utf8(&mut [0u8; 4]));
    }

    fn before_value(&mut self) {
        if self.after_key {
            self.after_key = false;
        } else {
            self.separate();
        }
    }

    fn separate(&mut self) {
        if let Some(first) = self.first.last_mut() {
            if *first {
                *first = false;
            } else {
                self.out.push(',');
            }
        }
    }

    fn write_escaped_str(&mut self, value: &str) {
        self.out.push('"');

        let bytes = value.as_bytes();
        let mut start = 0;

        for (i, &byte) in bytes.iter().enumerate() {
            let escape = ESCAPE[byte as usize];
            if escape == 0 {
                continue;
            }

            if start < i {
                self.out.push_str(&value[start..i]);
            }

            match escape {
                self::BB => self.out.push_str("\\b"),
                self::TT => self.out.push_str("\\t"),
                self::NN => self.out.push_str("\\n"),
                self::FF => self.out.push_str("\\f"),
                self::RR => self.out.push_str("\\r"),
                self::QU => self.out.push_str("\\\""),
                self::BS => self.out.push_str("\\\\"),
                self::U => {
                    static HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";
                    self.out.push_str("\\u00");
                    self.out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
                    self.out.push(HEX_DIGITS[(byte & 0xF) as usize] as char);
                }
                _ => unreachable!(),
            }

            start = i + 1;
        }

        if start != bytes.len() {
            self.out.push_str(&value[start..]);
        }

        self.out.push('"');
    }
}

const BB: u8 = b'b'; // \x08
const TT: u8 = b't'; // \x09
const NN: u8 = b'n'; // \x0A
const FF: u8 = b'f'; // \x0C
const RR: u8 = b'r'; // \x0D
const QU: u8 = b'"'; // \x22
const BS: u8 = b'\\'; // \x5C
const U: u8 = b'u'; // \x00...\x1F except the ones above

// Lookup table of escape sequences. A value of b'x' at index i means that byte
// i is escaped as "\x" in JSON. A value of 0 means that byte i is not escaped.
// Bytes of multi-byte UTF-8 sequences are all >= 0x80 and pass through.
#[rustfmt::skip]
static ESCAPE: [u8; 256] = [
    //  1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    U,  U,  U,  U,  U,  U,  U,  U, BB, TT, NN,  U, FF, RR,  U,  U, // 0
    U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U, // 1
    0,  0, QU,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 2
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 3
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 4
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, BS,  0,  0,  0, // 5
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 6
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 7
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 8
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 9
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // A
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // B
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // C
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // D
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // E
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // F
];
