use std::fmt;

use crate::tag::TypeTag;

/// Every field in an OSC message starts on a 4-byte boundary.
pub const ALIGNMENT: usize = 4;

/// Byte separating the address from the format string.
pub const FORMAT_DELIMITER: u8 = b',';

/// Default encode buffer size: one typical OSC-over-UDP datagram.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1536;

/// On-wire size of a string of `len` bytes (terminator excluded).
///
/// Always reserves at least one NUL, so an already aligned string gains a
/// full word of padding.
pub const fn pad_string(len: usize) -> usize {
    (len + 4) & !3
}

/// On-wire size of a blob carrying `len` payload bytes, including the
/// 4-byte length prefix.
pub const fn pad_blob(len: usize) -> usize {
    (len + 7) & !3
}

/// A single typed OSC argument.
///
/// String and blob variants borrow from the caller: a decoded argument
/// borrows the message buffer, an argument to encode borrows the caller's
/// data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Int32(i32),
    Float32(f32),
    String(&'a str),
    Blob(&'a [u8]),
    True,
    False,
    Nil,
    Infinitum,
}

impl Arg<'_> {
    /// The format tag declaring this argument.
    pub fn tag(&self) -> TypeTag {
        match self {
            Arg::Int32(_) => TypeTag::Int32,
            Arg::Float32(_) => TypeTag::Float32,
            Arg::String(_) => TypeTag::String,
            Arg::Blob(_) => TypeTag::Blob,
            Arg::True => TypeTag::True,
            Arg::False => TypeTag::False,
            Arg::Nil => TypeTag::Nil,
            Arg::Infinitum => TypeTag::Infinitum,
        }
    }

    /// Bytes this argument occupies in the argument region, padding included.
    pub fn wire_size(&self) -> usize {
        match self {
            Arg::Int32(_) | Arg::Float32(_) => 4,
            Arg::String(s) => pad_string(s.len()),
            Arg::Blob(b) => pad_blob(b.len()),
            Arg::True | Arg::False | Arg::Nil | Arg::Infinitum => 0,
        }
    }
}

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        if value {
            Arg::True
        } else {
            Arg::False
        }
    }
}

impl From<i32> for Arg<'_> {
    fn from(value: i32) -> Self {
        Arg::Int32(value)
    }
}

impl From<f32> for Arg<'_> {
    fn from(value: f32) -> Self {
        Arg::Float32(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::String(value)
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Arg::Blob(value)
    }
}

/// Renders the argument the way the message printer does.
impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int32(v) => write!(f, "{v}"),
            Arg::Float32(v) => write_general(f, *v),
            Arg::String(s) => f.write_str(s),
            Arg::Blob(b) => {
                write!(f, "[{}]", b.len())?;
                for byte in *b {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
            Arg::True => f.write_str("true"),
            Arg::False => f.write_str("false"),
            Arg::Nil => f.write_str("nil"),
            Arg::Infinitum => f.write_str("inf"),
        }
    }
}

/// Shortest of fixed and exponent notation with six significant digits,
/// as printf's `%g` renders it: `0.5`, `440`, `1e+20`, `1.5e-05`.
fn write_general(f: &mut fmt::Formatter<'_>, value: f32) -> fmt::Result {
    let v = f64::from(value);
    if v.is_nan() {
        return f.write_str(if v.is_sign_negative() { "-nan" } else { "nan" });
    }
    if v.is_infinite() {
        return f.write_str(if v < 0.0 { "-inf" } else { "inf" });
    }
    if v == 0.0 {
        return f.write_str(if v.is_sign_negative() { "-0" } else { "0" });
    }

    // The exponent after rounding to six digits picks the notation.
    let sci = format!("{v:.5e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return write!(f, "{v}");
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if !(-4..6).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        write!(f, "{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    } else {
        let decimals = (5 - exp) as usize;
        f.write_str(trim_fraction(&format!("{v:.decimals$}")))
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Configuration for callers that own an encode buffer.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Size of the buffer messages are encoded into. Default: 1536 bytes.
    pub max_message_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}
