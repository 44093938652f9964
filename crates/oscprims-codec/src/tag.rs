//! OSC 1.0 type tags.
//!
//! Every argument in a message is declared by one ASCII byte in the format
//! string. Four tags carry a payload; the remaining four are carried entirely
//! by the tag itself and occupy zero bytes on the wire.

use std::fmt;

/// A single-character type tag from a message's format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `i`: 32-bit big-endian two's complement integer.
    Int32,
    /// `f`: 32-bit big-endian IEEE-754 float.
    Float32,
    /// `s`: NUL-terminated string, padded to a multiple of 4.
    String,
    /// `b`: 4-byte big-endian length followed by raw bytes, padded to a multiple of 4.
    Blob,
    /// `T`
    True,
    /// `F`
    False,
    /// `N`
    Nil,
    /// `I`: infinitum, sometimes called "bang".
    Infinitum,
}

impl TypeTag {
    /// Parse a format string byte. Returns `None` for bytes outside the vocabulary.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'i' => Some(Self::Int32),
            b'f' => Some(Self::Float32),
            b's' => Some(Self::String),
            b'b' => Some(Self::Blob),
            b'T' => Some(Self::True),
            b'F' => Some(Self::False),
            b'N' => Some(Self::Nil),
            b'I' => Some(Self::Infinitum),
            _ => None,
        }
    }

    /// The byte this tag is written as.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Int32 => b'i',
            Self::Float32 => b'f',
            Self::String => b's',
            Self::Blob => b'b',
            Self::True => b'T',
            Self::False => b'F',
            Self::Nil => b'N',
            Self::Infinitum => b'I',
        }
    }

    pub fn as_char(self) -> char {
        char::from(self.as_byte())
    }

    /// Returns true if the tag occupies no bytes in the argument region.
    pub fn is_payload_free(self) -> bool {
        matches!(self, Self::True | Self::False | Self::Nil | Self::Infinitum)
    }

    /// Returns a human-readable name for the tag.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Float32 => "float32",
            Self::String => "string",
            Self::Blob => "blob",
            Self::True => "true",
            Self::False => "false",
            Self::Nil => "nil",
            Self::Infinitum => "infinitum",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Number of payload-carrying tags in a format string.
///
/// Unknown bytes are not counted.
pub fn payload_count(format: &[u8]) -> usize {
    format
        .iter()
        .filter_map(|&byte| TypeTag::from_byte(byte))
        .filter(|tag| !tag.is_payload_free())
        .count()
}
