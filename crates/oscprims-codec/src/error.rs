use crate::tag::TypeTag;

/// Errors that can occur while decoding or encoding an OSC message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OscError {
    /// No `,` byte was found before the end of the buffer.
    #[error("missing format delimiter (no ',' before end of buffer)")]
    MissingFormatDelimiter,

    /// The format string runs to the end of the buffer without a NUL.
    #[error("format string is not NUL-terminated")]
    UnterminatedFormatString,

    /// The address, format or a string argument is not valid UTF-8.
    #[error("invalid string data at offset {offset}")]
    InvalidString { offset: usize },

    /// The argument at `offset` extends past the end of the buffer.
    #[error("truncated '{tag}' argument at offset {offset}")]
    Truncated { tag: TypeTag, offset: usize },

    /// More arguments were requested than the format string declares.
    #[error("argument count mismatch (format declares {declared} arguments)")]
    ArgumentCountMismatch { declared: usize },

    /// The next declared argument has a different type than requested.
    #[error("expected '{expected}' argument, format declares '{found}'")]
    TagMismatch { expected: TypeTag, found: char },

    /// The format string contains a tag outside the OSC 1.0 vocabulary.
    #[error("unknown format tag '{0}'")]
    UnknownFormatTag(char),

    /// The padded address plus the format delimiter does not fit.
    #[error("address too long ({len} bytes, capacity {capacity})")]
    AddressTooLong { len: usize, capacity: usize },

    /// The padded format string does not fit after the address.
    #[error("format string too long ({len} bytes, capacity {capacity})")]
    FormatTooLong { len: usize, capacity: usize },

    /// An argument does not fit in the space left in the buffer.
    #[error("argument {index} overflows buffer ({needed} bytes needed, {remaining} remaining)")]
    ArgumentOverflow {
        index: usize,
        needed: usize,
        remaining: usize,
    },

    /// The supplied argument list does not match the format string.
    #[error("argument {index} does not match format tag '{expected}'")]
    ArgumentMismatch { index: usize, expected: TypeTag },

    /// More arguments were supplied than the format string declares.
    #[error("{supplied} arguments supplied, format declares {declared}")]
    UnusedArguments { declared: usize, supplied: usize },
}

impl OscError {
    /// Returns true for errors produced while reading a message.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            OscError::MissingFormatDelimiter
                | OscError::UnterminatedFormatString
                | OscError::InvalidString { .. }
                | OscError::Truncated { .. }
                | OscError::ArgumentCountMismatch { .. }
                | OscError::TagMismatch { .. }
        )
    }

    /// Returns true for errors produced while writing a message.
    ///
    /// `UnknownFormatTag` counts as an encode error; readers surface it per
    /// argument instead of failing the whole message.
    pub fn is_encode(&self) -> bool {
        matches!(
            self,
            OscError::UnknownFormatTag(_)
                | OscError::AddressTooLong { .. }
                | OscError::FormatTooLong { .. }
                | OscError::ArgumentOverflow { .. }
                | OscError::ArgumentMismatch { .. }
                | OscError::UnusedArguments { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, OscError>;
