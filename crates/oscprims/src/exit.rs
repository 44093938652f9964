use std::fmt;
use std::io;

use oscprims_codec::OscError;

// Process exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

/// Malformed input data maps to `DATA_INVALID`; a format string or value
/// list the user got wrong maps to `USAGE`.
pub fn codec_error(context: &str, err: OscError) -> CliError {
    let code = match err {
        OscError::UnknownFormatTag(_)
        | OscError::ArgumentMismatch { .. }
        | OscError::UnusedArguments { .. } => USAGE,
        _ => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_are_data_invalid() {
        let err = codec_error("decode failed", OscError::MissingFormatDelimiter);
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.to_string().starts_with("decode failed: "));
    }

    #[test]
    fn format_mistakes_are_usage() {
        let err = codec_error("encode failed", OscError::UnknownFormatTag('q'));
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn overflow_is_data_invalid() {
        let err = codec_error(
            "encode failed",
            OscError::ArgumentOverflow {
                index: 0,
                needed: 8,
                remaining: 4,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn missing_file_is_failure() {
        let err = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, FAILURE);
    }
}
