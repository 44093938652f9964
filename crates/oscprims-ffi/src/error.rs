use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use oscprims_codec::OscError;

use crate::types::OscResult;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let message = message.into();
    let sanitized = message.replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

pub(crate) fn set_invalid_argument(message: impl Into<String>) -> OscResult {
    set_error_message(message);
    OscResult::InvalidArgument
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn map_codec_error(err: &OscError) -> OscResult {
    set_error_message(err.to_string());
    match err {
        OscError::MissingFormatDelimiter
        | OscError::UnterminatedFormatString
        | OscError::InvalidString { .. } => OscResult::MalformedMessage,
        OscError::Truncated { .. } => OscResult::Truncated,
        OscError::ArgumentCountMismatch { .. } => OscResult::ArgumentCountMismatch,
        OscError::TagMismatch { .. } => OscResult::TagMismatch,
        OscError::UnknownFormatTag(_) => OscResult::UnknownFormatTag,
        OscError::AddressTooLong { .. }
        | OscError::FormatTooLong { .. }
        | OscError::ArgumentOverflow { .. } => OscResult::BufferOverflow,
        OscError::ArgumentMismatch { .. } | OscError::UnusedArguments { .. } => {
            OscResult::ArgumentMismatch
        }
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}
