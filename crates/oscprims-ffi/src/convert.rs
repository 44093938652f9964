use std::ffi::CStr;
use std::os::raw::c_char;

use oscprims_codec::{Arg, TypeTag};

use crate::error;
use crate::types::OscArg;

/// Convert a required C string argument into UTF-8 `&str`.
///
/// # Safety
/// `value` must be null or point to a valid NUL-terminated C string.
pub(crate) unsafe fn required_str_arg<'a>(value: *const c_char, name: &str) -> Option<&'a str> {
    if value.is_null() {
        let _ = error::set_invalid_argument(format!("{name} cannot be null"));
        return None;
    }

    let as_cstr = {
        // SAFETY: The caller guarantees `value` points to a valid NUL-terminated C string.
        unsafe { CStr::from_ptr(value) }
    };

    match as_cstr.to_str() {
        Ok(v) => Some(v),
        Err(_) => {
            let _ = error::set_invalid_argument(format!("{name} must be valid UTF-8"));
            None
        }
    }
}

/// Convert an optional byte pointer + length into a slice.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes.
pub(crate) unsafe fn bytes_arg<'a>(data: *const u8, len: usize, name: &str) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        let _ = error::set_invalid_argument(format!("{name} cannot be null when len > 0"));
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    Some(unsafe { std::slice::from_raw_parts(data, len) })
}

/// Convert a writable byte pointer + capacity into a mutable slice.
///
/// # Safety
/// If `capacity > 0`, `data` must be non-null and writable for `capacity` bytes.
pub(crate) unsafe fn bytes_mut_arg<'a>(
    data: *mut u8,
    capacity: usize,
    name: &str,
) -> Option<&'a mut [u8]> {
    if capacity == 0 {
        return Some(&mut []);
    }
    if data.is_null() {
        let _ = error::set_invalid_argument(format!("{name} cannot be null when capacity > 0"));
        return None;
    }

    // SAFETY: Pointer and capacity are validated above and owned by caller for the call duration.
    Some(unsafe { std::slice::from_raw_parts_mut(data, capacity) })
}

/// Convert a C argument record into a codec argument.
///
/// # Safety
/// For `s` and `b` records with `len > 0`, `data` must be readable for `len` bytes.
pub(crate) unsafe fn codec_arg<'a>(index: usize, raw: &OscArg) -> Option<Arg<'a>> {
    let Some(tag) = TypeTag::from_byte(raw.tag) else {
        let _ = error::set_invalid_argument(format!(
            "args[{index}] has unknown tag 0x{:02x}",
            raw.tag
        ));
        return None;
    };

    let arg = match tag {
        TypeTag::Int32 => Arg::Int32(raw.int32),
        TypeTag::Float32 => Arg::Float32(raw.float32),
        TypeTag::String => {
            // SAFETY: Forwarded from this function's contract.
            let bytes = unsafe { bytes_arg(raw.data, raw.len, "string data") }?;
            match std::str::from_utf8(bytes) {
                Ok(s) => Arg::String(s),
                Err(_) => {
                    let _ =
                        error::set_invalid_argument(format!("args[{index}] must be valid UTF-8"));
                    return None;
                }
            }
        }
        TypeTag::Blob => {
            // SAFETY: Forwarded from this function's contract.
            Arg::Blob(unsafe { bytes_arg(raw.data, raw.len, "blob data") }?)
        }
        TypeTag::True => Arg::True,
        TypeTag::False => Arg::False,
        TypeTag::Nil => Arg::Nil,
        TypeTag::Infinitum => Arg::Infinitum,
    };
    Some(arg)
}
