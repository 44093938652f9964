use oscprims_codec::Message;

use crate::convert;
use crate::error;
use crate::types::{MessageHandle, OscMessageHandle, OscResult};

fn with_message_mut(
    handle: OscMessageHandle,
    f: impl FnOnce(&mut Message<'static>) -> OscResult,
) -> OscResult {
    if handle.is_null() {
        return error::set_invalid_argument("message handle cannot be null");
    }

    let message_handle = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &mut *(handle as *mut MessageHandle) }
    };

    f(&mut message_handle.message)
}

fn write_slice_out(
    out_ptr: *mut *const u8,
    out_len: *mut usize,
    bytes: &'static [u8],
) -> OscResult {
    if out_ptr.is_null() || out_len.is_null() {
        return error::set_invalid_argument("out_ptr and out_len cannot be null");
    }

    // SAFETY: Both pointers were checked above; validity is guaranteed by the caller.
    unsafe {
        out_ptr.write(bytes.as_ptr());
        out_len.write(bytes.len());
    }
    OscResult::Ok
}

/// Parse the envelope of the message in `buf`.
///
/// On success `*out_handle` receives a handle that must be released with
/// `osc_message_free`. Extracted strings and blobs point into `buf`.
///
/// # Safety
/// `out_handle` must be a valid writable pointer. If `len > 0`, `buf` must be
/// non-null and readable for `len` bytes, and must stay alive and unmodified
/// until the handle is freed.
#[no_mangle]
pub unsafe extern "C" fn osc_read(
    buf: *const u8,
    len: usize,
    out_handle: *mut OscMessageHandle,
) -> OscResult {
    crate::ffi_boundary(OscResult::Internal, || {
        error::clear_error_state();

        if out_handle.is_null() {
            return error::set_invalid_argument("out_handle cannot be null");
        }
        // SAFETY: Checked non-null above.
        unsafe { out_handle.write(std::ptr::null_mut()) };

        let data: &'static [u8] = {
            // SAFETY: We validate pointer/length pairing in helper; the caller keeps `buf`
            // alive until the handle is freed.
            match unsafe { convert::bytes_arg(buf, len, "buf") } {
                Some(v) => v,
                None => return OscResult::InvalidArgument,
            }
        };

        match oscprims_codec::read(data) {
            Ok(message) => {
                let handle = Box::into_raw(Box::new(MessageHandle { message }));
                // SAFETY: Checked non-null above.
                unsafe { out_handle.write(handle as OscMessageHandle) };
                OscResult::Ok
            }
            Err(err) => error::map_codec_error(&err),
        }
    })
}

/// Free a message handle.
///
/// # Safety
/// `handle` must be null or a handle previously returned by `osc_read`.
#[no_mangle]
pub unsafe extern "C" fn osc_message_free(handle: OscMessageHandle) {
    crate::ffi_boundary((), || {
        if handle.is_null() {
            return;
        }

        // SAFETY: Caller guarantees this handle was allocated by osc_read.
        unsafe {
            drop(Box::from_raw(handle as *mut MessageHandle));
        }
    });
}

/// Point `*out_ptr`/`*out_len` at the address. Not NUL-terminated when the
/// address runs straight into the `,` delimiter.
///
/// # Safety
/// `handle` must be a valid message handle; `out_ptr` and `out_len` must be writable.
#[no_mangle]
pub unsafe extern "C" fn osc_message_address(
    handle: OscMessageHandle,
    out_ptr: *mut *const u8,
    out_len: *mut usize,
) -> OscResult {
    crate::ffi_boundary(OscResult::Internal, || {
        error::clear_error_state();
        with_message_mut(handle, |message| {
            write_slice_out(out_ptr, out_len, message.address().as_bytes())
        })
    })
}

/// Point `*out_ptr`/`*out_len` at the format string, without the leading `,`.
///
/// # Safety
/// `handle` must be a valid message handle; `out_ptr` and `out_len` must be writable.
#[no_mangle]
pub unsafe extern "C" fn osc_message_format(
    handle: OscMessageHandle,
    out_ptr: *mut *const u8,
    out_len: *mut usize,
) -> OscResult {
    crate::ffi_boundary(OscResult::Internal, || {
        error::clear_error_state();
        with_message_mut(handle, |message| {
            write_slice_out(out_ptr, out_len, message.format().as_bytes())
        })
    })
}

/// Rewind argument extraction to the first argument.
///
/// # Safety
/// `handle` must be a valid message handle.
#[no_mangle]
pub unsafe extern "C" fn osc_message_reset(handle: OscMessageHandle) -> OscResult {
    crate::ffi_boundary(OscResult::Internal, || {
        error::clear_error_state();
        with_message_mut(handle, |message| {
            message.reset();
            OscResult::Ok
        })
    })
}

/// Extract the next `i` argument into `*out`.
///
/// # Safety
/// `handle` must be a valid message handle; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn osc_next_int32(handle: OscMessageHandle, out: *mut i32) -> OscResult {
    crate::ffi_boundary(OscResult::Internal, || {
        error::clear_error_state();
        with_message_mut(handle, |message| {
            if out.is_null() {
                return error::set_invalid_argument("out cannot be null");
            }
            match message.next_int32() {
                Ok(value) => {
                    // SAFETY: Checked non-null above; validity is guaranteed by the caller.
                    unsafe { out.write(value) };
                    OscResult::Ok
                }
                Err(err) => error::map_codec_error(&err),
            }
        })
    })
}

/// Extract the next `f` argument into `*out`.
///
/// # Safety
/// `handle` must be a valid message handle; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn osc_next_float32(handle: OscMessageHandle, out: *mut f32) -> OscResult {
    crate::ffi_boundary(OscResult::Internal, || {
        error::clear_error_state();
        with_message_mut(handle, |message| {
            if out.is_null() {
                return error::set_invalid_argument("out cannot be null");
            }
            match message.next_float32() {
                Ok(value) => {
                    // SAFETY: Checked non-null above; validity is guaranteed by the caller.
                    unsafe { out.write(value) };
                    OscResult::Ok
                }
                Err(err) => error::map_codec_error(&err),
            }
        })
    })
}

/// Extract the next `s` argument. `*out_ptr` points into the original buffer
/// and is followed by a NUL byte; `*out_len` excludes it.
///
/// # Safety
/// `handle` must be a valid message handle; `out_ptr` and `out_len` must be writable.
#[no_mangle]
pub unsafe extern "C" fn osc_next_string(
    handle: OscMessageHandle,
    out_ptr: *mut *const u8,
    out_len: *mut usize,
) -> OscResult {
    crate::ffi_boundary(OscResult::Internal, || {
        error::clear_error_state();
        with_message_mut(handle, |message| {
            if out_ptr.is_null() || out_len.is_null() {
                return error::set_invalid_argument("out_ptr and out_len cannot be null");
            }
            match message.next_string() {
                Ok(value) => write_slice_out(out_ptr, out_len, value.as_bytes()),
                Err(err) => error::map_codec_error(&err),
            }
        })
    })
}

/// Extract the next `b` argument. `*out_ptr` points into the original buffer.
///
/// # Safety
/// `handle` must be a valid message handle; `out_ptr` and `out_len` must be writable.
#[no_mangle]
pub unsafe extern "C" fn osc_next_blob(
    handle: OscMessageHandle,
    out_ptr: *mut *const u8,
    out_len: *mut usize,
) -> OscResult {
    crate::ffi_boundary(OscResult::Internal, || {
        error::clear_error_state();
        with_message_mut(handle, |message| {
            if out_ptr.is_null() || out_len.is_null() {
                return error::set_invalid_argument("out_ptr and out_len cannot be null");
            }
            match message.next_blob() {
                Ok(value) => write_slice_out(out_ptr, out_len, value),
                Err(err) => error::map_codec_error(&err),
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE: &[u8] = b"/a\0\0,isb\0\0\0\0\0\0\0\x2ahi\0\0\0\0\0\x02\xca\xfe\0\0";

    fn slice_of(ptr: *const u8, len: usize) -> &'static [u8] {
        // SAFETY: Test pointers come from WIRE, which is 'static.
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }

    #[test]
    fn reads_every_argument() {
        let mut handle: OscMessageHandle = std::ptr::null_mut();
        // SAFETY: WIRE is 'static and handle is a valid out pointer.
        let rc = unsafe { osc_read(WIRE.as_ptr(), WIRE.len(), &mut handle) };
        assert_eq!(rc, OscResult::Ok);
        assert!(!handle.is_null());

        let mut ptr = std::ptr::null();
        let mut len = 0usize;
        let mut int = 0i32;

        unsafe {
            assert_eq!(
                osc_message_address(handle, &mut ptr, &mut len),
                OscResult::Ok
            );
            assert_eq!(slice_of(ptr, len), b"/a");

            assert_eq!(osc_message_format(handle, &mut ptr, &mut len), OscResult::Ok);
            assert_eq!(slice_of(ptr, len), b"isb");

            assert_eq!(osc_next_int32(handle, &mut int), OscResult::Ok);
            assert_eq!(int, 42);

            assert_eq!(osc_next_string(handle, &mut ptr, &mut len), OscResult::Ok);
            assert_eq!(slice_of(ptr, len), b"hi");

            assert_eq!(osc_next_blob(handle, &mut ptr, &mut len), OscResult::Ok);
            assert_eq!(slice_of(ptr, len), &[0xCA, 0xFE]);

            assert_eq!(
                osc_next_int32(handle, &mut int),
                OscResult::ArgumentCountMismatch
            );

            assert_eq!(osc_message_reset(handle), OscResult::Ok);
            assert_eq!(osc_next_int32(handle, &mut int), OscResult::Ok);

            osc_message_free(handle);
        }
    }

    #[test]
    fn wrong_type_reports_tag_mismatch() {
        let mut handle: OscMessageHandle = std::ptr::null_mut();
        let mut value = 0f32;
        unsafe {
            assert_eq!(osc_read(WIRE.as_ptr(), WIRE.len(), &mut handle), OscResult::Ok);
            assert_eq!(osc_next_float32(handle, &mut value), OscResult::TagMismatch);
            osc_message_free(handle);
        }
    }

    #[test]
    fn malformed_buffer_leaves_null_handle() {
        let wire = b"/no/comma\0\0\0";
        let mut handle: OscMessageHandle = 1 as OscMessageHandle;
        let rc = unsafe { osc_read(wire.as_ptr(), wire.len(), &mut handle) };
        assert_eq!(rc, OscResult::MalformedMessage);
        assert!(handle.is_null());
    }

    #[test]
    fn null_arguments_are_rejected() {
        let mut handle: OscMessageHandle = std::ptr::null_mut();
        unsafe {
            assert_eq!(
                osc_read(std::ptr::null(), 4, &mut handle),
                OscResult::InvalidArgument
            );
            assert_eq!(
                osc_read(WIRE.as_ptr(), WIRE.len(), std::ptr::null_mut()),
                OscResult::InvalidArgument
            );
            assert_eq!(
                osc_next_int32(std::ptr::null_mut(), std::ptr::null_mut()),
                OscResult::InvalidArgument
            );
            osc_message_free(std::ptr::null_mut());
        }
    }
}
