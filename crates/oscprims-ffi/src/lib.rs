//! oscprims-ffi: C-ABI exports for the oscprims message codec.

mod convert;
mod error;
mod message;
mod types;
mod write;

use std::panic::AssertUnwindSafe;

pub use message::{
    osc_message_address, osc_message_format, osc_message_free, osc_message_reset,
    osc_next_blob, osc_next_float32, osc_next_int32, osc_next_string, osc_read,
};
pub use types::{
    OscArg, OscMessageHandle, OscResult, OSC_ERR_ARGUMENT_COUNT, OSC_ERR_ARGUMENT_MISMATCH,
    OSC_ERR_INTERNAL, OSC_ERR_INVALID_ARGUMENT, OSC_ERR_MALFORMED, OSC_ERR_OVERFLOW,
    OSC_ERR_TAG_MISMATCH, OSC_ERR_TRUNCATED, OSC_ERR_UNKNOWN_TAG, OSC_OK,
};
pub use write::osc_write;

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Message for the most recent failure on this thread, or an empty string.
/// The pointer stays valid until the next call into this library.
#[no_mangle]
pub extern "C" fn osc_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}

#[no_mangle]
pub extern "C" fn osc_clear_error() {
    ffi_boundary((), error::clear_error_state);
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    fn last_error() -> String {
        let ptr = osc_last_error();
        assert!(!ptr.is_null());
        // SAFETY: osc_last_error returns a pointer to a thread-local CString.
        unsafe { CStr::from_ptr(ptr).to_str().unwrap().to_string() }
    }

    #[test]
    fn last_error_starts_empty() {
        osc_clear_error();
        assert!(last_error().is_empty());
    }

    #[test]
    fn failure_sets_last_error() {
        let wire = b"/x\0\0,s\0\0ab";
        let mut handle: OscMessageHandle = std::ptr::null_mut();
        let mut ptr = std::ptr::null();
        let mut len = 0usize;

        unsafe {
            assert_eq!(osc_read(wire.as_ptr(), wire.len(), &mut handle), OscResult::Ok);
            assert_eq!(
                osc_next_string(handle, &mut ptr, &mut len),
                OscResult::Truncated
            );
        }
        assert_eq!(last_error(), "truncated 's' argument at offset 8");

        unsafe { osc_message_free(handle) };
    }

    #[test]
    fn panic_is_caught_at_boundary() {
        let rc = ffi_boundary(OscResult::Internal, || panic!("boom"));
        assert_eq!(rc, OscResult::Internal);
        assert_eq!(last_error(), "panic across FFI boundary");
    }
}
