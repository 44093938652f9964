use std::ffi::c_void;

use oscprims_codec::Message;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscResult {
    Ok = 0,
    InvalidArgument = 1,
    MalformedMessage = 2,
    Truncated = 3,
    ArgumentCountMismatch = 4,
    TagMismatch = 5,
    UnknownFormatTag = 6,
    BufferOverflow = 7,
    ArgumentMismatch = 8,
    Internal = 99,
}

#[allow(dead_code)]
pub const OSC_OK: OscResult = OscResult::Ok;
#[allow(dead_code)]
pub const OSC_ERR_INVALID_ARGUMENT: OscResult = OscResult::InvalidArgument;
#[allow(dead_code)]
pub const OSC_ERR_MALFORMED: OscResult = OscResult::MalformedMessage;
#[allow(dead_code)]
pub const OSC_ERR_TRUNCATED: OscResult = OscResult::Truncated;
#[allow(dead_code)]
pub const OSC_ERR_ARGUMENT_COUNT: OscResult = OscResult::ArgumentCountMismatch;
#[allow(dead_code)]
pub const OSC_ERR_TAG_MISMATCH: OscResult = OscResult::TagMismatch;
#[allow(dead_code)]
pub const OSC_ERR_UNKNOWN_TAG: OscResult = OscResult::UnknownFormatTag;
#[allow(dead_code)]
pub const OSC_ERR_OVERFLOW: OscResult = OscResult::BufferOverflow;
#[allow(dead_code)]
pub const OSC_ERR_ARGUMENT_MISMATCH: OscResult = OscResult::ArgumentMismatch;
#[allow(dead_code)]
pub const OSC_ERR_INTERNAL: OscResult = OscResult::Internal;

/// One argument for `osc_write`.
///
/// `tag` selects which field is read: `i` uses `int32`, `f` uses `float32`,
/// `s` and `b` use `data`/`len` (strings need not be NUL-terminated and must
/// be UTF-8). `T`, `F`, `N` and `I` carry no value.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct OscArg {
    pub tag: u8,
    pub int32: i32,
    pub float32: f32,
    pub data: *const u8,
    pub len: usize,
}

impl Default for OscArg {
    fn default() -> Self {
        Self {
            tag: 0,
            int32: 0,
            float32: 0.0,
            data: std::ptr::null(),
            len: 0,
        }
    }
}

pub type OscMessageHandle = *mut c_void;

/// Heap state behind an `OscMessageHandle`.
///
/// The message borrows the buffer passed to `osc_read`; the caller keeps
/// that buffer alive until `osc_message_free`.
pub(crate) struct MessageHandle {
    pub(crate) message: Message<'static>,
}
