use std::os::raw::c_char;

use oscprims_codec::Arg;

use crate::convert;
use crate::error;
use crate::types::{OscArg, OscResult};

/// Encode one message into `buf`.
///
/// `format` is the tag string without the leading `,`. `args` holds one
/// record per `i f s b` tag; records for `T F N I` tags are optional and
/// consumed only when their tag matches. On success `*out_written`
/// receives the encoded length; `out_written` may be null.
///
/// # Safety
/// `address` and `format` must be non-null UTF-8 C strings. If `capacity > 0`,
/// `buf` must be writable for `capacity` bytes. If `nargs > 0`, `args` must
/// point to `nargs` readable records whose `data` pointers satisfy the
/// [`OscArg`] contract.
#[no_mangle]
pub unsafe extern "C" fn osc_write(
    buf: *mut u8,
    capacity: usize,
    address: *const c_char,
    format: *const c_char,
    args: *const OscArg,
    nargs: usize,
    out_written: *mut usize,
) -> OscResult {
    crate::ffi_boundary(OscResult::Internal, || {
        error::clear_error_state();

        let address = {
            // SAFETY: We validate null and UTF-8 in helper.
            match unsafe { convert::required_str_arg(address, "address") } {
                Some(v) => v,
                None => return OscResult::InvalidArgument,
            }
        };
        let format = {
            // SAFETY: We validate null and UTF-8 in helper.
            match unsafe { convert::required_str_arg(format, "format") } {
                Some(v) => v,
                None => return OscResult::InvalidArgument,
            }
        };

        let raw_args: &[OscArg] = if nargs == 0 {
            &[]
        } else if args.is_null() {
            return error::set_invalid_argument("args cannot be null when nargs > 0");
        } else {
            // SAFETY: Pointer and length are validated above and owned by caller for the call.
            unsafe { std::slice::from_raw_parts(args, nargs) }
        };

        let mut codec_args: Vec<Arg<'_>> = Vec::with_capacity(raw_args.len());
        for (index, raw) in raw_args.iter().enumerate() {
            // SAFETY: Record data pointers are covered by this function's contract.
            match unsafe { convert::codec_arg(index, raw) } {
                Some(arg) => codec_args.push(arg),
                None => return OscResult::InvalidArgument,
            }
        }

        let out = {
            // SAFETY: We validate pointer/capacity pairing in helper.
            match unsafe { convert::bytes_mut_arg(buf, capacity, "buf") } {
                Some(v) => v,
                None => return OscResult::InvalidArgument,
            }
        };

        match oscprims_codec::write(out, address, format, &codec_args) {
            Ok(written) => {
                if !out_written.is_null() {
                    // SAFETY: Checked non-null; validity is guaranteed by the caller.
                    unsafe { out_written.write(written) };
                }
                OscResult::Ok
            }
            Err(err) => error::map_codec_error(&err),
        }
    })
}
