use bytes::BufMut;
use tracing::{debug, trace};

use crate::codec::{pad_string, Arg, FORMAT_DELIMITER};
use crate::error::{OscError, Result};
use crate::tag::TypeTag;

/// Encode a message whose arguments are declared by `format`.
///
/// Wire format:
/// ```text
/// ┌──────────────────────┬─────┬─────────────────────┬──────────────────┐
/// │ address \0 [pad %4]  │ ',' │ format \0 [pad %4]  │ arg1 arg2 ...    │
/// └──────────────────────┴─────┴─────────────────────┴──────────────────┘
/// ```
///
/// Payload-carrying tags (`i f s b`) each consume the next entry of `args`,
/// which must be of the same type. `T F N I` consume the next entry only
/// when it is the matching [`Arg`] variant, so they may be listed or left
/// out. The buffer is zero-filled first; on error it may hold a partial,
/// unusable message.
///
/// Returns the number of bytes the message occupies.
pub fn write(buf: &mut [u8], address: &str, format: &str, args: &[Arg<'_>]) -> Result<usize> {
    write_declared(buf, address, format, args)
        .inspect(|len| trace!(address, format, len, "wrote OSC message"))
        .inspect_err(|err| debug!(address, format, error = %err, "OSC encode failed"))
}

/// Encode a message whose format string is derived from `args`.
///
/// Every argument, payload-free ones included, contributes its tag, so the
/// format can never disagree with the argument list.
pub fn encode(buf: &mut [u8], address: &str, args: &[Arg<'_>]) -> Result<usize> {
    encode_args(buf, address, args)
        .inspect(|len| trace!(address, args = args.len(), len, "encoded OSC message"))
        .inspect_err(|err| debug!(address, error = %err, "OSC encode failed"))
}

/// Exact number of bytes `encode` needs for `address` and `args`.
pub fn encoded_len(address: &str, args: &[Arg<'_>]) -> usize {
    pad_string(address.len())
        + pad_string(args.len() + 1)
        + args.iter().map(Arg::wire_size).sum::<usize>()
}

fn write_declared(buf: &mut [u8], address: &str, format: &str, args: &[Arg<'_>]) -> Result<usize> {
    let mut pos = write_envelope(buf, address, format.bytes())?;
    let mut supplied = args.iter().peekable();
    let mut index = 0;

    for byte in format.bytes() {
        let tag = TypeTag::from_byte(byte).ok_or(OscError::UnknownFormatTag(char::from(byte)))?;
        if tag.is_payload_free() {
            // A matching T/F/N/I argument is optional.
            if supplied.next_if(|arg| arg.tag() == tag).is_some() {
                index += 1;
            }
            continue;
        }
        let arg = supplied
            .next()
            .filter(|arg| arg.tag() == tag)
            .ok_or(OscError::ArgumentMismatch {
                index,
                expected: tag,
            })?;
        pos = put_arg(buf, pos, index, arg)?;
        index += 1;
    }

    if supplied.next().is_some() {
        return Err(OscError::UnusedArguments {
            declared: index,
            supplied: args.len(),
        });
    }

    Ok(pos)
}

fn encode_args(buf: &mut [u8], address: &str, args: &[Arg<'_>]) -> Result<usize> {
    let mut pos = write_envelope(buf, address, args.iter().map(|arg| arg.tag().as_byte()))?;
    for (index, arg) in args.iter().enumerate() {
        pos = put_arg(buf, pos, index, arg)?;
    }
    Ok(pos)
}

/// Zero the buffer and write the address, delimiter and format string.
///
/// Returns the offset of the argument region.
fn write_envelope(
    buf: &mut [u8],
    address: &str,
    tags: impl ExactSizeIterator<Item = u8>,
) -> Result<usize> {
    let capacity = buf.len();
    buf.fill(0);

    let address_size = pad_string(address.len());
    if address_size >= capacity {
        return Err(OscError::AddressTooLong {
            len: address.len(),
            capacity,
        });
    }
    buf[..address.len()].copy_from_slice(address.as_bytes());
    buf[address_size] = FORMAT_DELIMITER;

    // The delimiter and the tags are padded as one string.
    let format_len = tags.len();
    let format_size = pad_string(format_len + 1);
    if address_size + format_size > capacity {
        return Err(OscError::FormatTooLong {
            len: format_len,
            capacity,
        });
    }
    for (slot, tag) in buf[address_size + 1..].iter_mut().zip(tags) {
        *slot = tag;
    }

    Ok(address_size + format_size)
}

/// Write one argument at `pos`. Padding bytes are already zero.
fn put_arg(buf: &mut [u8], pos: usize, index: usize, arg: &Arg<'_>) -> Result<usize> {
    let needed = arg.wire_size();
    let remaining = buf.len() - pos;
    if needed > remaining {
        return Err(OscError::ArgumentOverflow {
            index,
            needed,
            remaining,
        });
    }

    let mut dst = &mut buf[pos..pos + needed];
    match *arg {
        Arg::Int32(v) => dst.put_i32(v),
        Arg::Float32(v) => dst.put_f32(v),
        Arg::String(s) => dst.put_slice(s.as_bytes()),
        Arg::Blob(b) => {
            let len = u32::try_from(b.len()).map_err(|_| OscError::ArgumentOverflow {
                index,
                needed,
                remaining,
            })?;
            dst.put_u32(len);
            dst.put_slice(b);
        }
        Arg::True | Arg::False | Arg::Nil | Arg::Infinitum => {}
    }

    Ok(pos + needed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read;

    #[test]
    fn writes_button_message() {
        let mut buf = [0u8; 32];
        let n = write(&mut buf, "/button1", "f", &[Arg::Float32(0.5)]).unwrap();

        assert_eq!(n, 20);
        assert_eq!(&buf[..n], b"/button1\0\0\0\0,f\0\0\x3f\x00\x00\x00");

        let mut msg = read(&buf[..n]).unwrap();
        assert_eq!(msg.address(), "/button1");
        assert_eq!(msg.format(), "f");
        assert_eq!(msg.next_float32().unwrap(), 0.5);
    }

    #[test]
    fn int_and_string_roundtrip() {
        let mut buf = [0u8; 64];
        let n = write(&mut buf, "/a", "is", &[Arg::Int32(42), Arg::String("hi")]).unwrap();

        assert_eq!(n, 16);
        assert_eq!(&buf[..n], b"/a\0\0,is\0\0\0\0\x2ahi\0\0");

        let mut msg = read(&buf[..n]).unwrap();
        assert_eq!(msg.next_int32().unwrap(), 42);
        assert_eq!(msg.next_string().unwrap(), "hi");
    }

    #[test]
    fn padding_bytes_are_zeroed() {
        let mut buf = [0xAAu8; 40];
        let n = write(&mut buf, "/xyz", "s", &[Arg::String("abcd")]).unwrap();

        assert_eq!(n, 20);
        assert_eq!(&buf[..n], b"/xyz\0\0\0\0,s\0\0abcd\0\0\0\0");
        assert!(buf[n..].iter().all(|&b| b == 0));
    }

    #[test]
    fn address_without_room_for_delimiter() {
        let mut buf = [0u8; 8];
        let err = write(&mut buf, "/abc", "", &[]).unwrap_err();
        assert_eq!(
            err,
            OscError::AddressTooLong {
                len: 4,
                capacity: 8
            }
        );
    }

    #[test]
    fn format_without_room_for_terminator() {
        let mut buf = [0u8; 9];
        let err = write(&mut buf, "/abc", "i", &[Arg::Int32(1)]).unwrap_err();

        assert!(matches!(err, OscError::FormatTooLong { len: 1, capacity: 9 }));
        assert_eq!(&buf[..], b"/abc\0\0\0\0,");
    }

    #[test]
    fn format_padding_must_fit() {
        let mut buf = [0u8; 10];
        let err = write(&mut buf, "/abc", "", &[]).unwrap_err();
        assert!(matches!(err, OscError::FormatTooLong { .. }));

        let mut buf = [0u8; 12];
        assert_eq!(write(&mut buf, "/abc", "", &[]).unwrap(), 12);
    }

    #[test]
    fn argument_overflow() {
        let mut buf = [0u8; 10];
        let err = write(&mut buf, "/a", "i", &[Arg::Int32(1)]).unwrap_err();
        assert_eq!(
            err,
            OscError::ArgumentOverflow {
                index: 0,
                needed: 4,
                remaining: 2
            }
        );
    }

    #[test]
    fn blob_overflow() {
        let mut buf = [0u8; 16];
        let err = write(&mut buf, "/a", "b", &[Arg::Blob(&[1, 2, 3, 4, 5])]).unwrap_err();
        assert!(matches!(err, OscError::ArgumentOverflow { needed: 12, .. }));
    }

    #[test]
    fn unknown_tag_aborts_after_partial_write() {
        let mut buf = [0u8; 32];
        let err = write(&mut buf, "/a", "ix", &[Arg::Int32(7)]).unwrap_err();

        assert_eq!(err, OscError::UnknownFormatTag('x'));
        assert_eq!(&buf[8..12], &[0, 0, 0, 7]);
    }

    #[test]
    fn mismatched_argument_type() {
        let mut buf = [0u8; 32];
        let err = write(&mut buf, "/a", "i", &[Arg::Float32(1.0)]).unwrap_err();
        assert_eq!(
            err,
            OscError::ArgumentMismatch {
                index: 0,
                expected: TypeTag::Int32
            }
        );
    }

    #[test]
    fn too_few_arguments() {
        let mut buf = [0u8; 32];
        let err = write(&mut buf, "/a", "is", &[Arg::Int32(1)]).unwrap_err();
        assert_eq!(
            err,
            OscError::ArgumentMismatch {
                index: 1,
                expected: TypeTag::String
            }
        );
    }

    #[test]
    fn too_many_arguments() {
        let mut buf = [0u8; 32];
        let err = write(&mut buf, "/a", "i", &[Arg::Int32(1), Arg::Int32(2)]).unwrap_err();
        assert_eq!(
            err,
            OscError::UnusedArguments {
                declared: 1,
                supplied: 2
            }
        );
    }

    #[test]
    fn payload_free_tags_write_no_bytes() {
        let mut buf = [0u8; 32];
        let n = write(&mut buf, "/t", "TFNI", &[]).unwrap();
        assert_eq!(n, 12);

        let mut msg = read(&buf[..n]).unwrap();
        let args: Vec<_> = msg.args().collect::<Result<_>>().unwrap();
        assert_eq!(args, vec![Arg::True, Arg::False, Arg::Nil, Arg::Infinitum]);
    }

    #[test]
    fn payload_free_arguments_may_be_supplied() {
        let mut buf = [0u8; 32];
        let n = write(&mut buf, "/a", "sT", &[Arg::String("hi"), Arg::True]).unwrap();

        assert_eq!(n, 12);
        assert_eq!(&buf[..n], b"/a\0\0,sT\0hi\0\0");

        let mut omitted = [0u8; 32];
        let m = write(&mut omitted, "/a", "sT", &[Arg::String("hi")]).unwrap();
        assert_eq!(&omitted[..m], &buf[..n]);
    }

    #[test]
    fn supplied_payload_free_arguments_keep_positions() {
        let mut buf = [0u8; 32];
        let args = [Arg::Int32(3), Arg::Nil, Arg::Float32(0.5)];
        let n = write(&mut buf, "/p", "iNf", &args).unwrap();

        let mut msg = read(&buf[..n]).unwrap();
        let decoded: Vec<_> = msg.args().collect::<Result<_>>().unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn mismatched_payload_free_argument_is_left_for_next_tag() {
        let mut buf = [0u8; 32];
        let err = write(&mut buf, "/a", "Ti", &[Arg::False, Arg::Int32(1)]).unwrap_err();
        assert_eq!(
            err,
            OscError::ArgumentMismatch {
                index: 0,
                expected: TypeTag::Int32
            }
        );
    }

    #[test]
    fn blob_is_padded_before_next_argument() {
        let mut buf = [0u8; 64];
        let data = [1u8, 2, 3, 4, 5];
        let n = write(&mut buf, "/b", "bi", &[Arg::Blob(&data), Arg::Int32(-1)]).unwrap();

        assert_eq!(n, 8 + 12 + 4);
        assert_eq!(&buf[8..12], &[0, 0, 0, 5]);
        assert_eq!(&buf[17..20], &[0, 0, 0]);

        let mut msg = read(&buf[..n]).unwrap();
        assert_eq!(msg.next_blob().unwrap(), &data);
        assert_eq!(msg.next_int32().unwrap(), -1);
    }

    #[test]
    fn mixed_roundtrip() {
        let data = [0xDEu8, 0xAD, 0xBE, 0xEF];
        let args = [
            Arg::Int32(i32::MIN),
            Arg::Float32(-2.25),
            Arg::String("osc"),
            Arg::Blob(&data),
            Arg::Int32(i32::MAX),
        ];
        let mut buf = [0u8; 128];
        let n = write(&mut buf, "/mixer/ch/1", "ifTsbNi", &args).unwrap();

        let mut msg = read(&buf[..n]).unwrap();
        assert_eq!(msg.address(), "/mixer/ch/1");
        assert_eq!(msg.format(), "ifTsbNi");
        let decoded: Vec<_> = msg.args().collect::<Result<_>>().unwrap();
        assert_eq!(
            decoded,
            vec![
                Arg::Int32(i32::MIN),
                Arg::Float32(-2.25),
                Arg::True,
                Arg::String("osc"),
                Arg::Blob(&data),
                Arg::Nil,
                Arg::Int32(i32::MAX),
            ]
        );
        assert_eq!(msg.cursor(), n);
    }

    #[test]
    fn encode_derives_format() {
        let args = [Arg::Int32(1), Arg::True, Arg::String("x")];
        let mut buf = [0u8; 64];
        let n = encode(&mut buf, "/d", &args).unwrap();

        assert_eq!(n, encoded_len("/d", &args));
        let mut msg = read(&buf[..n]).unwrap();
        assert_eq!(msg.format(), "iTs");
        let decoded: Vec<_> = msg.args().collect::<Result<_>>().unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let args = [Arg::String("hello"), Arg::Blob(&[9; 7]), Arg::Float32(1.5)];
        let full = encoded_len("/cap", &args);

        for capacity in 0..=full + 4 {
            let mut buf = vec![0u8; capacity];
            match write(&mut buf, "/cap", "sbf", &args) {
                Ok(n) => {
                    assert!(n <= capacity);
                    assert_eq!(n, full);
                }
                Err(err) => {
                    assert!(err.is_encode());
                    assert!(capacity < full);
                }
            }
        }
    }
}
