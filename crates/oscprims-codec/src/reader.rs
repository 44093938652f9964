use bytes::Buf;
use tracing::{debug, trace};

use crate::codec::{pad_blob, pad_string, Arg, FORMAT_DELIMITER};
use crate::error::{OscError, Result};
use crate::tag::{payload_count, TypeTag};

/// A read-only view over one encoded OSC message.
///
/// The view borrows the caller's buffer and never copies it. It carries a
/// cursor into the argument region plus the current position in the format
/// string; both only move forward, and only after an argument has been
/// extracted successfully.
#[derive(Debug, Clone)]
pub struct Message<'a> {
    buf: &'a [u8],
    address: &'a str,
    format: &'a str,
    args_start: usize,
    cursor: usize,
    tag_pos: usize,
}

/// Parse the envelope of an OSC message.
///
/// Locates the address, the `,` delimiter and the NUL-terminated format
/// string. Argument bytes are not inspected here; a malformed argument only
/// surfaces when it is extracted.
///
/// The leading `/` of the address is not checked, and an address missing its
/// NUL before the delimiter is accepted as-is.
pub fn read(buf: &[u8]) -> Result<Message<'_>> {
    let Some(comma) = buf.iter().position(|&b| b == FORMAT_DELIMITER) else {
        debug!(len = buf.len(), "no format delimiter in OSC buffer");
        return Err(OscError::MissingFormatDelimiter);
    };

    let format_start = comma + 1;
    let Some(terminator) = buf[format_start..].iter().position(|&b| b == 0) else {
        debug!(len = buf.len(), "unterminated OSC format string");
        return Err(OscError::UnterminatedFormatString);
    };
    let format_end = format_start + terminator;

    let address_end = buf[..comma].iter().position(|&b| b == 0).unwrap_or(comma);
    let address = std::str::from_utf8(&buf[..address_end])
        .map_err(|_| OscError::InvalidString { offset: 0 })?;
    let format = std::str::from_utf8(&buf[format_start..format_end]).map_err(|_| {
        OscError::InvalidString {
            offset: format_start,
        }
    })?;

    // Next multiple of 4 strictly after the terminator.
    let args_start = (format_end + 4) & !3;

    trace!(address, format, args_start, len = buf.len(), "read OSC envelope");

    Ok(Message {
        buf,
        address,
        format,
        args_start,
        cursor: args_start,
        tag_pos: 0,
    })
}

impl<'a> Message<'a> {
    /// The address pattern, e.g. `/button1`.
    pub fn address(&self) -> &'a str {
        self.address
    }

    /// The format string without its leading `,`, e.g. `ifs`.
    pub fn format(&self) -> &'a str {
        self.format
    }

    /// The whole underlying buffer.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Offset of the first argument. Always a multiple of 4.
    pub fn argument_offset(&self) -> usize {
        self.args_start
    }

    /// Offset of the next argument to be extracted.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of payload-carrying arguments declared by the format string.
    pub fn declared_arguments(&self) -> usize {
        payload_count(self.format.as_bytes())
    }

    /// Number of payload-carrying arguments not yet extracted.
    pub fn remaining_arguments(&self) -> usize {
        payload_count(&self.format.as_bytes()[self.tag_pos..])
    }

    /// Rewind to the first argument.
    pub fn reset(&mut self) {
        self.cursor = self.args_start;
        self.tag_pos = 0;
    }

    /// Extract the next `i` argument.
    pub fn next_int32(&mut self) -> Result<i32> {
        let pos = self.expect_tag(TypeTag::Int32)?;
        let (value, next) = self.take_int32()?;
        self.advance(pos, next);
        Ok(value)
    }

    /// Extract the next `f` argument.
    pub fn next_float32(&mut self) -> Result<f32> {
        let pos = self.expect_tag(TypeTag::Float32)?;
        let (value, next) = self.take_float32()?;
        self.advance(pos, next);
        Ok(value)
    }

    /// Extract the next `s` argument.
    ///
    /// Fails with [`OscError::Truncated`] if the string has no terminator
    /// before the end of the buffer; the cursor is left where it was.
    pub fn next_string(&mut self) -> Result<&'a str> {
        let pos = self.expect_tag(TypeTag::String)?;
        let (value, next) = self.take_string()?;
        self.advance(pos, next);
        Ok(value)
    }

    /// Extract the next `b` argument.
    ///
    /// Fails with [`OscError::Truncated`] if the declared length runs past
    /// the end of the buffer; the cursor is left where it was.
    pub fn next_blob(&mut self) -> Result<&'a [u8]> {
        let pos = self.expect_tag(TypeTag::Blob)?;
        let (value, next) = self.take_blob()?;
        self.advance(pos, next);
        Ok(value)
    }

    /// Extract whatever the next format tag declares.
    ///
    /// Unlike the typed extractors, payload-free tags are yielded as
    /// arguments, and a failed tag is stepped over (cursor unchanged) so that
    /// repeated calls always reach the end of the format string.
    pub fn next_arg(&mut self) -> Option<Result<Arg<'a>>> {
        let byte = *self.format.as_bytes().get(self.tag_pos)?;
        self.tag_pos += 1;

        let Some(tag) = TypeTag::from_byte(byte) else {
            return Some(Err(OscError::UnknownFormatTag(char::from(byte))));
        };

        let taken = match tag {
            TypeTag::Int32 => self.take_int32().map(|(v, next)| (Arg::Int32(v), next)),
            TypeTag::Float32 => self.take_float32().map(|(v, next)| (Arg::Float32(v), next)),
            TypeTag::String => self.take_string().map(|(v, next)| (Arg::String(v), next)),
            TypeTag::Blob => self.take_blob().map(|(v, next)| (Arg::Blob(v), next)),
            TypeTag::True => Ok((Arg::True, self.cursor)),
            TypeTag::False => Ok((Arg::False, self.cursor)),
            TypeTag::Nil => Ok((Arg::Nil, self.cursor)),
            TypeTag::Infinitum => Ok((Arg::Infinitum, self.cursor)),
        };

        Some(taken.map(|(arg, next)| {
            self.cursor = next;
            arg
        }))
    }

    /// Iterate over the remaining arguments in format order.
    pub fn args(&mut self) -> Args<'_, 'a> {
        Args { message: self }
    }

    /// Find the next payload-carrying tag and check it is `expected`.
    fn expect_tag(&self, expected: TypeTag) -> Result<usize> {
        let format = self.format.as_bytes();
        let mut pos = self.tag_pos;
        loop {
            let Some(&byte) = format.get(pos) else {
                return Err(OscError::ArgumentCountMismatch {
                    declared: self.declared_arguments(),
                });
            };
            match TypeTag::from_byte(byte) {
                Some(tag) if tag.is_payload_free() => pos += 1,
                Some(tag) if tag == expected => return Ok(pos),
                Some(_) => {
                    return Err(OscError::TagMismatch {
                        expected,
                        found: char::from(byte),
                    })
                }
                None => return Err(OscError::UnknownFormatTag(char::from(byte))),
            }
        }
    }

    fn advance(&mut self, tag_pos: usize, cursor: usize) {
        self.tag_pos = tag_pos + 1;
        self.cursor = cursor;
    }

    fn remaining(&self) -> &'a [u8] {
        self.buf.get(self.cursor..).unwrap_or_default()
    }

    fn truncated(&self, tag: TypeTag) -> OscError {
        OscError::Truncated {
            tag,
            offset: self.cursor,
        }
    }

    fn take_int32(&self) -> Result<(i32, usize)> {
        let mut src = self.remaining();
        if src.remaining() < 4 {
            return Err(self.truncated(TypeTag::Int32));
        }
        Ok((src.get_i32(), self.cursor + 4))
    }

    fn take_float32(&self) -> Result<(f32, usize)> {
        let mut src = self.remaining();
        if src.remaining() < 4 {
            return Err(self.truncated(TypeTag::Float32));
        }
        Ok((src.get_f32(), self.cursor + 4))
    }

    fn take_string(&self) -> Result<(&'a str, usize)> {
        let src = self.remaining();
        let Some(len) = src.iter().position(|&b| b == 0) else {
            return Err(self.truncated(TypeTag::String));
        };
        let value = std::str::from_utf8(&src[..len]).map_err(|_| OscError::InvalidString {
            offset: self.cursor,
        })?;
        // Trailing padding may be missing on the last argument.
        let next = (self.cursor + pad_string(len)).min(self.buf.len());
        Ok((value, next))
    }

    fn take_blob(&self) -> Result<(&'a [u8], usize)> {
        let mut src = self.remaining();
        if src.remaining() < 4 {
            return Err(self.truncated(TypeTag::Blob));
        }
        let len = src.get_u32() as usize;
        if src.remaining() < len {
            return Err(self.truncated(TypeTag::Blob));
        }
        let next = (self.cursor + pad_blob(len)).min(self.buf.len());
        Ok((&src[..len], next))
    }
}

/// Iterator over a message's arguments, created by [`Message::args`].
#[derive(Debug)]
pub struct Args<'m, 'a> {
    message: &'m mut Message<'a>,
}

impl<'a> Iterator for Args<'_, 'a> {
    type Item = Result<Arg<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.message.next_arg()
    }
}
