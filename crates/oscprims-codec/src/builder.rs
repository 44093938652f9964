use bytes::{Bytes, BytesMut};

use crate::codec::Arg;
use crate::error::Result;
use crate::writer::{encode, encoded_len};

/// Fluent, typed construction of a single message.
///
/// Each append adds the matching format tag, so the format string and the
/// argument list always agree. Unlike [`write`](crate::write), the builder
/// allocates: it owns the address and collects arguments in a `Vec`.
///
/// ```
/// use oscprims_codec::{read, MessageBuilder};
///
/// let bytes = MessageBuilder::new("/synth/1")
///     .string("freq")
///     .float32(440.0)
///     .boolean(true)
///     .to_bytes()
///     .unwrap();
///
/// let mut msg = read(&bytes).unwrap();
/// assert_eq!(msg.format(), "sfT");
/// assert_eq!(msg.next_string().unwrap(), "freq");
/// assert_eq!(msg.next_float32().unwrap(), 440.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder<'a> {
    address: String,
    args: Vec<Arg<'a>>,
}

impl<'a> MessageBuilder<'a> {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            args: Vec::new(),
        }
    }

    pub fn int32(self, value: i32) -> Self {
        self.arg(Arg::Int32(value))
    }

    pub fn float32(self, value: f32) -> Self {
        self.arg(Arg::Float32(value))
    }

    pub fn string(self, value: &'a str) -> Self {
        self.arg(Arg::String(value))
    }

    pub fn blob(self, value: &'a [u8]) -> Self {
        self.arg(Arg::Blob(value))
    }

    /// Append `T` or `F`.
    pub fn boolean(self, value: bool) -> Self {
        self.arg(Arg::from(value))
    }

    pub fn nil(self) -> Self {
        self.arg(Arg::Nil)
    }

    pub fn infinitum(self) -> Self {
        self.arg(Arg::Infinitum)
    }

    /// Append an already-typed argument.
    pub fn arg(mut self, arg: Arg<'a>) -> Self {
        self.push(arg);
        self
    }

    pub fn push(&mut self, arg: Arg<'a>) {
        self.args.push(arg);
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn args(&self) -> &[Arg<'a>] {
        &self.args
    }

    /// The format string the message will carry, without the leading `,`.
    pub fn format(&self) -> String {
        self.args.iter().map(|arg| arg.tag().as_char()).collect()
    }

    /// Exact encoded size of the message.
    pub fn wire_size(&self) -> usize {
        encoded_len(&self.address, &self.args)
    }

    /// Encode into a caller-supplied buffer. Returns the bytes written.
    pub fn write_into(&self, buf: &mut [u8]) -> Result<usize> {
        encode(buf, &self.address, &self.args)
    }

    /// Append the encoded message to `dst`. Returns the bytes appended.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<usize> {
        let start = dst.len();
        dst.resize(start + self.wire_size(), 0);
        match encode(&mut dst[start..], &self.address, &self.args) {
            Ok(n) => Ok(n),
            Err(err) => {
                dst.truncate(start);
                Err(err)
            }
        }
    }

    /// Encode into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut dst = BytesMut::with_capacity(self.wire_size());
        self.encode(&mut dst)?;
        Ok(dst.freeze())
    }
}
