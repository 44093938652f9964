//! Open Sound Control 1.0 message encoding and decoding.
//!
//! A message on the wire is an address, a `,`-prefixed format string of
//! single-character type tags, and the arguments those tags declare. Every
//! field is NUL-padded to a 4-byte boundary and numbers are big-endian.
//!
//! - [`read`] validates the envelope of a borrowed buffer and returns a
//!   [`Message`] view whose `next_*` methods extract arguments in order.
//! - [`write`] and [`encode`] serialize into a caller-supplied buffer
//!   without allocating.
//! - [`MessageBuilder`] is the allocating, typed convenience on top.
//!
//! Bundles and address pattern matching are out of scope.

pub mod builder;
pub mod codec;
pub mod error;
pub mod print;
pub mod reader;
pub mod tag;
pub mod writer;

pub use builder::MessageBuilder;
pub use codec::{
    pad_blob, pad_string, Arg, CodecConfig, ALIGNMENT, DEFAULT_MAX_MESSAGE_SIZE, FORMAT_DELIMITER,
};
pub use error::{OscError, Result};
pub use print::{dump, print, Dump};
pub use reader::{read, Args, Message};
pub use tag::TypeTag;
pub use writer::{encode, encoded_len, write};
