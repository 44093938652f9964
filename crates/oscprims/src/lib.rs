//! Open Sound Control 1.0 message codec.
//!
//! oscprims encodes and decodes OSC messages into and out of caller-owned
//! buffers, without allocating and without touching the network. Transports
//! (UDP sockets, files, serial links) only ever hand it raw bytes.
//!
//! # Crate Structure
//!
//! - [`codec`]: reader, argument iterator, writer, builder and printer
//!
//! The `oscprims` binary (behind the `cli` feature) encodes messages from
//! command-line values and decodes them from files or stdin.

/// Re-export codec types.
pub mod codec {
    pub use oscprims_codec::*;
}

pub use oscprims_codec::{read, write, Arg, Message, MessageBuilder, OscError, TypeTag};
