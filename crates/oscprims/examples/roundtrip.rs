//! Encode a message into a fixed buffer, read it back, and print it.
//!
//! Run with:
//!   cargo run --example roundtrip

use oscprims::codec::{print, DEFAULT_MAX_MESSAGE_SIZE};
use oscprims::{read, write, Arg, MessageBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut buf = [0u8; DEFAULT_MAX_MESSAGE_SIZE];
    let len = write(
        &mut buf,
        "/mixer/channel/3",
        "sfiT",
        &[
            Arg::String("gain"),
            Arg::Float32(-6.5),
            Arg::Int32(3),
            Arg::True,
        ],
    )?;
    print(&buf[..len]);

    let mut msg = read(&buf[..len])?;
    let name = msg.next_string()?;
    let gain = msg.next_float32()?;
    let channel = msg.next_int32()?;
    eprintln!("{} -> {name}={gain} on channel {channel}", msg.address());

    let reply = MessageBuilder::new("/mixer/ack")
        .int32(channel)
        .blob(&buf[..4])
        .nil()
        .to_bytes()?;
    print(&reply);

    Ok(())
}
