//! Human-readable rendering of encoded messages.
//!
//! Built entirely on [`read`] and the argument iterator; decode problems are
//! rendered inline and logged, never returned.

use std::fmt;

use crate::error::OscError;
use crate::reader::read;

/// Display adapter returned by [`dump`].
#[derive(Debug, Clone, Copy)]
pub struct Dump<'a> {
    buf: &'a [u8],
}

/// Render `buf` as one line of text, e.g. `[20 bytes] /button1 f 0.5`.
pub fn dump(buf: &[u8]) -> Dump<'_> {
    Dump { buf }
}

/// Print `buf` to stdout as rendered by [`dump`].
pub fn print(buf: &[u8]) {
    println!("{}", dump(buf));
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut msg = match read(self.buf) {
            Ok(msg) => msg,
            Err(err) => return write!(f, "Error while reading OSC buffer: {err}"),
        };

        write!(
            f,
            "[{} bytes] {} {}",
            self.buf.len(),
            msg.address(),
            msg.format()
        )?;

        for arg in msg.args() {
            match arg {
                Ok(arg) => write!(f, " {arg}")?,
                Err(OscError::UnknownFormatTag(tag)) => write!(f, " Unknown format: '{tag}'")?,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable OSC argument");
                    write!(f, " <{err}>")?;
                }
            }
        }
        Ok(())
    }
}
