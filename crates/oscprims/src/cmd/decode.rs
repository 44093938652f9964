use std::fs;
use std::io::Read;
use std::path::Path;

use oscprims_codec::TypeTag;

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::hex;
use crate::output::{
    print_decoded, ArgumentOutput, DecodedOutput, OutputFormat, DECODED_SCHEMA_ID,
};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(args.path.as_deref())?;
    let bytes = if args.hex {
        hex::decode(&String::from_utf8_lossy(&input))
            .map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex input: {err}")))?
    } else {
        input
    };

    let out = decode_message(&bytes)?;
    print_decoded(&out, &bytes, format);

    // Every argument was still rendered; the exit code flags the damage.
    if out.arguments.iter().any(|arg| arg.error.is_some()) {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}

fn read_input(path: Option<&Path>) -> CliResult<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        _ => {
            let mut input = Vec::new();
            std::io::stdin()
                .read_to_end(&mut input)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(input)
        }
    }
}

fn decode_message(bytes: &[u8]) -> CliResult<DecodedOutput<'_>> {
    let mut msg = oscprims_codec::read(bytes).map_err(|err| codec_error("decode failed", err))?;
    let address = msg.address();
    let format = msg.format();

    let arguments = format
        .bytes()
        .zip(msg.args())
        .enumerate()
        .map(|(index, (byte, result))| match result {
            Ok(arg) => ArgumentOutput::decoded(index, &arg),
            Err(err) => {
                tracing::warn!(index, error = %err, "argument could not be decoded");
                let kind = TypeTag::from_byte(byte).map_or("unknown", TypeTag::name);
                ArgumentOutput::failed(index, char::from(byte), kind, err.to_string())
            }
        })
        .collect();

    tracing::debug!(address, format, size = bytes.len(), "decoded message");

    Ok(DecodedOutput {
        schema_id: DECODED_SCHEMA_ID,
        size: bytes.len(),
        address,
        format,
        arguments,
    })
}
