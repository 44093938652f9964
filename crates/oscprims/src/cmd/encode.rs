use std::fs;

use oscprims_codec::{Arg, TypeTag};

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, io_error, CliError, CliResult, SUCCESS};
use crate::hex;
use crate::output::{print_encoded, EncodedOutput, OutputFormat, ENCODED_SCHEMA_ID};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let values = parse_values(&args.types, &args.values)?;
    let arguments: Vec<Arg<'_>> = values.iter().map(Value::as_arg).collect();

    let mut buf = vec![0u8; args.capacity];
    let len = oscprims_codec::write(&mut buf, &args.address, &args.types, &arguments)
        .map_err(|err| codec_error("encode failed", err))?;
    let bytes = &buf[..len];

    if let Some(path) = &args.out {
        fs::write(path, bytes)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
        tracing::info!(path = %path.display(), len, "wrote encoded message");
    }

    let out = EncodedOutput {
        schema_id: ENCODED_SCHEMA_ID,
        address: &args.address,
        format: &args.types,
        size: len,
        hex: hex::encode(bytes),
    };
    print_encoded(&out, bytes, format);

    Ok(SUCCESS)
}

/// A command-line value parsed for its format tag.
#[derive(Debug, PartialEq)]
enum Value {
    Int32(i32),
    Float32(f32),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    fn as_arg(&self) -> Arg<'_> {
        match self {
            Value::Int32(v) => Arg::Int32(*v),
            Value::Float32(v) => Arg::Float32(*v),
            Value::Text(s) => Arg::String(s),
            Value::Bytes(b) => Arg::Blob(b),
        }
    }
}

/// Pair each payload-carrying tag with the next raw value.
///
/// Unknown tags are skipped here; the writer rejects them.
fn parse_values(types: &str, raw: &[String]) -> CliResult<Vec<Value>> {
    let mut remaining = raw.iter();
    let mut values = Vec::new();

    for c in types.chars() {
        let Some(tag) = u8::try_from(c).ok().and_then(TypeTag::from_byte) else {
            continue;
        };
        if tag.is_payload_free() {
            continue;
        }

        let text = remaining.next().ok_or_else(|| {
            CliError::usage(format!(
                "missing value for '{tag}' argument {}",
                values.len()
            ))
        })?;

        let value = match tag {
            TypeTag::Int32 => text.parse().map(Value::Int32).map_err(|err| {
                CliError::usage(format!("invalid int32 value '{text}': {err}"))
            })?,
            TypeTag::Float32 => text.parse().map(Value::Float32).map_err(|err| {
                CliError::usage(format!("invalid float32 value '{text}': {err}"))
            })?,
            TypeTag::Blob => hex::decode(text).map(Value::Bytes).map_err(|err| {
                CliError::usage(format!("invalid blob value '{text}': {err}"))
            })?,
            _ => Value::Text(text.clone()),
        };
        values.push(value);
    }

    if remaining.next().is_some() {
        return Err(CliError::usage(format!(
            "{} values supplied, format '{types}' declares {}",
            raw.len(),
            values.len()
        )));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_values_in_tag_order() {
        let values = parse_values("iTfsbN", &raw(&["42", "0.5", "hi", "0aff"])).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Int32(42),
                Value::Float32(0.5),
                Value::Text("hi".to_string()),
                Value::Bytes(vec![0x0A, 0xFF]),
            ]
        );
    }

    #[test]
    fn missing_value_is_usage_error() {
        let err = parse_values("is", &raw(&["1"])).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("missing value for 's'"));
    }

    #[test]
    fn extra_value_is_usage_error() {
        let err = parse_values("i", &raw(&["1", "2"])).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn invalid_number_is_usage_error() {
        let err = parse_values("i", &raw(&["forty"])).unwrap_err();
        assert!(err.message.contains("invalid int32 value 'forty'"));
    }

    #[test]
    fn unknown_tags_consume_nothing() {
        let values = parse_values("xi", &raw(&["3"])).unwrap();
        assert_eq!(values, vec![Value::Int32(3)]);
    }

    #[test]
    fn values_become_codec_args() {
        let values = parse_values("sb", &raw(&["x", "01"])).unwrap();
        let args: Vec<Arg<'_>> = values.iter().map(Value::as_arg).collect();
        assert_eq!(args, vec![Arg::String("x"), Arg::Blob(&[1])]);
    }
}
