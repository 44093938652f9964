use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use oscprims_codec::Arg;
use serde::Serialize;

use crate::hex;

pub const DECODED_SCHEMA_ID: &str =
    "https://schemas.3leaps.dev/oscprims/cli/v1/message-decoded.schema.json";
pub const ENCODED_SCHEMA_ID: &str =
    "https://schemas.3leaps.dev/oscprims/cli/v1/message-encoded.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    /// The one-line message dump.
    Pretty,
    /// The encoded message bytes, unchanged.
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EncodedOutput<'a> {
    pub schema_id: &'static str,
    pub address: &'a str,
    pub format: &'a str,
    pub size: usize,
    pub hex: String,
}

#[derive(Debug, Serialize)]
pub struct DecodedOutput<'a> {
    pub schema_id: &'static str,
    pub size: usize,
    pub address: &'a str,
    pub format: &'a str,
    pub arguments: Vec<ArgumentOutput>,
}

#[derive(Debug, Serialize)]
pub struct ArgumentOutput {
    pub index: usize,
    pub tag: char,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub display: String,
}

impl ArgumentOutput {
    pub fn decoded(index: usize, arg: &Arg<'_>) -> Self {
        let tag = arg.tag();
        Self {
            index,
            tag: tag.as_char(),
            kind: tag.name(),
            value: Some(json_value(arg)),
            error: None,
            display: arg.to_string(),
        }
    }

    pub fn failed(index: usize, tag: char, kind: &'static str, error: String) -> Self {
        Self {
            index,
            tag,
            kind,
            value: None,
            display: format!("<{error}>"),
            error: Some(error),
        }
    }
}

fn json_value(arg: &Arg<'_>) -> serde_json::Value {
    use serde_json::Value;

    match *arg {
        Arg::Int32(v) => Value::from(v),
        Arg::Float32(v) => serde_json::Number::from_f64(f64::from(v))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Arg::String(s) => Value::from(s),
        Arg::Blob(b) => Value::from(hex::encode(b)),
        Arg::True => Value::Bool(true),
        Arg::False => Value::Bool(false),
        Arg::Nil => Value::Null,
        Arg::Infinitum => Value::from("inf"),
    }
}

pub fn print_encoded(out: &EncodedOutput<'_>, bytes: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "HEX", "ASCII"]);
            for (i, word) in bytes.chunks(4).enumerate() {
                table.add_row(vec![
                    (i * 4).to_string(),
                    hex::encode(word),
                    ascii_preview(word),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", oscprims_codec::dump(bytes));
            println!("{}", hex::encode_words(bytes));
        }
        OutputFormat::Raw => print_raw(bytes),
    }
}

pub fn print_decoded(out: &DecodedOutput<'_>, bytes: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            println!("{} {} ({} bytes)", out.address, out.format, out.size);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "TAG", "TYPE", "VALUE"]);
            for arg in &out.arguments {
                table.add_row(vec![
                    arg.index.to_string(),
                    arg.tag.to_string(),
                    arg.kind.to_string(),
                    arg.display.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", oscprims_codec::dump(bytes)),
        OutputFormat::Raw => print_raw(bytes),
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn ascii_preview(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() {
                char::from(b)
            } else {
                '.'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoded_argument_json() {
        let data = [0xCAu8, 0xFE];
        let out = ArgumentOutput::decoded(2, &Arg::Blob(&data));
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["index"], 2);
        assert_eq!(json["tag"], "b");
        assert_eq!(json["type"], "blob");
        assert_eq!(json["value"], "CAFE");
        assert!(json.get("error").is_none());
        assert!(json.get("display").is_none());
    }

    #[test]
    fn failed_argument_json() {
        let out = ArgumentOutput::failed(0, 's', "string", "truncated".to_string());
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["error"], "truncated");
        assert!(json.get("value").is_none());
        assert_eq!(out.display, "<truncated>");
    }

    #[test]
    fn nil_serializes_as_null() {
        let out = ArgumentOutput::decoded(0, &Arg::Nil);
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"value\":null"));
    }

    #[test]
    fn nan_float_serializes_as_null() {
        assert_eq!(json_value(&Arg::Float32(f32::NAN)), serde_json::Value::Null);
        assert_eq!(json_value(&Arg::Float32(0.5)), serde_json::json!(0.5));
    }

    #[test]
    fn ascii_preview_masks_padding() {
        assert_eq!(ascii_preview(b"/a\0\0"), "/a..");
    }
}
