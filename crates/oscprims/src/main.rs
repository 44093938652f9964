mod cmd;
mod exit;
mod hex;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "oscprims", version, about = "Open Sound Control message codec CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). `RUST_LOG` directives take precedence.
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "OSCPRIMS_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "oscprims", "encode", "/a", "--types", "is", "42", "hi",
        ])
        .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.address, "/a");
                assert_eq!(args.types, "is");
                assert_eq!(args.values, vec!["42", "hi"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn encode_accepts_negative_values() {
        let cli = Cli::try_parse_from(["oscprims", "encode", "/n", "-t", "if", "-7", "-0.5"])
            .expect("negative values should parse");

        match cli.command {
            Command::Encode(args) => assert_eq!(args.values, vec!["-7", "-0.5"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from(["oscprims", "decode", "--hex", "/tmp/msg.hex"])
            .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(ref args) if args.hex));
    }

    #[test]
    fn rejects_unknown_output_format() {
        let err = Cli::try_parse_from(["oscprims", "--format", "xml", "version"])
            .expect_err("unknown format should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
