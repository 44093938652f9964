use clap::{Args, Subcommand};
use std::path::PathBuf;

use oscprims_codec::DEFAULT_MAX_MESSAGE_SIZE;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod envinfo;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a message from typed values.
    Encode(EncodeArgs),
    /// Decode and print a message.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Address pattern, e.g. /mixer/fader1.
    pub address: String,
    /// Type tags (i, f, s, b, T, F, N, I), one per argument.
    #[arg(long, short = 't', default_value = "")]
    pub types: String,
    /// One value per i/f/s/b tag, in order. Blobs are given as hex.
    #[arg(allow_hyphen_values = true)]
    pub values: Vec<String>,
    /// Size of the encode buffer in bytes.
    #[arg(long, env = "OSCPRIMS_CAPACITY", default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    pub capacity: usize,
    /// Also write the encoded bytes to this file.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding one encoded message. Reads stdin when omitted or `-`.
    pub path: Option<PathBuf>,
    /// Input is hex text instead of raw bytes.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}
