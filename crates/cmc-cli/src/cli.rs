//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cmc-ic",
    version,
    about = "Inspect and convert star cluster initial-condition files",
    long_about = "Inspect and convert star cluster initial-condition files.\n\n\
                  Reads and writes the singles/binaries table pair as FITS or,\n\
                  when built with the hdf5 feature, HDF5."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the header and a stellar type breakdown of a cluster file.
    Inspect(InspectArgs),

    /// Rewrite a cluster file in the format given by the output extension.
    Convert(ConvertArgs),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Cluster file (.fits, .hdf5 or .h5).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Cluster file to read.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination; the extension selects the format.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
