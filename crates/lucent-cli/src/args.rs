//! Command-line argument definitions for the Lucent CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the descriptor file, the output
//! directory, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Lucent diagram renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON file holding one descriptor or an array of them
    #[arg(help = "Path to the input descriptor file")]
    pub input: String,

    /// Directory receiving one output file per descriptor
    #[arg(short, long, default_value = "out")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
