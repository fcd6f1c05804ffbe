// sff2fasta-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "sff2fasta: Batch SFF to FASTA conversion",
    long_about = "Converts SFF files to FASTA via an intermediate FASTQ step, \
                  driving the external sff2fastq and fastq2fasta converters \
                  through the sff2fasta-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts SFF files from an input file or directory to FASTA
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Input .sff file, or directory containing .sff files
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// Directory where .fasta files will be saved (defaults to each input's directory)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of files per batch (0 or omitted processes everything as one batch)
    #[arg(short = 'b', long, value_name = "COUNT")]
    pub batch_size: Option<usize>,

    /// Output mode: 0 = log file only, 1 = log file + console, 2 = console only
    #[arg(short = 'v', long, value_name = "MODE", default_value_t = 0,
          value_parser = clap::value_parser!(u8).range(0..=2))]
    pub verbosity: u8,

    /// Directory for the run log and the failure list
    #[arg(long, value_name = "LOG_DIR", default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Location of the sff2fastq executable.
    /// Can also be set via the SFF2FASTQ_BIN environment variable.
    #[arg(long, value_name = "PATH", env = "SFF2FASTQ_BIN")]
    pub sff2fastq: Option<PathBuf>,

    /// Location of the fastq2fasta executable.
    /// Can also be set via the FASTQ2FASTA_BIN environment variable.
    #[arg(long, value_name = "PATH", env = "FASTQ2FASTA_BIN")]
    pub fastq2fasta: Option<PathBuf>,
}
