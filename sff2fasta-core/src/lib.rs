//! Core library for batch SFF to FASTA conversion.
//!
//! This crate drives two external single-purpose converters (sff2fastq and
//! fastq2fasta) through an intermediate FASTQ staging step. It provides input
//! discovery, staging directory management, converter invocation, the batch
//! pipeline, and run lifecycle / shutdown handling.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use sff2fasta_core::{CoreConfig, RunContext, process_files};
//! use sff2fasta_core::external::CommandSpawner;
//! use sff2fasta_core::file_logging::FailureLog;
//! use std::path::{Path, PathBuf};
//!
//! let config = CoreConfig::new(PathBuf::from("/data/reads"), PathBuf::from("./logs"));
//! config.validate().unwrap();
//!
//! let files = sff2fasta_core::find_processable_files(&config.input_path).unwrap();
//! let failure_log = FailureLog::create(Path::new("./logs/failed_sff.log")).unwrap();
//! let ctx = RunContext::new(failure_log);
//!
//! let summary = process_files(&CommandSpawner, &config, &ctx, &files).unwrap();
//! ctx.run_shutdown().unwrap();
//! std::process::exit(summary.status.exit_code());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod lifecycle;
pub mod processing;
pub mod staging;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, Verbosity};
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use external::{CommandSpawner, ConverterCommand, ConverterKind};
pub use file_logging::FailureLog;
pub use lifecycle::{RunContext, ShutdownToken, install_interrupt_handler};
pub use processing::{RunStatus, RunSummary, process_files};
pub use staging::StagingArea;
pub use utils::{format_bytes, format_duration};

use std::time::Duration;

/// Result of one successful two-stage conversion, with statistics about the
/// job. Returned by `process_files` for each file that completed both stages.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    pub filename: String,
    pub duration: Duration,
    pub input_size: u64,
    pub output_size: u64,
}
