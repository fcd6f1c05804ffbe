//! Core batch conversion logic and orchestration.
//!
//! This module serves as the central hub for the conversion pipeline within
//! the sff2fasta-core library. It organizes the per-file job bookkeeping and
//! the batch loop into submodules and exposes the primary entry point.

/// Per-file conversion job state and output path derivation
pub mod job;

/// Main batch pipeline orchestration logic
pub mod pipeline;

pub use job::ConversionJob;
pub use pipeline::{RunStatus, RunSummary, process_files};
