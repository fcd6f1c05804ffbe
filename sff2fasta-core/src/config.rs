// ============================================================================
// sff2fasta-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Core Configuration Structures and Constants
//
// This module defines the configuration structures and constants used
// throughout the sff2fasta-core library: input/output paths, batch sizing,
// verbosity, and the locations of the two external converter executables.
//
// KEY COMPONENTS:
// - CoreConfig: Main configuration structure for the library
// - Verbosity: Output routing mode (log file / console)
// - Default constants: Converter locations and file extensions
//
// USAGE:
// Instances of CoreConfig are created by consumers of the library (like
// sff2fasta-cli) and passed to the process_files function.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::path::PathBuf;

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Default location of the sff2fastq executable (stage 1, SFF -> FASTQ).
pub const DEFAULT_SFF2FASTQ_BIN: &str = "./submodules/sff2fastq/sff2fastq";

/// Default location of the fastq2fasta executable (stage 2, FASTQ -> FASTA).
pub const DEFAULT_FASTQ2FASTA_BIN: &str = "./submodules/fastq2fasta/fastq2fasta";

/// Extension of input files discovered in directory mode.
pub const SFF_EXTENSION: &str = "sff";

/// Extension of intermediate staging artifacts.
pub const FASTQ_EXTENSION: &str = "fastq";

/// Extension of final output files.
pub const FASTA_EXTENSION: &str = "fasta";

// ============================================================================
// VERBOSITY
// ============================================================================

/// Output routing mode for run diagnostics.
///
/// Mirrors the tool's `-v` flag: 0 = log file only, 1 = log file + console,
/// 2 = console only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Diagnostics go to the run log file only.
    #[default]
    LogOnly,
    /// Diagnostics go to both the run log file and the console.
    LogAndConsole,
    /// Diagnostics go to the console only; no run log file is written.
    ConsoleOnly,
}

impl Verbosity {
    /// Whether this mode writes the run log file.
    #[must_use]
    pub fn logs_to_file(self) -> bool {
        matches!(self, Verbosity::LogOnly | Verbosity::LogAndConsole)
    }

    /// Whether this mode writes to the console.
    #[must_use]
    pub fn logs_to_console(self) -> bool {
        matches!(self, Verbosity::LogAndConsole | Verbosity::ConsoleOnly)
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = CoreError;

    fn try_from(mode: u8) -> CoreResult<Self> {
        match mode {
            0 => Ok(Verbosity::LogOnly),
            1 => Ok(Verbosity::LogAndConsole),
            2 => Ok(Verbosity::ConsoleOnly),
            other => Err(CoreError::Config(format!(
                "Verbosity mode must be 0, 1 or 2, got {other}"
            ))),
        }
    }
}

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Main configuration structure for the sff2fasta-core library.
///
/// Holds the resolved paths and run parameters for one conversion run. It is
/// typically created by the consumer of the library (e.g., sff2fasta-cli) and
/// passed to the `process_files` function.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    // ---- Path Configuration ----
    /// Input .sff file, or directory containing .sff files
    pub input_path: PathBuf,

    /// Directory where output .fasta files are written.
    /// `None` derives each output path alongside its input file.
    pub output_dir: Option<PathBuf>,

    /// Directory for the run log and the failure list
    pub log_dir: PathBuf,

    // ---- Run Parameters ----
    /// Number of inputs per batch. `None` or `Some(0)` processes all inputs
    /// as a single batch.
    pub batch_size: Option<usize>,

    /// Output routing mode for diagnostics
    pub verbosity: Verbosity,

    // ---- External Converters ----
    /// Location of the sff2fastq executable (stage 1)
    pub sff2fastq_bin: PathBuf,

    /// Location of the fastq2fasta executable (stage 2)
    pub fastq2fasta_bin: PathBuf,
}

impl CoreConfig {
    /// Creates a configuration with default converter locations, no output
    /// directory override, no batching, and file-only verbosity.
    #[must_use]
    pub fn new(input_path: PathBuf, log_dir: PathBuf) -> Self {
        Self {
            input_path,
            output_dir: None,
            log_dir,
            batch_size: None,
            verbosity: Verbosity::default(),
            sff2fastq_bin: PathBuf::from(DEFAULT_SFF2FASTQ_BIN),
            fastq2fasta_bin: PathBuf::from(DEFAULT_FASTQ2FASTA_BIN),
        }
    }

    /// Validates the configuration before a run starts.
    ///
    /// The input path must exist; a bad input path is a configuration error
    /// that aborts the run before any conversion is attempted. The output
    /// directory is checked later, at path-derivation time, because it may
    /// legitimately not exist yet (it is created on first use).
    pub fn validate(&self) -> CoreResult<()> {
        if !self.input_path.exists() {
            return Err(CoreError::Config(format!(
                "Input path '{}' does not exist",
                self.input_path.display()
            )));
        }
        Ok(())
    }

    /// Resolves the configured batch size against the total input count.
    /// `None` and `0` both mean one batch containing all inputs.
    #[must_use]
    pub fn effective_batch_size(&self, total_inputs: usize) -> usize {
        match self.batch_size {
            None | Some(0) => total_inputs.max(1),
            Some(size) => size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_mode_number() {
        assert_eq!(Verbosity::try_from(0).unwrap(), Verbosity::LogOnly);
        assert_eq!(Verbosity::try_from(1).unwrap(), Verbosity::LogAndConsole);
        assert_eq!(Verbosity::try_from(2).unwrap(), Verbosity::ConsoleOnly);
        assert!(Verbosity::try_from(3).is_err());
    }

    #[test]
    fn verbosity_routing() {
        assert!(Verbosity::LogOnly.logs_to_file());
        assert!(!Verbosity::LogOnly.logs_to_console());
        assert!(Verbosity::LogAndConsole.logs_to_file());
        assert!(Verbosity::LogAndConsole.logs_to_console());
        assert!(!Verbosity::ConsoleOnly.logs_to_file());
        assert!(Verbosity::ConsoleOnly.logs_to_console());
    }

    #[test]
    fn batch_size_defaults_to_all_inputs() {
        let mut config = CoreConfig::new(PathBuf::from("in"), PathBuf::from("logs"));
        assert_eq!(config.effective_batch_size(12), 12);

        config.batch_size = Some(0);
        assert_eq!(config.effective_batch_size(12), 12);

        config.batch_size = Some(5);
        assert_eq!(config.effective_batch_size(12), 5);
    }

    #[test]
    fn batch_size_for_empty_input_is_nonzero() {
        let config = CoreConfig::new(PathBuf::from("in"), PathBuf::from("logs"));
        // chunks() panics on zero, so the resolved size must never be zero
        assert_eq!(config.effective_batch_size(0), 1);
    }

    #[test]
    fn validate_rejects_missing_input() {
        let config = CoreConfig::new(
            PathBuf::from("/surely/does/not/exist.sff"),
            PathBuf::from("logs"),
        );
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }
}
