// ============================================================================
// sff2fasta-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the External Converter Executables
//
// This module encapsulates interactions with the two external command-line
// converters (sff2fastq and fastq2fasta). It provides abstractions through
// traits and concrete implementations to make these external dependencies
// testable and maintainable.
//
// KEY COMPONENTS:
// - ConverterCommand: program path plus the fixed argument shape per stage
// - Traits for converter invocation (ConverterSpawner, ConverterProcess)
// - Concrete implementation backed by std::process::Command
// - Dependency checking for the converter executables
//
// DESIGN PHILOSOPHY:
// This module follows the dependency injection pattern, allowing consumers to
// provide their own implementations of the traits for testing or specialized
// behavior. The default implementation spawns real subprocesses.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and implementations for invoking converter processes
pub mod invoker;

/// Mock converter infrastructure for tests (feature-gated)
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use invoker::{
    CommandProcess, CommandSpawner, ConverterProcess, ConverterSpawner, ProcessSlot, invoke,
};

// ============================================================================
// CONVERTER COMMANDS
// ============================================================================

/// The two conversion stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterKind {
    /// Stage 1: SFF -> FASTQ
    SffToFastq,
    /// Stage 2: FASTQ -> FASTA
    FastqToFasta,
}

impl ConverterKind {
    /// Short name used in log lines and error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ConverterKind::SffToFastq => "sff2fastq",
            ConverterKind::FastqToFasta => "fastq2fasta",
        }
    }
}

/// One fully-formed converter invocation: the program to run and its fixed
/// argument shape. The shapes are part of the converters' contract and never
/// vary:
///
/// * stage 1: `sff2fastq -o <fastq> <sff>`
/// * stage 2: `fastq2fasta -i <fastq> -o <fasta>`
#[derive(Debug, Clone)]
pub struct ConverterCommand {
    pub kind: ConverterKind,
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ConverterCommand {
    /// Builds the stage-1 command converting `sff` into `fastq`.
    #[must_use]
    pub fn sff_to_fastq(program: &Path, sff: &Path, fastq: &Path) -> Self {
        Self {
            kind: ConverterKind::SffToFastq,
            program: program.to_path_buf(),
            args: vec![
                OsString::from("-o"),
                fastq.as_os_str().to_os_string(),
                sff.as_os_str().to_os_string(),
            ],
        }
    }

    /// Builds the stage-2 command converting `fastq` into `fasta`.
    #[must_use]
    pub fn fastq_to_fasta(program: &Path, fastq: &Path, fasta: &Path) -> Self {
        Self {
            kind: ConverterKind::FastqToFasta,
            program: program.to_path_buf(),
            args: vec![
                OsString::from("-i"),
                fastq.as_os_str().to_os_string(),
                OsString::from("-o"),
                fasta.as_os_str().to_os_string(),
            ],
        }
    }

    /// Renders the command line for log output.
    #[must_use]
    pub fn display(&self) -> String {
        let mut rendered = self.program.display().to_string();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks whether a converter executable can be started.
///
/// Runs the program with `-h`, discarding all output; only failure to spawn
/// is meaningful. Callers downgrade a missing converter to a warning rather
/// than aborting the run: a converter that cannot be launched surfaces later
/// as an ordinary per-file failure, which keeps the rest of the batch moving.
pub fn check_dependency(program: &Path) -> CoreResult<()> {
    let result = Command::new(program)
        .arg("-h")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found converter: {}", program.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Converter '{}' not found", program.display());
            Err(CoreError::DependencyNotFound(
                program.display().to_string(),
            ))
        }
        Err(e) => {
            log::error!("Failed to start converter check '{}': {}", program.display(), e);
            Err(CoreError::CommandStart(program.display().to_string(), e))
        }
    }
}
