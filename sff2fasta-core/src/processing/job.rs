//! Per-file conversion job state.
//!
//! A `ConversionJob` is created at the start of processing one input file and
//! discarded when the file completes or fails. It carries the three paths the
//! two-stage conversion needs: the input SFF, the staging FASTQ, and the
//! output FASTA.

use crate::config::{CoreConfig, FASTA_EXTENSION};
use crate::error::{CoreError, CoreResult};
use crate::staging::StagingArea;
use crate::utils::get_file_stem_safe;

use std::path::{Path, PathBuf};

/// Ephemeral state for one input file's two-stage conversion.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub staging_fastq: PathBuf,
    pub output_fasta: PathBuf,
}

impl ConversionJob {
    /// Derives the job's staging and output paths.
    ///
    /// The output FASTA goes to `<outputDir>/<stem>.fasta` when an output
    /// directory is configured (creating it if absent), otherwise alongside
    /// the input. An output path that exists but is not a directory is a
    /// configuration error that fails the whole run.
    pub fn prepare(
        input: &Path,
        config: &CoreConfig,
        staging: &mut StagingArea,
    ) -> CoreResult<Self> {
        let stem = get_file_stem_safe(input)?;
        let output_fasta = resolve_output_path(input, &stem, config.output_dir.as_deref())?;
        let staging_fastq = staging.fastq_path(&stem)?;

        Ok(Self {
            input: input.to_path_buf(),
            staging_fastq,
            output_fasta,
        })
    }
}

fn resolve_output_path(
    input: &Path,
    stem: &str,
    output_dir: Option<&Path>,
) -> CoreResult<PathBuf> {
    let filename = format!("{stem}.{FASTA_EXTENSION}");
    match output_dir {
        Some(dir) => {
            if !dir.exists() {
                log::info!(
                    "Output directory '{}' does not exist, creating it now ...",
                    dir.display()
                );
                std::fs::create_dir_all(dir)?;
            }
            if !dir.is_dir() {
                return Err(CoreError::Config(format!(
                    "Output path '{}' exists but is not a directory",
                    dir.display()
                )));
            }
            Ok(dir.join(filename))
        }
        None => {
            let parent = input.parent().ok_or_else(|| {
                CoreError::PathError(format!(
                    "Could not determine parent directory for '{}'",
                    input.display()
                ))
            })?;
            Ok(parent.join(filename))
        }
    }
}
