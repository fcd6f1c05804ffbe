//! Staging directory management for intermediate FASTQ artifacts.
//!
//! The staging area owns the temporary directory that holds each job's
//! intermediate FASTQ file between the two conversion stages. The directory
//! is created lazily on first use and removed exactly once per run, during
//! the shutdown routine. The tempfile crate's Drop-based cleanup remains as a
//! safety net if the explicit removal is never reached.

use crate::config::FASTQ_EXTENSION;
use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempDir};

const STAGING_PREFIX: &str = "sff2fasta_staging_";

/// Owner of the run-wide staging directory.
#[derive(Debug, Default)]
pub struct StagingArea {
    dir: Option<TempDir>,
}

impl StagingArea {
    #[must_use]
    pub fn new() -> Self {
        Self { dir: None }
    }

    /// Derives the staging FASTQ path for one job, creating the staging
    /// directory if this is the first use.
    pub fn fastq_path(&mut self, file_stem: &str) -> CoreResult<PathBuf> {
        let dir = self.ensure_dir()?;
        Ok(dir.join(format!("{file_stem}.{FASTQ_EXTENSION}")))
    }

    /// Current staging directory path, if it has been created.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    /// Removes the staging directory recursively.
    ///
    /// Failures are surfaced to the caller rather than swallowed; the
    /// shutdown routine is the single place this is invoked from, so a
    /// failure here fails the shutdown loudly. Calling this when the
    /// directory was never created (or was already removed) is a no-op.
    pub fn remove(&mut self) -> CoreResult<()> {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            dir.close()?;
            log::info!("Removed staging directory: {}", path.display());
        }
        Ok(())
    }

    fn ensure_dir(&mut self) -> CoreResult<&Path> {
        if self.dir.is_none() {
            let created = TempFileBuilder::new().prefix(STAGING_PREFIX).tempdir()?;
            log::debug!("Created staging directory: {}", created.path().display());
            self.dir = Some(created);
        }
        match self.dir.as_ref() {
            Some(dir) => Ok(dir.path()),
            None => Err(CoreError::OperationFailed(
                "Staging directory was removed mid-run".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_is_created_lazily() {
        let mut staging = StagingArea::new();
        assert!(staging.path().is_none());

        let fastq = staging.fastq_path("sample").unwrap();
        let dir = staging.path().expect("staging dir should exist now");
        assert!(dir.exists());
        assert_eq!(fastq, dir.join("sample.fastq"));
    }

    #[test]
    fn repeated_use_reuses_the_same_directory() {
        let mut staging = StagingArea::new();
        let first = staging.fastq_path("a").unwrap();
        let second = staging.fastq_path("b").unwrap();
        assert_eq!(first.parent(), second.parent());
    }

    #[test]
    fn remove_deletes_the_directory_and_is_idempotent() {
        let mut staging = StagingArea::new();
        staging.fastq_path("sample").unwrap();
        let dir = staging.path().unwrap().to_path_buf();
        assert!(dir.exists());

        staging.remove().unwrap();
        assert!(!dir.exists());
        assert!(staging.path().is_none());

        // Second removal and removal-before-creation are both no-ops
        staging.remove().unwrap();
        StagingArea::new().remove().unwrap();
    }
}
