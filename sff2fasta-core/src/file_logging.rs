//! Log file setup and the per-run failure list.
//!
//! The run log is handled through the `log` facade with log4rs appenders:
//! the verbosity mode decides whether lines go to the run log file, the
//! console, or both. The failure list is a plain data file - one input path
//! per line - kept separate from diagnostics so it can be fed back into
//! another run or consumed by scripts.

use crate::config::Verbosity;
use crate::error::CoreResult;

use anyhow::Result;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Initializes the global logger for one run.
///
/// Builds a file appender and/or a console appender according to the
/// verbosity mode. The run log file is only created in modes that write to
/// it. May be called once per process.
pub fn setup_run_logging(
    log_file: &Path,
    verbosity: Verbosity,
    log_level: LevelFilter,
) -> Result<()> {
    let mut config = Config::builder();
    let mut root = Root::builder();

    if verbosity.logs_to_file() {
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Clean format for log files
        let file_appender = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(
                "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}",
            )))
            .build(log_file)?;
        config = config.appender(Appender::builder().build("file", Box::new(file_appender)));
        root = root.appender("file");
    }

    if verbosity.logs_to_console() {
        let console_appender = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new("[{l}] {m}{n}")))
            .build();
        config = config.appender(Appender::builder().build("console", Box::new(console_appender)));
        root = root.appender("console");
    }

    let config = config.build(root.build(log_level))?;
    log4rs::init_config(config)?;

    Ok(())
}

/// Append-only list of inputs that failed to produce verified output.
///
/// One original input path per line. Every write is flushed immediately so
/// the list survives an interrupted run.
pub struct FailureLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FailureLog {
    /// Creates (truncating) the failure list file.
    pub fn create(path: &Path) -> CoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Appends one failed input path.
    pub fn record(&mut self, input: &Path) -> CoreResult<()> {
        writeln!(self.writer, "{}", input.display())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes any buffered content; the file handle closes on drop.
    pub fn close(&mut self) -> CoreResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn records_one_path_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("failed_sff.log");

        let mut failure_log = FailureLog::create(&path).unwrap();
        failure_log.record(Path::new("/in/a.sff")).unwrap();
        failure_log.record(Path::new("/in/b.sff")).unwrap();
        failure_log.close().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines, vec!["/in/a.sff", "/in/b.sff"]);
    }

    #[test]
    fn create_makes_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs/nested/failed_sff.log");
        let failure_log = FailureLog::create(&path).unwrap();
        assert!(failure_log.path().exists());
    }
}
