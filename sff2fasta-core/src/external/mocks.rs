// sff2fasta-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// This module is only compiled when the "test-mocks" feature is enabled.
#![cfg(feature = "test-mocks")]

use super::*;
use crate::external::invoker::{ConverterProcess, ConverterSpawner};

use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Builds an `ExitStatus` carrying the given exit code.
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    ExitStatus::from_raw(code << 8)
}

/// Mock implementation of ConverterProcess.
pub struct MockConverterProcess {
    /// Exit status reported once `pending_polls` reaches zero.
    pub status: ExitStatus,
    /// Number of try_wait calls that report "still running" first.
    pub pending_polls: u32,
    /// Set when kill() is called.
    pub killed: Arc<AtomicBool>,
}

impl MockConverterProcess {
    #[must_use]
    pub fn completed(status: ExitStatus) -> Self {
        Self {
            status,
            pending_polls: 0,
            killed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A process that never finishes on its own; the returned flag records
    /// whether it was killed.
    #[must_use]
    pub fn hanging() -> (Self, Arc<AtomicBool>) {
        let killed = Arc::new(AtomicBool::new(false));
        let process = Self {
            status: exit_status(0),
            pending_polls: u32::MAX,
            killed: killed.clone(),
        };
        (process, killed)
    }
}

impl ConverterProcess for MockConverterProcess {
    fn try_wait(&mut self) -> CoreResult<Option<ExitStatus>> {
        if self.pending_polls > 0 {
            self.pending_polls -= 1;
            Ok(None)
        } else {
            Ok(Some(self.status))
        }
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.killed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Represents an expected converter call and its mock result.
pub struct MockExpectation {
    pub program_pattern: String,
    pub result: CoreResult<MockConverterProcess>,
    pub create_output: bool,
}

/// Mock implementation of ConverterSpawner supporting multiple expectations.
///
/// Expectations are matched (and consumed) in order against the program path;
/// `create_output` writes a placeholder file at the path following `-o`,
/// simulating a converter that produced its output.
#[derive(Clone, Default)]
pub struct MockConverterSpawner {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockConverterSpawner {
    #[must_use]
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        program_pattern: &str,
        result: CoreResult<MockConverterProcess>,
        create_output: bool,
    ) {
        self.expectations.lock().unwrap().push(MockExpectation {
            program_pattern: program_pattern.to_string(),
            result,
            create_output,
        });
    }

    /// Converter completes with exit code 0, optionally creating its output.
    pub fn add_success_expectation(&self, program_pattern: &str, create_output: bool) {
        let process = MockConverterProcess::completed(exit_status(0));
        self.add_expectation(program_pattern, Ok(process), create_output);
    }

    /// Converter cannot be launched at all.
    pub fn add_spawn_error_expectation(&self, program_pattern: &str, error: CoreError) {
        self.add_expectation(program_pattern, Err(error), false);
    }

    /// Converter completes with a non-zero exit code.
    pub fn add_exit_code_expectation(
        &self,
        program_pattern: &str,
        exit_code: i32,
        create_output: bool,
    ) {
        let process = MockConverterProcess::completed(exit_status(exit_code));
        self.add_expectation(program_pattern, Ok(process), create_output);
    }

    /// Converter never finishes; returns the flag recording whether the
    /// invoker killed it.
    pub fn add_hanging_expectation(&self, program_pattern: &str) -> Arc<AtomicBool> {
        let (process, killed) = MockConverterProcess::hanging();
        self.add_expectation(program_pattern, Ok(process), false);
        killed
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.lock().unwrap().clone()
    }
}

impl ConverterSpawner for MockConverterSpawner {
    type Process = MockConverterProcess;

    fn spawn(&self, cmd: &ConverterCommand) -> CoreResult<Self::Process> {
        let program = cmd.program.display().to_string();
        let args: Vec<String> = cmd
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.received_calls.lock().unwrap().push(
            std::iter::once(program.clone())
                .chain(args.iter().cloned())
                .collect(),
        );

        let mut expectations = self.expectations.lock().unwrap();
        let found_index = expectations
            .iter()
            .position(|exp| program.contains(&exp.program_pattern));

        let Some(index) = found_index else {
            panic!("MockConverterSpawner: no expectation found for command: {program} {args:?}");
        };
        let expectation = expectations.remove(index);
        log::info!(
            "MockConverterSpawner: matched expectation with pattern '{}'",
            expectation.program_pattern
        );

        if expectation.create_output {
            let output_path = args
                .iter()
                .position(|a| a == "-o")
                .and_then(|i| args.get(i + 1))
                .map(PathBuf::from);
            match output_path {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)
                            .expect("MockConverterSpawner failed to create output parent dir");
                    }
                    std::fs::write(&path, b"mock converter output")
                        .expect("MockConverterSpawner failed to create output file");
                    log::info!("MockConverterSpawner created output file: {}", path.display());
                }
                None => panic!("MockConverterSpawner: no -o argument to derive output path from"),
            }
        }

        expectation.result
    }
}
