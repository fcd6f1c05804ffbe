// ============================================================================
// sff2fasta-core/src/lifecycle.rs
// ============================================================================
//
// LIFECYCLE: Run Context, Cancellation and the Shutdown Routine
//
// This module owns the run-scoped shared state the shutdown routine operates
// on: the cancellation token, one process slot per converter stage, the
// staging area, and the failure log. All of it lives in an explicit
// RunContext passed to the pipeline rather than in process-wide globals.
//
// KEY COMPONENTS:
// - ShutdownToken: cancellation flag set by the interrupt handler
// - install_interrupt_handler: wires SIGINT/Ctrl-C to the token
// - RunContext: shared state for one run
// - RunContext::run_shutdown: single-shot exit routine

use crate::error::{CoreError, CoreResult};
use crate::external::invoker::ProcessSlot;
use crate::external::ConverterKind;
use crate::file_logging::FailureLog;
use crate::staging::StagingArea;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

// ============================================================================
// CANCELLATION
// ============================================================================

/// Cancellation token shared between the interrupt handler and the pipeline.
///
/// The handler only sets the flag; the pipeline and invoker observe it at
/// file boundaries and at every wait poll, so cancellation is picked up even
/// while a converter is running.
#[derive(Clone, Default)]
pub struct ShutdownToken {
    cancelled: Arc<AtomicBool>,
}

impl ShutdownToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Installs the interrupt handler for the run.
///
/// The handler does nothing beyond setting the token: the sequential main
/// flow notices it at the next wait poll or file boundary and drives the
/// shutdown routine itself, so cleanup always runs on one thread.
pub fn install_interrupt_handler(token: ShutdownToken) -> CoreResult<()> {
    ctrlc::set_handler(move || {
        log::warn!("Interrupt received: cancelling run");
        token.cancel();
    })
    .map_err(|e| CoreError::OperationFailed(format!("Failed to install interrupt handler: {e}")))
}

// ============================================================================
// RUN CONTEXT
// ============================================================================

/// Shared state for one conversion run.
///
/// Writers are the pipeline and the invoker; the shutdown routine is the
/// only reader of the process slots and the only remover of the staging
/// directory.
pub struct RunContext {
    pub token: ShutdownToken,
    stage1_slot: ProcessSlot,
    stage2_slot: ProcessSlot,
    pub staging: Mutex<StagingArea>,
    failure_log: Mutex<FailureLog>,
    shutdown_done: AtomicBool,
}

impl RunContext {
    #[must_use]
    pub fn new(failure_log: FailureLog) -> Self {
        Self {
            token: ShutdownToken::new(),
            stage1_slot: ProcessSlot::new(),
            stage2_slot: ProcessSlot::new(),
            staging: Mutex::new(StagingArea::new()),
            failure_log: Mutex::new(failure_log),
            shutdown_done: AtomicBool::new(false),
        }
    }

    /// The live-process slot for one converter stage.
    #[must_use]
    pub fn slot_for(&self, kind: ConverterKind) -> &ProcessSlot {
        match kind {
            ConverterKind::SffToFastq => &self.stage1_slot,
            ConverterKind::FastqToFasta => &self.stage2_slot,
        }
    }

    /// Appends one input path to the failure list. Logging failures about the
    /// failure log itself is all we can do at this point.
    pub fn record_failure(&self, input: &Path) {
        let mut failure_log = self
            .failure_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = failure_log.record(input) {
            log::error!(
                "Failed to record '{}' in the failure list: {}",
                input.display(),
                e
            );
        }
    }

    /// The exit routine. Idempotent: executes at most once per run, whether
    /// reached via normal completion or cancellation.
    ///
    /// Sequence: terminate any in-flight converter processes, remove the
    /// staging directory (loudly - a teardown failure is surfaced), then
    /// flush and close the failure log.
    pub fn run_shutdown(&self) -> CoreResult<()> {
        if self.shutdown_done.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        log::info!("Exit routine initiated ...");

        if self.stage1_slot.is_occupied() {
            log::info!("Killing subprocess: sff2fastq");
            if let Err(e) = self.stage1_slot.terminate() {
                log::error!("Failed to kill sff2fastq: {e}");
            }
        }
        if self.stage2_slot.is_occupied() {
            log::info!("Killing subprocess: fastq2fasta");
            if let Err(e) = self.stage2_slot.terminate() {
                log::error!("Failed to kill fastq2fasta: {e}");
            }
        }

        self.staging
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove()?;

        self.failure_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .close()?;

        log::info!("Exit routine finished.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn token_starts_clear_and_latches() {
        let token = ShutdownToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());

        // Clones share the same flag
        let clone = token.clone();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn shutdown_runs_exactly_once() {
        let dir = tempdir().unwrap();
        let failure_log = FailureLog::create(&dir.path().join("failed.log")).unwrap();
        let ctx = RunContext::new(failure_log);

        // Materialize the staging directory, then shut down
        let staging_path = {
            let mut staging = ctx.staging.lock().unwrap();
            staging.fastq_path("sample").unwrap();
            staging.path().unwrap().to_path_buf()
        };
        assert!(staging_path.exists());

        ctx.run_shutdown().unwrap();
        assert!(!staging_path.exists());

        // Second invocation is a guarded no-op
        ctx.run_shutdown().unwrap();
    }

    #[test]
    fn record_failure_appends_one_line_per_call() {
        let dir = tempdir().unwrap();
        let list_path = dir.path().join("failed.log");
        let failure_log = FailureLog::create(&list_path).unwrap();
        let ctx = RunContext::new(failure_log);

        ctx.record_failure(Path::new("/data/a.sff"));
        ctx.record_failure(Path::new("/data/b.sff"));
        ctx.run_shutdown().unwrap();

        let contents = std::fs::read_to_string(&list_path).unwrap();
        assert_eq!(contents, "/data/a.sff\n/data/b.sff\n");
    }
}
