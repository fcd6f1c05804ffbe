// ============================================================================
// sff2fasta-core/src/external/invoker.rs
// ============================================================================
//
// CONVERTER INVOKER: Subprocess Management and Abstraction
//
// This module provides abstractions for spawning and waiting on converter
// processes. It defines traits and implementations for executing converter
// commands and handling their lifecycle.
//
// KEY COMPONENTS:
// - ConverterProcess: trait representing an active converter process
// - ConverterSpawner: trait for creating new converter processes
// - CommandSpawner: concrete implementation using std::process::Command
// - ProcessSlot: shared handle slot read by the shutdown routine
// - invoke: runs one converter to completion under a cancellation token
//
// ARCHITECTURE:
// The module follows a trait-based design that allows for flexible process
// management and testing through dependency injection patterns. Waiting is
// implemented as a try_wait poll loop so the run's cancellation token is
// observed at the blocking-wait boundary.

use crate::error::{CoreError, CoreResult, command_start_error, command_wait_error};
use crate::external::ConverterCommand;
use crate::lifecycle::ShutdownToken;

use std::io;
use std::process::{Child, Command, ExitStatus};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// Interval between completion polls while a converter is running.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

// --- Converter Execution Abstraction ---

/// Trait representing an active converter process instance.
///
/// `Send` is required because the shutdown routine may terminate the process
/// from the interrupt-handler thread.
pub trait ConverterProcess: Send {
    /// Non-blocking completion check. Returns the exit status once the
    /// process has terminated.
    fn try_wait(&mut self) -> CoreResult<Option<ExitStatus>>;

    /// Forcibly terminates the process.
    fn kill(&mut self) -> CoreResult<()>;
}

/// Trait representing something that can spawn a ConverterProcess.
pub trait ConverterSpawner {
    type Process: ConverterProcess + 'static;

    /// Spawns the converter command.
    fn spawn(&self, cmd: &ConverterCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using std::process ---

/// Wrapper around `std::process::Child` implementing `ConverterProcess`.
pub struct CommandProcess {
    child: Child,
    label: &'static str,
}

impl ConverterProcess for CommandProcess {
    fn try_wait(&mut self) -> CoreResult<Option<ExitStatus>> {
        self.child
            .try_wait()
            .map_err(|e| command_wait_error(self.label, e))
    }

    fn kill(&mut self) -> CoreResult<()> {
        match self.child.kill() {
            Ok(()) => {
                // Reap the terminated child so no zombie is left behind
                let _ = self.child.wait();
                Ok(())
            }
            // The process already exited on its own
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(CoreError::Io(e)),
        }
    }
}

/// Concrete implementation of `ConverterSpawner` using `std::process::Command`.
///
/// Converter stdout/stderr are inherited so the tools' own messages reach the
/// console, matching how they behave when run by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandSpawner;

impl ConverterSpawner for CommandSpawner {
    type Process = CommandProcess;

    fn spawn(&self, cmd: &ConverterCommand) -> CoreResult<Self::Process> {
        Command::new(&cmd.program)
            .args(&cmd.args)
            .spawn()
            .map(|child| CommandProcess {
                child,
                label: cmd.kind.label(),
            })
            .map_err(|e| command_start_error(cmd.kind.label(), e))
    }
}

// --- Process Slot ---

/// Shared slot holding at most one live converter process per stage.
///
/// The invoker registers the process for the duration of the wait and clears
/// it when the call returns; the shutdown routine reads the slot to terminate
/// in-flight work. Cloning shares the same underlying slot.
#[derive(Clone, Default)]
pub struct ProcessSlot {
    inner: Arc<Mutex<Option<Box<dyn ConverterProcess>>>>,
}

impl ProcessSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a live process is currently registered.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.lock().is_some()
    }

    /// Kills and removes the registered process, if any.
    pub fn terminate(&self) -> CoreResult<()> {
        let taken = self.lock().take();
        if let Some(mut process) = taken {
            process.kill()?;
        }
        Ok(())
    }

    fn register(&self, process: Box<dyn ConverterProcess>) {
        *self.lock() = Some(process);
    }

    fn clear(&self) {
        *self.lock() = None;
    }

    /// Polls the registered process. `Ok(None)` while still running; an empty
    /// slot means the process was terminated out from under us by shutdown.
    fn poll(&self) -> CoreResult<Option<ExitStatus>> {
        match self.lock().as_mut() {
            Some(process) => process.try_wait(),
            None => Err(CoreError::Interrupted),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Box<dyn ConverterProcess>>> {
        // A poisoned slot just means another thread panicked mid-update; the
        // contained handle is still valid for kill/wait purposes
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// --- Invocation ---

/// Runs one converter to completion.
///
/// The spawned process is registered in the stage's slot so the shutdown
/// routine can find and terminate it; the slot is cleared when this call
/// returns. The cancellation token is checked at every poll: on cancellation
/// the process is killed and `CoreError::Interrupted` is returned.
///
/// A completed wait is a success regardless of the reported exit code; the
/// code is logged for diagnostics only. Callers detect stage failure from
/// the existence of the expected output file, not from the exit code.
pub fn invoke<S: ConverterSpawner>(
    spawner: &S,
    cmd: &ConverterCommand,
    slot: &ProcessSlot,
    token: &ShutdownToken,
) -> CoreResult<ExitStatus> {
    log::info!("{}", cmd.display());

    let process = spawner.spawn(cmd)?;
    slot.register(Box::new(process));
    log::info!("{}: processing ...", cmd.kind.label());

    let status = loop {
        if token.is_cancelled() {
            log::warn!("Cancellation requested; terminating {}", cmd.kind.label());
            slot.terminate()?;
            return Err(CoreError::Interrupted);
        }
        match slot.poll() {
            Ok(Some(status)) => break status,
            Ok(None) => thread::sleep(WAIT_POLL_INTERVAL),
            Err(e) => {
                slot.clear();
                return Err(e);
            }
        }
    };
    slot.clear();

    match status.code() {
        Some(code) => log::info!("{} finished with exit code: {}", cmd.kind.label(), code),
        None => log::info!("{} finished without an exit code (signal)", cmd.kind.label()),
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct NeverFinishes {
        killed: Arc<AtomicBool>,
    }

    impl ConverterProcess for NeverFinishes {
        fn try_wait(&mut self) -> CoreResult<Option<ExitStatus>> {
            Ok(None)
        }

        fn kill(&mut self) -> CoreResult<()> {
            self.killed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn terminate_kills_and_clears_the_slot() {
        let killed = Arc::new(AtomicBool::new(false));
        let slot = ProcessSlot::new();
        slot.register(Box::new(NeverFinishes {
            killed: killed.clone(),
        }));
        assert!(slot.is_occupied());

        slot.terminate().unwrap();
        assert!(killed.load(Ordering::SeqCst));
        assert!(!slot.is_occupied());

        // Terminating an empty slot is a no-op
        slot.terminate().unwrap();
    }

    #[test]
    fn polling_an_empty_slot_reports_interruption() {
        let slot = ProcessSlot::new();
        assert!(matches!(slot.poll(), Err(CoreError::Interrupted)));
    }
}
