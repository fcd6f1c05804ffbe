// Integration tests for the batch pipeline, driven by mock converters.
//
// These tests exercise `process_files` end to end - path derivation, staging,
// invocation, failure recording, batch verification - without spawning real
// subprocesses.

use sff2fasta_core::error::{CoreError, command_start_error};
use sff2fasta_core::external::mocks::MockConverterSpawner;
use sff2fasta_core::file_logging::FailureLog;
use sff2fasta_core::{CoreConfig, RunContext, RunStatus, process_files};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const SFF2FASTQ_PATTERN: &str = "sff2fastq";
const FASTQ2FASTA_PATTERN: &str = "fastq2fasta";

struct Fixture {
    // Held so the directories outlive the test body
    _input_dir: TempDir,
    _log_dir: TempDir,
    config: CoreConfig,
    ctx: RunContext,
    files: Vec<PathBuf>,
    failure_list: PathBuf,
}

/// Creates input files, a config pointing at mock converter paths, and a run
/// context with a real failure list on disk.
fn fixture(input_names: &[&str]) -> Fixture {
    let input_dir = TempDir::new().unwrap();
    let log_dir = TempDir::new().unwrap();

    let files: Vec<PathBuf> = input_names
        .iter()
        .map(|name| {
            let path = input_dir.path().join(name);
            std::fs::write(&path, b"sff content").unwrap();
            path
        })
        .collect();

    let mut config = CoreConfig::new(input_dir.path().to_path_buf(), log_dir.path().to_path_buf());
    config.sff2fastq_bin = PathBuf::from("/mock/sff2fastq");
    config.fastq2fasta_bin = PathBuf::from("/mock/fastq2fasta");

    let failure_list = log_dir.path().join("failed_sff.log");
    let ctx = RunContext::new(FailureLog::create(&failure_list).unwrap());

    Fixture {
        _input_dir: input_dir,
        _log_dir: log_dir,
        config,
        ctx,
        files,
        failure_list,
    }
}

fn failure_list_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn converts_every_file_in_order() {
    let f = fixture(&["a.sff", "b.sff"]);
    let spawner = MockConverterSpawner::new();
    for _ in 0..2 {
        spawner.add_success_expectation(SFF2FASTQ_PATTERN, true);
        spawner.add_success_expectation(FASTQ2FASTA_PATTERN, true);
    }

    let summary = process_files(&spawner, &f.config, &f.ctx, &f.files).unwrap();

    assert_eq!(summary.status, RunStatus::Success);
    assert_eq!(summary.status.exit_code(), 0);
    assert!(summary.failed.is_empty());

    let names: Vec<&str> = summary.converted.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, vec!["a.sff", "b.sff"]);
    assert_eq!(summary.converted[0].input_size, b"sff content".len() as u64);

    // Both final outputs exist alongside their inputs
    assert!(f.files[0].with_extension("fasta").exists());
    assert!(f.files[1].with_extension("fasta").exists());

    // Four converter calls, alternating stages, inputs in sorted order
    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 4);
    assert!(calls[0][0].contains("sff2fastq"));
    assert_eq!(calls[0].last().unwrap(), &f.files[0].display().to_string());
    assert!(calls[2][0].contains("sff2fastq"));
    assert_eq!(calls[2].last().unwrap(), &f.files[1].display().to_string());
}

#[test]
fn staging_artifacts_are_gone_after_a_successful_run() {
    let f = fixture(&["reads.sff"]);
    let spawner = MockConverterSpawner::new();
    spawner.add_success_expectation(SFF2FASTQ_PATTERN, true);
    spawner.add_success_expectation(FASTQ2FASTA_PATTERN, true);

    let summary = process_files(&spawner, &f.config, &f.ctx, &f.files).unwrap();
    assert_eq!(summary.status, RunStatus::Success);

    // The per-file FASTQ is deleted right after stage 2 ...
    let staging_dir = {
        let staging = f.ctx.staging.lock().unwrap();
        staging.path().unwrap().to_path_buf()
    };
    assert!(!staging_dir.join("reads.fastq").exists());

    // ... and the staging directory itself goes with the exit routine
    f.ctx.run_shutdown().unwrap();
    assert!(!staging_dir.exists());
}

#[test]
fn launch_failure_is_recorded_once_and_the_run_continues() {
    let f = fixture(&["a.sff", "b.sff"]);
    let spawner = MockConverterSpawner::new();
    spawner.add_spawn_error_expectation(
        SFF2FASTQ_PATTERN,
        command_start_error(
            "sff2fastq",
            std::io::Error::new(ErrorKind::NotFound, "No such file or directory"),
        ),
    );
    spawner.add_success_expectation(SFF2FASTQ_PATTERN, true);
    spawner.add_success_expectation(FASTQ2FASTA_PATTERN, true);

    let summary = process_files(&spawner, &f.config, &f.ctx, &f.files).unwrap();

    assert_eq!(summary.status, RunStatus::Failure);
    assert_eq!(summary.status.exit_code(), 1);
    assert_eq!(summary.failed, vec![f.files[0].clone()]);
    assert_eq!(summary.converted.len(), 1);
    assert_eq!(summary.converted[0].filename, "b.sff");

    f.ctx.run_shutdown().unwrap();
    assert_eq!(
        failure_list_lines(&f.failure_list),
        vec![f.files[0].display().to_string()]
    );
}

#[test]
fn missing_stage_output_fails_the_file_without_running_stage_two() {
    let f = fixture(&["a.sff"]);
    let spawner = MockConverterSpawner::new();
    // sff2fastq exits cleanly but produces no FASTQ
    spawner.add_success_expectation(SFF2FASTQ_PATTERN, false);

    let summary = process_files(&spawner, &f.config, &f.ctx, &f.files).unwrap();

    assert_eq!(summary.status, RunStatus::Failure);
    assert_eq!(summary.failed, vec![f.files[0].clone()]);
    assert!(summary.converted.is_empty());
    assert_eq!(spawner.get_received_calls().len(), 1);
}

#[test]
fn nonzero_exit_code_alone_is_not_a_failure() {
    let f = fixture(&["a.sff"]);
    let spawner = MockConverterSpawner::new();
    // Both stages report failure codes but still produce their outputs;
    // only the output files decide pass/fail
    spawner.add_exit_code_expectation(SFF2FASTQ_PATTERN, 3, true);
    spawner.add_exit_code_expectation(FASTQ2FASTA_PATTERN, 3, true);

    let summary = process_files(&spawner, &f.config, &f.ctx, &f.files).unwrap();

    assert_eq!(summary.status, RunStatus::Success);
    assert_eq!(summary.converted.len(), 1);
    assert!(summary.failed.is_empty());
}

#[test]
fn batch_verification_only_checks_the_final_output() {
    let f = fixture(&["a.sff", "b.sff"]);
    let spawner = MockConverterSpawner::new();
    // a.sff: stage 2 exits cleanly but never writes a.fasta
    spawner.add_success_expectation(SFF2FASTQ_PATTERN, true);
    spawner.add_success_expectation(FASTQ2FASTA_PATTERN, false);
    // b.sff: fully successful
    spawner.add_success_expectation(SFF2FASTQ_PATTERN, true);
    spawner.add_success_expectation(FASTQ2FASTA_PATTERN, true);

    let summary = process_files(&spawner, &f.config, &f.ctx, &f.files).unwrap();

    // a.fasta is missing, but only the batch's final output is verified
    assert!(!f.files[0].with_extension("fasta").exists());
    assert!(f.files[1].with_extension("fasta").exists());
    assert_eq!(summary.status, RunStatus::Success);
    assert!(summary.failed.is_empty());
}

#[test]
fn missing_final_output_fails_the_batch() {
    let f = fixture(&["only.sff"]);
    let spawner = MockConverterSpawner::new();
    spawner.add_success_expectation(SFF2FASTQ_PATTERN, true);
    spawner.add_success_expectation(FASTQ2FASTA_PATTERN, false);

    let summary = process_files(&spawner, &f.config, &f.ctx, &f.files).unwrap();

    assert_eq!(summary.status, RunStatus::Failure);
    assert_eq!(summary.failed, vec![f.files[0].clone()]);

    f.ctx.run_shutdown().unwrap();
    assert_eq!(
        failure_list_lines(&f.failure_list),
        vec![f.files[0].display().to_string()]
    );
}

#[test]
fn each_batch_gets_its_own_verification() {
    let f = fixture(&["a.sff", "b.sff"]);
    let mut config = f.config.clone();
    config.batch_size = Some(1);

    let spawner = MockConverterSpawner::new();
    // Batch 1 (a.sff): output never materializes
    spawner.add_success_expectation(SFF2FASTQ_PATTERN, true);
    spawner.add_success_expectation(FASTQ2FASTA_PATTERN, false);
    // Batch 2 (b.sff): fully successful
    spawner.add_success_expectation(SFF2FASTQ_PATTERN, true);
    spawner.add_success_expectation(FASTQ2FASTA_PATTERN, true);

    let summary = process_files(&spawner, &config, &f.ctx, &f.files).unwrap();

    // With one file per batch, a.sff is the final file of its own batch and
    // the missing output is caught
    assert_eq!(summary.status, RunStatus::Failure);
    assert_eq!(summary.failed, vec![f.files[0].clone()]);
}

#[test]
fn rerunning_overwrites_previous_outputs() {
    let f = fixture(&["reads.sff"]);

    for _ in 0..2 {
        let spawner = MockConverterSpawner::new();
        spawner.add_success_expectation(SFF2FASTQ_PATTERN, true);
        spawner.add_success_expectation(FASTQ2FASTA_PATTERN, true);

        // Fresh context per run, as each CLI invocation would create
        let list = f.failure_list.clone();
        let ctx = RunContext::new(FailureLog::create(&list).unwrap());
        let summary = process_files(&spawner, &f.config, &ctx, &f.files).unwrap();
        ctx.run_shutdown().unwrap();

        assert_eq!(summary.status, RunStatus::Success);
        assert!(f.files[0].with_extension("fasta").exists());
    }
}

#[test]
fn pre_cancelled_run_converts_nothing() {
    let f = fixture(&["a.sff"]);
    let spawner = MockConverterSpawner::new();

    f.ctx.token.cancel();
    let result = process_files(&spawner, &f.config, &f.ctx, &f.files);

    assert!(matches!(result, Err(CoreError::Interrupted)));
    assert!(spawner.get_received_calls().is_empty());
}

#[test]
fn cancellation_kills_the_inflight_converter() {
    let f = fixture(&["a.sff"]);
    let spawner = MockConverterSpawner::new();
    let killed = spawner.add_hanging_expectation(SFF2FASTQ_PATTERN);

    let token = f.ctx.token.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(250));
        token.cancel();
    });

    let result = process_files(&spawner, &f.config, &f.ctx, &f.files);
    canceller.join().unwrap();

    assert!(matches!(result, Err(CoreError::Interrupted)));
    assert!(killed.load(std::sync::atomic::Ordering::SeqCst));
}
