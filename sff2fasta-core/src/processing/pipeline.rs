// ============================================================================
// sff2fasta-core/src/processing/pipeline.rs
// ============================================================================
//
// BATCH PIPELINE: Main Conversion Orchestration
//
// This module houses the batch conversion orchestration logic for the
// sff2fasta-core library. It partitions the input list into batches, drives
// each file through the two-stage conversion, and decides per-file and
// per-batch pass/fail.
//
// WORKFLOW:
// 1. Warn about converter executables that cannot be launched
// 2. Partition inputs into contiguous, ordered batches
// 3. For each file:
//    a. Derive the output FASTA and staging FASTQ paths
//    b. Run sff2fastq; judge success by the staging FASTQ's existence
//    c. Run fastq2fasta on the staging FASTQ
//    d. Delete the staging FASTQ
// 4. After each batch, verify the final expected FASTA exists
//
// Every per-file failure is logged, appended to the failure list, and
// converted into a continue-to-next-file decision; only configuration errors
// and cancellation propagate out.

// ---- Internal crate imports ----
use crate::ConvertResult;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{ConverterCommand, ConverterKind, check_dependency, invoke};
use crate::external::invoker::ConverterSpawner;
use crate::lifecycle::RunContext;
use crate::processing::job::ConversionJob;
use crate::utils::get_file_size;

// ---- Standard library imports ----
use std::path::PathBuf;
use std::sync::PoisonError;
use std::time::Instant;

// ============================================================================
// RUN STATUS
// ============================================================================

/// Aggregate pass/fail for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

impl RunStatus {
    /// Process exit code for this status.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failure => 1,
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct RunSummary {
    pub status: RunStatus,
    /// Files that completed both stages, with per-job statistics.
    pub converted: Vec<ConvertResult>,
    /// Inputs that failed a stage or a batch-level check.
    pub failed: Vec<PathBuf>,
}

// ============================================================================
// MAIN PROCESSING FUNCTION
// ============================================================================

/// Processes a list of input files according to the provided configuration.
///
/// This is the main entry point for the sff2fasta-core library. Inputs are
/// partitioned into contiguous batches and processed strictly in order,
/// sequentially; the two conversion stages of one file never overlap. A
/// failed file never halts the run - it is recorded in the failure list and
/// the pipeline moves on - so `Err` is only returned for configuration
/// errors and cancellation.
///
/// The function is generic over the `ConverterSpawner` implementation so
/// tests can inject mock converters.
pub fn process_files<S: ConverterSpawner>(
    spawner: &S,
    config: &CoreConfig,
    ctx: &RunContext,
    files: &[PathBuf],
) -> CoreResult<RunSummary> {
    // A converter that cannot be launched surfaces per file later; warn early
    // so a fully doomed run is obvious from the first log lines.
    for bin in [&config.sff2fastq_bin, &config.fastq2fasta_bin] {
        if let Err(e) = check_dependency(bin) {
            log::warn!("Converter check failed: {e}");
        }
    }

    let batch_size = config.effective_batch_size(files.len());
    log::info!("Using batch size [{batch_size}]");

    let mut summary = RunSummary {
        status: RunStatus::Success,
        converted: Vec::new(),
        failed: Vec::new(),
    };

    for (batch_index, batch) in files.chunks(batch_size).enumerate() {
        let batch_start = batch_index * batch_size;
        log::info!(
            "Now processing batch with range [{}:{}] ...",
            batch_start,
            batch_start + batch.len()
        );

        // The batch-level check below inspects only the final job of the
        // batch; this mirrors the tool's historical behavior and is a known
        // coarse verification, not a per-file guarantee.
        let mut last_job: Option<ConversionJob> = None;
        let mut last_job_failed = false;

        for input in batch {
            if ctx.token.is_cancelled() {
                return Err(CoreError::Interrupted);
            }

            log::info!("Now processing SFF file [{}] ...", input.display());

            let job = {
                let mut staging = ctx.staging.lock().unwrap_or_else(PoisonError::into_inner);
                ConversionJob::prepare(input, config, &mut staging)
            };
            let job = match job {
                Ok(job) => job,
                // A bad output path is a configuration error for the run
                Err(e @ CoreError::Config(_)) => return Err(e),
                Err(e) => {
                    log::error!(
                        "Failed to prepare conversion for '{}': {e}. Continuing to process remaining files ...",
                        input.display()
                    );
                    record_failed(ctx, &mut summary, input.clone());
                    last_job = None;
                    last_job_failed = true;
                    continue;
                }
            };
            last_job = Some(job.clone());

            match execute_job(spawner, config, ctx, &job) {
                Ok(result) => {
                    log::info!(
                        "Completed: {} in {:.1}s",
                        result.filename,
                        result.duration.as_secs_f64()
                    );
                    summary.converted.push(result);
                    last_job_failed = false;
                }
                Err(CoreError::Interrupted) => return Err(CoreError::Interrupted),
                Err(e) => {
                    log::error!(
                        "Conversion failed for '{}': {e}. Continuing to process remaining files ...",
                        input.display()
                    );
                    record_failed(ctx, &mut summary, input.clone());
                    last_job_failed = true;
                }
            }
        }

        // Batch-level verification: only the last job's expected output is
        // inspected. A file already recorded as failed is not recorded twice.
        if let Some(job) = last_job {
            if !last_job_failed && !job.output_fasta.exists() {
                log::error!(
                    "Output FASTA file not created: {}. Continuing to process remaining batches ...",
                    job.output_fasta.display()
                );
                record_failed(ctx, &mut summary, job.input);
            }
        }
    }

    Ok(summary)
}

fn record_failed(ctx: &RunContext, summary: &mut RunSummary, input: PathBuf) {
    ctx.record_failure(&input);
    summary.failed.push(input);
    summary.status = RunStatus::Failure;
}

// ============================================================================
// PER-FILE EXECUTION
// ============================================================================

/// Drives one file through both conversion stages.
///
/// Stage success is judged solely by the existence of the stage's expected
/// output file; converter exit codes are logged but never interpreted. The
/// staging FASTQ is deleted as soon as stage 2 completes.
fn execute_job<S: ConverterSpawner>(
    spawner: &S,
    config: &CoreConfig,
    ctx: &RunContext,
    job: &ConversionJob,
) -> CoreResult<ConvertResult> {
    let job_start = Instant::now();
    log::info!(
        "Converting SFF file [{}] to FASTA file [{}] ...",
        job.input.display(),
        job.output_fasta.display()
    );

    if job.input.exists() {
        log::info!("Running sff2fastq ...");
        let cmd =
            ConverterCommand::sff_to_fastq(&config.sff2fastq_bin, &job.input, &job.staging_fastq);
        invoke(
            spawner,
            &cmd,
            ctx.slot_for(ConverterKind::SffToFastq),
            &ctx.token,
        )?;
    } else {
        log::warn!("Input file '{}' no longer exists", job.input.display());
    }

    if !job.staging_fastq.exists() {
        return Err(CoreError::OutputMissing(job.staging_fastq.clone()));
    }

    log::info!("Running fastq2fasta ...");
    let cmd = ConverterCommand::fastq_to_fasta(
        &config.fastq2fasta_bin,
        &job.staging_fastq,
        &job.output_fasta,
    );
    invoke(
        spawner,
        &cmd,
        ctx.slot_for(ConverterKind::FastqToFasta),
        &ctx.token,
    )?;

    // Never leave the staging artifact behind on the success path
    std::fs::remove_file(&job.staging_fastq)?;

    let filename = job
        .input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| job.input.display().to_string());
    let input_size = get_file_size(&job.input).unwrap_or(0);
    let output_size = get_file_size(&job.output_fasta).unwrap_or(0);

    Ok(ConvertResult {
        filename,
        duration: job_start.elapsed(),
        input_size,
        output_size,
    })
}
