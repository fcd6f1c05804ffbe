//! Implementation of the 'convert' subcommand.
//!
//! This module handles batch SFF to FASTA conversion: configuration setup,
//! logging initialization, input discovery, and delegation to the
//! sff2fasta-core library.

use crate::cli::ConvertArgs;
use crate::error::CliResult;
use crate::logging::{failure_list_filename, get_timestamp, run_log_filename};

use sff2fasta_core::file_logging::{FailureLog, setup_run_logging};
use sff2fasta_core::lifecycle::{RunContext, install_interrupt_handler};
use sff2fasta_core::{
    CommandSpawner, CoreConfig, CoreError, RunStatus, RunSummary, Verbosity, find_processable_files,
    format_bytes, format_duration, process_files,
};

use std::fs;
use std::time::Instant;

use log::{info, warn};

/// Runs one conversion run end to end and returns its aggregate status.
///
/// Per-file conversion failures are reflected in the returned `RunStatus`,
/// not in the `Result`; `Err` means the run itself could not proceed
/// (bad configuration, logging setup failure, interruption).
pub fn run_convert(args: ConvertArgs) -> CliResult<RunStatus> {
    let total_start_time = Instant::now();

    let config = build_core_config(args)?;
    config.validate()?;

    // Both per-run files carry the same timestamp so they pair up
    let timestamp = get_timestamp();
    fs::create_dir_all(&config.log_dir)?;
    let run_log_path = config.log_dir.join(run_log_filename(&timestamp));
    setup_run_logging(&run_log_path, config.verbosity, log::LevelFilter::Info).map_err(|e| {
        CoreError::OperationFailed(format!("Failed to initialize logging: {e}"))
    })?;

    let failure_list_path = config.log_dir.join(failure_list_filename(&timestamp));
    let ctx = RunContext::new(FailureLog::create(&failure_list_path)?);
    install_interrupt_handler(ctx.token.clone())?;

    info!("========================================");
    info!("sff2fasta run started: {}", chrono::Local::now());
    info!("Input path: {}", config.input_path.display());
    match &config.output_dir {
        Some(dir) => info!("Output directory: {}", dir.display()),
        None => info!("Output directory: alongside each input file"),
    }
    info!("Run log file: {}", run_log_path.display());
    info!("Failure list: {}", failure_list_path.display());
    info!("========================================");

    // An empty input directory is a successful run with nothing to do
    let files = match find_processable_files(&config.input_path) {
        Ok(files) => files,
        Err(CoreError::NoFilesFound) => Vec::new(),
        Err(e) => {
            ctx.run_shutdown()?;
            return Err(e);
        }
    };
    info!("Found {} file(s) to process.", files.len());
    if files.is_empty() {
        info!("No processable .sff files found in the specified input path.");
    }

    let status = match process_files(&CommandSpawner, &config, &ctx, &files) {
        Ok(summary) => {
            log_summary(&summary, &failure_list_path);
            summary.status
        }
        Err(CoreError::Interrupted) => {
            warn!("Run interrupted before completion.");
            RunStatus::Failure
        }
        Err(e) => {
            ctx.run_shutdown()?;
            return Err(e);
        }
    };

    ctx.run_shutdown()?;

    info!("========================================");
    info!(
        "Total run time: {}",
        format_duration(total_start_time.elapsed().as_secs_f64())
    );
    info!("sff2fasta run finished: {}", chrono::Local::now());
    info!("========================================");

    Ok(status)
}

/// Creates and configures CoreConfig from CLI arguments.
fn build_core_config(args: ConvertArgs) -> CliResult<CoreConfig> {
    let mut config = CoreConfig::new(args.input_path, args.log_dir);
    config.output_dir = args.output_dir;
    config.batch_size = args.batch_size;
    config.verbosity = Verbosity::try_from(args.verbosity)?;
    if let Some(bin) = args.sff2fastq {
        config.sff2fastq_bin = bin;
    }
    if let Some(bin) = args.fastq2fasta {
        config.fastq2fasta_bin = bin;
    }
    Ok(config)
}

fn log_summary(summary: &RunSummary, failure_list_path: &std::path::Path) {
    if !summary.converted.is_empty() {
        info!("========================================");
        info!("Conversion Summary:");
        info!("========================================");
        for result in &summary.converted {
            info!("{}", result.filename);
            info!(
                "  Convert time: {}",
                format_duration(result.duration.as_secs_f64())
            );
            info!("  Input size:   {}", format_bytes(result.input_size));
            info!("  Output size:  {}", format_bytes(result.output_size));
            info!("----------------------------------------");
        }
        info!("Successfully converted {} file(s).", summary.converted.len());
    } else {
        info!("No files were successfully converted.");
    }
    info!(
        "Processed {} file(s): {} converted, {} failed.",
        summary.converted.len() + summary.failed.len(),
        summary.converted.len(),
        summary.failed.len()
    );

    if !summary.failed.is_empty() {
        warn!(
            "{} file(s) failed; see {}",
            summary.failed.len(),
            failure_list_path.display()
        );
    }
}
