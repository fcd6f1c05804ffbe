// ============================================================================
// sff2fasta-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Per-Run Log File Naming
//
// Each run writes two files into the log directory, both carrying the same
// timestamp so they pair up: the run log (diagnostics) and the failure list
// (one failed input path per line).

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
#[must_use]
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// File name of the run log for the given timestamp.
#[must_use]
pub fn run_log_filename(timestamp: &str) -> String {
    format!("sff2fasta_run_{timestamp}.log")
}

/// File name of the failure list for the given timestamp.
#[must_use]
pub fn failure_list_filename(timestamp: &str) -> String {
    format!("failed_sff_{timestamp}.log")
}
