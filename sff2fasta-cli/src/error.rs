// sff2fasta-cli/src/error.rs
//
// CLI error handling: the CLI reports errors through the core error type.

use sff2fasta_core::CoreResult;

/// Type alias for CLI results using CoreError.
///
/// This provides consistency with the core library while allowing
/// CLI-specific error handling when needed.
pub type CliResult<T> = CoreResult<T>;
