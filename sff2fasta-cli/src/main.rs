// sff2fasta-cli/src/main.rs
//
// Binary entry point: parses arguments, dispatches to the subcommand
// implementation, and turns the run's outcome into the process exit code.

use clap::Parser;
use console::style;
use sff2fasta_cli::{Cli, Commands, run_convert};
use std::process;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert(args) => run_convert(args),
    };

    match result {
        Ok(status) => process::exit(status.exit_code()),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            process::exit(1);
        }
    }
}
