// sff2fasta-cli/src/commands/mod.rs
//
// Subcommand implementations.

pub mod convert;
