// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the `test` subcommand and its flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a fine-tuned checkpoint on the test tables
    Test(TestArgs),
}

/// All arguments for the `test` command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// JSON evaluation config
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Checkpoint to evaluate instead of checkpoint_dir/checkpoint_name
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,
}
