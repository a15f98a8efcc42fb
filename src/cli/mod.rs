// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and hands off to Layer 2.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TestArgs};

use crate::infra::config::EvalConfig;

#[derive(Parser, Debug)]
#[command(
    name = "cta-eval",
    version,
    about = "Evaluate a BERT column type classifier on held-out tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Test(args) => run_test(args),
        }
    }
}

/// Handles the `test` subcommand.
fn run_test(args: TestArgs) -> Result<()> {
    use crate::application::test_use_case::TestUseCase;

    tracing::info!("Loading config from: {}", args.config.display());
    let config = EvalConfig::load(&args.config)?;

    let mut use_case = TestUseCase::new(config);
    if let Some(checkpoint) = args.checkpoint {
        use_case = use_case.with_checkpoint(checkpoint);
    }

    let report = use_case.execute()?;

    println!("\nEvaluated {} batches", report.batches);
    println!("Loss: {:.6}", report.loss);
    for (name, score) in &report.metrics {
        println!("{name} = {score:.6}");
    }
    Ok(())
}
