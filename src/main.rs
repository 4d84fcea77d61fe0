//! Operator entry point.
//!
//! Startup failures and run-loop errors share one policy: a single error log
//! and a non-zero exit, suitable for orchestrator-driven restart.

use clap::Parser;
use tracing::error;

use kfdef_operator::config::Cli;
use kfdef_operator::runtime;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli).await {
        error!("Error: {e}.");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let init = runtime::initialize(cli).await?;

    // Leadership is held, never released, for the rest of the process life.
    let _leadership = init.leadership;

    init.manager.start(runtime::shutdown_signal()).await?;
    Ok(())
}
