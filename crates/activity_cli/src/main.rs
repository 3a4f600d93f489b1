use std::io;
use std::sync::Arc;

use activity_cli::cli::{Cli, Commands};
use activity_cli::commands::{run, version};
use activity_cli::reporter::{escape_data, WorkflowCommandReporter};
use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout only carries command output and workflow commands
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("PR_ACTIVITY_LOG"))
        .init();

    let cli = Cli::parse();

    if cli.command == Commands::Version {
        println!("pr-activity version {}", version());
        std::process::exit(0);
    }

    let reporter = Arc::new(WorkflowCommandReporter::stdout());
    let mut out = io::stdout();

    match run(&cli, reporter.clone(), &mut out).await {
        Ok(()) => {
            if reporter.has_failed() {
                std::process::exit(1);
            }
            std::process::exit(0);
        }
        Err(e) => {
            error!("Error: {e}");
            println!("::error::{}", escape_data(&e.to_string()));
            std::process::exit(2);
        }
    }
}
