mod cli;
mod commands;
mod formatting;
mod pipeline;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_analyze, run_batch, run_check};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "dqc=debug,dqc_lib=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> ExitCode {
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Analyze {
            input,
            input_type,
            analysis,
        } => {
            run_analyze(
                args.config,
                args.verbose,
                input,
                input_type,
                analysis,
                args.timeout,
                args.format,
                args.output,
            )
            .await
        }
        Commands::Check {
            input,
            input_type,
            analysis,
        } => {
            run_check(
                args.config,
                args.verbose,
                input,
                input_type,
                analysis,
                args.timeout,
                args.format,
                args.output,
            )
            .await
        }
        Commands::Batch { dir, analysis } => {
            run_batch(
                args.config,
                args.verbose,
                dir,
                analysis,
                args.timeout,
                args.format,
                args.output,
            )
            .await
        }
    }
}
