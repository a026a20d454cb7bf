mod cli;
mod judge;
mod outcome;
mod report;
mod results;
mod run;
mod suite;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reasoner::io::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "eval", version, about = "Batch evaluation harness for reasoner")]
struct Cli {
    /// Directory holding `<suite>/<eval_run_id>/` results.
    #[arg(long, global = true, default_value = "results")]
    results_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the case ids of a suite (default: the bundled suite).
    List {
        #[arg(long)]
        suite: Option<PathBuf>,
    },
    /// Solve every case of a suite and persist the results.
    Run {
        #[arg(long)]
        suite: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Only run this case id.
        #[arg(long)]
        case: Option<String>,
    },
    /// Aggregate stored runs of a suite.
    Report { suite_id: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("eval=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::List { suite } => cli::list_cases(suite.as_deref()),
        Command::Run {
            suite,
            config,
            case,
        } => cli::run_suite_cmd(
            suite.as_deref(),
            &config,
            case.as_deref(),
            &cli.results_dir,
        ),
        Command::Report { suite_id } => cli::report_suite(&cli.results_dir, &suite_id),
    }
}
