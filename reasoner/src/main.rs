//! Command-line entry point for the reasoning agent.
//!
//! `reasoner solve` answers one question with the plan/execute/verify loop and
//! prints the result; `reasoner init` writes a default `reasoner.toml`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reasoner::core::types::{RunResult, RunStatus};
use reasoner::exit_codes;
use reasoner::io::backend::Backend;
use reasoner::io::config::{DEFAULT_CONFIG_FILE, ReasonerConfig, load_config, write_config};
use reasoner::logging;
use reasoner::solve::Orchestrator;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "reasoner",
    version,
    about = "Plan, execute, and verify answers to reasoning questions with a local LLM"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `reasoner.toml` if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Answer a question, retrying until the verifier accepts or retries run out.
    Solve {
        question: String,
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Override the configured model.
        #[arg(long)]
        model: Option<String>,
        /// Override the configured retry budget.
        #[arg(long)]
        max_retries: Option<u32>,
        /// Print the full run result as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force, config } => cmd_init(&config, force),
        Command::Solve {
            question,
            config,
            model,
            max_retries,
            json,
        } => cmd_solve(&question, &config, model, max_retries, json),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        info!(path = %path.display(), "config exists; leaving it untouched");
        return Ok(exit_codes::OK);
    }
    write_config(path, &ReasonerConfig::default())?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_solve(
    question: &str,
    config_path: &Path,
    model: Option<String>,
    max_retries: Option<u32>,
    json: bool,
) -> Result<i32> {
    let mut config = load_config(config_path)?;
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(max_retries) = max_retries {
        config.max_retries = max_retries;
    }
    config.validate().context("validate command-line overrides")?;

    let backend = Backend::from_config(&config.backend)?;
    info!(backend = backend.name(), model = %config.model, "solving");
    let orchestrator =
        Orchestrator::new(backend, config.model.clone()).with_max_retries(config.max_retries);
    let result = orchestrator.solve(question);

    let mut stdout = std::io::stdout().lock();
    if json {
        let payload = serde_json::to_string_pretty(&result).context("serialize run result")?;
        writeln!(stdout, "{payload}").context("write stdout")?;
    } else {
        write_human(&mut stdout, &result).context("write stdout")?;
    }

    Ok(match result.status {
        RunStatus::Success => exit_codes::OK,
        RunStatus::Failed => exit_codes::UNVERIFIED,
    })
}

fn write_human(out: &mut impl Write, result: &RunResult) -> std::io::Result<()> {
    writeln!(out, "Answer: {}", result.answer)?;
    writeln!(out, "Status: {}", result.status)?;
    writeln!(out, "Reasoning: {}", result.reasoning_visible_to_user)?;
    writeln!(out, "Retries: {}", result.metadata.retries)?;
    writeln!(out, "Plan:")?;
    for line in result.metadata.plan.lines() {
        writeln!(out, "  {line}")?;
    }
    writeln!(out, "Checks:")?;
    for check in &result.metadata.checks {
        let mark = if check.passed { "pass" } else { "fail" };
        writeln!(out, "  [{mark}] {}: {}", check.check_name, check.details)?;
    }
    Ok(())
}
