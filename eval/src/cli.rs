//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use reasoner::io::backend::Backend;
use reasoner::io::config::load_config;
use reasoner::solve::Orchestrator;
use tracing::{debug, info};

use crate::report::aggregate;
use crate::run::{SuiteRunInput, run_suite};
use crate::suite::{resolve_suite, validate_id};

/// List the case ids of a suite.
pub fn list_cases(suite_path: Option<&Path>) -> Result<()> {
    let loaded = resolve_suite(suite_path)?;
    for case in &loaded.file.cases {
        println!("{}", case.id);
    }
    Ok(())
}

/// Solve every case of a suite (or one case) with the configured backend.
pub fn run_suite_cmd(
    suite_path: Option<&Path>,
    config_path: &Path,
    case_id: Option<&str>,
    results_base: &Path,
) -> Result<()> {
    let loaded = resolve_suite(suite_path)?;
    let config = load_config(config_path).context("load reasoner config")?;
    let backend = Backend::from_config(&config.backend).context("build backend")?;
    let backend_name = backend.name();
    debug!(suite_id = %loaded.file.suite.id, backend = backend_name, "suite loaded");

    let orchestrator =
        Orchestrator::new(backend, config.model.clone()).with_max_retries(config.max_retries);
    info!(model = %config.model, max_retries = config.max_retries, "running suite");
    println!(
        "{} RUNNING SUITE {} ({}) {}",
        "=".repeat(20),
        loaded.file.suite.id,
        config.model,
        "=".repeat(20)
    );

    let mut stdout = std::io::stdout().lock();
    let outcome = run_suite(
        &orchestrator,
        &SuiteRunInput {
            suite: &loaded,
            case_id,
            results_base,
            backend: backend_name,
        },
        &mut stdout,
    )?;
    drop(stdout);

    println!(
        "run: suite={} eval_run_id={} results={}",
        loaded.file.suite.id,
        outcome.eval_run_id,
        outcome.results_dir.display()
    );
    Ok(())
}

/// Show aggregated results for a suite.
pub fn report_suite(results_base: &Path, suite_id: &str) -> Result<()> {
    validate_id("suite", suite_id)?;
    let (summary, warnings) = aggregate(&results_base.join(suite_id))?;
    println!(
        "report: suite={} runs={} cases={}",
        suite_id, summary.runs, summary.cases
    );
    println!(
        "report: verified={} mismatch={} unverified={}",
        summary.verified, summary.mismatch, summary.unverified
    );
    if let Some(avg) = summary.avg_duration_secs {
        println!("report: avg_duration_secs={:.2}", avg);
    }
    if let Some(avg) = summary.avg_retries {
        println!("report: avg_retries={:.2}", avg);
    }
    for (case_id, (verified, total)) in summary.case_pass_rates {
        println!("report: case {} {}/{}", case_id, verified, total);
    }
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}
