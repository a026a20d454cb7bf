//! Suite execution.
//!
//! Solves each selected case in order, echoes the run result, classifies it
//! against the case expectation, and persists everything under the results
//! directory.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use reasoner::io::completion::Completer;
use reasoner::solve::Orchestrator;
use tracing::{debug, info, instrument};

use crate::outcome::{Outcome, classify_outcome};
use crate::results::{
    CaseRecord, EvalMeta, new_eval_run_id, results_dir, sha256_hex, write_case_result, write_meta,
};
use crate::suite::{Case, LoadedSuite};

/// What a suite run needs besides the orchestrator.
#[derive(Debug)]
pub struct SuiteRunInput<'a> {
    pub suite: &'a LoadedSuite,
    /// Restrict the run to one case id.
    pub case_id: Option<&'a str>,
    pub results_base: &'a Path,
    /// Backend label recorded in `meta.json`.
    pub backend: &'a str,
}

/// Result of running a suite.
#[derive(Debug)]
pub struct SuiteRunOutcome {
    pub eval_run_id: String,
    pub results_dir: PathBuf,
    pub meta: EvalMeta,
}

#[instrument(skip_all, fields(suite_id = %input.suite.file.suite.id))]
pub fn run_suite<C: Completer>(
    orchestrator: &Orchestrator<C>,
    input: &SuiteRunInput<'_>,
    out: &mut impl Write,
) -> Result<SuiteRunOutcome> {
    let cases = select_cases(input.suite, input.case_id)?;
    let suite_id = &input.suite.file.suite.id;
    let eval_run_id = new_eval_run_id();
    let dir = results_dir(input.results_base, suite_id, &eval_run_id);
    info!(cases = cases.len(), eval_run_id = %eval_run_id, "suite run started");

    let started_at = Utc::now();
    let mut records = Vec::with_capacity(cases.len());
    for case in cases {
        debug!(case_id = %case.id, "solving case");
        writeln!(out, "\nProcessing: {}", case.question).context("write output")?;

        let clock = Instant::now();
        let result = orchestrator.solve(&case.question);
        let duration_secs = clock.elapsed().as_secs_f64();

        let outcome = classify_outcome(&result, case.expect.as_deref());
        let payload = serde_json::to_string_pretty(&result).context("serialize run result")?;
        writeln!(out, "{payload}").context("write output")?;
        let verdict = if outcome == Outcome::Verified {
            "PASSED"
        } else {
            "FAILED"
        };
        writeln!(out, "{verdict} ({})", outcome_label(outcome)).context("write output")?;

        write_case_result(&dir, &case.id, &result)
            .with_context(|| format!("persist case {}", case.id))?;
        info!(case_id = %case.id, outcome = ?outcome, retries = result.metadata.retries, "case finished");
        records.push(CaseRecord {
            case_id: case.id.clone(),
            outcome,
            retries: result.metadata.retries,
            duration_secs,
            answer: result.answer,
            expect: case.expect.clone(),
        });
    }
    let finished_at = Utc::now();

    let meta = EvalMeta {
        suite_id: suite_id.clone(),
        eval_run_id: eval_run_id.clone(),
        suite_hash: sha256_hex(input.suite.source.as_bytes()),
        model: orchestrator.model().to_string(),
        backend: input.backend.to_string(),
        max_retries: orchestrator.max_retries(),
        start_time: started_at.to_rfc3339(),
        end_time: finished_at.to_rfc3339(),
        duration_secs: (finished_at - started_at).num_milliseconds() as f64 / 1000.0,
        cases: records,
    };
    write_meta(&dir, &meta).context("write meta")?;
    info!(results_dir = %dir.display(), "suite run complete");

    Ok(SuiteRunOutcome {
        eval_run_id,
        results_dir: dir,
        meta,
    })
}

fn select_cases<'a>(suite: &'a LoadedSuite, case_id: Option<&str>) -> Result<Vec<&'a Case>> {
    match case_id {
        None => Ok(suite.file.cases.iter().collect()),
        Some(id) => match suite.file.case(id) {
            Some(case) => Ok(vec![case]),
            None => bail!("case {} not found in suite {}", id, suite.file.suite.id),
        },
    }
}

pub fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Verified => "verified",
        Outcome::Mismatch => "mismatch",
        Outcome::Unverified => "unverified",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::read_meta;
    use crate::suite::SuiteFile;
    use reasoner::core::types::RunResult;
    use reasoner::test_support::{Arithmetic, SimulatedModel};

    const SUITE: &str = r#"
[suite]
id = "clock"

[[cases]]
id = "train"
question = "If a train leaves at 14:30 and arrives at 18:05, how long is the journey?"
expect = "3 hours 35 minutes"

[[cases]]
id = "bus"
question = "A bus leaves at 09:50 and arrives at 11:10. How long is the ride?"
expect = "2 hours"
"#;

    fn loaded() -> LoadedSuite {
        LoadedSuite {
            file: SuiteFile::parse_str(SUITE).expect("suite"),
            source: SUITE.to_string(),
        }
    }

    #[test]
    fn runs_every_case_and_persists_results() {
        let temp = tempfile::tempdir().expect("tempdir");
        let suite = loaded();
        let orchestrator =
            Orchestrator::new(SimulatedModel::new(Arithmetic::FollowInstructions), "sim");
        let mut out = Vec::new();

        let outcome = run_suite(
            &orchestrator,
            &SuiteRunInput {
                suite: &suite,
                case_id: None,
                results_base: temp.path(),
                backend: "simulated",
            },
            &mut out,
        )
        .expect("run");

        let printed = String::from_utf8(out).expect("utf8");
        assert!(printed.contains("Processing: If a train leaves at 14:30"));
        assert!(printed.contains("PASSED (verified)"));
        assert!(printed.contains("FAILED (mismatch)"));

        let meta = read_meta(&outcome.results_dir).expect("meta");
        assert_eq!(meta, outcome.meta);
        assert_eq!(meta.suite_hash, sha256_hex(SUITE.as_bytes()));
        assert_eq!(meta.model, "sim");
        let outcomes: Vec<Outcome> = meta.cases.iter().map(|c| c.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::Verified, Outcome::Mismatch]);
        assert_eq!(meta.cases[1].answer, "1 hours 20 minutes");

        let stored: RunResult = serde_json::from_str(
            &std::fs::read_to_string(outcome.results_dir.join("train.json")).expect("read"),
        )
        .expect("parse");
        assert_eq!(stored.answer, "3 hours 35 minutes");
    }

    #[test]
    fn single_case_filter() {
        let temp = tempfile::tempdir().expect("tempdir");
        let suite = loaded();
        let orchestrator = Orchestrator::new(SimulatedModel::new(Arithmetic::NaiveHours), "sim")
            .with_max_retries(0);
        let mut out = Vec::new();

        let outcome = run_suite(
            &orchestrator,
            &SuiteRunInput {
                suite: &suite,
                case_id: Some("train"),
                results_base: temp.path(),
                backend: "simulated",
            },
            &mut out,
        )
        .expect("run");

        assert_eq!(outcome.meta.cases.len(), 1);
        assert_eq!(outcome.meta.cases[0].outcome, Outcome::Unverified);
        assert!(!outcome.results_dir.join("bus.json").exists());
    }

    #[test]
    fn unknown_case_is_an_error() {
        let suite = loaded();
        let err = select_cases(&suite, Some("plane")).expect_err("missing case");
        assert!(err.to_string().contains("case plane not found in suite clock"));
    }
}
