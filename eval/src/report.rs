use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::outcome::Outcome;
use crate::results::read_meta;

#[derive(Debug, Default, PartialEq)]
pub struct ReportSummary {
    pub runs: usize,
    pub cases: usize,
    pub verified: usize,
    pub mismatch: usize,
    pub unverified: usize,
    pub avg_duration_secs: Option<f64>,
    pub avg_retries: Option<f64>,
    /// Per case id: (verified, total).
    pub case_pass_rates: BTreeMap<String, (usize, usize)>,
}

pub fn load_run_dirs(suite_results_dir: &Path) -> Result<Vec<PathBuf>> {
    if !suite_results_dir.exists() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(suite_results_dir)
        .with_context(|| format!("read {}", suite_results_dir.display()))?
    {
        let entry = entry.context("read entry")?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Aggregate every stored run of a suite; unreadable runs become warnings.
pub fn aggregate(suite_results_dir: &Path) -> Result<(ReportSummary, Vec<String>)> {
    let mut summary = ReportSummary::default();
    let mut warnings = Vec::new();
    let mut total_duration = 0.0;
    let mut total_retries = 0u64;

    for run_dir in load_run_dirs(suite_results_dir)? {
        let meta = match read_meta(&run_dir) {
            Ok(meta) => meta,
            Err(err) => {
                warnings.push(format!(
                    "skip {}: meta.json invalid ({err:#})",
                    run_dir.display()
                ));
                continue;
            }
        };

        summary.runs += 1;
        for case in &meta.cases {
            summary.cases += 1;
            match case.outcome {
                Outcome::Verified => summary.verified += 1,
                Outcome::Mismatch => summary.mismatch += 1,
                Outcome::Unverified => summary.unverified += 1,
            }
            total_duration += case.duration_secs;
            total_retries += u64::from(case.retries);

            let entry = summary
                .case_pass_rates
                .entry(case.case_id.clone())
                .or_insert((0, 0));
            if case.outcome == Outcome::Verified {
                entry.0 += 1;
            }
            entry.1 += 1;
        }
    }

    if summary.cases > 0 {
        let cases = summary.cases as f64;
        summary.avg_duration_secs = Some(total_duration / cases);
        summary.avg_retries = Some(total_retries as f64 / cases);
    }
    Ok((summary, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{CaseRecord, EvalMeta, write_meta};
    use tempfile::tempdir;

    fn record(case_id: &str, outcome: Outcome, retries: u32, duration: f64) -> CaseRecord {
        CaseRecord {
            case_id: case_id.to_string(),
            outcome,
            retries,
            duration_secs: duration,
            answer: "a".to_string(),
            expect: None,
        }
    }

    fn write_run(base: &Path, run_id: &str, cases: Vec<CaseRecord>) {
        let meta = EvalMeta {
            suite_id: "default".to_string(),
            eval_run_id: run_id.to_string(),
            suite_hash: "hash".to_string(),
            model: "m".to_string(),
            backend: "ollama".to_string(),
            max_retries: 2,
            start_time: "now".to_string(),
            end_time: "later".to_string(),
            duration_secs: 0.0,
            cases,
        };
        write_meta(&base.join(run_id), &meta).expect("write meta");
    }

    #[test]
    fn aggregates_outcomes_and_averages() {
        let temp = tempdir().expect("tempdir");
        write_run(
            temp.path(),
            "run-1",
            vec![
                record("apples", Outcome::Verified, 0, 2.0),
                record("train", Outcome::Unverified, 2, 6.0),
            ],
        );
        write_run(
            temp.path(),
            "run-2",
            vec![
                record("apples", Outcome::Verified, 0, 1.0),
                record("train", Outcome::Mismatch, 1, 3.0),
            ],
        );

        let (summary, warnings) = aggregate(temp.path()).expect("aggregate");

        assert!(warnings.is_empty());
        assert_eq!(summary.runs, 2);
        assert_eq!(summary.cases, 4);
        assert_eq!(summary.verified, 2);
        assert_eq!(summary.mismatch, 1);
        assert_eq!(summary.unverified, 1);
        assert_eq!(summary.avg_duration_secs, Some(3.0));
        assert_eq!(summary.avg_retries, Some(0.75));
        assert_eq!(summary.case_pass_rates.get("apples"), Some(&(2, 2)));
        assert_eq!(summary.case_pass_rates.get("train"), Some(&(0, 2)));
    }

    #[test]
    fn invalid_meta_is_skipped_with_warning() {
        let temp = tempdir().expect("tempdir");
        write_run(temp.path(), "run-1", vec![record("apples", Outcome::Verified, 0, 1.0)]);
        let broken = temp.path().join("run-2");
        fs::create_dir_all(&broken).expect("dir");
        fs::write(broken.join("meta.json"), "{not json").expect("write");

        let (summary, warnings) = aggregate(temp.path()).expect("aggregate");

        assert_eq!(summary.runs, 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("meta.json invalid"));
    }

    #[test]
    fn missing_directory_is_empty_report() {
        let temp = tempdir().expect("tempdir");
        let (summary, warnings) = aggregate(&temp.path().join("nope")).expect("aggregate");
        assert_eq!(summary, ReportSummary::default());
        assert!(warnings.is_empty());
    }
}
