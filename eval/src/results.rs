//! Result persistence.
//!
//! Each suite run writes `results/<suite>/<eval_run_id>/` containing one
//! `<case>.json` per solved case (the full `RunResult`) and a `meta.json`
//! summarizing the run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rand::{Rng, distributions::Alphanumeric};
use reasoner::core::types::RunResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::outcome::Outcome;

/// Metadata for one suite run, persisted to `meta.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvalMeta {
    pub suite_id: String,
    pub eval_run_id: String,
    /// SHA-256 of the suite source for reproducibility tracking.
    pub suite_hash: String,
    pub model: String,
    pub backend: String,
    pub max_retries: u32,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: f64,
    pub cases: Vec<CaseRecord>,
}

/// Per-case summary inside `meta.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaseRecord {
    pub case_id: String,
    pub outcome: Outcome,
    pub retries: u32,
    pub duration_secs: f64,
    pub answer: String,
    #[serde(default)]
    pub expect: Option<String>,
}

pub fn results_dir(base_dir: &Path, suite_id: &str, eval_run_id: &str) -> PathBuf {
    base_dir.join(suite_id).join(eval_run_id)
}

/// `eval-<UTC timestamp>-<random suffix>`; sorts chronologically.
pub fn new_eval_run_id() -> String {
    format!(
        "eval-{}-{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        generate_short_id()
    )
}

fn generate_short_id() -> String {
    let mut rng = rand::thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(6)
        .collect::<String>()
        .to_lowercase()
}

pub fn sha256_hex(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    hex::encode(hasher.finalize())
}

pub fn write_case_result(dir: &Path, case_id: &str, result: &RunResult) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create results dir {}", dir.display()))?;
    let path = dir.join(format!("{case_id}.json"));
    write_json(&path, result)?;
    Ok(path)
}

pub fn write_meta(dir: &Path, meta: &EvalMeta) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create results dir {}", dir.display()))?;
    write_json(&dir.join("meta.json"), meta)
}

pub fn read_meta(dir: &Path) -> Result<EvalMeta> {
    let path = dir.join("meta.json");
    let contents =
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value).context("serialize json")?;
    fs::write(path, format!("{contents}\n")).with_context(|| format!("write {}", path.display()))
}
