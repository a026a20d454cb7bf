//! Suite file parsing and validation.
//!
//! Suites are TOML files listing questions and optional expected answers.
//! The default suite ships inside the binary (`eval/suites/default.toml`).

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const DEFAULT_SUITE: &str = include_str!("../suites/default.toml");

/// A parsed suite file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SuiteFile {
    pub suite: SuiteMeta,
    #[serde(default)]
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SuiteMeta {
    /// Unique identifier (slug format: `[a-z0-9_-]+`); names the results directory.
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One question to solve.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Case {
    pub id: String,
    pub question: String,
    /// Text that must appear in the answer for the case to count as verified.
    #[serde(default)]
    pub expect: Option<String>,
}

/// A suite together with the exact source text it was parsed from.
#[derive(Debug, Clone)]
pub struct LoadedSuite {
    pub file: SuiteFile,
    pub source: String,
}

impl SuiteFile {
    pub fn load(path: &Path) -> Result<LoadedSuite> {
        let source =
            fs::read_to_string(path).with_context(|| format!("read suite {}", path.display()))?;
        let file =
            Self::parse_str(&source).with_context(|| format!("load suite {}", path.display()))?;
        Ok(LoadedSuite { file, source })
    }

    pub fn parse_str(contents: &str) -> Result<Self> {
        let suite: SuiteFile = toml::from_str(contents).context("parse suite")?;
        suite.validate()?;
        Ok(suite)
    }

    /// Look up a case by id.
    pub fn case(&self, id: &str) -> Option<&Case> {
        self.cases.iter().find(|case| case.id == id)
    }

    fn validate(&self) -> Result<()> {
        validate_id("suite.id", &self.suite.id)?;
        if self.cases.is_empty() {
            bail!("cases must be a non-empty array");
        }
        let mut seen = BTreeSet::new();
        for (index, case) in self.cases.iter().enumerate() {
            validate_id("cases.id", &case.id).with_context(|| format!("cases[{index}] invalid"))?;
            if case.question.trim().is_empty() {
                bail!("cases[{index}].question must be non-empty");
            }
            if let Some(expect) = &case.expect
                && expect.trim().is_empty()
            {
                bail!("cases[{index}].expect must be non-empty when set");
            }
            if !seen.insert(case.id.as_str()) {
                bail!("duplicate case id {}", case.id);
            }
        }
        Ok(())
    }
}

/// The bundled suite, or the file at `path` when given.
pub fn resolve_suite(path: Option<&Path>) -> Result<LoadedSuite> {
    match path {
        Some(path) => SuiteFile::load(path),
        None => Ok(LoadedSuite {
            file: SuiteFile::parse_str(DEFAULT_SUITE).context("bundled default suite")?,
            source: DEFAULT_SUITE.to_string(),
        }),
    }
}

/// Ids become directory and file names.
pub fn validate_id(field: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("{field} must be non-empty");
    }
    if id.contains("..") {
        bail!("{field} must not contain '..'");
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
    {
        bail!("{field} must use [a-z0-9_-] only");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_suite() {
        let input = r#"
[suite]
id = "smoke"

[[cases]]
id = "add"
question = "What is 2 + 2?"
expect = "4"

[[cases]]
id = "open-ended"
question = "Who runs the slowest?"
"#;
        let suite = SuiteFile::parse_str(input).expect("suite parses");
        assert_eq!(suite.suite.id, "smoke");
        assert_eq!(suite.cases.len(), 2);
        assert_eq!(suite.case("add").and_then(|c| c.expect.as_deref()), Some("4"));
        assert_eq!(suite.case("open-ended").and_then(|c| c.expect.as_deref()), None);
    }

    #[test]
    fn bundled_suite_has_eight_cases() {
        let loaded = resolve_suite(None).expect("default suite");
        assert_eq!(loaded.file.suite.id, "default");
        assert_eq!(loaded.file.cases.len(), 8);
        let train = loaded.file.case("train-duration").expect("train case");
        assert!(train.question.contains("14:30"));
        assert_eq!(train.expect.as_deref(), Some("3 hours 35 minutes"));
    }

    #[test]
    fn rejects_invalid_id() {
        let input = r#"
[suite]
id = "bad/id"

[[cases]]
id = "a"
question = "q"
"#;
        let err = SuiteFile::parse_str(input).expect_err("invalid id");
        assert!(err.to_string().contains("suite.id"));
    }

    #[test]
    fn rejects_duplicate_cases() {
        let input = r#"
[suite]
id = "smoke"

[[cases]]
id = "a"
question = "q1"

[[cases]]
id = "a"
question = "q2"
"#;
        let err = SuiteFile::parse_str(input).expect_err("duplicate");
        assert!(err.to_string().contains("duplicate case id a"));
    }

    #[test]
    fn rejects_blank_question() {
        let input = r#"
[suite]
id = "smoke"

[[cases]]
id = "a"
question = "   "
"#;
        let _err = SuiteFile::parse_str(input).expect_err("blank question");
    }

    #[test]
    fn load_keeps_source_text() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("smoke.toml");
        let contents = "[suite]\nid = \"smoke\"\n\n[[cases]]\nid = \"a\"\nquestion = \"q\"\n";
        fs::write(&path, contents).expect("write");

        let loaded = SuiteFile::load(&path).expect("load");

        assert_eq!(loaded.source, contents);
        assert_eq!(loaded.file.cases[0].id, "a");
    }
}
