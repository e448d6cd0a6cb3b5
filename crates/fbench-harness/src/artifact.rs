//! Report artifact capture.
//!
//! A run directory holds two files per report: the machine-readable
//! `report.json` (pretty-printed, schema-versioned) and the rendered
//! `summary.md` for humans. The directory is created on demand; write
//! failures surface as [`BenchError::ArtifactIo`] with the offending path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use fbench_error::{BenchError, Result};

use crate::runner::TestReport;

/// File name for the serialized report.
pub const REPORT_FILE: &str = "report.json";
/// File name for the rendered summary.
pub const SUMMARY_FILE: &str = "summary.md";

/// Paths produced by [`write_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    /// Location of `report.json`.
    pub report_path: PathBuf,
    /// Location of `summary.md`.
    pub summary_path: PathBuf,
}

/// Write `report.json` and `summary.md` for `report` under `dir`.
///
/// Creates `dir` (and parents) if needed.
///
/// # Errors
///
/// Returns [`BenchError::ArtifactIo`] if the directory or either file
/// cannot be written, and [`BenchError::Internal`] if the report fails to
/// serialize.
pub fn write_report(dir: impl AsRef<Path>, report: &TestReport) -> Result<ReportArtifacts> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|error| BenchError::artifact_io(dir, error))?;

    let json = serde_json::to_string_pretty(report)
        .map_err(|error| BenchError::internal(format!("report serialization failed: {error}")))?;
    let report_path = dir.join(REPORT_FILE);
    fs::write(&report_path, json).map_err(|error| BenchError::artifact_io(&report_path, error))?;

    let summary_path = dir.join(SUMMARY_FILE);
    fs::write(&summary_path, report.render_markdown())
        .map_err(|error| BenchError::artifact_io(&summary_path, error))?;

    info!(
        dir = %dir.display(),
        suite = %report.suite,
        outcome = %report.outcome,
        "report artifacts written"
    );
    Ok(ReportArtifacts {
        report_path,
        summary_path,
    })
}

#[cfg(test)]
mod tests {
    use crate::fixture::FixtureSet;
    use crate::runner::{run_with_defaults, TestReport};

    use super::*;

    fn sample_report() -> TestReport {
        let set = FixtureSet::parse(
            "sample.json",
            r#"[ { "inputs": { "x": 1 }, "expected": 1 } ]"#,
        )
        .expect("document should parse");
        let echo = |inputs: &serde_json::Map<String, serde_json::Value>| {
            inputs.get("x").cloned().ok_or_else(|| "missing 'x'".to_owned())
        };
        run_with_defaults(&set, &echo)
    }

    #[test]
    fn write_report_produces_both_files() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let target = dir.path().join("run-001");
        let report = sample_report();
        let artifacts = write_report(&target, &report).expect("artifacts should write");

        assert_eq!(artifacts.report_path, target.join(REPORT_FILE));
        assert_eq!(artifacts.summary_path, target.join(SUMMARY_FILE));

        let json = std::fs::read_to_string(&artifacts.report_path).expect("report readable");
        let decoded: TestReport = serde_json::from_str(&json).expect("report should parse");
        assert_eq!(decoded, report);

        let summary = std::fs::read_to_string(&artifacts.summary_path).expect("summary readable");
        assert!(summary.contains("# Fixture Run Report"), "got:\n{summary}");
        assert!(summary.contains("- outcome: `PASS`"), "got:\n{summary}");
    }

    #[test]
    fn write_report_creates_nested_directories() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let target = dir.path().join("deep").join("run").join("dir");
        write_report(&target, &sample_report()).expect("nested dirs should be created");
        assert!(target.join(REPORT_FILE).exists());
    }

    #[test]
    fn write_report_into_unwritable_dir_fails_with_path() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "occupied").expect("blocker file should write");
        // A file where the run directory should go makes create_dir_all fail.
        let err = write_report(&blocker, &sample_report()).expect_err("write must fail");
        assert!(matches!(err, BenchError::ArtifactIo { .. }));
        assert!(err.to_string().contains("file"), "got: {err}");
    }
}
