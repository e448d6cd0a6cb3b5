//! Sequential test driver: invoke a subject per fixture, compare, report.
//!
//! # Architecture
//!
//! ```text
//! FixtureSet → Subject::invoke → compare → CaseResult* → TestReport
//! ```
//!
//! The driver walks the fixture set strictly in order and never stops
//! early: every fixture is evaluated even after failures, so a report
//! always covers the whole set. Each case is annotated with the literal
//! inputs, expected value, and actual outcome for diagnostics.
//!
//! A subject fault, whether a returned error or a panic crossing the
//! invocation boundary, is captured as the failing case's actual outcome
//! and the run continues with the next fixture.

use std::any::Any;
use std::fmt;
use std::fmt::Write as _;
use std::panic::{self, AssertUnwindSafe};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use fbench_error::BenchError;

use crate::compare::CompareRules;
use crate::fixture::FixtureSet;

/// Current report schema version.
pub const TEST_REPORT_SCHEMA_VERSION: &str = "1.0.0";

const DEFAULT_SUITE: &str = "unnamed";

// ─── Subject ─────────────────────────────────────────────────────────────

/// A function under test.
///
/// The driver is polymorphic over any callable taking a fixture's named
/// arguments and producing a JSON value; closures of type
/// `Fn(&Map<String, Value>) -> Result<Value, String>` implement this
/// automatically. The `Err` channel carries subject faults, which the
/// driver records without aborting the run.
pub trait Subject {
    /// Invoke the subject with one fixture's inputs.
    fn invoke(&self, inputs: &Map<String, Value>) -> std::result::Result<Value, String>;
}

impl<F> Subject for F
where
    F: Fn(&Map<String, Value>) -> std::result::Result<Value, String>,
{
    fn invoke(&self, inputs: &Map<String, Value>) -> std::result::Result<Value, String> {
        self(inputs)
    }
}

// ─── Case Results ────────────────────────────────────────────────────────

/// Status of one fixture evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// The subject's output matched the expected value.
    Pass,
    /// The subject produced a value that did not match.
    Mismatch,
    /// The subject returned an error or panicked.
    Fault,
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::Fault => write!(f, "fault"),
        }
    }
}

/// What the subject produced for one fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ActualOutcome {
    /// A JSON value returned by the subject.
    Value(Value),
    /// A fault message: the subject's error string, or its panic payload
    /// prefixed with `panic: `.
    Fault(String),
}

impl fmt::Display for ActualOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Fault(message) => write!(f, "fault: {message}"),
        }
    }
}

/// Outcome of one fixture evaluation, annotated for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Position of the fixture in the set.
    pub index: usize,
    /// Pass, mismatch, or fault.
    pub status: CaseStatus,
    /// The literal inputs the subject was invoked with.
    pub inputs: Map<String, Value>,
    /// The expected value from the fixture.
    pub expected: Value,
    /// What the subject actually produced.
    pub actual: ActualOutcome,
}

impl CaseResult {
    /// Whether this case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Pass
    }
}

// ─── Test Report ─────────────────────────────────────────────────────────

/// Aggregate outcome for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every fixture passed.
    Pass,
    /// At least one fixture mismatched or faulted.
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Full record of one driver run over a fixture set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Schema version for forward compatibility.
    pub schema_version: String,
    /// Caller-chosen suite label.
    pub suite: String,
    /// Where the fixture set came from.
    pub fixture_origin: String,
    /// Content hash of the fixture set that was run.
    pub fixture_content_hash: String,
    /// Absolute numeric tolerance the comparisons used.
    pub tolerance: f64,
    /// Wall-clock timestamp of report generation (unix milliseconds).
    pub generated_unix_ms: u128,
    /// Fixtures evaluated.
    pub total: usize,
    /// Fixtures whose output matched.
    pub passed: usize,
    /// Fixtures whose output did not match.
    pub mismatched: usize,
    /// Fixtures where the subject errored or panicked.
    pub faulted: usize,
    /// Lowest failing fixture index, if any fixture failed.
    pub first_failure_index: Option<usize>,
    /// Aggregate pass/fail.
    pub outcome: Outcome,
    /// One entry per fixture, in evaluation order.
    pub cases: Vec<CaseResult>,
}

impl TestReport {
    /// Whether every fixture passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    /// Iterate over the failing cases in order.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|case| !case.passed())
    }

    /// Render a human-readable markdown summary.
    #[must_use]
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Fixture Run Report\n\n");
        let _ = writeln!(out, "- suite: `{}`", self.suite);
        let _ = writeln!(out, "- outcome: `{}`", self.outcome);
        let _ = writeln!(out, "- fixture_origin: `{}`", self.fixture_origin);
        let _ = writeln!(out, "- fixture_content_hash: `{}`", self.fixture_content_hash);
        let _ = writeln!(out, "- tolerance: `{}`", self.tolerance);
        let _ = writeln!(out, "- total: `{}`", self.total);
        let _ = writeln!(out, "- passed: `{}`", self.passed);
        let _ = writeln!(out, "- mismatched: `{}`", self.mismatched);
        let _ = writeln!(out, "- faulted: `{}`", self.faulted);
        let _ = writeln!(
            out,
            "- first_failure_index: `{}`",
            self.first_failure_index
                .map_or_else(|| "none".to_owned(), |idx| idx.to_string())
        );
        out.push('\n');

        if self.first_failure_index.is_none() {
            out.push_str("## Failures\n\nNone.\n");
        } else {
            out.push_str("## Failures\n\n");
            for case in self.failures() {
                let _ = writeln!(out, "- fixture `{}`: {}", case.index, case.status);
                let _ = writeln!(
                    out,
                    "  - inputs: `{}`",
                    Value::Object(case.inputs.clone())
                );
                let _ = writeln!(out, "  - expected: `{}`", case.expected);
                let _ = writeln!(out, "  - actual: `{}`", case.actual);
            }
        }

        out
    }
}

// ─── Run Configuration ───────────────────────────────────────────────────

/// Per-run configuration for the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Label for logs and report artifacts.
    pub suite: String,
    /// Comparison policy.
    pub rules: CompareRules,
}

impl RunConfig {
    /// Named suite with default comparison rules.
    #[must_use]
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            rules: CompareRules::default(),
        }
    }

    /// Named suite with an explicit tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidTolerance`] if `tolerance` is negative,
    /// NaN, or infinite.
    pub fn with_tolerance(
        suite: impl Into<String>,
        tolerance: f64,
    ) -> std::result::Result<Self, BenchError> {
        Ok(Self {
            suite: suite.into(),
            rules: CompareRules::new(tolerance)?,
        })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SUITE)
    }
}

// ─── Driver ──────────────────────────────────────────────────────────────

/// Evaluate every fixture in order against `subject`.
///
/// Failures never stop the run: mismatches and subject faults are recorded
/// and evaluation proceeds with the next fixture. An empty fixture set
/// yields a passing report with zero cases.
pub fn run(fixtures: &FixtureSet, subject: &impl Subject, config: &RunConfig) -> TestReport {
    let total = fixtures.len();
    let mut cases = Vec::with_capacity(total);
    let mut passed = 0_usize;
    let mut mismatched = 0_usize;
    let mut faulted = 0_usize;
    let mut first_failure_index = None;

    for (index, fixture) in fixtures.iter().enumerate() {
        let actual = invoke_subject(subject, &fixture.inputs);
        let status = match &actual {
            ActualOutcome::Value(value) if config.rules.compare(&fixture.expected, value) => {
                CaseStatus::Pass
            }
            ActualOutcome::Value(_) => CaseStatus::Mismatch,
            ActualOutcome::Fault(_) => CaseStatus::Fault,
        };
        match status {
            CaseStatus::Pass => passed += 1,
            CaseStatus::Mismatch => {
                mismatched += 1;
                first_failure_index.get_or_insert(index);
                debug!(suite = %config.suite, index, "fixture mismatch");
            }
            CaseStatus::Fault => {
                faulted += 1;
                first_failure_index.get_or_insert(index);
                debug!(suite = %config.suite, index, "subject fault");
            }
        }
        cases.push(CaseResult {
            index,
            status,
            inputs: fixture.inputs.clone(),
            expected: fixture.expected.clone(),
            actual,
        });
    }

    let outcome = if passed == total {
        Outcome::Pass
    } else {
        Outcome::Fail
    };
    info!(
        suite = %config.suite,
        outcome = %outcome,
        total,
        passed,
        mismatched,
        faulted,
        "fixture run complete"
    );

    TestReport {
        schema_version: TEST_REPORT_SCHEMA_VERSION.to_owned(),
        suite: config.suite.clone(),
        fixture_origin: fixtures.origin().to_owned(),
        fixture_content_hash: fixtures.content_hash().to_owned(),
        tolerance: config.rules.tolerance,
        generated_unix_ms: now_unix_ms(),
        total,
        passed,
        mismatched,
        faulted,
        first_failure_index,
        outcome,
        cases,
    }
}

/// Run with default configuration: unnamed suite, default tolerance.
pub fn run_with_defaults(fixtures: &FixtureSet, subject: &impl Subject) -> TestReport {
    run(fixtures, subject, &RunConfig::default())
}

fn invoke_subject(subject: &impl Subject, inputs: &Map<String, Value>) -> ActualOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| subject.invoke(inputs))) {
        Ok(Ok(value)) => ActualOutcome::Value(value),
        Ok(Err(fault)) => ActualOutcome::Fault(fault),
        Err(payload) => ActualOutcome::Fault(format!("panic: {}", panic_message(&payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_owned()
    }
}

fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::fixture::FixtureSet;

    use super::*;

    fn addition(inputs: &Map<String, Value>) -> std::result::Result<Value, String> {
        let a = inputs
            .get("a")
            .and_then(Value::as_i64)
            .ok_or("missing integer argument 'a'")?;
        let b = inputs
            .get("b")
            .and_then(Value::as_i64)
            .ok_or("missing integer argument 'b'")?;
        Ok(json!(a + b))
    }

    fn add_set() -> FixtureSet {
        FixtureSet::parse(
            "add.json",
            r#"[
                { "inputs": { "a": 3, "b": 5 }, "expected": 8 },
                { "inputs": { "a": -2, "b": 2 }, "expected": 0 },
                { "inputs": { "a": 1, "b": 1 }, "expected": 3 }
            ]"#,
        )
        .expect("document should parse")
    }

    #[test]
    fn mismatches_do_not_stop_the_run() {
        let report = run_with_defaults(&add_set(), &addition);
        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 2);
        assert_eq!(report.mismatched, 1);
        assert_eq!(report.faulted, 0);
        assert_eq!(report.first_failure_index, Some(2));
        assert_eq!(report.outcome, Outcome::Fail);
        assert_eq!(report.cases.len(), 3);
        assert!(report.cases[0].passed());
        assert!(report.cases[1].passed());
        assert_eq!(report.cases[2].status, CaseStatus::Mismatch);
        assert_eq!(report.cases[2].actual, ActualOutcome::Value(json!(2)));
    }

    #[test]
    fn cases_carry_literal_inputs_and_expected() {
        let report = run_with_defaults(&add_set(), &addition);
        let first = &report.cases[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.inputs.get("a"), Some(&json!(3)));
        assert_eq!(first.inputs.get("b"), Some(&json!(5)));
        assert_eq!(first.expected, json!(8));
    }

    #[test]
    fn subject_error_is_recorded_and_run_continues() {
        let set = FixtureSet::parse(
            "faulty.json",
            r#"[
                { "inputs": { "a": 1, "b": 1 }, "expected": 2 },
                { "inputs": { "b": 1 }, "expected": 1 },
                { "inputs": { "a": 2, "b": 2 }, "expected": 4 }
            ]"#,
        )
        .expect("document should parse");
        let report = run_with_defaults(&set, &addition);
        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 2);
        assert_eq!(report.faulted, 1);
        assert_eq!(report.first_failure_index, Some(1));
        assert_eq!(
            report.cases[1].actual,
            ActualOutcome::Fault("missing integer argument 'a'".to_owned())
        );
        assert!(report.cases[2].passed(), "run must continue past the fault");
    }

    #[test]
    fn subject_panic_is_captured_as_fault() {
        let set = FixtureSet::parse(
            "panics.json",
            r#"[
                { "inputs": {}, "expected": 1 },
                { "inputs": { "a": 1, "b": 0 }, "expected": 1 }
            ]"#,
        )
        .expect("document should parse");
        let subject = |inputs: &Map<String, Value>| -> std::result::Result<Value, String> {
            if inputs.is_empty() {
                panic!("no arguments supplied");
            }
            Ok(json!(1))
        };
        let report = run_with_defaults(&set, &subject);
        assert_eq!(report.faulted, 1);
        assert_eq!(report.passed, 1);
        let ActualOutcome::Fault(message) = &report.cases[0].actual else {
            panic!("expected fault outcome, got {:?}", report.cases[0].actual);
        };
        assert_eq!(message, "panic: no arguments supplied");
        assert!(report.cases[1].passed(), "run must continue past the panic");
    }

    #[test]
    fn empty_set_passes_vacuously() {
        let set = FixtureSet::parse("empty.json", "[]").expect("parse");
        let report = run_with_defaults(&set, &addition);
        assert_eq!(report.total, 0);
        assert!(report.all_passed());
        assert!(report.cases.is_empty());
        assert_eq!(report.first_failure_index, None);
    }

    #[test]
    fn run_config_tolerance_flows_into_comparison() {
        let set = FixtureSet::parse(
            "floats.json",
            r#"[ { "inputs": { "x": 1.0 }, "expected": 1.05 } ]"#,
        )
        .expect("parse");
        let echo = |inputs: &Map<String, Value>| -> std::result::Result<Value, String> {
            inputs.get("x").cloned().ok_or_else(|| "missing 'x'".to_owned())
        };

        let loose = RunConfig::with_tolerance("loose", 0.1).expect("valid tolerance");
        assert!(run(&set, &echo, &loose).all_passed());

        let strict = RunConfig::with_tolerance("strict", 1e-6).expect("valid tolerance");
        assert!(!run(&set, &echo, &strict).all_passed());
    }

    #[test]
    fn report_echoes_run_metadata() {
        let set = add_set();
        let config = RunConfig::new("addition");
        let report = run(&set, &addition, &config);
        assert_eq!(report.schema_version, TEST_REPORT_SCHEMA_VERSION);
        assert_eq!(report.suite, "addition");
        assert_eq!(report.fixture_origin, "add.json");
        assert_eq!(report.fixture_content_hash, set.content_hash());
        assert!((report.tolerance - 1e-6).abs() < f64::EPSILON);
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = run_with_defaults(&add_set(), &addition);
        let encoded = serde_json::to_string(&report).expect("report should serialize");
        let decoded: TestReport = serde_json::from_str(&encoded).expect("report should parse");
        assert_eq!(decoded, report);
    }

    #[test]
    fn markdown_summary_lists_failures() {
        let report = run_with_defaults(&add_set(), &addition);
        let summary = report.render_markdown();
        assert!(summary.contains("- outcome: `FAIL`"), "got:\n{summary}");
        assert!(summary.contains("- fixture `2`: mismatch"), "got:\n{summary}");
        assert!(summary.contains("  - expected: `3`"), "got:\n{summary}");
        assert!(summary.contains("  - actual: `2`"), "got:\n{summary}");
    }

    #[test]
    fn markdown_summary_for_clean_run_has_no_failures() {
        let set = FixtureSet::parse(
            "clean.json",
            r#"[ { "inputs": { "a": 1, "b": 1 }, "expected": 2 } ]"#,
        )
        .expect("parse");
        let summary = run_with_defaults(&set, &addition).render_markdown();
        assert!(summary.contains("- outcome: `PASS`"), "got:\n{summary}");
        assert!(summary.contains("## Failures\n\nNone."), "got:\n{summary}");
    }

    #[test]
    fn outcome_display_matches_report_vocabulary() {
        assert_eq!(Outcome::Pass.to_string(), "PASS");
        assert_eq!(Outcome::Fail.to_string(), "FAIL");
        assert_eq!(CaseStatus::Mismatch.to_string(), "mismatch");
        assert_eq!(CaseStatus::Fault.to_string(), "fault");
        assert_eq!(
            ActualOutcome::Fault("boom".to_owned()).to_string(),
            "fault: boom"
        );
        assert_eq!(ActualOutcome::Value(json!([1, 2])).to_string(), "[1,2]");
    }
}
