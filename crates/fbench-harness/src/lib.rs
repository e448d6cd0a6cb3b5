//! Fixture-driven equality test harness.
//!
//! `fbench-harness` validates an arbitrary function under test against an
//! ordered table of `{inputs, expected}` fixtures loaded from JSON. Three
//! pieces cooperate:
//!
//! - [mod@compare]: deep structural comparison over JSON values with an
//!   absolute numeric tolerance (default `1e-6`);
//! - [`fixture`]: the fixture model and the fail-fast document loader;
//! - [`runner`]: the sequential driver that invokes the subject per
//!   fixture, captures faults, and accumulates a full [`runner::TestReport`].
//!
//! Supporting modules: [`artifact`] persists reports as `report.json` plus
//! a rendered `summary.md`; [`catalog`] ships built-in fixture suites and
//! reference subjects for demos and self-tests.
//!
//! # Example
//!
//! ```
//! use fbench_harness::{run_with_defaults, FixtureSet};
//! use serde_json::{json, Map, Value};
//!
//! let document = r#"[
//!     { "inputs": { "a": 3, "b": 5 }, "expected": 8 },
//!     { "inputs": { "a": 2, "b": 2 }, "expected": 4 }
//! ]"#;
//! let fixtures = FixtureSet::parse("demo", document)?;
//!
//! let add = |inputs: &Map<String, Value>| -> Result<Value, String> {
//!     let a = inputs.get("a").and_then(Value::as_i64).ok_or("missing 'a'")?;
//!     let b = inputs.get("b").and_then(Value::as_i64).ok_or("missing 'b'")?;
//!     Ok(json!(a + b))
//! };
//!
//! let report = run_with_defaults(&fixtures, &add);
//! assert!(report.all_passed());
//! # Ok::<(), fbench_error::BenchError>(())
//! ```

pub mod artifact;
pub mod catalog;
pub mod compare;
pub mod fixture;
pub mod runner;

pub use artifact::{write_report, ReportArtifacts, REPORT_FILE, SUMMARY_FILE};
pub use compare::{compare, CompareRules, DEFAULT_TOLERANCE};
pub use fixture::{Fixture, FixtureSet};
pub use runner::{
    run, run_with_defaults, ActualOutcome, CaseResult, CaseStatus, Outcome, RunConfig, Subject,
    TestReport, TEST_REPORT_SCHEMA_VERSION,
};
