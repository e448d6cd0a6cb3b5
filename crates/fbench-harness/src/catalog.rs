//! Built-in deterministic fixture sets and reference subjects.
//!
//! The catalog provides small in-code fixture sets exercising the harness
//! end to end without touching the filesystem: an integer-addition suite,
//! a string-uppercase suite, and a mixed-shape suite covering tolerance,
//! sequence ordering, and key-set sensitivity. Construction is pure and
//! stable: building the same suite twice yields identical fixtures and an
//! identical content hash.
//!
//! The matching reference subjects ([`addition_subject`],
//! [`uppercase_subject`], [`echo_subject`]) double as documented examples
//! of the subject contract: typed argument extraction with a fault message
//! on missing or mistyped arguments.

use serde_json::{json, Map, Value};

use crate::fixture::{Fixture, FixtureSet};

/// Origin label for [`addition_fixtures`].
pub const ADDITION_SUITE: &str = "builtin/addition";
/// Origin label for [`uppercase_fixtures`].
pub const UPPERCASE_SUITE: &str = "builtin/uppercase";
/// Origin label for [`shape_fixtures`].
pub const SHAPES_SUITE: &str = "builtin/shapes";

// ─── Fixture Suites ──────────────────────────────────────────────────────

/// Fixtures for a two-argument integer addition subject.
#[must_use]
pub fn addition_fixtures() -> FixtureSet {
    FixtureSet::from_fixtures(
        ADDITION_SUITE,
        vec![
            Fixture::new(args(&[("a", json!(3)), ("b", json!(5))]), json!(8)),
            Fixture::new(args(&[("a", json!(-2)), ("b", json!(2))]), json!(0)),
            Fixture::new(args(&[("a", json!(0)), ("b", json!(0))]), json!(0)),
            Fixture::new(
                args(&[("a", json!(1_000_000)), ("b", json!(2_000_000))]),
                json!(3_000_000),
            ),
        ],
    )
}

/// Fixtures for a string-uppercasing subject.
#[must_use]
pub fn uppercase_fixtures() -> FixtureSet {
    FixtureSet::from_fixtures(
        UPPERCASE_SUITE,
        vec![
            Fixture::new(args(&[("s", json!("abc"))]), json!("ABC")),
            Fixture::new(args(&[("s", json!("MiXeD case"))]), json!("MIXED CASE")),
            Fixture::new(args(&[("s", json!(""))]), json!("")),
            Fixture::new(args(&[("s", json!("already UP"))]), json!("ALREADY UP")),
        ],
    )
}

/// Mixed-shape fixtures for an echoing subject.
///
/// Expected values are the `value` argument itself, with one near-miss
/// float that only passes under the default tolerance. Runs against
/// [`echo_subject`] demonstrate recursion through containers.
#[must_use]
pub fn shape_fixtures() -> FixtureSet {
    FixtureSet::from_fixtures(
        SHAPES_SUITE,
        vec![
            Fixture::new(args(&[("value", json!([1, 2, 3]))]), json!([1, 2, 3])),
            Fixture::new(
                args(&[("value", json!({"a": 1, "b": [true, null]}))]),
                json!({"a": 1, "b": [true, null]}),
            ),
            // Differs from the echoed value by 4e-7, inside the default
            // tolerance of 1e-6.
            Fixture::new(args(&[("value", json!(0.100_000_4))]), json!(0.1)),
            Fixture::new(args(&[("value", json!(null))]), json!(null)),
            Fixture::new(
                args(&[("value", json!({"nested": {"deep": [[0.5]]}}))]),
                json!({"nested": {"deep": [[0.5]]}}),
            ),
        ],
    )
}

// ─── Reference Subjects ──────────────────────────────────────────────────

/// Reference subject computing `a + b` over integer arguments.
///
/// Faults on a missing or non-integer argument and on overflow.
pub fn addition_subject(inputs: &Map<String, Value>) -> Result<Value, String> {
    let a = integer_arg(inputs, "a")?;
    let b = integer_arg(inputs, "b")?;
    let sum = a
        .checked_add(b)
        .ok_or_else(|| format!("integer overflow: {a} + {b}"))?;
    Ok(json!(sum))
}

/// Reference subject uppercasing the `s` argument.
pub fn uppercase_subject(inputs: &Map<String, Value>) -> Result<Value, String> {
    let s = string_arg(inputs, "s")?;
    Ok(json!(s.to_uppercase()))
}

/// Reference subject returning the `value` argument unchanged.
pub fn echo_subject(inputs: &Map<String, Value>) -> Result<Value, String> {
    inputs
        .get("value")
        .cloned()
        .ok_or_else(|| missing_arg("value"))
}

fn integer_arg(inputs: &Map<String, Value>, name: &str) -> Result<i64, String> {
    inputs
        .get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| missing_arg(name))
}

fn string_arg<'a>(inputs: &'a Map<String, Value>, name: &str) -> Result<&'a str, String> {
    inputs
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| missing_arg(name))
}

fn missing_arg(name: &str) -> String {
    format!("missing or mistyped argument '{name}'")
}

fn args(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::runner::run_with_defaults;

    use super::*;

    #[test]
    fn catalog_construction_is_deterministic() {
        assert_eq!(addition_fixtures(), addition_fixtures());
        assert_eq!(uppercase_fixtures(), uppercase_fixtures());
        assert_eq!(shape_fixtures(), shape_fixtures());
        assert_eq!(
            addition_fixtures().content_hash(),
            addition_fixtures().content_hash()
        );
    }

    #[test]
    fn suites_have_distinct_hashes_and_origins() {
        let addition = addition_fixtures();
        let uppercase = uppercase_fixtures();
        assert_ne!(addition.content_hash(), uppercase.content_hash());
        assert_eq!(addition.origin(), ADDITION_SUITE);
        assert_eq!(uppercase.origin(), UPPERCASE_SUITE);
        assert_eq!(shape_fixtures().origin(), SHAPES_SUITE);
    }

    #[test]
    fn addition_suite_passes_against_addition_subject() {
        let report = run_with_defaults(&addition_fixtures(), &addition_subject);
        assert!(report.all_passed(), "failures: {:?}", report.first_failure_index);
        assert_eq!(report.total, 4);
    }

    #[test]
    fn uppercase_suite_passes_against_uppercase_subject() {
        let report = run_with_defaults(&uppercase_fixtures(), &uppercase_subject);
        assert!(report.all_passed());
    }

    #[test]
    fn shape_suite_passes_against_echo_subject() {
        let report = run_with_defaults(&shape_fixtures(), &echo_subject);
        assert!(report.all_passed(), "shape suite must pass under default tolerance");
    }

    #[test]
    fn addition_subject_faults_on_missing_argument() {
        let inputs = args(&[("a", json!(1))]);
        let err = addition_subject(&inputs).expect_err("missing 'b' must fault");
        assert_eq!(err, "missing or mistyped argument 'b'");
    }

    #[test]
    fn addition_subject_faults_on_overflow() {
        let inputs = args(&[("a", json!(i64::MAX)), ("b", json!(1))]);
        let err = addition_subject(&inputs).expect_err("overflow must fault");
        assert!(err.contains("integer overflow"), "got: {err}");
    }
}
