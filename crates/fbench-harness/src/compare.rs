//! Deep structural comparison with numeric tolerance.
//!
//! The comparator walks two JSON value trees in lockstep and decides whether
//! they are equal under a per-run tolerance policy:
//!
//! - numeric pairs match when `|expected - actual| <= tolerance`;
//! - sequences match pairwise, in order, at equal length;
//! - mappings match on identical key sets with matching values per key;
//! - remaining scalars (string, boolean, null) match on exact equality;
//! - any other shape pairing is a mismatch.
//!
//! The comparison is total: shape mismatches are reported as `false`, never
//! as errors. Tolerance validation happens once, at [`CompareRules`]
//! construction, so the hot path carries no fallible branches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use fbench_error::{BenchError, Result};

/// Default absolute tolerance for numeric comparison.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

// ─── Compare Rules ───────────────────────────────────────────────────────

/// Per-run comparison policy.
///
/// Carried by the run configuration and echoed into reports so a report
/// always states the tolerance it was produced under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompareRules {
    /// Absolute tolerance applied when both sides are numeric.
    pub tolerance: f64,
}

impl CompareRules {
    /// Build rules with an explicit tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidTolerance`] if `tolerance` is negative,
    /// NaN, or infinite.
    pub fn new(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(BenchError::InvalidTolerance { value: tolerance });
        }
        Ok(Self { tolerance })
    }

    /// Whether `expected` and `actual` match under these rules.
    #[must_use]
    pub fn compare(&self, expected: &Value, actual: &Value) -> bool {
        compare(expected, actual, self.tolerance)
    }
}

impl Default for CompareRules {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

// ─── Structural Comparison ───────────────────────────────────────────────

/// Compare `expected` against `actual` with an absolute numeric tolerance.
///
/// Total over all value pairs: incompatible shapes (a sequence against a
/// mapping, a boolean against a number) yield `false` rather than an error.
#[must_use]
pub fn compare(expected: &Value, actual: &Value, tolerance: f64) -> bool {
    match (expected, actual) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_match(x, y, tolerance),
        (Value::Array(xs), Value::Array(ys)) => sequences_match(xs, ys, tolerance),
        (Value::Object(xs), Value::Object(ys)) => mappings_match(xs, ys, tolerance),
        _ => false,
    }
}

fn sequences_match(expected: &[Value], actual: &[Value], tolerance: f64) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| compare(e, a, tolerance))
}

fn mappings_match(
    expected: &Map<String, Value>,
    actual: &Map<String, Value>,
    tolerance: f64,
) -> bool {
    // Equal length plus every expected key present implies identical key sets.
    expected.len() == actual.len()
        && expected
            .iter()
            .all(|(key, e)| actual.get(key).is_some_and(|a| compare(e, a, tolerance)))
}

#[allow(clippy::cast_precision_loss)]
fn numbers_match(
    expected: &serde_json::Number,
    actual: &serde_json::Number,
    tolerance: f64,
) -> bool {
    // Integer pairs stay in integer arithmetic: a 64-bit value beyond 2^53
    // must not gain or lose a mismatch through the f64 round-trip.
    if let (Some(x), Some(y)) = (expected.as_i64(), actual.as_i64()) {
        return x == y || x.abs_diff(y) as f64 <= tolerance;
    }
    if let (Some(x), Some(y)) = (expected.as_u64(), actual.as_u64()) {
        return x == y || x.abs_diff(y) as f64 <= tolerance;
    }
    match (expected.as_f64(), actual.as_f64()) {
        (Some(x), Some(y)) => floats_match(x, y, tolerance),
        _ => false,
    }
}

#[allow(clippy::float_cmp)]
fn floats_match(x: f64, y: f64, tolerance: f64) -> bool {
    if x == y {
        return true;
    }
    (x - y).abs() <= tolerance
}
