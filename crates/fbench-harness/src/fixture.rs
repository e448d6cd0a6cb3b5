//! Fixture model and JSON loader.
//!
//! A fixture document is an ordered JSON array of records, each pairing a
//! named-argument mapping with the output the subject is expected to
//! produce:
//!
//! ```text
//! [
//!   { "inputs": { "a": 3, "b": 5 }, "expected": 8 },
//!   { "inputs": { "a": -2, "b": 2 }, "expected": 0 }
//! ]
//! ```
//!
//! Capitalized field spellings (`Inputs`/`Expected`) are accepted as
//! aliases; unknown extra fields are ignored. Fixture sets are immutable
//! once loaded and carry a SHA-256 content hash over their canonical
//! serialized form, so two documents that differ only in whitespace or
//! field order share an identity.
//!
//! # Errors
//!
//! Loading fails fast: a missing, unreadable, or malformed document is
//! fatal before any comparison executes. The parser is constructed per
//! call; there is no shared parser state.

use std::fs;
use std::io;
use std::path::Path;
use std::slice;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use fbench_error::{BenchError, Result};

// ─── Fixture ─────────────────────────────────────────────────────────────

/// One recorded (inputs, expected-output) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// Parameter name to argument value.
    #[serde(alias = "Inputs")]
    pub inputs: Map<String, Value>,
    /// The output the subject must produce for these inputs.
    #[serde(alias = "Expected")]
    pub expected: Value,
}

impl Fixture {
    /// Build a fixture from an argument mapping and an expected value.
    #[must_use]
    pub fn new(inputs: Map<String, Value>, expected: Value) -> Self {
        Self { inputs, expected }
    }
}

// ─── Fixture Set ─────────────────────────────────────────────────────────

/// Ordered, immutable collection of fixtures for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureSet {
    origin: String,
    content_hash: String,
    fixtures: Vec<Fixture>,
}

impl FixtureSet {
    /// Load a fixture document from disk.
    ///
    /// # Errors
    ///
    /// - [`BenchError::FixtureNotFound`] if `path` does not exist.
    /// - [`BenchError::FixtureIo`] if the file exists but cannot be read.
    /// - [`BenchError::FixtureParse`] if the contents are not a JSON array
    ///   of `{inputs, expected}` records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(BenchError::fixture_not_found(path));
            }
            Err(error) => return Err(BenchError::fixture_io(path, error)),
        };
        let set = Self::parse(path.display().to_string(), &text)?;
        debug!(
            origin = %set.origin,
            fixtures = set.len(),
            content_hash = %set.content_hash,
            "fixture document loaded"
        );
        Ok(set)
    }

    /// Parse a fixture document from an in-memory JSON string.
    ///
    /// `origin` labels the document in errors, logs, and reports; for
    /// documents loaded from disk it is the file path.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::FixtureParse`] if `text` is not a JSON array
    /// of `{inputs, expected}` records.
    pub fn parse(origin: impl Into<String>, text: &str) -> Result<Self> {
        let origin = origin.into();
        let fixtures: Vec<Fixture> = serde_json::from_str(text)
            .map_err(|error| BenchError::fixture_parse(&origin, error.to_string()))?;
        Ok(Self::from_fixtures(origin, fixtures))
    }

    /// Build a fixture set directly from in-memory fixtures.
    #[must_use]
    pub fn from_fixtures(origin: impl Into<String>, fixtures: Vec<Fixture>) -> Self {
        let content_hash = canonical_hash(&fixtures);
        Self {
            origin: origin.into(),
            content_hash,
            fixtures,
        }
    }

    /// Label identifying where this set came from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// SHA-256 over the canonical serialized fixtures.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Number of fixtures in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    /// Whether the set holds no fixtures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Fixture at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Fixture> {
        self.fixtures.get(index)
    }

    /// Iterate over fixtures in document order.
    pub fn iter(&self) -> slice::Iter<'_, Fixture> {
        self.fixtures.iter()
    }

    /// Fail if the set is empty.
    ///
    /// The loader accepts an empty array (a vacuously passing run); callers
    /// that consider an empty document an authoring mistake, such as the
    /// lint tool, enforce this separately.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::EmptyFixtureSet`] when no fixtures are present.
    pub fn require_non_empty(&self) -> Result<()> {
        if self.fixtures.is_empty() {
            return Err(BenchError::empty_fixture_set(&self.origin));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FixtureSet {
    type Item = &'a Fixture;
    type IntoIter = slice::Iter<'a, Fixture>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Serialization can only fail for non-string map keys, which the fixture
// types rule out; an empty hash is the fallback rather than a panic.
fn canonical_hash(fixtures: &[Fixture]) -> String {
    serde_json::to_string(fixtures).map_or_else(
        |_| String::new(),
        |canonical| {
            let mut hasher = Sha256::new();
            hasher.update(canonical.as_bytes());
            format!("{:x}", hasher.finalize())
        },
    )
}
