use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for frankenbench operations.
///
/// Structured variants for the fatal conditions a harness run can hit:
/// fixture loading, comparison-rule construction, and report artifact
/// writing. Subject faults are never represented here — a function under
/// test that errors or panics becomes report data, not a `BenchError`.
#[derive(Error, Debug)]
pub enum BenchError {
    // === Fixture Loading Errors ===
    /// Fixture file not found.
    #[error("fixture file not found: '{path}'")]
    FixtureNotFound { path: PathBuf },

    /// Fixture file exists but could not be read.
    #[error("failed to read fixture file '{path}': {source}")]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fixture document is not valid JSON, or not an array of
    /// `{inputs, expected}` records.
    #[error("invalid fixture document '{origin}': {detail}")]
    FixtureParse { origin: String, detail: String },

    /// Fixture document parsed but contains no fixtures.
    #[error("fixture document '{origin}' is empty")]
    EmptyFixtureSet { origin: String },

    // === Comparison Rule Errors ===
    /// Tolerance must be finite and non-negative.
    #[error("invalid tolerance {value}: must be finite and non-negative")]
    InvalidTolerance { value: f64 },

    // === Report Artifact Errors ===
    /// Report artifact could not be written.
    #[error("failed to write report artifact '{path}': {source}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Internal Errors ===
    /// Invariant violation inside the harness itself.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Stable result codes for CLI exit status and report fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// Successful result.
    Ok = 0,
    /// Fixture file missing or unreadable.
    FixtureUnavailable = 10,
    /// Fixture document malformed or empty.
    FixtureInvalid = 11,
    /// Comparison rules rejected at construction.
    BadRules = 20,
    /// Report artifact write failed.
    Artifact = 30,
    /// Internal logic error.
    Internal = 90,
}

impl BenchError {
    /// Map this error to its stable result code.
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::FixtureNotFound { .. } | Self::FixtureIo { .. } => ErrorCode::FixtureUnavailable,
            Self::FixtureParse { .. } | Self::EmptyFixtureSet { .. } => ErrorCode::FixtureInvalid,
            Self::InvalidTolerance { .. } => ErrorCode::BadRules,
            Self::ArtifactIo { .. } => ErrorCode::Artifact,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether this error aborts a run before any comparison executes.
    pub const fn is_load_fatal(&self) -> bool {
        matches!(
            self,
            Self::FixtureNotFound { .. }
                | Self::FixtureIo { .. }
                | Self::FixtureParse { .. }
                | Self::EmptyFixtureSet { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::FixtureNotFound { .. } => Some("Check the fixture file path"),
            Self::FixtureParse { .. } => {
                Some("Fixture documents are JSON arrays of objects with 'inputs' and 'expected'")
            }
            Self::EmptyFixtureSet { .. } => Some("Add at least one fixture record to the document"),
            Self::InvalidTolerance { .. } => {
                Some("Use a finite tolerance >= 0.0, or the default of 1e-6")
            }
            _ => None,
        }
    }

    /// Get the process exit code for this error (for CLI use).
    pub const fn exit_code(&self) -> i32 {
        self.error_code() as i32
    }

    /// Create a fixture-not-found error.
    pub fn fixture_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FixtureNotFound { path: path.into() }
    }

    /// Create a fixture read error.
    pub fn fixture_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FixtureIo {
            path: path.into(),
            source,
        }
    }

    /// Create a fixture parse error.
    pub fn fixture_parse(origin: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::FixtureParse {
            origin: origin.into(),
            detail: detail.into(),
        }
    }

    /// Create an empty-fixture-set error.
    pub fn empty_fixture_set(origin: impl Into<String>) -> Self {
        Self::EmptyFixtureSet {
            origin: origin.into(),
        }
    }

    /// Create an artifact write error.
    pub fn artifact_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ArtifactIo {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using `BenchError`.
pub type Result<T> = std::result::Result<T, BenchError>;
