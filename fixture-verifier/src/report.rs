//! Verification report types.

use serde::Serialize;

use crate::assertion::Verdict;
use crate::error::{FailureKind, ScanError, VerifyError};
use crate::format::FormatKind;

/// What happened to one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed {
        kind: FailureKind,
        /// Index of the failing assertion, for assertion failures.
        #[serde(skip_serializing_if = "Option::is_none")]
        assertion: Option<usize>,
        message: String,
    },
}

impl Outcome {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of verifying a single resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct VerificationResult {
    /// Logical resource name.
    pub resource: String,
    /// Where the bytes came from (`path`, `archive.zip!entry`, `memory:name`).
    pub location: String,
    /// Classified format; `None` when classification itself failed.
    pub kind: Option<FormatKind>,
    /// Number of assertions that were to be evaluated.
    pub assertions: usize,
    pub outcome: Outcome,
}

impl VerificationResult {
    /// Record the verdict (or error) of verifying one resource.
    #[must_use]
    pub fn new(
        resource: &str,
        location: String,
        kind: Option<FormatKind>,
        assertions: usize,
        verdict: Result<Verdict, VerifyError>,
    ) -> Self {
        let outcome = match verdict.and_then(|v| v.into_result(resource)) {
            Ok(()) => Outcome::Passed,
            Err(err) => Outcome::Failed {
                kind: err.kind(),
                assertion: match &err {
                    VerifyError::AssertionFailed { index, .. } => Some(*index),
                    _ => None,
                },
                message: err.to_string(),
            },
        };
        Self {
            resource: resource.to_owned(),
            location,
            kind,
            assertions,
            outcome,
        }
    }

    /// Format the result for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        let kind = self.kind.map_or("?", FormatKind::as_str);
        match &self.outcome {
            Outcome::Passed => format!(
                "PASS {} [{kind}] ({} assertion(s))",
                self.location, self.assertions
            ),
            Outcome::Failed { message, .. } => {
                format!("FAIL {} [{kind}]: {message}", self.location)
            }
        }
    }
}

/// Result of a verification run.
///
/// Callers must check both `results` and `scan_errors`. A non-empty
/// `scan_errors` means some paths never reached verification.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct VerificationReport {
    /// Number of resources that passed.
    pub passed: usize,
    /// Number of resources that failed to read, decode, or assert.
    pub failed: usize,
    /// Whether every resource passed AND no scan errors occurred.
    pub ok: bool,
    /// Per-resource results, in discovery order.
    pub results: Vec<VerificationResult>,
    /// Discovery-level errors: paths that could not be walked.
    pub scan_errors: Vec<ScanError>,
}

impl VerificationReport {
    /// Assemble a report, computing counts and the `ok` flag.
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>, scan_errors: Vec<ScanError>) -> Self {
        let passed = results.iter().filter(|r| r.outcome.is_pass()).count();
        let failed = results.len() - passed;
        Self {
            passed,
            failed,
            ok: failed == 0 && scan_errors.is_empty(),
            results,
            scan_errors,
        }
    }

    /// Total number of resources verified (passed + failed).
    #[must_use]
    pub fn resources_verified(&self) -> usize {
        self.passed + self.failed
    }

    /// Results that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &VerificationResult> {
        self.results.iter().filter(|r| !r.outcome.is_pass())
    }
}
