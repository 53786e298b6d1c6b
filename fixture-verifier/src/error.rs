//! Error types for fixture verification.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::format::FormatKind;

/// Errors raised while classifying, reading, decoding or asserting on a resource.
///
/// Every variant carries the logical resource name so callers can report
/// failures without keeping the resource around.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifyError {
    /// The resource name does not end with a recognized extension.
    #[error("{resource}: unknown format (no recognized extension)")]
    UnknownFormat {
        /// Logical resource name.
        resource: String,
    },

    /// The resource is absent from the filesystem, bundle root or archive.
    #[error("{resource}: resource not found at {location}")]
    ResourceNotFound {
        /// Logical resource name.
        resource: String,
        /// Where the lookup happened (path, bundle root or archive name).
        location: String,
    },

    /// The resource exceeded the configured size limit.
    #[error("{resource}: resource exceeds maximum size of {limit} bytes")]
    ResourceTooLarge {
        /// Logical resource name.
        resource: String,
        /// The configured limit in bytes.
        limit: u64,
    },

    /// Reading the underlying byte source failed.
    #[error("{resource}: failed to read resource: {source}")]
    Io {
        /// Logical resource name.
        resource: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The decoder for the resource's format rejected the bytes.
    #[error("{resource}: {kind} decode error: {message}")]
    Decode {
        /// Logical resource name.
        resource: String,
        /// The format the decoder was handling.
        kind: FormatKind,
        /// The decoder's own error message.
        message: String,
    },

    /// Decoded content did not satisfy an assertion.
    #[error("{resource}: assertion #{index} failed: expected {expected}, got {actual}")]
    AssertionFailed {
        /// Logical resource name.
        resource: String,
        /// Zero-based index of the failing assertion.
        index: usize,
        /// Description of what the assertion expected.
        expected: String,
        /// Description of what was found instead.
        actual: String,
    },
}

impl VerifyError {
    /// The logical name of the resource this error is about.
    #[must_use]
    pub fn resource(&self) -> &str {
        match self {
            Self::UnknownFormat { resource }
            | Self::ResourceNotFound { resource, .. }
            | Self::ResourceTooLarge { resource, .. }
            | Self::Io { resource, .. }
            | Self::Decode { resource, .. }
            | Self::AssertionFailed { resource, .. } => resource,
        }
    }

    /// Stable, serializable classification of this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnknownFormat { .. } => FailureKind::UnknownFormat,
            Self::ResourceNotFound { .. } => FailureKind::ResourceNotFound,
            Self::ResourceTooLarge { .. } => FailureKind::ResourceTooLarge,
            Self::Io { .. } => FailureKind::IoError,
            Self::Decode { .. } => FailureKind::DecodeError,
            Self::AssertionFailed { .. } => FailureKind::AssertionFailed,
        }
    }

    /// Wrap a decoder's error for `resource`.
    #[must_use]
    pub fn decode(resource: &str, kind: FormatKind, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            resource: resource.to_owned(),
            kind,
            message: err.to_string(),
        }
    }
}

/// The kind of failure recorded for a resource in a report.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum FailureKind {
    /// See [`VerifyError::UnknownFormat`].
    UnknownFormat,
    /// See [`VerifyError::ResourceNotFound`].
    ResourceNotFound,
    /// See [`VerifyError::ResourceTooLarge`].
    ResourceTooLarge,
    /// See [`VerifyError::Io`].
    IoError,
    /// See [`VerifyError::Decode`].
    DecodeError,
    /// See [`VerifyError::AssertionFailed`].
    AssertionFailed,
    /// A directory traversal error (permission denied, loop detected, etc.).
    WalkError,
    /// The resolved path is outside the scan root (symlink escape).
    OutsideRoot,
    /// An exclude glob pattern could not be parsed.
    InvalidExcludePattern,
    /// The `max_files` limit was reached, truncating the run.
    LimitExceeded,
}

/// A discovery-level error: a path that never reached verification.
///
/// Distinct from a failed [`crate::VerificationResult`], which means a
/// resource was found and then failed to decode or assert.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ScanError {
    /// The path that could not be scanned.
    pub file: PathBuf,
    /// The kind of failure.
    pub kind: FailureKind,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ScanError {
    /// Format the error for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{}: [scan error] {}", self.file.display(), self.message)
    }
}
