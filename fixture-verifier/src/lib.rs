//! # fixture-verifier
//!
//! Format-dispatching verification of test fixtures.
//!
//! A resource (file, in-memory buffer, bundled fixture or ZIP entry) is
//! classified by its name into a [`FormatKind`], decoded with a third-party
//! decoder into [`Content`], and checked against a list of [`Assertion`]s.
//! Archive entries go through exactly the same path as standalone files.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use fixture_verifier::{verify_fs, Expectations, FsSourceConfig, VerifyConfig};
//!
//! let mut fs_config = FsSourceConfig::default();
//! fs_config.paths = vec![PathBuf::from("src/test/resources")];
//!
//! let report = verify_fs(&fs_config, &VerifyConfig::default(), &Expectations::reference()).unwrap();
//! println!("Passed: {}", report.passed);
//! println!("Failed: {}", report.failed);
//! println!("OK: {}", report.ok);
//! ```

mod assertion;
mod config;
mod error;
mod expectations;
pub mod format;
pub mod output;
mod report;
mod resource;
mod strategy;
mod verifier;

pub use assertion::{Assertion, Failure, Verdict, evaluate_all};
pub use config::{FsSourceConfig, JsonDecoder, VerifyConfig};
pub use error::{FailureKind, ScanError, VerifyError};
pub use expectations::{
    Expectations, REFERENCE_CSV, REFERENCE_JSON, REFERENCE_PDF, REFERENCE_XLSX, REFERENCE_ZIP,
};
pub use format::archive::scan_archive;
pub use format::json::decode_json_as;
pub use format::{ArchiveEntry, ArchiveIndex, Content, FormatKind, classify};
pub use report::{Outcome, VerificationReport, VerificationResult};
pub use resource::{ByteSource, FixtureRoot, Resource};
pub use verifier::{decode, verify, verify_archive, verify_resource};

use strategy::fs::find_files;
use verifier::ArchiveWalk;

/// Verify fixture files on disk against `expectations`.
///
/// Every discovered file whose name has expectations is verified; archives
/// are also opened and their entries verified the same way. With
/// `fs_config.verify_unlisted`, other files with a recognized extension are
/// decoded with no assertions.
///
/// # Errors
///
/// Returns an error if `fs_config.paths` is empty or if any provided path does not exist.
/// Returns `Ok` with no results if paths exist but contain no matching files.
/// Per-resource failures (unreadable files, decode errors, failed assertions)
/// are reported in `report.results` and never silently discarded.
pub fn verify_fs(
    fs_config: &FsSourceConfig,
    verify_config: &VerifyConfig,
    expectations: &Expectations,
) -> anyhow::Result<VerificationReport> {
    if fs_config.paths.is_empty() {
        anyhow::bail!("No paths provided for verification");
    }

    for path in &fs_config.paths {
        if !path.exists() {
            anyhow::bail!("Path does not exist: {}", path.display());
        }
    }

    let (files, mut scan_errors) = find_files(fs_config);
    tracing::info!(files = files.len(), "discovered fixture files");

    let walk = ArchiveWalk {
        expectations,
        config: verify_config,
        include_unlisted: fs_config.verify_unlisted,
    };

    let mut results = Vec::new();
    for (visited, file_path) in files.iter().enumerate() {
        if visited >= fs_config.max_files {
            scan_errors.push(ScanError {
                file: file_path.clone(),
                kind: FailureKind::LimitExceeded,
                message: format!(
                    "Run aborted: max_files limit ({}) reached; remaining files not verified",
                    fs_config.max_files
                ),
            });
            break;
        }
        walk.resource(&Resource::file(file_path), 0, &mut results);
    }

    Ok(VerificationReport::from_results(results, scan_errors))
}
