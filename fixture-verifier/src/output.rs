//! Shared output formatting for verification reports.
//!
//! Provides JSON and plain-text formatters for `VerificationReport`.
//! Color/terminal formatting belongs to the CLI layer.

use std::io::Write;

use crate::report::VerificationReport;

/// Format a `VerificationReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &VerificationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `VerificationReport` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &VerificationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  FIXTURE VERIFIER")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Resources verified: {}", report.resources_verified())?;
    writeln!(writer, "  Passed:             {}", report.passed)?;
    writeln!(writer, "  Failed:             {}", report.failed)?;
    writeln!(writer)?;

    if !report.scan_errors.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  SCAN ERRORS (paths that could not be verified)")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for scan_err in &report.scan_errors {
            writeln!(writer, "{}", scan_err.format_human_readable())?;
        }
        writeln!(writer)?;
    }

    if report.failed > 0 {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  FAILURES")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for result in report.failures() {
            writeln!(writer, "{}", result.format_human_readable())?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if report.ok {
        writeln!(
            writer,
            "All {} resource(s) passed verification",
            report.resources_verified()
        )?;
    } else {
        if !report.scan_errors.is_empty() {
            writeln!(
                writer,
                "{} path(s) could not be scanned; treat this run as failed",
                report.scan_errors.len()
            )?;
        }
        if report.failed > 0 {
            writeln!(
                writer,
                "{} of {} resource(s) failed verification",
                report.failed,
                report.resources_verified()
            )?;
        }
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}
