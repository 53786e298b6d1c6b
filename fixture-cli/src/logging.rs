use std::io::IsTerminal;

use colored::{ColoredString, Colorize};
use fixture_verifier::{FormatKind, Outcome, VerificationResult};
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows the number of `-v` flags.
pub fn init(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Only colorize stdout when it is a terminal.
pub fn configure_colors() {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

fn status_label(outcome: &Outcome) -> ColoredString {
    match outcome {
        Outcome::Passed => "PASS".green().bold(),
        Outcome::Failed { .. } => "FAIL".red().bold(),
    }
}

/// One result line: colored status, location, kind and detail.
#[must_use]
pub fn format_result(result: &VerificationResult) -> String {
    let kind = result.kind.map_or("?", FormatKind::as_str);
    let detail = match &result.outcome {
        Outcome::Passed => format!("{} assertion(s)", result.assertions).as_str().dimmed(),
        Outcome::Failed { message, .. } => message.as_str().yellow(),
    };
    format!(
        "{} {} [{}] {}",
        status_label(&result.outcome),
        result.location.cyan(),
        kind,
        detail
    )
}
