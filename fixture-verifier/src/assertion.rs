//! Content assertions and their evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::VerifyError;
use crate::format::json::{display_value, lookup};
use crate::format::{Content, FormatKind};

/// Longest excerpt of actual content quoted in a failure.
const EXCERPT_LEN: usize = 80;

/// A pure predicate over decoded content.
///
/// Serialized externally tagged, so manifests read naturally:
/// `{"page_count": 166}`, `{"contains": "123"}`,
/// `{"field_contains": {"path": "address.streetAddress", "text": "naist street"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assertion {
    /// Substring containment in any textual part of the content.
    Contains(String),
    /// Exact PDF page count.
    PageCount(usize),
    /// Cell at an absolute zero-based position contains `text`.
    CellContains {
        #[serde(default)]
        sheet: usize,
        row: usize,
        col: usize,
        text: String,
    },
    /// Every listed row appears somewhere in the CSV, in any order.
    ContainsRows(Vec<Vec<String>>),
    /// JSON value at a dotted path contains `text`.
    FieldContains { path: String, text: String },
    /// JSON value at a dotted path equals `value` exactly.
    FieldEquals { path: String, value: Value },
    /// Archive has an entry with this exact name.
    HasEntry(String),
    /// Archive has exactly this many file entries (directories excluded).
    EntryCount(usize),
}

/// The first assertion that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Zero-based index into the assertion list.
    pub index: usize,
    pub expected: String,
    pub actual: String,
}

impl Failure {
    /// One-line human-readable reason.
    #[must_use]
    pub fn reason(&self) -> String {
        format!(
            "assertion #{}: expected {}, got {}",
            self.index, self.expected, self.actual
        )
    }
}

/// Outcome of evaluating an assertion list against content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(Failure),
}

impl Verdict {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Convert to a `Result`, attaching the resource name to a failure.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::AssertionFailed`] for [`Verdict::Fail`].
    pub fn into_result(self, resource: &str) -> Result<(), VerifyError> {
        match self {
            Self::Pass => Ok(()),
            Self::Fail(failure) => Err(VerifyError::AssertionFailed {
                resource: resource.to_owned(),
                index: failure.index,
                expected: failure.expected,
                actual: failure.actual,
            }),
        }
    }
}

/// Evaluate assertions in order, stopping at the first failure.
#[must_use]
pub fn evaluate_all(assertions: &[Assertion], content: &Content) -> Verdict {
    for (index, assertion) in assertions.iter().enumerate() {
        if let Err((expected, actual)) = assertion.evaluate(content) {
            return Verdict::Fail(Failure {
                index,
                expected,
                actual,
            });
        }
    }
    Verdict::Pass
}

impl Assertion {
    /// Evaluate against decoded content.
    ///
    /// # Errors
    ///
    /// Returns `(expected, actual)` descriptions when the predicate does not
    /// hold, including when it does not apply to the content's format.
    pub fn evaluate(&self, content: &Content) -> Result<(), (String, String)> {
        match (self, content) {
            (Self::Contains(needle), _) => {
                if content.contains_text(needle) {
                    Ok(())
                } else {
                    Err((
                        format!("{} content containing \"{needle}\"", content.kind()),
                        describe(content),
                    ))
                }
            }
            (Self::PageCount(expected), Content::Pdf(pdf)) => {
                if pdf.page_count == *expected {
                    Ok(())
                } else {
                    Err((
                        format!("{expected} pages"),
                        format!("{} pages", pdf.page_count),
                    ))
                }
            }
            (
                Self::CellContains {
                    sheet,
                    row,
                    col,
                    text,
                },
                Content::Spreadsheet(workbook),
            ) => {
                let expected = format!("cell [{sheet}]({row},{col}) containing \"{text}\"");
                match workbook.cell(*sheet, *row, *col) {
                    Some(cell) if cell.contains(text.as_str()) => Ok(()),
                    Some(cell) => Err((expected, quoted(excerpt(cell)))),
                    None => Err((expected, "no such cell".to_owned())),
                }
            }
            (Self::ContainsRows(expected_rows), Content::Csv(rows)) => {
                match expected_rows.iter().find(|expected| !rows.contains(expected)) {
                    None => Ok(()),
                    Some(missing) => Err((
                        format!("row [{}]", missing.join(",")),
                        format!("{} rows without it", rows.len()),
                    )),
                }
            }
            (Self::FieldContains { path, text }, Content::Json(value)) => {
                let expected = format!("field \"{path}\" containing \"{text}\"");
                match lookup(value, path) {
                    Some(found) => {
                        let rendered = display_value(found);
                        if rendered.contains(text.as_str()) {
                            Ok(())
                        } else {
                            Err((expected, quoted(excerpt(&rendered))))
                        }
                    }
                    None => Err((expected, "missing field".to_owned())),
                }
            }
            (Self::FieldEquals { path, value: want }, Content::Json(value)) => {
                let expected = format!("field \"{path}\" equal to {want}");
                match lookup(value, path) {
                    Some(found) if found == want => Ok(()),
                    Some(found) => Err((expected, excerpt(&found.to_string()).to_owned())),
                    None => Err((expected, "missing field".to_owned())),
                }
            }
            (Self::HasEntry(name), Content::Archive(index)) => {
                if index.get(name).is_some() {
                    Ok(())
                } else {
                    let names: Vec<&str> = index.entries.iter().map(|e| e.name.as_str()).collect();
                    Err((
                        format!("entry \"{name}\""),
                        format!("entries [{}]", names.join(", ")),
                    ))
                }
            }
            (Self::EntryCount(expected), Content::Archive(index)) => {
                let count = index.files().count();
                if count == *expected {
                    Ok(())
                } else {
                    Err((format!("{expected} entries"), format!("{count} entries")))
                }
            }
            (other, _) => Err((
                format!("{other} on {} content", other.applies_to()),
                format!("{} content", content.kind()),
            )),
        }
    }

    /// The format this assertion inspects; `None` for format-agnostic ones.
    #[must_use]
    pub fn target_kind(&self) -> Option<FormatKind> {
        match self {
            Self::Contains(_) => None,
            Self::PageCount(_) => Some(FormatKind::Pdf),
            Self::CellContains { .. } => Some(FormatKind::Spreadsheet),
            Self::ContainsRows(_) => Some(FormatKind::Csv),
            Self::FieldContains { .. } | Self::FieldEquals { .. } => Some(FormatKind::Json),
            Self::HasEntry(_) | Self::EntryCount(_) => Some(FormatKind::Archive),
        }
    }

    fn applies_to(&self) -> &'static str {
        self.target_kind().map_or("any", FormatKind::as_str)
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(text) => write!(f, "contains \"{text}\""),
            Self::PageCount(n) => write!(f, "page_count == {n}"),
            Self::CellContains {
                sheet,
                row,
                col,
                text,
            } => write!(f, "cell [{sheet}]({row},{col}) contains \"{text}\""),
            Self::ContainsRows(rows) => {
                let rows: Vec<String> = rows.iter().map(|row| row.join(",")).collect();
                write!(f, "contains rows [{}]", rows.join("; "))
            }
            Self::FieldContains { path, text } => write!(f, "{path} contains \"{text}\""),
            Self::FieldEquals { path, value } => write!(f, "{path} == {value}"),
            Self::HasEntry(name) => write!(f, "has entry \"{name}\""),
            Self::EntryCount(n) => write!(f, "entry_count == {n}"),
        }
    }
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(EXCERPT_LEN) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn quoted(text: &str) -> String {
    format!("\"{text}\"")
}

fn describe(content: &Content) -> String {
    match content {
        Content::Text(text) => format!("text {}", quoted(excerpt(text))),
        Content::Pdf(pdf) => format!("{} pages without a match", pdf.page_count),
        Content::Spreadsheet(workbook) => format!("{} sheets without a match", workbook.sheets.len()),
        Content::Csv(rows) => format!("{} rows without a match", rows.len()),
        Content::Json(_) => "no matching string value".to_owned(),
        Content::Archive(index) => format!("{} entries without a match", index.len()),
    }
}
