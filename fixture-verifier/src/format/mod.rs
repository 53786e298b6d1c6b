//! Format classification and decoder dispatch.
//!
//! Each sub-module wraps one third-party decoder:
//! - `text` - UTF-8 text
//! - `pdf` - page count and per-page text via `lopdf`
//! - `spreadsheet` - XLSX/XLS cell grids via `calamine`
//! - `csv` - headerless row lists via the `csv` crate
//! - `json` - object graphs via `serde_json` or `serde-saphyr`
//! - `archive` - ZIP central directory via `zip`

pub mod archive;
pub mod csv;
pub mod json;
pub mod pdf;
pub mod spreadsheet;
pub mod text;

use std::fmt;

use serde::Serialize;

use crate::config::VerifyConfig;
use crate::error::VerifyError;

pub use archive::{ArchiveEntry, ArchiveIndex};
pub use pdf::PdfContent;
pub use spreadsheet::{Sheet, Workbook};

/// The closed set of recognized content formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Text,
    Pdf,
    Spreadsheet,
    Csv,
    Json,
    Archive,
}

impl FormatKind {
    /// All kinds, in classification-table order.
    pub const ALL: [Self; 6] = [
        Self::Text,
        Self::Pdf,
        Self::Spreadsheet,
        Self::Csv,
        Self::Json,
        Self::Archive,
    ];

    /// Lowercase label used in messages and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Spreadsheet => "spreadsheet",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension table. Matching is case-sensitive and exact.
const EXTENSIONS: &[(&str, FormatKind)] = &[
    ("txt", FormatKind::Text),
    ("pdf", FormatKind::Pdf),
    ("xlsx", FormatKind::Spreadsheet),
    ("xls", FormatKind::Spreadsheet),
    ("csv", FormatKind::Csv),
    ("json", FormatKind::Json),
    ("zip", FormatKind::Archive),
];

/// Determine the format of a resource from its name.
///
/// Only the last path component is inspected, so archive entry names such as
/// `docs/guide.pdf` classify by their own suffix. A bare `.pdf` is a PDF; a
/// name ending in a separator has no file component and is unknown.
///
/// # Errors
///
/// Returns [`VerifyError::UnknownFormat`] if the name has no recognized extension.
pub fn classify(name: &str) -> Result<FormatKind, VerifyError> {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    file_name
        .rsplit_once('.')
        .and_then(|(_, ext)| {
            EXTENSIONS
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, kind)| *kind)
        })
        .ok_or_else(|| VerifyError::UnknownFormat {
            resource: name.to_owned(),
        })
}

/// Decoded, format-specific content of a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Pdf(PdfContent),
    Spreadsheet(Workbook),
    Csv(Vec<Vec<String>>),
    Json(serde_json::Value),
    Archive(ArchiveIndex),
}

impl Content {
    /// The format this content was decoded as.
    #[must_use]
    pub fn kind(&self) -> FormatKind {
        match self {
            Self::Text(_) => FormatKind::Text,
            Self::Pdf(_) => FormatKind::Pdf,
            Self::Spreadsheet(_) => FormatKind::Spreadsheet,
            Self::Csv(_) => FormatKind::Csv,
            Self::Json(_) => FormatKind::Json,
            Self::Archive(_) => FormatKind::Archive,
        }
    }

    /// Whether any textual part of the content contains `needle`.
    ///
    /// Text and PDF content is searched as a whole; tabular content cell by
    /// cell; JSON string values (not keys); archives by entry name.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        match self {
            Self::Text(text) => text.contains(needle),
            Self::Pdf(pdf) => pdf.contains(needle),
            Self::Spreadsheet(workbook) => workbook
                .sheets
                .iter()
                .flat_map(|sheet| sheet.rows.iter().flatten())
                .any(|cell| cell.contains(needle)),
            Self::Csv(rows) => rows.iter().flatten().any(|cell| cell.contains(needle)),
            Self::Json(value) => json::any_string_contains(value, needle),
            Self::Archive(index) => index.entries.iter().any(|e| e.name.contains(needle)),
        }
    }
}

/// Decode raw bytes as `kind`.
///
/// This is the kind-to-decoder lookup; adding a [`FormatKind`] without a
/// decoder fails to compile.
///
/// # Errors
///
/// Returns [`VerifyError::Decode`] carrying `resource` and the decoder's message.
pub fn decode_bytes(
    bytes: &[u8],
    kind: FormatKind,
    resource: &str,
    config: &VerifyConfig,
) -> Result<Content, VerifyError> {
    tracing::debug!(resource, %kind, len = bytes.len(), "decoding");
    let content = match kind {
        FormatKind::Text => Content::Text(text::decode_text(bytes, resource)?),
        FormatKind::Pdf => Content::Pdf(pdf::decode_pdf(bytes, resource)?),
        FormatKind::Spreadsheet => {
            Content::Spreadsheet(spreadsheet::decode_spreadsheet(bytes, resource)?)
        }
        FormatKind::Csv => Content::Csv(csv::decode_csv(bytes, resource)?),
        FormatKind::Json => Content::Json(json::decode_json(bytes, config.json_decoder, resource)?),
        FormatKind::Archive => Content::Archive(archive::scan_archive(resource, bytes)?),
    };
    Ok(content)
}
