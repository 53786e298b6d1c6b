//! Known resource names and the assertions expected of each.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::assertion::Assertion;

/// Name of the reference PDF fixture (the JUnit 5.8.2 user guide).
pub const REFERENCE_PDF: &str = "junit-user-guide-5.8.2.pdf";
pub const REFERENCE_XLSX: &str = "example.xlsx";
pub const REFERENCE_CSV: &str = "student.csv";
pub const REFERENCE_JSON: &str = "example.json";
pub const REFERENCE_ZIP: &str = "sample.zip";

/// Maps resource names to the assertions that must hold for them.
///
/// Lookup accepts either the exact name (as recorded in an archive, which may
/// include directories) or its final path component.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Expectations {
    resources: BTreeMap<String, Vec<Assertion>>,
}

impl Expectations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference fixture set: a 166-page PDF mentioning "123", a workbook
    /// whose first sheet has "Краснодарский край" at A2, a student CSV, a
    /// person JSON document and a ZIP holding only `sample.txt`.
    #[must_use]
    #[allow(clippy::non_ascii_literal)]
    pub fn reference() -> Self {
        let mut expectations = Self::new();
        expectations.insert(
            REFERENCE_PDF,
            vec![
                Assertion::PageCount(166),
                Assertion::Contains("123".to_owned()),
            ],
        );
        expectations.insert(
            REFERENCE_XLSX,
            vec![Assertion::CellContains {
                sheet: 0,
                row: 1,
                col: 0,
                text: "Краснодарский край".to_owned(),
            }],
        );
        expectations.insert(
            REFERENCE_CSV,
            vec![Assertion::ContainsRows(
                [["Name", "Surname"], ["Ivan", "Ivanov"], ["Petr", "Petrov"]]
                    .iter()
                    .map(|row| row.iter().map(|c| (*c).to_owned()).collect())
                    .collect(),
            )],
        );
        expectations.insert(
            REFERENCE_JSON,
            [
                ("firstName", "John"),
                ("lastName", "doe"),
                ("address.streetAddress", "naist street"),
            ]
            .into_iter()
            .map(|(path, text)| Assertion::FieldContains {
                path: path.to_owned(),
                text: text.to_owned(),
            })
            .collect(),
        );
        expectations.insert(
            REFERENCE_ZIP,
            vec![
                Assertion::EntryCount(1),
                Assertion::HasEntry("sample.txt".to_owned()),
            ],
        );
        expectations
    }

    /// Load a manifest of the form `{"resources": {"name": [assertion, ...]}}`.
    ///
    /// `.yaml`/`.yml` files are read with `serde-saphyr`, anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_manifest(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        };
        parsed.with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not a valid JSON manifest.
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not a valid YAML manifest.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        serde_saphyr::from_str(content).map_err(|e| anyhow::anyhow!("YAML parse error: {e}"))
    }

    pub fn insert(&mut self, name: impl Into<String>, assertions: Vec<Assertion>) {
        self.resources.insert(name.into(), assertions);
    }

    /// Add every entry of `other`, replacing assertions for names present in both.
    pub fn merge(&mut self, other: Self) {
        self.resources.extend(other.resources);
    }

    /// Assertions for `name`, matching the exact name first, then its file name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Assertion]> {
        self.resources
            .get(name)
            .or_else(|| {
                let file_name = Path::new(name).file_name()?.to_str()?;
                self.resources.get(file_name)
            })
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
