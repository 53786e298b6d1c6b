//! Named byte sources: files, in-memory buffers, bundled fixtures and archive entries.

use std::borrow::Cow;
use std::path::PathBuf;

use crate::error::VerifyError;
use crate::format::archive::read_entry;
use crate::strategy::fs::read_file_bounded;

/// Where a resource's bytes come from.
#[derive(Debug, Clone)]
pub enum ByteSource<'a> {
    /// A file on disk, opened only when read.
    File(PathBuf),
    /// Bytes already in memory.
    Memory(Cow<'a, [u8]>),
    /// A named entry inside a ZIP archive held in memory.
    ArchiveEntry {
        archive_name: String,
        archive: &'a [u8],
        entry: String,
    },
}

/// A named, read-only source of bytes to be decoded and checked.
#[derive(Debug, Clone)]
pub struct Resource<'a> {
    /// Logical name; its extension decides the format.
    pub name: String,
    pub source: ByteSource<'a>,
}

impl Resource<'static> {
    /// A file on disk, named by its final path component.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.file_name().map_or_else(
            || path.to_string_lossy().into_owned(),
            |n| n.to_string_lossy().into_owned(),
        );
        Self {
            name,
            source: ByteSource::File(path),
        }
    }
}

impl<'a> Resource<'a> {
    /// A resource backed by in-memory bytes (owned or borrowed).
    #[must_use]
    pub fn memory(name: impl Into<String>, bytes: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            name: name.into(),
            source: ByteSource::Memory(bytes.into()),
        }
    }

    /// An entry of the ZIP archive `archive`, named by its recorded entry name.
    #[must_use]
    pub fn archive_entry(
        archive_name: impl Into<String>,
        archive: &'a [u8],
        entry: impl Into<String>,
    ) -> Self {
        let entry = entry.into();
        Self {
            name: entry.clone(),
            source: ByteSource::ArchiveEntry {
                archive_name: archive_name.into(),
                archive,
                entry,
            },
        }
    }

    /// Human-readable location: a path, `memory`, or `archive.zip!entry`.
    #[must_use]
    pub fn location(&self) -> String {
        match &self.source {
            ByteSource::File(path) => path.display().to_string(),
            ByteSource::Memory(_) => format!("memory:{}", self.name),
            ByteSource::ArchiveEntry {
                archive_name,
                entry,
                ..
            } => format!("{archive_name}!{entry}"),
        }
    }

    /// Acquire the resource's bytes, reading at most `max_size`.
    ///
    /// Files and archive entries are opened here and closed before returning.
    ///
    /// # Errors
    ///
    /// - [`VerifyError::ResourceNotFound`] if the file or entry is absent
    /// - [`VerifyError::ResourceTooLarge`] if the resource exceeds `max_size`
    /// - [`VerifyError::Io`] / [`VerifyError::Decode`] if reading fails
    pub fn read(&self, max_size: u64) -> Result<Cow<'_, [u8]>, VerifyError> {
        match &self.source {
            ByteSource::File(path) => read_file_bounded(path, &self.name, max_size).map(Cow::Owned),
            ByteSource::Memory(bytes) => {
                if bytes.len() as u64 > max_size {
                    return Err(VerifyError::ResourceTooLarge {
                        resource: self.name.clone(),
                        limit: max_size,
                    });
                }
                Ok(Cow::Borrowed(bytes.as_ref()))
            }
            ByteSource::ArchiveEntry {
                archive_name,
                archive,
                entry,
            } => read_entry(archive_name, archive, entry, &self.name, max_size).map(Cow::Owned),
        }
    }
}

/// A directory of bundled fixtures, addressed by relative path
/// (`pdf/guide.pdf`, `csv/student.csv`), like a classpath resource root.
#[derive(Debug, Clone)]
pub struct FixtureRoot {
    root: PathBuf,
}

impl FixtureRoot {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a bundled fixture.
    ///
    /// The resolved file must exist and stay inside the root.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::ResourceNotFound`] if the fixture is missing or
    /// resolves outside the root.
    pub fn resource(&self, relative: &str) -> Result<Resource<'static>, VerifyError> {
        let path = self.root.join(relative);
        let not_found = || VerifyError::ResourceNotFound {
            resource: relative.to_owned(),
            location: path.display().to_string(),
        };

        let (Ok(canonical_root), Ok(canonical_path)) =
            (self.root.canonicalize(), path.canonicalize())
        else {
            return Err(not_found());
        };
        if !canonical_path.starts_with(&canonical_root) || !canonical_path.is_file() {
            return Err(not_found());
        }
        Ok(Resource::file(path))
    }
}
