//! ZIP archive indexing and entry extraction via the `zip` crate.

use std::io::{Cursor, Read};

use serde::Serialize;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::VerifyError;
use crate::format::FormatKind;

/// One entry of a ZIP central directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    /// Position in the central directory.
    pub index: usize,
    /// Entry name as recorded in the archive (may include directories).
    pub name: String,
    /// Offset of the entry's (possibly compressed) data within the archive.
    pub data_start: u64,
    /// Length of the stored data starting at `data_start`.
    pub compressed_size: u64,
    /// Uncompressed size.
    pub size: u64,
    pub is_dir: bool,
}

impl ArchiveEntry {
    /// Byte range of the stored data within the archive.
    #[must_use]
    pub fn byte_range(&self) -> std::ops::Range<u64> {
        self.data_start..self.data_start + self.compressed_size
    }
}

/// Ordered entry list of an archive, built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ArchiveIndex {
    pub entries: Vec<ArchiveEntry>,
}

impl ArchiveIndex {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by its exact recorded name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Regular file entries, in archive order.
    pub fn files(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter().filter(|e| !e.is_dir)
    }
}

fn open<'a>(
    resource: &str,
    bytes: &'a [u8],
) -> Result<ZipArchive<Cursor<&'a [u8]>>, VerifyError> {
    ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| VerifyError::decode(resource, FormatKind::Archive, e))
}

/// Walk the central directory once and record every entry in order.
///
/// Entry data is not decompressed.
///
/// # Errors
///
/// Returns a decode error if the bytes are not a readable ZIP archive.
pub fn scan_archive(resource: &str, bytes: &[u8]) -> Result<ArchiveIndex, VerifyError> {
    let mut archive = open(resource, bytes)?;
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive
            .by_index_raw(index)
            .map_err(|e| VerifyError::decode(resource, FormatKind::Archive, e))?;
        entries.push(ArchiveEntry {
            index,
            name: file.name().to_owned(),
            data_start: file.data_start(),
            compressed_size: file.compressed_size(),
            size: file.size(),
            is_dir: file.is_dir(),
        });
    }
    tracing::trace!(resource, entries = entries.len(), "archive indexed");
    Ok(ArchiveIndex { entries })
}

/// Decompress a single entry, reading at most `max_size` bytes.
///
/// `resource` names the entry for error reporting; `archive_name` is used as
/// the lookup location when the entry is absent.
///
/// # Errors
///
/// - [`VerifyError::ResourceNotFound`] if no entry has that name
/// - [`VerifyError::ResourceTooLarge`] if the entry exceeds `max_size`
/// - [`VerifyError::Decode`] for archive or decompression failures
pub fn read_entry(
    archive_name: &str,
    bytes: &[u8],
    entry: &str,
    resource: &str,
    max_size: u64,
) -> Result<Vec<u8>, VerifyError> {
    let mut archive = open(archive_name, bytes)?;
    let file = match archive.by_name(entry) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(VerifyError::ResourceNotFound {
                resource: resource.to_owned(),
                location: archive_name.to_owned(),
            });
        }
        Err(e) => return Err(VerifyError::decode(resource, FormatKind::Archive, e)),
    };

    let mut buffer = Vec::new();
    file.take(max_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| VerifyError::decode(resource, FormatKind::Archive, e))?;
    if buffer.len() as u64 > max_size {
        return Err(VerifyError::ResourceTooLarge {
            resource: resource.to_owned(),
            limit: max_size,
        });
    }
    Ok(buffer)
}

/// Build an in-memory ZIP from `(name, bytes)` pairs (test helper).
#[cfg(test)]
pub(crate) fn build_test_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            continue;
        }
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
