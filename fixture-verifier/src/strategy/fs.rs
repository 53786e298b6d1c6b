//! Filesystem fixture source.
//!
//! Discovers fixture files on disk and reads them safely for verification.
//! Properties enforced here:
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Resolved paths are checked to remain within the scan root
//! - Device files, pipes, and sockets are skipped
//! - Maximum directory depth is enforced to prevent infinite recursion
//! - Bounded streaming reads prevent TOCTOU and memory `DoS`

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::config::FsSourceConfig;
use crate::error::{FailureKind, ScanError, VerifyError};
use crate::format::classify;

/// Directories to skip
pub const SKIP_DIRS: &[&str] = &["target", "node_modules", ".git", ".idea", ".gradle"];

/// Check if a path matches any of the exclude patterns
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    for pattern in exclude_patterns {
        if pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
        {
            return true;
        }
    }
    false
}

/// Check if a directory entry is a skip directory (for `WalkDir::filter_entry`).
/// Returns `true` if the entry should be **included** (i.e., is NOT a skip dir).
fn is_not_skip_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_dir()
        && let Some(name) = entry.file_name().to_str()
    {
        return !SKIP_DIRS.contains(&name);
    }
    true
}

/// Check if the file name has an extension `classify` recognizes.
fn matches_file_pattern(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| classify(name).is_ok())
}

/// Find all fixture files in the given paths.
///
/// Returns `(files, scan_errors)`:
/// - `files`: sorted, deduplicated paths with a recognized extension.
/// - `scan_errors`: walk errors (permission denied, loop, etc.) and boundary violations.
///   These are never silently discarded.
pub fn find_files(config: &FsSourceConfig) -> (Vec<PathBuf>, Vec<ScanError>) {
    let mut files = Vec::new();
    let mut scan_errors = Vec::new();

    let mut exclude_patterns = Vec::with_capacity(config.exclude.len());
    for pat_str in &config.exclude {
        match Pattern::new(pat_str) {
            Ok(pat) => exclude_patterns.push(pat),
            Err(e) => {
                scan_errors.push(ScanError {
                    file: PathBuf::from(pat_str),
                    kind: FailureKind::InvalidExcludePattern,
                    message: format!("Invalid exclude glob pattern '{pat_str}': {e}"),
                });
            }
        }
    }

    for root in &config.paths {
        if root.is_file() {
            if matches_file_pattern(root) && !matches_exclude(root, &exclude_patterns) {
                files.push(root.clone());
            }
            continue;
        }

        if !root.is_dir() {
            continue;
        }

        // Canonicalize the root once so we can enforce the boundary for every entry.
        let canonical_root = match root.canonicalize() {
            Ok(r) => r,
            Err(e) => {
                scan_errors.push(ScanError {
                    file: root.clone(),
                    kind: FailureKind::IoError,
                    message: format!("Failed to canonicalize root path: {e}"),
                });
                continue;
            }
        };

        for entry_result in WalkDir::new(root)
            .follow_links(config.follow_links)
            .max_depth(config.max_depth)
            .into_iter()
            .filter_entry(is_not_skip_dir)
        {
            let entry = match entry_result {
                Ok(e) => e,
                Err(walk_err) => {
                    let path = walk_err
                        .path()
                        .map_or_else(|| root.clone(), Path::to_path_buf);
                    tracing::warn!(path = %path.display(), "directory traversal error: {walk_err}");
                    scan_errors.push(ScanError {
                        file: path,
                        kind: FailureKind::WalkError,
                        message: format!("Directory traversal error: {walk_err}"),
                    });
                    continue;
                }
            };

            let file_path = entry.path();

            if !file_path.is_file() || !matches_file_pattern(file_path) {
                continue;
            }

            match file_path.canonicalize() {
                Ok(canonical_path) => {
                    if !canonical_path.starts_with(&canonical_root) {
                        scan_errors.push(ScanError {
                            file: file_path.to_path_buf(),
                            kind: FailureKind::OutsideRoot,
                            message: format!(
                                "Path resolves outside scan root: {} -> {}",
                                file_path.display(),
                                canonical_path.display()
                            ),
                        });
                        continue;
                    }
                }
                Err(e) => {
                    scan_errors.push(ScanError {
                        file: file_path.to_path_buf(),
                        kind: FailureKind::IoError,
                        message: format!("Failed to canonicalize path: {e}"),
                    });
                    continue;
                }
            }

            // Skip devices, pipes, sockets; only regular files
            #[cfg(unix)]
            {
                use std::os::unix::fs::FileTypeExt;
                if let Ok(ft) = entry.metadata().map(|m| m.file_type())
                    && (ft.is_block_device()
                        || ft.is_char_device()
                        || ft.is_fifo()
                        || ft.is_socket())
                {
                    continue;
                }
            }

            if matches_exclude(file_path, &exclude_patterns) {
                continue;
            }

            files.push(file_path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    (files, scan_errors)
}

/// Read a file using a bounded streaming read, enforcing `max_size`.
///
/// Uses `Read::take` so the size check and the read are the same operation.
/// The file handle is dropped before returning, on success or failure.
///
/// # Errors
///
/// - [`VerifyError::ResourceNotFound`] if the file does not exist
/// - [`VerifyError::ResourceTooLarge`] if it exceeds `max_size`
/// - [`VerifyError::Io`] for any other I/O failure
pub fn read_file_bounded(
    path: &Path,
    resource: &str,
    max_size: u64,
) -> Result<Vec<u8>, VerifyError> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            VerifyError::ResourceNotFound {
                resource: resource.to_owned(),
                location: path.display().to_string(),
            }
        } else {
            VerifyError::Io {
                resource: resource.to_owned(),
                source: e,
            }
        }
    })?;

    // One extra byte detects oversized files
    let mut buffer = Vec::new();
    file.take(max_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| VerifyError::Io {
            resource: resource.to_owned(),
            source: e,
        })?;

    if buffer.len() as u64 > max_size {
        return Err(VerifyError::ResourceTooLarge {
            resource: resource.to_owned(),
            limit: max_size,
        });
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(paths: Vec<PathBuf>) -> FsSourceConfig {
        let mut cfg = FsSourceConfig::default();
        cfg.paths = paths;
        cfg
    }

    #[test]
    fn test_find_files_filters_by_extension_and_sorts() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("csv")).unwrap();
        fs::write(tmp.path().join("csv/student.csv"), "a").unwrap();
        fs::write(tmp.path().join("example.json"), "{}").unwrap();
        fs::write(tmp.path().join("README.md"), "# no").unwrap();
        fs::write(tmp.path().join("UPPER.PDF"), "no").unwrap();

        let (files, errors) = find_files(&config_for(vec![tmp.path().to_path_buf()]));
        assert!(errors.is_empty(), "{errors:?}");
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["student.csv", "example.json"]);
    }

    #[test]
    fn test_find_files_skips_target_dir() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("target")).unwrap();
        fs::write(tmp.path().join("target/out.json"), "{}").unwrap();
        let (files, _) = find_files(&config_for(vec![tmp.path().to_path_buf()]));
        assert!(files.is_empty(), "{files:?}");
    }

    #[test]
    fn test_invalid_exclude_pattern_is_reported() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = config_for(vec![tmp.path().to_path_buf()]);
        cfg.exclude = vec!["[".to_owned()];
        let (_, errors) = find_files(&cfg);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, FailureKind::InvalidExcludePattern);
    }

    #[test]
    fn test_read_file_bounded_limits() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sample.txt");
        fs::write(&path, "0123456789").unwrap();

        assert_eq!(read_file_bounded(&path, "sample.txt", 10).unwrap().len(), 10);
        assert!(matches!(
            read_file_bounded(&path, "sample.txt", 9),
            Err(VerifyError::ResourceTooLarge { limit: 9, .. })
        ));
        assert!(matches!(
            read_file_bounded(&tmp.path().join("nope.txt"), "nope.txt", 9),
            Err(VerifyError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn test_read_file_bounded_without_limit() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.txt");
        fs::write(&path, "abc").unwrap();
        assert_eq!(read_file_bounded(&path, "a.txt", u64::MAX).unwrap(), b"abc");
    }
}
