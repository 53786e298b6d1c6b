//! Configuration types for fixture verification.
//!
//! Split into core verification config (applies to every resource) and
//! source-specific config (how fixtures are discovered on disk). This keeps
//! the core API free of filesystem concerns.

use std::path::PathBuf;

use serde::Deserialize;

/// Which library parses JSON resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum JsonDecoder {
    /// `serde_json` (default).
    #[default]
    SerdeJson,
    /// `serde-saphyr`, reading the document as YAML flow syntax.
    Saphyr,
}

/// Core verification config, applied regardless of input source.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct VerifyConfig {
    /// Maximum size of a single resource in bytes (default: 64 MB).
    /// Applies to files, bundled fixtures and decompressed archive entries.
    pub max_resource_size: u64,
    /// How deep archives nested inside archives are followed (default: 4).
    pub max_archive_depth: usize,
    /// JSON backend used for `.json` resources.
    pub json_decoder: JsonDecoder,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            max_resource_size: 67_108_864,
            max_archive_depth: 4,
            json_decoder: JsonDecoder::default(),
        }
    }
}

/// Filesystem-specific source options.
///
/// NOTE: `paths` is required and must be non-empty. Default fixture roots
/// are a CLI concern, not baked into the library.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FsSourceConfig {
    /// Paths to scan (files or directories). Required, must be non-empty.
    pub paths: Vec<PathBuf>,
    /// Exclude patterns (glob format).
    pub exclude: Vec<String>,
    /// Whether to follow symbolic links (default: `false`).
    pub follow_links: bool,
    /// Maximum directory traversal depth (default: 64).
    pub max_depth: usize,
    /// Maximum number of files to verify (default: `100_000`).
    pub max_files: usize,
    /// Decode files with a recognized extension even when no expectations
    /// name them (zero assertions, so only decoding is checked).
    pub verify_unlisted: bool,
}

impl Default for FsSourceConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            exclude: Vec::new(),
            follow_links: false,
            max_depth: 64,
            max_files: 100_000,
            verify_unlisted: false,
        }
    }
}
