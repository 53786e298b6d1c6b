//! Fixture source strategies.
//!
//! Only the filesystem strategy (`fs` module) exists. In-memory and archive
//! sources are plain [`crate::Resource`] constructors and need no discovery.

pub mod fs;
