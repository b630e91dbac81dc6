//! Recursive repository scanner with language tagging.
//!
//! The scanner walks a directory tree, prunes vendored/generated/hidden
//! directories before descending into them, classifies the remaining files by
//! extension, and reads each eligible file as lossy UTF-8. The result is a
//! [`RepositoryIndex`]: an ordered list of [`FileRecord`]s plus per-language
//! counts, which downstream crates turn into prompts and diagrams.
//!
//! Traversal is sorted by file name at every level, so the index order is
//! stable across platforms and repeated scans.

pub mod errors;
pub mod types;

mod language;
mod scan;

pub use errors::{Result, ScanError};
pub use scan::scan_repository;
pub use types::{FileRecord, RepositoryIndex};
