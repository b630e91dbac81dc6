//! Directory walk that builds the [`RepositoryIndex`].

use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::errors::{Result, ScanError};
use crate::language::{is_skipped_dir, is_skipped_file, language_for};
use crate::types::{FileRecord, RepositoryIndex};

/// Files larger than this are left out of the index.
const MAX_FILE_SIZE: u64 = 100_000;

/// Scans `root` recursively and returns the index.
///
/// Pruned directories are never descended into; files are dropped when their
/// name or extension is in the skip tables, their extension is unmapped, they
/// are empty, or they exceed [`MAX_FILE_SIZE`] bytes. Content is read as
/// lossy UTF-8, so encoding junk substitutes instead of failing the scan.
/// Unreadable entries below the root are skipped.
///
/// Traversal is sorted by file name at every level; the resulting record
/// order is stable across platforms and repeated runs.
///
/// # Errors
/// - [`ScanError::InvalidRoot`] if `root` is missing or not a directory
/// - [`ScanError::Io`] if the root itself cannot be opened
#[instrument(skip_all, fields(root = %root.display()))]
pub fn scan_repository(root: &Path) -> Result<RepositoryIndex> {
    if !root.is_dir() {
        return Err(ScanError::InvalidRoot(root.to_path_buf()));
    }
    let root = fs::canonicalize(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !is_skipped_dir(&e.file_name().to_string_lossy())
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(ScanError::Io {
                        path: root.clone(),
                        source: err.into(),
                    });
                }
                debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if is_skipped_file(&file_name) {
            continue;
        }
        let Some(language) = language_for(&file_name) else {
            continue;
        };

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(_) => continue,
        };
        if size == 0 || size > MAX_FILE_SIZE {
            continue;
        }
        let bytes = match fs::read(entry.path()) {
            Ok(b) => b,
            Err(_) => continue,
        };

        files.push(FileRecord {
            path: relative_slash_path(&root, entry.path()),
            language,
            content: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    let index = RepositoryIndex::new(root, files);
    info!(
        total_files = index.total_files(),
        languages = index.language_counts.len(),
        "repository scan finished"
    );
    Ok(index)
}

/// Root-relative path with `/` separators on every platform.
fn relative_slash_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
