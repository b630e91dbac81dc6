use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// One indexed source file.
///
/// `path` is relative to the scanned root and always `/`-separated, so it can
/// be compared and grouped without touching the filesystem again. Records are
/// immutable once the scan has produced them.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Root-relative path, `/`-separated on every platform.
    pub path: String,
    /// Language tag from the extension table (e.g. `"python"`, `"dockerfile"`).
    pub language: &'static str,
    /// Full file content, read as lossy UTF-8.
    pub content: String,
}

/// The complete scan result for one repository.
///
/// Built in one pass and replaced wholesale on re-scan; the language counts
/// are derived from `files` at construction and never updated separately.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryIndex {
    /// Canonicalized root the scan ran against.
    pub root: PathBuf,
    /// Indexed files in deterministic traversal order.
    pub files: Vec<FileRecord>,
    /// Files per language tag, sorted by tag.
    pub language_counts: BTreeMap<&'static str, usize>,
}

impl RepositoryIndex {
    /// Builds an index from scanned records, deriving the language counts.
    pub fn new(root: PathBuf, files: Vec<FileRecord>) -> Self {
        let mut language_counts = BTreeMap::new();
        for f in &files {
            *language_counts.entry(f.language).or_insert(0) += 1;
        }
        Self {
            root,
            files,
            language_counts,
        }
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(path: &str, language: &'static str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            language,
            content: String::new(),
        }
    }

    #[test]
    fn counts_are_derived_from_records() {
        let idx = RepositoryIndex::new(
            PathBuf::from("/tmp/x"),
            vec![rec("a.py", "python"), rec("b.py", "python"), rec("c.rs", "rust")],
        );
        assert_eq!(idx.total_files(), 3);
        assert_eq!(idx.language_counts.get("python"), Some(&2));
        assert_eq!(idx.language_counts.get("rust"), Some(&1));
    }

    #[test]
    fn empty_index_has_no_counts() {
        let idx = RepositoryIndex::new(PathBuf::from("/tmp/x"), Vec::new());
        assert!(idx.is_empty());
        assert!(idx.language_counts.is_empty());
    }
}
