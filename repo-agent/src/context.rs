//! Context assembly: file tree, key-file snippets, and question-relevant
//! file selection under a character budget.
//!
//! All three outputs are plain strings destined for prompt slots. Budgets
//! are counted in bytes over the assembled output, so a bundle never
//! exceeds its budget by more than the truncation marker.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use tracing::debug;

use repo_indexer::{FileRecord, RepositoryIndex};

/// Snippet budget for summary prompts.
pub const SUMMARY_SNIPPET_BUDGET: usize = 12_000;
/// Snippet budget for diagram blueprint prompts.
pub const DIAGRAM_SNIPPET_BUDGET: usize = 10_000;
/// Context budget for question answering.
pub const QUESTION_CONTEXT_BUDGET: usize = 14_000;

const TRUNCATION_MARKER: &str = "\n...(truncated)";

/// A truncated tail shorter than this is not worth including.
const MIN_REMAINING: usize = 200;

/// Conventional filenames surfaced first in snippet bundles.
const PRIORITY_FILENAMES: &[&str] = &[
    "main.py",
    "app.py",
    "index.js",
    "index.ts",
    "server.py",
    "server.js",
    "manage.py",
    "setup.py",
    "pyproject.toml",
    "package.json",
    "pom.xml",
    "build.gradle",
    "Cargo.toml",
    "docker-compose.yml",
    "docker-compose.yaml",
    "Dockerfile",
    "requirements.txt",
    "go.mod",
    "Makefile",
    "README.md",
];

/// All indexed paths, sorted, one per line.
pub fn file_tree(index: &RepositoryIndex) -> String {
    let mut paths: Vec<&str> = index.files.iter().map(|f| f.path.as_str()).collect();
    paths.sort_unstable();
    paths.join("\n")
}

/// The most important file contents, capped at `budget` bytes.
///
/// Files are ordered by `(not priority, path)`, so manifest files, entry
/// points, and READMEs come first. Each file is prefixed with a
/// `--- path (language) ---` header; the last file to fit is truncated and
/// marked when at least [`MIN_REMAINING`] bytes of budget are left for it.
pub fn key_snippets(index: &RepositoryIndex, budget: usize) -> String {
    let mut ordered: Vec<&FileRecord> = index.files.iter().collect();
    ordered.sort_by(|a, b| {
        (!is_priority(&a.path), a.path.as_str()).cmp(&(!is_priority(&b.path), b.path.as_str()))
    });

    assemble(ordered.into_iter(), budget, |f| {
        format!("\n--- {} ({}) ---\n", f.path, f.language)
    })
}

/// Contents of the files most likely relevant to `question`, capped at
/// `budget` bytes.
///
/// Scoring is a keyword-overlap heuristic: each distinct word of three or
/// more word-characters from the lowercased question adds 5 when it occurs
/// in a file's path and 1 when it occurs in its content. Files are taken in
/// descending score order; ties keep index order, which is deterministic
/// because the scan sorts its traversal.
pub fn question_context(index: &RepositoryIndex, question: &str, budget: usize) -> String {
    let q_lower = question.to_lowercase();
    let words = question_words(&q_lower);

    let mut scored: Vec<(usize, &FileRecord)> = index
        .files
        .iter()
        .map(|f| {
            let path_lower = f.path.to_lowercase();
            let content_lower = f.content.to_lowercase();
            let mut score = 0usize;
            for w in &words {
                if path_lower.contains(w) {
                    score += 5;
                }
                if content_lower.contains(w) {
                    score += 1;
                }
            }
            (score, f)
        })
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));

    debug!(
        files = scored.len(),
        keywords = words.len(),
        top_score = scored.first().map(|(s, _)| *s).unwrap_or(0),
        "scored files against question"
    );

    let out = assemble(scored.into_iter().map(|(_, f)| f), budget, |f| {
        format!("\n--- {} ---\n", f.path)
    });
    if out.is_empty() {
        "(No relevant files found)".to_string()
    } else {
        out
    }
}

/// Distinct words of at least three word-characters.
fn question_words(q_lower: &str) -> BTreeSet<&str> {
    q_lower
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= 3)
        .collect()
}

fn is_priority(path: &str) -> bool {
    let basename = path.rsplit('/').next().unwrap_or(path);
    PRIORITY_FILENAMES.contains(&basename)
}

/// Greedy first-fit concatenation of `header + content` chunks.
///
/// Headers count against the budget. When the next file does not fit whole,
/// its content is cut at a char boundary and suffixed with the truncation
/// marker, unless the leftover budget is too small to bother; either way
/// assembly stops there. Output length is at most `budget` plus the marker.
fn assemble<'a, I, H>(files: I, budget: usize, header_for: H) -> String
where
    I: Iterator<Item = &'a FileRecord>,
    H: Fn(&FileRecord) -> String,
{
    let mut out = String::new();
    for f in files {
        let header = header_for(f);
        if out.len() + header.len() + f.content.len() > budget {
            let remaining = budget.saturating_sub(out.len());
            if remaining > MIN_REMAINING && header.len() < remaining {
                out.push_str(&header);
                out.push_str(safe_truncate(&f.content, remaining - header.len()));
                out.push_str(TRUNCATION_MARKER);
            }
            break;
        }
        out.push_str(&header);
        out.push_str(&f.content);
    }
    out
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}
