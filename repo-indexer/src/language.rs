//! Classification tables: which directories to prune, which files to skip,
//! and which language tag a file gets.

/// Extension (without dot, lowercase) to language tag.
const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("jsx", "javascript"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("go", "go"),
    ("rs", "rust"),
    ("rb", "ruby"),
    ("php", "php"),
    ("cs", "csharp"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("h", "c"),
    ("hpp", "cpp"),
    ("swift", "swift"),
    ("dart", "dart"),
    ("scala", "scala"),
    ("r", "r"),
    ("sql", "sql"),
    ("html", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("json", "json"),
    ("xml", "xml"),
    ("md", "markdown"),
    ("txt", "text"),
    ("sh", "bash"),
    ("bat", "batch"),
    ("ps1", "powershell"),
    ("dockerfile", "dockerfile"),
    ("tf", "terraform"),
    ("proto", "protobuf"),
    ("graphql", "graphql"),
    ("toml", "toml"),
    ("ini", "ini"),
    ("cfg", "ini"),
    ("env", "text"),
    ("gitignore", "text"),
];

/// Vendored/generated directories pruned before descent. Anything starting
/// with `.` is pruned as well, so dot-names here are spelled out only for
/// completeness.
const SKIP_DIR_NAMES: &[&str] = &[
    ".git",
    "__pycache__",
    "node_modules",
    ".venv",
    "venv",
    "env",
    ".idea",
    ".vscode",
    ".vs",
    "dist",
    "build",
    "out",
    "target",
    ".next",
    ".nuxt",
    "coverage",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    "bin",
    "obj",
    ".terraform",
    ".eggs",
];

/// Binary and artifact extensions (last extension, lowercase).
const SKIP_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "svg", "mp3", "mp4", "avi", "wav", "pdf", "zip",
    "tar", "gz", "exe", "dll", "so", "dylib", "whl", "pyc", "class", "jar", "lock",
];

/// Minified bundles are skipped by whole-name suffix since their last
/// extension alone still looks like source.
const SKIP_NAME_SUFFIXES: &[&str] = &[".min.js", ".min.css"];

/// True for directory names the walk must not descend into.
pub(crate) fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || SKIP_DIR_NAMES.contains(&name) || name.ends_with(".egg-info")
}

/// True for file names the scan drops before language lookup.
pub(crate) fn is_skipped_file(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    if SKIP_NAME_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return true;
    }
    match last_extension(&lower) {
        Some(ext) => SKIP_EXTENSIONS.contains(&ext),
        None => false,
    }
}

/// Language tag for a file name, or `None` when the extension is unmapped.
///
/// A file literally named `Dockerfile` (any case) is tagged `dockerfile`
/// regardless of extension rules.
pub(crate) fn language_for(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_ascii_lowercase();
    if lower == "dockerfile" {
        return Some("dockerfile");
    }
    let ext = last_extension(&lower)?;
    EXTENSION_LANGUAGES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
}

/// Last extension of an already-lowercased file name. Names with a leading
/// dot and no further dot (`.env`, `.gitignore`) have no extension.
fn last_extension(lower_name: &str) -> Option<&str> {
    let stem_and_ext = lower_name.rsplit_once('.')?;
    if stem_and_ext.0.is_empty() {
        None
    } else {
        Some(stem_and_ext.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_extensions() {
        assert_eq!(language_for("main.py"), Some("python"));
        assert_eq!(language_for("App.TSX"), Some("typescript"));
        assert_eq!(language_for("schema.graphql"), Some("graphql"));
        assert_eq!(language_for("setup.cfg"), Some("ini"));
        assert_eq!(language_for("notes.xyz"), None);
        assert_eq!(language_for("README"), None);
    }

    #[test]
    fn dockerfile_is_special_cased_by_name() {
        assert_eq!(language_for("Dockerfile"), Some("dockerfile"));
        assert_eq!(language_for("DOCKERFILE"), Some("dockerfile"));
        assert_eq!(language_for("base.dockerfile"), Some("dockerfile"));
        // Variants like `Dockerfile.dev` stay unmapped.
        assert_eq!(language_for("Dockerfile.dev"), None);
    }

    #[test]
    fn dot_files_have_no_extension() {
        assert_eq!(language_for(".env"), None);
        assert_eq!(language_for("local.env"), Some("text"));
        assert_eq!(language_for(".gitignore"), None);
        assert_eq!(language_for("global.gitignore"), Some("text"));
    }

    #[test]
    fn skips_binaries_and_minified_bundles() {
        assert!(is_skipped_file("logo.PNG"));
        assert!(is_skipped_file("Cargo.lock"));
        assert!(is_skipped_file("bundle.min.js"));
        assert!(is_skipped_file("styles.min.css"));
        assert!(!is_skipped_file("bundle.js"));
        assert!(!is_skipped_file("main.py"));
    }

    #[test]
    fn prunes_vendored_and_hidden_dirs() {
        assert!(is_skipped_dir("node_modules"));
        assert!(is_skipped_dir(".git"));
        assert!(is_skipped_dir(".cache"));
        assert!(is_skipped_dir("mypkg.egg-info"));
        assert!(!is_skipped_dir("src"));
        assert!(!is_skipped_dir("docs"));
    }
}
