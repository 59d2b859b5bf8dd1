//! Local directory enumeration.

use std::path::{Path, PathBuf};

use cirrus_core::{Error, Result};
use walkdir::WalkDir;

use super::ignore::IgnoreRuleSet;

/// One file found under an upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Bare file name.
    pub file_name: String,
    /// Virtual directory path relative to the root, `/`-separated. Empty
    /// for files directly under the root.
    pub path: String,
    /// Absolute (or root-joined) location on disk.
    pub source: PathBuf,
}

/// Recursively enumerate the files under `root`, skipping everything
/// `rules` ignores. Ignored directories are pruned without descending.
///
/// The result is sorted by file name so batch assignment stays stable
/// across runs on identical trees.
pub fn list_files(root: &Path, rules: &IgnoreRuleSet) -> Result<Vec<LocalFile>> {
    if !root.is_dir() {
        return Err(Error::filesystem(root, "directory not found"));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !entry_ignored(root, entry, rules));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            Error::filesystem(path, e)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        files.push(LocalFile {
            file_name: entry.file_name().to_string_lossy().into_owned(),
            path: virtual_parent(root, entry.path()),
            source: entry.path().to_path_buf(),
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

fn entry_ignored(root: &Path, entry: &walkdir::DirEntry, rules: &IgnoreRuleSet) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let relative = relative_slash_path(root, entry.path());
    let file_name = entry.file_name().to_string_lossy();
    rules.is_ignored(&relative, &file_name)
}

/// `/`-separated form of `path` relative to `root`.
fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Virtual directory of a file: its parent components relative to the
/// root, empty when the file sits directly under the root.
fn virtual_parent(root: &Path, file: &Path) -> String {
    match file.parent() {
        Some(parent) if parent != root => relative_slash_path(root, parent),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_lists_nested_files_with_virtual_paths() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("index.html"), "root");
        write_file(&dir.path().join("css/style.css"), "css");
        write_file(&dir.path().join("images/icons/favicon.ico"), "ico");

        let files = list_files(dir.path(), &IgnoreRuleSet::empty()).unwrap();
        assert_eq!(files.len(), 3);

        let by_name: Vec<(&str, &str)> = files
            .iter()
            .map(|f| (f.file_name.as_str(), f.path.as_str()))
            .collect();
        assert_eq!(
            by_name,
            vec![
                ("favicon.ico", "images/icons"),
                ("index.html", ""),
                ("style.css", "css"),
            ]
        );
    }

    #[test]
    fn test_result_is_sorted_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("z/a.txt"), "1");
        write_file(&dir.path().join("a/z.txt"), "2");
        write_file(&dir.path().join("m.txt"), "3");

        let files = list_files(dir.path(), &IgnoreRuleSet::empty()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "m.txt", "z.txt"]);
    }

    #[test]
    fn test_enumeration_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "d.txt", "a.txt", "c.txt"] {
            write_file(&dir.path().join(name), name);
        }

        let first = list_files(dir.path(), &IgnoreRuleSet::empty()).unwrap();
        let second = list_files(dir.path(), &IgnoreRuleSet::empty()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ignored_directories_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("index.html"), "keep");
        write_file(&dir.path().join("node_modules/react/index.js"), "skip");
        write_file(&dir.path().join(".git/config"), "skip");
        write_file(&dir.path().join("src/app.log"), "skip");
        write_file(&dir.path().join("src/app.ts"), "keep");

        let rules =
            IgnoreRuleSet::from_patterns(["node_modules", ".git", "*.log"]).unwrap();
        let files = list_files(dir.path(), &rules).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["app.ts", "index.html"]);
    }

    #[test]
    fn test_missing_root_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = list_files(&missing, &IgnoreRuleSet::empty()).unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_empty_directory_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let files = list_files(dir.path(), &IgnoreRuleSet::empty()).unwrap();
        assert!(files.is_empty());
    }
}
