//! Source tree scanner for the code rewrite pass
//!
//! Walks a source directory and collects code files by extension, skipping
//! hidden entries and conventional build directories.

use crate::error::{FileError, FileResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for source scanning
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (empty = all files)
    pub include_extensions: HashSet<String>,

    /// Whether to descend into hidden entries (starting with .)
    pub show_hidden: bool,

    /// Directories to always ignore
    pub ignored_dirs: HashSet<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let ignored_dirs = [".git", ".pio", ".vscode", "build", "target"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        Self {
            include_extensions: HashSet::new(),
            show_hidden: false,
            ignored_dirs,
        }
    }
}

impl ScanConfig {
    /// Create a config matching the given extensions
    pub fn for_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include_extensions: extensions
                .into_iter()
                .map(|e| e.into().trim_start_matches('.').to_lowercase())
                .collect(),
            ..Self::default()
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        if self.include_extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.include_extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Collect the source files under `root`, sorted by path
pub fn collect_source_files(root: impl AsRef<Path>, config: &ScanConfig) -> FileResult<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || should_descend(e, config));

    for entry in walker {
        let entry = entry.map_err(|e| FileError::DirectoryScanError {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            source: e,
        })?;

        if entry.file_type().is_file() && config.matches_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    log::debug!("Found {} source file(s) under {}", files.len(), root.display());
    Ok(files)
}

/// Check if an entry should be visited during traversal
fn should_descend(entry: &DirEntry, config: &ScanConfig) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return true;
    };
    if !config.show_hidden && name.starts_with('.') {
        return false;
    }
    !(entry.file_type().is_dir() && config.ignored_dirs.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::write(base.join("marlin.cpp"), "").unwrap();
        fs::write(base.join("marlin.h"), "").unwrap();
        fs::create_dir(base.join("lcd")).unwrap();
        fs::write(base.join("lcd/menu.cpp"), "").unwrap();
        fs::write(base.join("lcd/README.md"), "").unwrap();
        fs::create_dir(base.join(".hidden")).unwrap();
        fs::write(base.join(".hidden/secret.cpp"), "").unwrap();
        fs::create_dir(base.join("build")).unwrap();
        fs::write(base.join("build/generated.cpp"), "").unwrap();

        dir
    }

    #[test]
    fn test_collect_cpp_only() {
        let dir = setup_test_dir();
        let files = collect_source_files(dir.path(), &ScanConfig::for_extensions(["cpp"])).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["lcd/menu.cpp", "marlin.cpp"]);
    }

    #[test]
    fn test_collect_multiple_extensions() {
        let dir = setup_test_dir();
        let config = ScanConfig::for_extensions([".cpp", "H"]);
        let files = collect_source_files(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_collect_hidden_and_ignored() {
        let dir = setup_test_dir();
        let config = ScanConfig {
            show_hidden: true,
            ..ScanConfig::for_extensions(["cpp"])
        };
        let files = collect_source_files(dir.path(), &config).unwrap();
        assert!(files.iter().any(|p| p.ends_with(".hidden/secret.cpp")));
        assert!(!files.iter().any(|p| p.ends_with("build/generated.cpp")));

        let mut config = ScanConfig::for_extensions(["cpp"]);
        config.ignored_dirs.insert("lcd".to_string());
        let files = collect_source_files(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let err = collect_source_files(dir.path().join("nope"), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, FileError::DirectoryScanError { .. }));
    }
}
