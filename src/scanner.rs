use crate::error::Result;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names that are never scanned, in addition to hidden directories.
pub const DEFAULT_EXCLUDES: &[&str] = &["target", "vendor"];

/// File scanner for traversing project directories.
///
/// The `FileScanner` recursively walks through a project directory to find all Rust source files.
/// It skips hidden directories (those starting with `.`), the [`DEFAULT_EXCLUDES`] and any
/// path component matching one of the caller's exclusion patterns.
///
/// # Example
///
/// ```no_run
/// use swagdoc::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"))
///     .with_excludes(vec!["generated".to_string()]);
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    excludes: Vec<String>,
}

/// Result of directory scanning operation.
///
/// Contains the list of discovered Rust files and any warnings encountered during scanning.
pub struct ScanResult {
    /// Paths of all discovered `.rs` files, sorted
    pub rust_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Adds path-component exclusion patterns on top of the defaults.
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        for exclude in excludes {
            if !self.excludes.contains(&exclude) {
                self.excludes.push(exclude);
            }
        }
        self
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// Inaccessible directories or files are logged and recorded as warnings, but
    /// scanning continues. The returned file list is sorted so that every later
    /// phase sees the files in the same order on every run.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be accessed.
    pub fn scan(&self) -> Result<ScanResult> {
        fs::metadata(&self.root_path)?;

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        rust_files.sort();
        debug!(
            "Scanned {}: {} Rust files",
            self.root_path.display(),
            rust_files.len()
        );

        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        // Never filter the root itself
        if entry.path() == self.root_path {
            return false;
        }

        let file_name = entry.file_name().to_string_lossy();
        if file_name.starts_with('.') {
            return true;
        }
        self.matches_exclude(entry.path())
    }

    /// Whether any component of `path` below the root equals an exclusion pattern.
    pub fn matches_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root_path).unwrap_or(path);
        relative.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            self.excludes.iter().any(|exclude| *exclude == name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_normal_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("lib.rs"), "pub fn test() {}").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.rust_files.len(), 2);
        assert!(result.warnings.is_empty());

        // Sorted by path
        let file_names: Vec<String> = result
            .rust_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(file_names, vec!["lib.rs", "main.rs"]);
    }

    #[test]
    fn test_scan_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = FileScanner::new(temp_dir.path().join("nope"));
        assert!(scanner.scan().is_err());
    }

    #[test]
    fn test_scan_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/models")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("src/models/pet.rs"), "struct Pet {}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.rust_files.len(), 2);
    }

    #[test]
    fn test_scan_skips_default_excludes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("target")).unwrap();
        fs::write(root.join("target/build.rs"), "fn main() {}").unwrap();
        fs::create_dir(root.join("vendor")).unwrap();
        fs::write(root.join("vendor/dep.rs"), "fn dep() {}").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.rust_files.len(), 1);
        assert_eq!(
            result.rust_files[0].file_name().unwrap().to_string_lossy(),
            "main.rs"
        );
    }

    #[test]
    fn test_scan_skips_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/config.rs"), "// config").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.rust_files.len(), 1);
    }

    #[test]
    fn test_scan_skips_custom_excludes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("generated")).unwrap();
        fs::write(root.join("generated/api.rs"), "fn api() {}").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let scanner =
            FileScanner::new(root.to_path_buf()).with_excludes(vec!["generated".to_string()]);
        let result = scanner.scan().unwrap();

        assert_eq!(result.rust_files.len(), 1);
        assert!(scanner.matches_exclude(&root.join("generated/api.rs")));
        assert!(!scanner.matches_exclude(&root.join("main.rs")));
    }
}
