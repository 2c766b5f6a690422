//! Asset discovery by filesystem walking.
//!
//! Discovery is lazy and restartable: [`AssetScanner::scan`] returns a fresh
//! iterator on every call, so callers can rescan cheaply between builds
//! without holding materialized file lists.
//!
//! # Discovery Policy
//!
//! - Directories are silently skipped
//! - Files ending in a swap-file suffix (editor artifacts) are skipped
//! - Files that fail to parse into an [`Asset`] are logged and skipped;
//!   a single malformed entry never aborts a scan
//! - Matching paths are yielded in lexicographic order (the `glob` crate
//!   guarantees alphabetical iteration), which gives mount precedence a
//!   platform-independent tie-break

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::asset::Asset;

/// Suffixes of editor swap files excluded from discovery by default.
pub const SWAP_FILE_SUFFIXES: &[&str] = &["~", ".swp"];

/// Default discovery pattern: every file under the pages root, any depth.
const DEFAULT_PATTERN: &str = "**/*";

/// Error returned when a scan cannot be started.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The discovery glob pattern failed to parse.
    #[error("invalid discovery pattern {pattern:?}: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Parse failure from the glob engine.
        #[source]
        source: glob::PatternError,
    },
}

/// Discovers assets by walking a pages directory with a glob pattern.
#[derive(Clone, Debug)]
pub struct AssetScanner {
    pages_path: PathBuf,
    pattern: String,
    swap_suffixes: Vec<String>,
}

impl AssetScanner {
    /// Create a scanner over `pages_path` with the default pattern and
    /// swap-file suffixes.
    pub fn new(pages_path: impl Into<PathBuf>) -> Self {
        Self {
            pages_path: pages_path.into(),
            pattern: DEFAULT_PATTERN.to_string(),
            swap_suffixes: SWAP_FILE_SUFFIXES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Replace the discovery glob pattern (relative to the pages path).
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Replace the swap-file suffix exclusion list.
    #[must_use]
    pub fn with_swap_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.swap_suffixes = suffixes;
        self
    }

    /// The pages directory this scanner walks.
    #[must_use]
    pub fn pages_path(&self) -> &Path {
        &self.pages_path
    }

    /// Start a scan, returning a lazy iterator of discovered assets.
    ///
    /// A missing pages directory is not an error; the iterator is simply
    /// empty. Each call walks the filesystem from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Pattern`] if the discovery pattern is malformed.
    pub fn scan(&self) -> Result<ScannedAssets, ScanError> {
        let full_pattern = self.pages_path.join(&self.pattern);
        let paths =
            glob::glob(&full_pattern.to_string_lossy()).map_err(|source| ScanError::Pattern {
                pattern: self.pattern.clone(),
                source,
            })?;

        Ok(ScannedAssets {
            paths,
            pages_path: self.pages_path.clone(),
            swap_suffixes: self.swap_suffixes.clone(),
        })
    }
}

/// Lazy iterator over assets produced by one [`AssetScanner::scan`] call.
///
/// Yields assets in lexicographic path order. Unreadable entries and
/// malformed assets are logged and skipped.
pub struct ScannedAssets {
    paths: glob::Paths,
    pages_path: PathBuf,
    swap_suffixes: Vec<String>,
}

impl ScannedAssets {
    /// Whether a file name ends in one of the excluded swap-file suffixes.
    fn is_swap_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return false;
        };
        self.swap_suffixes.iter().any(|suffix| name.ends_with(suffix))
    }
}

impl Iterator for ScannedAssets {
    type Item = Asset;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.paths.next()? {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(path = %e.path().display(), error = %e, "Unreadable entry, skipping");
                    continue;
                }
            };

            if path.is_dir() || self.is_swap_file(&path) {
                continue;
            }

            match Asset::new(&path, &self.pages_path) {
                Ok(asset) => return Some(asset),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Malformed asset, skipping");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn create_pages_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn request_paths(scanner: &AssetScanner) -> Vec<String> {
        scanner
            .scan()
            .unwrap()
            .map(|a| a.request_path().to_string())
            .collect()
    }

    #[test]
    fn test_scan_finds_files_at_any_depth() {
        let pages = create_pages_dir();
        fs::create_dir_all(pages.path().join("a/b")).unwrap();
        fs::write(pages.path().join("index.html.erb"), "").unwrap();
        fs::write(pages.path().join("a/b/deep.html"), "").unwrap();

        let scanner = AssetScanner::new(pages.path());

        assert_eq!(request_paths(&scanner), vec!["/a/b/deep", "/index"]);
    }

    #[test]
    fn test_scan_skips_directories() {
        let pages = create_pages_dir();
        fs::create_dir(pages.path().join("videos")).unwrap();
        fs::write(pages.path().join("videos/intro.html"), "").unwrap();

        let scanner = AssetScanner::new(pages.path());

        assert_eq!(request_paths(&scanner), vec!["/videos/intro"]);
    }

    #[test]
    fn test_scan_excludes_swap_files() {
        let pages = create_pages_dir();
        fs::write(pages.path().join("notes.txt~"), "").unwrap();
        fs::write(pages.path().join("notes.txt.swp"), "").unwrap();
        fs::write(pages.path().join("notes.txt"), "").unwrap();

        let scanner = AssetScanner::new(pages.path());

        assert_eq!(request_paths(&scanner), vec!["/notes"]);
    }

    #[test]
    fn test_scan_order_is_lexicographic() {
        let pages = create_pages_dir();
        fs::write(pages.path().join("index.md"), "").unwrap();
        fs::write(pages.path().join("index.html"), "").unwrap();
        fs::write(pages.path().join("about.html"), "").unwrap();

        let scanner = AssetScanner::new(pages.path());
        let files: Vec<String> = scanner
            .scan()
            .unwrap()
            .map(|a| a.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(files, vec!["about.html", "index.html", "index.md"]);
    }

    #[test]
    fn test_scan_is_restartable() {
        let pages = create_pages_dir();
        fs::write(pages.path().join("one.html"), "").unwrap();
        fs::write(pages.path().join("two.html"), "").unwrap();

        let scanner = AssetScanner::new(pages.path());

        assert_eq!(request_paths(&scanner), request_paths(&scanner));
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let scanner = AssetScanner::new("/nonexistent/pages");

        assert!(request_paths(&scanner).is_empty());
    }

    #[test]
    fn test_scan_with_custom_pattern() {
        let pages = create_pages_dir();
        fs::create_dir(pages.path().join("videos")).unwrap();
        fs::write(pages.path().join("videos/intro.html"), "").unwrap();
        fs::write(pages.path().join("about.html"), "").unwrap();

        let scanner = AssetScanner::new(pages.path()).with_pattern("videos/*");

        assert_eq!(request_paths(&scanner), vec!["/videos/intro"]);
    }

    #[test]
    fn test_scan_with_custom_swap_suffixes() {
        let pages = create_pages_dir();
        fs::write(pages.path().join("draft.bak"), "").unwrap();
        fs::write(pages.path().join("final.html"), "").unwrap();

        let scanner =
            AssetScanner::new(pages.path()).with_swap_suffixes(vec![".bak".to_string()]);

        assert_eq!(request_paths(&scanner), vec!["/final"]);
    }
}
