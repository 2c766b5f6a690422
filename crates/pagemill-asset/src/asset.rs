//! Filename parsing: path → request path + format extension stack + MIME type.

use std::path::{Path, PathBuf};

use mime_guess::Mime;
use thiserror::Error;

/// Error returned when a path cannot be parsed into an [`Asset`].
#[derive(Debug, Error)]
pub enum AssetError {
    /// The path names a directory, not a file.
    #[error("asset path is a directory: {}", .0.display())]
    IsDirectory(PathBuf),
    /// The path has no usable file name.
    #[error("asset path has no file name: {}", .0.display())]
    MissingFileName(PathBuf),
    /// The path is not located under the pages root.
    #[error("asset path {} is outside the pages root {}", .path.display(), .root.display())]
    OutsidePagesRoot {
        /// The offending asset path.
        path: PathBuf,
        /// The pages root it was resolved against.
        root: PathBuf,
    },
}

/// One physical file, decomposed into a request path and an ordered stack of
/// format extensions.
///
/// An asset is constructed once per discovered file and is immutable
/// thereafter. All derivation is done from the path string at construction
/// time; no file contents are read.
///
/// # Format Extensions
///
/// Extensions are ordered outermost-processed first: `about.html.erb` yields
/// `[".erb", ".html"]`. A file with no extensions (e.g. `Makefile`, dotfiles
/// like `.gitignore`) has an empty stack and is treated as opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    path: PathBuf,
    request_path: String,
    /// Outermost-processed first.
    extensions: Vec<String>,
    mime_type: Mime,
}

impl Asset {
    /// Parse a file path into an asset.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file (absolute or relative)
    /// * `pages_root` - Base directory the request path is computed against
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::IsDirectory`] if `path` names an existing
    /// directory, [`AssetError::OutsidePagesRoot`] if `path` is not under
    /// `pages_root`, and [`AssetError::MissingFileName`] if no file name can
    /// be extracted.
    pub fn new(path: impl Into<PathBuf>, pages_root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.into();
        let pages_root = pages_root.as_ref();

        if path.is_dir() {
            return Err(AssetError::IsDirectory(path));
        }

        let relative = path
            .strip_prefix(pages_root)
            .map_err(|_| AssetError::OutsidePagesRoot {
                path: path.clone(),
                root: pages_root.to_path_buf(),
            })?
            .to_path_buf();

        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AssetError::MissingFileName(path.clone()))?;

        let (stem, inner_to_outer) = split_file_name(&file_name);
        if stem.is_empty() {
            return Err(AssetError::MissingFileName(path));
        }

        let mime_type = derive_mime(&file_name, &inner_to_outer);

        // Directory components of the relative path, then the stripped stem.
        let mut segments: Vec<String> = relative
            .parent()
            .map(|dir| {
                dir.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        segments.push(stem);
        let request_path = format!("/{}", segments.join("/"));

        let mut extensions = inner_to_outer;
        extensions.reverse();

        Ok(Self {
            path,
            request_path,
            extensions,
            mime_type,
        })
    }

    /// Path to the backing file, as given at construction.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URL-like path the asset is addressed by, with all trailing format
    /// extensions stripped.
    #[must_use]
    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    /// Format extensions, outermost-processed first (e.g. `[".erb", ".html"]`
    /// for `about.html.erb`). Empty for opaque assets.
    #[must_use]
    pub fn format_extensions(&self) -> &[String] {
        &self.extensions
    }

    /// MIME type derived from the innermost recognized extension.
    ///
    /// Template extensions like `.erb` are not recognized by the MIME table
    /// and fall through, so `about.html.erb` is `text/html`. Falls back to
    /// `application/octet-stream`.
    #[must_use]
    pub fn mime_type(&self) -> &Mime {
        &self.mime_type
    }

    /// Whether the backing file currently exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Split a file name into its stem and extension segments, innermost first.
///
/// Leading dots belong to the stem, so dotfiles carry no extensions:
/// - `about.html.erb` -> `("about", [".html", ".erb"])`
/// - `.gitignore` -> `(".gitignore", [])`
/// - `logo.png` -> `("logo", [".png"])`
fn split_file_name(name: &str) -> (String, Vec<String>) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    let rest = &name[leading_dots..];

    let mut parts = rest.split('.');
    let stem_tail = parts.next().unwrap_or("");
    let stem = format!("{}{stem_tail}", ".".repeat(leading_dots));
    let extensions = parts
        .filter(|part| !part.is_empty())
        .map(|part| format!(".{part}"))
        .collect();

    (stem, extensions)
}

/// Derive a MIME type from the innermost extension the MIME table recognizes.
fn derive_mime(file_name: &str, inner_to_outer: &[String]) -> Mime {
    inner_to_outer
        .iter()
        .find_map(|ext| mime_guess::from_ext(&ext[1..]).first())
        .unwrap_or_else(|| mime_guess::from_path(file_name).first_or_octet_stream())
}
