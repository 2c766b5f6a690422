//! Mounting discovered assets onto a resource tree.

use pagemill_asset::{AssetScanner, ScanError};
use pagemill_tree::ResourceNode;

/// Mounts every asset produced by a scanner onto its position in a resource
/// tree, creating intermediate directory nodes as needed.
///
/// Mounting is in-place by contract: the passed-in root is mutated and
/// nothing new is returned, which is what lets the pipeline stages after it
/// keep rewriting the same tree.
///
/// # Precedence
///
/// Scanner order decides overwrite order when two files map to the same
/// request path (e.g. `index.html` and `index.md` both resolving to
/// `/index`): the last-mounted asset wins. Because scans yield paths
/// lexicographically, precedence is deterministic across platforms.
#[derive(Clone, Debug)]
pub struct DirectoryCollection {
    scanner: AssetScanner,
    warn_on_overwrite: bool,
}

impl DirectoryCollection {
    /// Create a collection over the given scanner.
    #[must_use]
    pub fn new(scanner: AssetScanner) -> Self {
        Self {
            scanner,
            warn_on_overwrite: false,
        }
    }

    /// Emit a `tracing` warning when a mount overwrites an existing asset.
    ///
    /// Off by default: later-file-wins is intentional content precedence,
    /// not an error.
    #[must_use]
    pub fn warn_on_overwrite(mut self, warn: bool) -> Self {
        self.warn_on_overwrite = warn;
        self
    }

    /// Mount every discovered asset onto `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if discovery cannot start (malformed pattern).
    pub fn mount(&self, root: &ResourceNode) -> Result<(), ScanError> {
        let mut mounted = 0usize;
        for asset in self.scanner.scan()? {
            let mut node = root.clone();
            for segment in asset.request_path().split('/').filter(|s| !s.is_empty()) {
                node = node.add_child(segment);
            }

            let asset_path = asset.path().to_path_buf();
            if let Some(previous) = node.attach_asset(asset) {
                if self.warn_on_overwrite {
                    tracing::warn!(
                        request_path = %node.request_path(),
                        previous = %previous.path().display(),
                        replacement = %asset_path.display(),
                        "Mount overwrote an existing asset"
                    );
                } else {
                    tracing::debug!(
                        request_path = %node.request_path(),
                        replacement = %asset_path.display(),
                        "Mount overwrote an existing asset"
                    );
                }
            }
            mounted += 1;
        }
        tracing::debug!(mounted, "Mounted assets onto resource tree");
        Ok(())
    }
}
