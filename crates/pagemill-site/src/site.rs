//! Site orchestration: discover, mount, process, query.
//!
//! [`Site`] ties the crates together: it owns the root path and the
//! [`ResourcesPipeline`], builds the resource tree on demand, and optionally
//! memoizes the resulting [`ResourceCollection`] across calls.
//!
//! # Build Cycle
//!
//! Every [`Site::root`] call runs Discover → Mount → Process from scratch:
//! scan the pages directory, mount each asset onto a fresh tree, then run
//! every pipeline stage in registration order. [`Site::resources`] wraps that
//! with the caching contract of [`SiteConfig::cache_resources`].
//!
//! # Threading
//!
//! One build cycle owns one tree; the types are `Rc`-based and deliberately
//! not `Send`, and the build entry points take `&mut self`, so the
//! single-writer discipline is enforced by the compiler rather than by a
//! runtime lock.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;

use pagemill_asset::{AssetScanner, ScanError, SWAP_FILE_SUFFIXES};
use pagemill_tree::{ProcManipulator, Resource, ResourceNode, ResourcesPipeline, TreeProcessor};

use crate::collection::{ResourceCollection, Resources};
use crate::directory_collection::DirectoryCollection;

/// Error returned by site build and query operations.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Asset discovery could not start.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// A query glob pattern failed to parse.
    #[error("invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Parse failure from the glob engine.
        #[source]
        source: glob::PatternError,
    },
}

/// Configuration for [`Site`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root path of the site project; pages live under `<root_path>/pages`.
    pub root_path: PathBuf,
    /// Memoize the resource collection across [`Site::resources`] calls.
    ///
    /// Off (the default) is development mode: every call rebuilds, so file
    /// edits are observed without restarting the process. On is production
    /// mode: the first call builds, later calls reuse the collection until
    /// [`Site::clear_resources_cache`]. A deliberate latency/freshness
    /// trade-off.
    pub cache_resources: bool,
    /// Discovery glob pattern, relative to the pages path.
    pub glob: String,
    /// File-name suffixes excluded from discovery (editor swap files).
    pub swap_file_suffixes: Vec<String>,
    /// Emit a warning when two files mount to the same request path.
    pub warn_on_overwrite: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("."),
            cache_resources: false,
            glob: "**/*".to_string(),
            swap_file_suffixes: SWAP_FILE_SUFFIXES.iter().map(ToString::to_string).collect(),
            warn_on_overwrite: false,
        }
    }
}

/// A collection of renderable resources built from a directory of pages.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), pagemill_site::SiteError> {
/// use pagemill_site::Site;
///
/// let mut site = Site::with_root("my-site");
/// site.manipulate(|resource, _root| {
///     if resource.request_path().starts_with("/videos/") {
///         resource.data_mut().insert("layout".to_string(), "video".into());
///     }
/// });
///
/// let resources = site.resources()?;
/// if let Some(page) = resources.get("/videos/intro") {
///     println!("{} is {}", page.request_path(), page.mime_type());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Site {
    config: SiteConfig,
    pipeline: ResourcesPipeline,
    cached: Option<Rc<ResourceCollection>>,
}

impl Site {
    /// Create a site from configuration.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            pipeline: ResourcesPipeline::new(),
            cached: None,
        }
    }

    /// Create a site rooted at `root_path` with default configuration.
    #[must_use]
    pub fn with_root(root_path: impl Into<PathBuf>) -> Self {
        Self::new(SiteConfig {
            root_path: root_path.into(),
            ..SiteConfig::default()
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Root path of the site project.
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.config.root_path
    }

    /// Location of the site's pages: `<root_path>/pages`.
    #[must_use]
    pub fn pages_path(&self) -> PathBuf {
        self.config.root_path.join("pages")
    }

    /// Register a tree processor for every subsequent build.
    ///
    /// Processors only affect builds that happen after registration;
    /// pipeline composition is not retroactive to an already cached
    /// collection.
    pub fn process_with(&mut self, processor: impl TreeProcessor + 'static) {
        self.pipeline.append(processor);
    }

    /// Register a per-resource manipulation callback.
    ///
    /// Sugar for appending a [`ProcManipulator`] to the pipeline. The
    /// callback receives each asset-bearing resource and the tree root, and
    /// may rewrite data or tree structure; see [`ProcManipulator`] for the
    /// traversal contract.
    pub fn manipulate<F>(&mut self, callback: F)
    where
        F: FnMut(&Resource, &ResourceNode) + 'static,
    {
        self.pipeline.append(ProcManipulator::new(callback));
    }

    /// Build the resource tree from scratch: discover assets, mount them,
    /// and run the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Scan`] if discovery cannot start.
    pub fn root(&mut self) -> Result<ResourceNode, SiteError> {
        let pages_path = self.pages_path();
        tracing::debug!(pages_path = %pages_path.display(), "Discovering assets");
        let scanner = AssetScanner::new(pages_path)
            .with_pattern(self.config.glob.clone())
            .with_swap_suffixes(self.config.swap_file_suffixes.clone());

        let root = ResourceNode::root();
        DirectoryCollection::new(scanner)
            .warn_on_overwrite(self.config.warn_on_overwrite)
            .mount(&root)?;

        tracing::debug!(stages = self.pipeline.len(), "Processing resource tree");
        self.pipeline.run_all(&root);
        Ok(root)
    }

    /// The queryable collection of all resources within [`Site::root`].
    ///
    /// With `cache_resources` off, every call performs a fresh build. With it
    /// on, the first call builds and memoizes; later calls return the
    /// memoized collection until [`Site::clear_resources_cache`].
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Scan`] if a fresh build is needed and discovery
    /// cannot start.
    pub fn resources(&mut self) -> Result<Rc<ResourceCollection>, SiteError> {
        if !self.config.cache_resources {
            self.clear_resources_cache();
        }
        if let Some(cached) = &self.cached {
            return Ok(Rc::clone(cached));
        }

        let root = self.root()?;
        let collection = Rc::new(ResourceCollection::new(root, self.config.root_path.clone()));
        self.cached = Some(Rc::clone(&collection));
        Ok(collection)
    }

    /// Drop the memoized resource collection, forcing the next
    /// [`Site::resources`] call to rebuild.
    pub fn clear_resources_cache(&mut self) {
        self.cached = None;
    }

    /// Look up a resource by request path. Delegates to [`Site::resources`].
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Scan`] if a fresh build fails to start; a plain
    /// lookup miss is `Ok(None)`.
    pub fn get(&mut self, request_path: &str) -> Result<Option<Resource>, SiteError> {
        Ok(self.resources()?.get(request_path))
    }

    /// Iterate resources matching a request-path glob. Delegates to
    /// [`Site::resources`].
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Pattern`] for a malformed pattern, or
    /// [`SiteError::Scan`] if a fresh build fails to start.
    pub fn glob(&mut self, pattern: &str) -> Result<Resources, SiteError> {
        self.resources()?
            .glob(pattern)
            .map_err(|source| SiteError::Pattern {
                pattern: pattern.to_string(),
                source,
            })
    }
}
