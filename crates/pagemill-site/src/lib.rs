//! Site orchestration, mounting, and resource lookup for Pagemill.
//!
//! This crate maps a directory of source files into an addressable tree of
//! renderable resources, lets an ordered pipeline of processors rewrite that
//! tree, and answers consumer queries against the result:
//!
//! - [`DirectoryCollection`]: mounts discovered assets onto a resource tree
//! - [`ResourceCollection`]: exact-path lookup and glob search over a
//!   processed tree
//! - [`Site`]: owns the root path and pipeline, builds on demand, and
//!   optionally memoizes the collection ([`SiteConfig::cache_resources`])
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), pagemill_site::SiteError> {
//! use pagemill_site::Site;
//!
//! // Pages live under my-site/pages/**.
//! let mut site = Site::with_root("my-site");
//! let resources = site.resources()?;
//!
//! if let Some(page) = resources.get("/about") {
//!     println!("{}: {}", page.request_path(), page.mime_type());
//! }
//! for video in resources.glob("/videos/**").unwrap() {
//!     println!("{}", video.request_path());
//! }
//! # Ok(())
//! # }
//! ```

pub(crate) mod collection;
pub(crate) mod directory_collection;
pub(crate) mod site;

pub use collection::{ResourceCollection, Resources};
pub use directory_collection::DirectoryCollection;
pub use site::{Site, SiteConfig, SiteError};

// Re-export the building blocks so a site consumer needs only this crate.
pub use pagemill_asset::{Asset, AssetError, AssetScanner, Mime, ScanError};
pub use pagemill_tree::{
    DataMap, ProcManipulator, Resource, ResourceNode, ResourcesPipeline, TreeProcessor,
};
