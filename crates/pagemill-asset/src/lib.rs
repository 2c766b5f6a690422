//! Asset model and filesystem discovery for Pagemill.
//!
//! This crate provides:
//! - [`Asset`]: one physical file decomposed into a request path, an ordered
//!   stack of format extensions, and a MIME type
//! - [`AssetScanner`]: restartable discovery of assets under a pages root
//!
//! # Path Convention
//!
//! Request paths are URL-like: a leading slash, forward-slash separators, and
//! no trailing format extensions:
//! - `pages/index.html.erb` -> `/index`
//! - `pages/videos/intro.html` -> `/videos/intro`
//! - `pages/logo.png` -> `/logo` (the extension stack records `.png`)

pub(crate) mod asset;
pub(crate) mod scan;

pub use asset::{Asset, AssetError};
pub use scan::{AssetScanner, ScanError, ScannedAssets, SWAP_FILE_SUFFIXES};

// Re-export the MIME type so downstream crates don't need a direct
// mime_guess dependency just to name it.
pub use mime_guess::Mime;
