//! Resource tree and manipulation pipeline for Pagemill.
//!
//! This crate provides:
//! - [`ResourceNode`]: a mutable ownership tree mapping request-path segments
//!   to nodes, each optionally backed by an [`Asset`](pagemill_asset::Asset)
//! - [`Resource`]: the queryable node + asset combination exposed to consumers
//! - [`ResourcesPipeline`]: an ordered chain of [`TreeProcessor`]s that
//!   rewrite a mounted tree before it is queried
//! - [`ProcManipulator`]: adapter turning a per-resource callback into a
//!   tree processor
//!
//! # Ownership
//!
//! [`ResourceNode`] is a cheaply clonable handle; parents own their children
//! and a node removed from its parent stays alive (with its subtree) for as
//! long as a handle to it exists, so manipulators can legally re-graft it
//! elsewhere.
//!
//! The tree is single-threaded by design: handles are `Rc`-based and the
//! types are deliberately not `Send`. One build cycle owns one tree.

pub(crate) mod node;
pub(crate) mod pipeline;
pub(crate) mod resource;

pub use node::{DataMap, ResourceNode};
pub use pipeline::{ProcManipulator, ResourcesPipeline, TreeProcessor};
pub use resource::Resource;
