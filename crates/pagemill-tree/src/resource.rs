//! The queryable node + asset combination exposed to consumers.

use std::cell::{Ref, RefMut};
use std::rc::Rc;

use pagemill_asset::{Asset, Mime};

use crate::node::{DataMap, ResourceNode};

/// A renderable resource: a tree node together with its backing asset.
///
/// Resources are thin views constructed on demand; the node and its scratch
/// data are shared, so data written through one view (e.g. by a pipeline
/// manipulator) is visible through every later view of the same node.
#[derive(Clone, Debug)]
pub struct Resource {
    node: ResourceNode,
    asset: Rc<Asset>,
}

impl Resource {
    /// Build a resource view of `node`, or `None` if it has no backing asset.
    #[must_use]
    pub fn new(node: ResourceNode) -> Option<Self> {
        let asset = node.asset()?;
        Some(Self { node, asset })
    }

    /// The request path of the node this resource currently sits at.
    ///
    /// Follows the node, not the asset: re-parenting the node changes the
    /// path a consumer addresses this resource by.
    #[must_use]
    pub fn request_path(&self) -> String {
        self.node.request_path()
    }

    /// MIME type of the backing asset.
    #[must_use]
    pub fn mime_type(&self) -> &Mime {
        self.asset.mime_type()
    }

    /// The tree node backing this resource.
    #[must_use]
    pub fn node(&self) -> &ResourceNode {
        &self.node
    }

    /// The asset backing this resource.
    #[must_use]
    pub fn asset(&self) -> &Rc<Asset> {
        &self.asset
    }

    /// Scratch data shared with the backing node.
    #[must_use]
    pub fn data(&self) -> Ref<'_, DataMap> {
        self.node.data()
    }

    /// Mutable scratch data shared with the backing node.
    #[must_use]
    pub fn data_mut(&self) -> RefMut<'_, DataMap> {
        self.node.data_mut()
    }
}
