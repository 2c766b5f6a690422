//! The mutable resource tree.
//!
//! Nodes are `Rc<RefCell<_>>` handles: cloning a [`ResourceNode`] clones the
//! handle, not the subtree. Parent links are weak, so dropping every handle
//! to a detached subtree frees it.
//!
//! # Invariants
//!
//! - Children are unique by name; [`ResourceNode::add_child`] is idempotent
//! - The tree is acyclic; a node's request path is the concatenation of
//!   ancestor names from its root
//! - Traversal is pre-order, deterministic by child insertion order

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use pagemill_asset::Asset;

/// Caller-mutable scratch data attached to a node (e.g. `data["layout"]`).
pub type DataMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug)]
struct NodeInner {
    name: String,
    parent: Weak<RefCell<NodeInner>>,
    children: Vec<ResourceNode>,
    asset: Option<Rc<Asset>>,
    /// Union of format extensions available at this node.
    formats: Vec<String>,
    data: DataMap,
}

/// A handle to one node of the resource tree.
///
/// Each node has a path segment name, children unique by name, an optional
/// backing [`Asset`], and a format set recording which extensions are
/// renderable at this position.
#[derive(Clone, Debug)]
pub struct ResourceNode(Rc<RefCell<NodeInner>>);

impl ResourceNode {
    /// Create an empty root node (empty name, no parent).
    #[must_use]
    pub fn root() -> Self {
        Self(Rc::new(RefCell::new(NodeInner {
            name: String::new(),
            parent: Weak::new(),
            children: Vec::new(),
            asset: None,
            formats: Vec::new(),
            data: DataMap::new(),
        })))
    }

    /// This node's path segment name. Empty for a root.
    #[must_use]
    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    /// Get or create the child with the given name.
    ///
    /// Idempotent: an existing child is returned untouched, otherwise an
    /// empty node is created, attached, and returned.
    pub fn add_child(&self, name: &str) -> ResourceNode {
        if let Some(existing) = self.get_child(name) {
            return existing;
        }

        let child = Self(Rc::new(RefCell::new(NodeInner {
            name: name.to_string(),
            parent: Rc::downgrade(&self.0),
            children: Vec::new(),
            asset: None,
            formats: Vec::new(),
            data: DataMap::new(),
        })));
        self.0.borrow_mut().children.push(child.clone());
        child
    }

    /// Look up a direct child by name.
    #[must_use]
    pub fn get_child(&self, name: &str) -> Option<ResourceNode> {
        self.0
            .borrow()
            .children
            .iter()
            .find(|child| child.0.borrow().name == name)
            .cloned()
    }

    /// Snapshot of the child handles, in insertion order.
    #[must_use]
    pub fn children(&self) -> Vec<ResourceNode> {
        self.0.borrow().children.clone()
    }

    /// The parent node, if this node is attached to one.
    #[must_use]
    pub fn parent(&self) -> Option<ResourceNode> {
        self.0.borrow().parent.upgrade().map(Self)
    }

    /// Set the backing asset, merging its format extensions into this node's
    /// format set. Returns the previously attached asset, if any.
    ///
    /// Overwriting is allowed: later mounts win, so plugins and
    /// later-discovered files can replace content. Callers that want to
    /// surface conflicts can inspect the returned previous asset.
    pub fn attach_asset(&self, asset: impl Into<Rc<Asset>>) -> Option<Rc<Asset>> {
        let asset = asset.into();
        let mut inner = self.0.borrow_mut();
        for ext in asset.format_extensions() {
            if !inner.formats.contains(ext) {
                inner.formats.push(ext.clone());
            }
        }
        inner.asset.replace(asset)
    }

    /// The backing asset, if any.
    #[must_use]
    pub fn asset(&self) -> Option<Rc<Asset>> {
        self.0.borrow().asset.clone()
    }

    /// Detach this node from its parent.
    ///
    /// Children remain owned by the detached subtree, so it can be re-grafted
    /// under another parent. Removing a root (or an already detached node) is
    /// a no-op.
    pub fn remove(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent
            .0
            .borrow_mut()
            .children
            .retain(|child| !Rc::ptr_eq(&child.0, &self.0));
        self.0.borrow_mut().parent = Weak::new();
    }

    /// The format extensions available at this node, in merge order.
    #[must_use]
    pub fn formats(&self) -> Vec<String> {
        self.0.borrow().formats.clone()
    }

    /// Add one extension to the format set, if not already present.
    pub fn add_format(&self, ext: &str) {
        let mut inner = self.0.borrow_mut();
        if !inner.formats.iter().any(|f| f == ext) {
            inner.formats.push(ext.to_string());
        }
    }

    /// Remove one extension from the format set without detaching the node.
    ///
    /// Returns whether the extension was present. Used to demote a node from
    /// renderable to directory-only before re-parenting its asset.
    pub fn remove_format(&self, ext: &str) -> bool {
        let mut inner = self.0.borrow_mut();
        let before = inner.formats.len();
        inner.formats.retain(|f| f != ext);
        inner.formats.len() != before
    }

    /// The node's full request path: `/` followed by ancestor names from the
    /// root, separated by `/`.
    ///
    /// A detached node is its own root, so its path is relative to wherever
    /// it is (re-)attached.
    #[must_use]
    pub fn request_path(&self) -> String {
        let mut segments = Vec::new();
        let mut current = self.clone();
        loop {
            let (name, parent) = {
                let inner = current.0.borrow();
                (inner.name.clone(), inner.parent.upgrade())
            };
            match parent {
                Some(parent) => {
                    segments.push(name);
                    current = Self(parent);
                }
                None => break,
            }
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// Scratch data attached to this node.
    #[must_use]
    pub fn data(&self) -> Ref<'_, DataMap> {
        Ref::map(self.0.borrow(), |inner| &inner.data)
    }

    /// Mutable access to the scratch data attached to this node.
    #[must_use]
    pub fn data_mut(&self) -> RefMut<'_, DataMap> {
        RefMut::map(self.0.borrow_mut(), |inner| &mut inner.data)
    }

    /// Depth-first pre-order traversal starting at (and including) this node.
    ///
    /// Children are visited in insertion order. The traversal is live, not
    /// snapshotted: a visitor that mutates the tree sees its own mutations on
    /// nodes it has not reached yet. Nodes detached mid-traversal are
    /// skipped; no borrow is held while the visitor runs, so visitors may
    /// freely add, remove, and re-parent nodes.
    pub fn for_each_descendant<F: FnMut(&ResourceNode)>(&self, visitor: &mut F) {
        visitor(self);
        for child in self.children() {
            let still_attached = child
                .parent()
                .is_some_and(|parent| Rc::ptr_eq(&parent.0, &self.0));
            if still_attached {
                child.for_each_descendant(visitor);
            }
        }
    }

    /// Whether two handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &ResourceNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ResourceNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ResourceNode {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_asset(rel: &str) -> Asset {
        Asset::new(format!("pages/{rel}"), "pages").unwrap()
    }

    #[test]
    fn test_add_child_is_idempotent() {
        let root = ResourceNode::root();

        let first = root.add_child("videos");
        let second = root.add_child("videos");

        assert_eq!(first, second);
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_attach_asset_merges_formats() {
        let root = ResourceNode::root();
        let node = root.add_child("about");

        node.attach_asset(test_asset("about.html.erb"));

        assert_eq!(node.formats(), [".erb", ".html"]);
    }

    #[test]
    fn test_attach_asset_overwrites_and_returns_previous() {
        let root = ResourceNode::root();
        let node = root.add_child("index");

        let first = node.attach_asset(test_asset("index.html"));
        assert!(first.is_none());

        let second = node.attach_asset(test_asset("index.md"));
        assert_eq!(second.unwrap().request_path(), "/index");
        assert_eq!(node.asset().unwrap().format_extensions(), [".md"]);

        // Formats accumulate across mounts.
        assert_eq!(node.formats(), [".html", ".md"]);
    }

    #[test]
    fn test_remove_detaches_but_keeps_subtree() {
        let root = ResourceNode::root();
        let videos = root.add_child("videos");
        let intro = videos.add_child("intro");

        videos.remove();

        assert!(root.get_child("videos").is_none());
        assert!(videos.parent().is_none());
        // Subtree survives on the detached node.
        assert_eq!(videos.get_child("intro").unwrap(), intro);
    }

    #[test]
    fn test_removed_subtree_can_be_regrafted() {
        let root = ResourceNode::root();
        let index = root.add_child("index");
        index.attach_asset(test_asset("index.html"));

        let asset = index.asset().unwrap();
        index.remove_format(".html");
        index.remove();

        let promoted = root.add_child("x");
        promoted.attach_asset(asset);

        assert!(root.get_child("index").is_none());
        assert_eq!(promoted.request_path(), "/x");
        assert_eq!(promoted.asset().unwrap().request_path(), "/index");
    }

    #[test]
    fn test_remove_format() {
        let root = ResourceNode::root();
        let node = root.add_child("about");
        node.attach_asset(test_asset("about.html.erb"));

        assert!(node.remove_format(".html"));
        assert!(!node.remove_format(".html"));
        assert_eq!(node.formats(), [".erb"]);

        node.add_format(".html");
        node.add_format(".html");
        assert_eq!(node.formats(), [".erb", ".html"]);
    }

    #[test]
    fn test_request_path_concatenates_ancestors() {
        let root = ResourceNode::root();
        let c = root.add_child("a").add_child("b").add_child("c");

        assert_eq!(root.request_path(), "/");
        assert_eq!(c.request_path(), "/a/b/c");
    }

    #[test]
    fn test_traversal_is_preorder_by_insertion() {
        let root = ResourceNode::root();
        let a = root.add_child("a");
        a.add_child("a1");
        a.add_child("a2");
        root.add_child("b");

        let mut visited = Vec::new();
        root.for_each_descendant(&mut |node| visited.push(node.request_path()));

        assert_eq!(visited, ["/", "/a", "/a/a1", "/a/a2", "/b"]);
    }

    #[test]
    fn test_traversal_skips_nodes_detached_by_visitor() {
        let root = ResourceNode::root();
        root.add_child("a");
        let b = root.add_child("b");
        root.add_child("c");

        let mut visited = Vec::new();
        root.for_each_descendant(&mut |node| {
            if node.name() == "a" {
                b.remove();
            }
            visited.push(node.name());
        });

        assert_eq!(visited, ["", "a", "c"]);
    }

    #[test]
    fn test_traversal_sees_additions_in_unvisited_subtrees() {
        let root = ResourceNode::root();
        root.add_child("a");
        let b = root.add_child("b");

        let mut visited = Vec::new();
        root.for_each_descendant(&mut |node| {
            if node.name() == "a" {
                b.add_child("late");
            }
            visited.push(node.name());
        });

        assert_eq!(visited, ["", "a", "b", "late"]);
    }

    #[test]
    fn test_data_persists_on_node() {
        let root = ResourceNode::root();
        let node = root.add_child("videos");

        node.data_mut()
            .insert("layout".to_string(), "video".into());

        assert_eq!(
            node.data().get("layout"),
            Some(&serde_json::Value::from("video"))
        );
    }
}
