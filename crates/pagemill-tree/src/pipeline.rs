//! The ordered chain of tree processors run after mounting.
//!
//! Stages are not isolated from each other: each processor receives the tree
//! exactly as the previous stage left it, in strict registration order. That
//! is the contract plugins rely on, not an implementation accident.

use crate::node::ResourceNode;
use crate::resource::Resource;

/// A single stage of the resources pipeline.
///
/// A processor receives the mounted root node and may mutate the tree
/// arbitrarily: add, remove, and re-parent nodes, or attach data. It must
/// preserve the tree's acyclic invariant; a processor that introduces a cycle
/// is a programming error, not a handled failure mode.
pub trait TreeProcessor {
    /// Process the tree rooted at `root`, mutating it in place.
    fn process(&mut self, root: &ResourceNode);
}

/// An ordered, appendable sequence of [`TreeProcessor`]s.
///
/// Append-only during configuration; fully consumed, each stage exactly once
/// in order, during a build.
#[derive(Default)]
pub struct ResourcesPipeline {
    processors: Vec<Box<dyn TreeProcessor>>,
}

impl ResourcesPipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a processor to the end of the chain.
    pub fn append(&mut self, processor: impl TreeProcessor + 'static) {
        self.processors.push(Box::new(processor));
    }

    /// Number of registered processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Whether no processors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run every processor in registration order against `root`.
    pub fn run_all(&mut self, root: &ResourceNode) {
        for (stage, processor) in self.processors.iter_mut().enumerate() {
            tracing::debug!(stage, "Running tree processor");
            processor.process(root);
        }
    }
}

impl std::fmt::Debug for ResourcesPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcesPipeline")
            .field("stages", &self.processors.len())
            .finish()
    }
}

/// Adapter that turns a per-resource callback into a [`TreeProcessor`].
///
/// The callback is invoked with a transient [`Resource`] view for every
/// asset-bearing node of a live pre-order traversal, plus the tree's root so
/// it can detach and reattach nodes. Because the traversal is live, a
/// callback that mutates sibling or descendant structure observes its own
/// mutations on nodes it has not reached yet; patterns like "promote index to
/// root" depend on this.
///
/// # Example
///
/// ```
/// use pagemill_tree::{ProcManipulator, ResourcesPipeline};
///
/// let mut pipeline = ResourcesPipeline::new();
/// pipeline.append(ProcManipulator::new(|resource, _root| {
///     if resource.request_path().starts_with("/videos/") {
///         resource.data_mut().insert("layout".to_string(), "video".into());
///     }
/// }));
/// ```
pub struct ProcManipulator<F> {
    callback: F,
}

impl<F> ProcManipulator<F>
where
    F: FnMut(&Resource, &ResourceNode),
{
    /// Wrap a per-resource callback.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> TreeProcessor for ProcManipulator<F>
where
    F: FnMut(&Resource, &ResourceNode),
{
    fn process(&mut self, root: &ResourceNode) {
        let callback = &mut self.callback;
        root.for_each_descendant(&mut |node| {
            if let Some(resource) = Resource::new(node.clone()) {
                callback(&resource, root);
            }
        });
    }
}
