//! Flattened, queryable view over a processed resource tree.

use std::path::{Path, PathBuf};

use pagemill_tree::{Resource, ResourceNode};

/// Read-only index over a fully processed tree: exact-path lookup plus
/// glob-pattern search.
///
/// The collection holds the tree it was built from; it is rebuilt whenever
/// the tree is rebuilt. Queries walk the live tree, so a collection must not
/// be queried concurrently with tree mutation (single-threaded by design).
#[derive(Clone, Debug)]
pub struct ResourceCollection {
    root: ResourceNode,
    root_path: PathBuf,
}

impl ResourceCollection {
    /// Wrap a processed root node.
    ///
    /// `root_path` is kept for human-facing diagnostics only; lookups never
    /// consult it.
    #[must_use]
    pub fn new(root: ResourceNode, root_path: impl Into<PathBuf>) -> Self {
        Self {
            root,
            root_path: root_path.into(),
        }
    }

    /// The processed tree this collection indexes.
    #[must_use]
    pub fn root(&self) -> &ResourceNode {
        &self.root
    }

    /// The site root path this collection was built for (diagnostics only).
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Look up the resource at a request path.
    ///
    /// The path is normalized to a leading slash and no trailing slash
    /// (except the bare root `/`) before walking the tree segment by
    /// segment. Returns `None` on any missing segment or if the terminal
    /// node carries no asset. No partial matches, no redirects, no
    /// case-folding.
    #[must_use]
    pub fn get(&self, request_path: &str) -> Option<Resource> {
        let normalized = normalize_request_path(request_path);
        let mut node = self.root.clone();
        for segment in normalized.split('/').filter(|s| !s.is_empty()) {
            node = node.get_child(segment)?;
        }
        Resource::new(node)
    }

    /// Lazily iterate every resource whose request path matches a glob
    /// pattern (e.g. `/videos/**`).
    ///
    /// The iterator is restartable: each call re-walks the tree in
    /// deterministic pre-order.
    ///
    /// # Errors
    ///
    /// Returns the pattern parse failure if `pattern` is malformed.
    pub fn glob(&self, pattern: &str) -> Result<Resources, glob::PatternError> {
        let pattern = glob::Pattern::new(&normalize_request_path(pattern))?;
        Ok(Resources {
            stack: vec![self.root.clone()],
            pattern: Some(pattern),
        })
    }

    /// Lazily iterate every resource in the collection, in pre-order.
    #[must_use]
    pub fn iter(&self) -> Resources {
        Resources {
            stack: vec![self.root.clone()],
            pattern: None,
        }
    }
}

/// Normalize a request path: leading slash, no trailing slash except root.
fn normalize_request_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Lazy pre-order iterator over the asset-bearing nodes of a tree.
#[derive(Clone, Debug)]
pub struct Resources {
    stack: Vec<ResourceNode>,
    pattern: Option<glob::Pattern>,
}

impl Iterator for Resources {
    type Item = Resource;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            let mut children = node.children();
            children.reverse();
            self.stack.extend(children);

            let Some(resource) = Resource::new(node) else {
                continue;
            };
            match &self.pattern {
                Some(pattern) if !pattern.matches(&resource.request_path()) => {}
                _ => return Some(resource),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use pagemill_asset::Asset;
    use pretty_assertions::assert_eq;

    use super::*;

    fn mount(root: &ResourceNode, rel: &str) {
        let asset = Asset::new(format!("pages/{rel}"), "pages").unwrap();
        let mut node = root.clone();
        for segment in asset.request_path().split('/').filter(|s| !s.is_empty()) {
            node = node.add_child(segment);
        }
        node.attach_asset(asset);
    }

    fn collection(files: &[&str]) -> ResourceCollection {
        let root = ResourceNode::root();
        for file in files {
            mount(&root, file);
        }
        ResourceCollection::new(root, ".")
    }

    #[test]
    fn test_get_walks_segments() {
        let collection = collection(&["a/b/c.html.erb"]);

        let resource = collection.get("/a/b/c").unwrap();
        assert_eq!(resource.request_path(), "/a/b/c");
        assert_eq!(resource.asset().format_extensions(), [".erb", ".html"]);
    }

    #[test]
    fn test_get_normalizes_slashes() {
        let collection = collection(&["about.html"]);

        assert!(collection.get("about").is_some());
        assert!(collection.get("/about/").is_some());
        assert!(collection.get("/about").is_some());
    }

    #[test]
    fn test_get_misses_return_none() {
        let collection = collection(&["a/b.html"]);

        assert!(collection.get("/missing").is_none());
        assert!(collection.get("/a/b/too-deep").is_none());
        // "/a" exists as a directory node but has no backing asset.
        assert!(collection.get("/a").is_none());
    }

    #[test]
    fn test_get_root_requires_root_asset() {
        let collection = collection(&["about.html"]);
        assert!(collection.get("/").is_none());

        let asset = Asset::new("pages/index.html", "pages").unwrap();
        collection.root().attach_asset(asset);
        assert!(collection.get("/").is_some());
        assert!(collection.get("").is_some());
    }

    #[test]
    fn test_glob_filters_by_pattern() {
        let collection = collection(&[
            "videos/one.html",
            "videos/deep/two.html",
            "articles/three.html",
        ]);

        let paths: Vec<String> = collection
            .glob("/videos/**")
            .unwrap()
            .map(|r| r.request_path())
            .collect();

        assert_eq!(paths, ["/videos/one", "/videos/deep/two"]);
    }

    #[test]
    fn test_glob_is_restartable() {
        let collection = collection(&["videos/one.html", "videos/two.html"]);

        let first: Vec<String> = collection
            .glob("/videos/**")
            .unwrap()
            .map(|r| r.request_path())
            .collect();
        let second: Vec<String> = collection
            .glob("/videos/**")
            .unwrap()
            .map(|r| r.request_path())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_iter_is_preorder_and_skips_directory_nodes() {
        let collection = collection(&["a/one.html", "b.html"]);

        let paths: Vec<String> = collection.iter().map(|r| r.request_path()).collect();

        assert_eq!(paths, ["/a/one", "/b"]);
    }

    #[test]
    fn test_normalize_request_path() {
        assert_eq!(normalize_request_path(""), "/");
        assert_eq!(normalize_request_path("/"), "/");
        assert_eq!(normalize_request_path("about"), "/about");
        assert_eq!(normalize_request_path("/about/"), "/about");
        assert_eq!(normalize_request_path("/a/b"), "/a/b");
    }
}
