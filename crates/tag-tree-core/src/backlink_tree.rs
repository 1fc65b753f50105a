use crate::content_type::ContentSuffixes;
use serde::Serialize;
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};

/// Resolves raw link text, as written in `source_id`, to a target document id.
pub trait LinkResolver {
    fn resolve_link(&self, link_text: &str, source_id: &str) -> Option<String>;
}

impl<F> LinkResolver for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn resolve_link(&self, link_text: &str, source_id: &str) -> Option<String> {
        self(link_text, source_id)
    }
}

/// A document and its outgoing link references, unresolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedDocument {
    pub id: String,
    pub links: Vec<String>,
}

impl LinkedDocument {
    pub fn new(id: impl Into<String>, links: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            links: links.into_iter().map(Into::into).collect(),
        }
    }
}

/// Index of a node inside the tree that allocated it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One path segment of the backlink key space.
#[derive(Debug)]
pub struct BacklinkTreeNode {
    id: NodeId,
    name: String,
    path: String,
    children: HashMap<String, NodeId>,
    direct_documents: HashSet<String>,
    aggregate: OnceCell<usize>,
}

impl BacklinkTreeNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full `/`-joined path from the virtual root, no leading slash.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn children(&self) -> &HashMap<String, NodeId> {
        &self.children
    }

    /// Documents whose own link resolves to exactly this path.
    pub fn direct_documents(&self) -> &HashSet<String> {
        &self.direct_documents
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Backlink keys mapped to the documents that reference them.
pub type BacklinkGroups = HashMap<String, HashSet<String>>;

/// Split a key into its non-empty segments.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.split('/').filter(|s| !s.is_empty())
}

/// Normalize a base path to its canonical `a/b` form. Empty means "everything".
fn normalize_base(base_path: &str) -> String {
    segments(base_path).collect::<Vec<_>>().join("/")
}

/// Compute the backlink key for a resolved target, or `None` when the target is
/// outside `base` or reduces to nothing.
fn backlink_key(target_id: &str, base: &str, suffixes: &ContentSuffixes) -> Option<String> {
    let relative = if base.is_empty() {
        target_id
    } else {
        let target = target_id.strip_prefix('/').unwrap_or(target_id);
        let rest = target.strip_prefix(base)?;
        // Base must end on a segment boundary: "tags" covers "tags/x", not "tagsx"
        rest.strip_prefix('/')?
    };

    let stripped = suffixes.strip(relative);
    let key = segments(stripped).collect::<Vec<_>>().join("/");
    (!key.is_empty()).then_some(key)
}

/// First pass: resolve every link and group referencing documents by key.
///
/// Keys are canonical (no leading slash, no empty segments), so each key maps
/// to exactly one node of the tree built from them.
pub fn group_backlinks<R>(
    documents: &[LinkedDocument],
    base_path: &str,
    resolver: &R,
    suffixes: &ContentSuffixes,
) -> BacklinkGroups
where
    R: LinkResolver + ?Sized,
{
    let base = normalize_base(base_path);
    let mut groups = BacklinkGroups::new();

    for document in documents {
        for link in &document.links {
            let Some(target) = resolver.resolve_link(link, &document.id) else {
                continue;
            };
            let Some(key) = backlink_key(&target, &base, suffixes) else {
                continue;
            };
            groups
                .entry(key)
                .or_default()
                .insert(document.id.clone());
        }
    }

    groups
}

/// Hierarchical backlink tree. Owns every node; the virtual root is implicit.
///
/// Aggregate counts are cached on the nodes themselves, so they live exactly as
/// long as the tree. Rebuilding means building a new tree.
#[derive(Debug, Default)]
pub struct BacklinkTree {
    nodes: Vec<BacklinkTreeNode>,
    roots: HashMap<String, NodeId>,
}

impl BacklinkTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Second pass: materialize one node chain per key.
    pub fn from_groups(groups: BacklinkGroups) -> Self {
        let mut tree = Self::new();
        for (key, documents) in groups {
            if let Some(leaf) = tree.ensure_path(&key) {
                tree.nodes[leaf.0].direct_documents = documents;
            }
        }
        tree
    }

    /// Walk the chain for `key`, creating missing nodes. `None` if `key` has no segments.
    fn ensure_path(&mut self, key: &str) -> Option<NodeId> {
        let mut current: Option<NodeId> = None;
        let mut path = String::new();

        for segment in segments(key) {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(segment);

            let existing = match current {
                None => self.roots.get(segment),
                Some(parent) => self.nodes[parent.0].children.get(segment),
            }
            .copied();

            let id = match existing {
                Some(id) => id,
                None => {
                    let id = NodeId(self.nodes.len());
                    self.nodes.push(BacklinkTreeNode {
                        id,
                        name: segment.to_string(),
                        path: path.clone(),
                        children: HashMap::new(),
                        direct_documents: HashSet::new(),
                        aggregate: OnceCell::new(),
                    });
                    match current {
                        None => self.roots.insert(segment.to_string(), id),
                        Some(parent) => self.nodes[parent.0]
                            .children
                            .insert(segment.to_string(), id),
                    };
                    id
                }
            };
            current = Some(id);
        }

        current
    }

    /// Root-level segment name -> root node.
    pub fn roots(&self) -> &HashMap<String, NodeId> {
        &self.roots
    }

    pub fn root(&self, name: &str) -> Option<&BacklinkTreeNode> {
        self.roots.get(name).map(|id| self.node(*id))
    }

    /// Look up a node by id. Panics on an id from another tree.
    pub fn node(&self, id: NodeId) -> &BacklinkTreeNode {
        &self.nodes[id.0]
    }

    /// Total number of nodes, roots included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BacklinkTreeNode> {
        self.nodes.iter()
    }

    /// Roots sorted by name, for display.
    pub fn sorted_roots(&self) -> Vec<&BacklinkTreeNode> {
        self.sorted(self.roots.values())
    }

    /// Children of `node` sorted by name, for display.
    pub fn sorted_children(&self, node: &BacklinkTreeNode) -> Vec<&BacklinkTreeNode> {
        self.sorted(node.children.values())
    }

    fn sorted<'a>(&self, ids: impl Iterator<Item = &'a NodeId>) -> Vec<&BacklinkTreeNode> {
        let mut nodes: Vec<&BacklinkTreeNode> = ids.map(|id| self.node(*id)).collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }

    /// Direct documents of `node` plus those of every descendant, memoized.
    ///
    /// Post-order with an explicit stack; depth is unbounded.
    pub fn aggregate_count(&self, node: &BacklinkTreeNode) -> usize {
        if let Some(count) = node.aggregate.get() {
            return *count;
        }

        let mut stack: Vec<(NodeId, bool)> = vec![(node.id, false)];
        while let Some((id, children_done)) = stack.pop() {
            let current = self.node(id);
            if current.aggregate.get().is_some() {
                continue;
            }

            if children_done {
                let descendants: usize = current
                    .children
                    .values()
                    .map(|child| self.node(*child).aggregate.get().copied().unwrap_or(0))
                    .sum();
                let _ = current
                    .aggregate
                    .set(current.direct_documents.len() + descendants);
            } else {
                stack.push((id, true));
                for child in current.children.values() {
                    if self.node(*child).aggregate.get().is_none() {
                        stack.push((*child, false));
                    }
                }
            }
        }

        node.aggregate.get().copied().unwrap_or(0)
    }

    /// `node.path` and every descendant path.
    pub fn collect_paths(&self, node: &BacklinkTreeNode) -> HashSet<String> {
        let mut paths = HashSet::new();
        self.collect_paths_into(node, &mut paths);
        paths
    }

    /// Like [`collect_paths`](Self::collect_paths), adding into an existing set.
    pub fn collect_paths_into(&self, node: &BacklinkTreeNode, into: &mut HashSet<String>) {
        let mut stack = vec![node.id];
        while let Some(id) = stack.pop() {
            let current = self.node(id);
            into.insert(current.path.clone());
            stack.extend(current.children.values().copied());
        }
    }

    /// Union of direct documents across `node` and its descendants.
    pub fn documents_under(&self, node: &BacklinkTreeNode) -> HashSet<&str> {
        let mut documents = HashSet::new();
        let mut stack = vec![node.id];
        while let Some(id) = stack.pop() {
            let current = self.node(id);
            documents.extend(current.direct_documents.iter().map(String::as_str));
            stack.extend(current.children.values().copied());
        }
        documents
    }

    /// Find the node at `path`. Empty and slash-only paths are never found.
    pub fn find_node(&self, path: &str) -> Option<&BacklinkTreeNode> {
        let mut segments = segments(path);
        let first = segments.next()?;
        let mut current = self.root(first)?;
        for segment in segments {
            let child = current.children.get(segment)?;
            current = self.node(*child);
        }
        Some(current)
    }

    /// Flattened, pre-order view of `node` and its subtree for serialization.
    ///
    /// Children come right after their parent, sorted by name. `max_depth`
    /// limits how many levels below `node` are listed.
    pub fn snapshot(&self, node: &BacklinkTreeNode, max_depth: Option<usize>) -> Vec<NodeSnapshot> {
        let mut out = Vec::new();
        self.snapshot_into(node, max_depth, &mut out);
        out
    }

    /// Snapshots of every root in name order, concatenated.
    pub fn snapshot_roots(&self, max_depth: Option<usize>) -> Vec<NodeSnapshot> {
        let mut out = Vec::new();
        for root in self.sorted_roots() {
            self.snapshot_into(root, max_depth, &mut out);
        }
        out
    }

    fn snapshot_into(&self, start: &BacklinkTreeNode, max_depth: Option<usize>, out: &mut Vec<NodeSnapshot>) {
        let mut stack = vec![(start, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let children = self.sorted_children(node);
            let mut documents: Vec<String> = node.direct_documents.iter().cloned().collect();
            documents.sort();

            out.push(NodeSnapshot {
                name: node.name.clone(),
                path: node.path.clone(),
                depth,
                count: self.aggregate_count(node),
                documents,
                children: children.iter().map(|child| child.name.clone()).collect(),
            });

            if max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            // reversed so the pop order stays sorted
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
}

/// Serializable copy of one node inside a flattened snapshot.
///
/// The list is flat so arbitrarily deep trees serialize and drop without
/// nesting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub path: String,
    /// Levels below the node the snapshot started from.
    pub depth: usize,
    pub count: usize,
    pub documents: Vec<String>,
    /// Child names, sorted. Entries past `max_depth` are not in the list.
    pub children: Vec<String>,
}

/// Build the backlink tree for `documents`.
///
/// Only links resolving under `base_path` count; an empty base takes all of
/// them. The result is a fresh tree with no cached counts.
pub fn build_tree<R>(
    documents: &[LinkedDocument],
    base_path: &str,
    resolver: &R,
    suffixes: &ContentSuffixes,
) -> BacklinkTree
where
    R: LinkResolver + ?Sized,
{
    if documents.is_empty() {
        return BacklinkTree::new();
    }

    let groups = group_backlinks(documents, base_path, resolver, suffixes);
    let key_count = groups.len();
    let tree = BacklinkTree::from_groups(groups);

    tracing::debug!(
        "Backlink tree: {} documents -> {} keys, {} nodes, {} roots (base={:?})",
        documents.len(),
        key_count,
        tree.len(),
        tree.roots.len(),
        base_path
    );

    tree
}
