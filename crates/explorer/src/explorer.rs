use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::vault::Vault;
use std::collections::HashSet;
use std::path::Path;
use tag_tree_core::{build_tree, BacklinkTree, BacklinkTreeNode, DocumentResolver};

/// A scanned vault together with its resolver and current backlink tree.
///
/// The tree is never patched: any change to the documents or settings rebuilds
/// it from scratch, dropping the old nodes and their cached counts.
pub struct Explorer {
    config: ExplorerConfig,
    vault: Vault,
    resolver: DocumentResolver,
    tree: BacklinkTree,
}

impl Explorer {
    pub fn new(vault: Vault, config: ExplorerConfig) -> Self {
        let resolver = DocumentResolver::from_ids(config.extensions.clone(), vault.ids());
        let mut explorer = Self {
            config,
            vault,
            resolver,
            tree: BacklinkTree::new(),
        };
        explorer.rebuild();
        explorer
    }

    /// Scan `root` and build the tree.
    pub fn open(root: &Path, config: ExplorerConfig) -> Result<Self> {
        let vault = Vault::scan(root, &config)?;
        Ok(Self::new(vault, config))
    }

    pub fn rebuild(&mut self) {
        self.tree = build_tree(
            self.vault.documents(),
            &self.config.base_path,
            &self.resolver,
            &self.config.extensions,
        );
        tracing::debug!(
            "Rebuilt tree for {}: {} nodes",
            self.vault.root().display(),
            self.tree.len()
        );
    }

    /// Re-read the vault from disk, then rebuild.
    pub fn rescan(&mut self) -> Result<()> {
        let vault = Vault::scan(self.vault.root(), &self.config)?;
        self.resolver = DocumentResolver::from_ids(self.config.extensions.clone(), vault.ids());
        self.vault = vault;
        self.rebuild();
        Ok(())
    }

    pub fn set_base_path(&mut self, base_path: impl Into<String>) {
        self.config.base_path = base_path.into();
        self.rebuild();
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn tree(&self) -> &BacklinkTree {
        &self.tree
    }

    pub fn find(&self, path: &str) -> Option<&BacklinkTreeNode> {
        self.tree.find_node(path)
    }

    /// Documents referencing `path` or anything below it, sorted. Empty when
    /// the path is not in the tree.
    pub fn documents_under(&self, path: &str) -> Vec<String> {
        let Some(node) = self.tree.find_node(path) else {
            return Vec::new();
        };
        let mut documents: Vec<String> = self
            .tree
            .documents_under(node)
            .into_iter()
            .map(str::to_string)
            .collect();
        documents.sort();
        documents
    }

    /// `path` and every tree path below it, for filtering the file list.
    pub fn filter_paths(&self, path: &str) -> HashSet<String> {
        self.tree
            .find_node(path)
            .map(|node| self.tree.collect_paths(node))
            .unwrap_or_default()
    }
}
