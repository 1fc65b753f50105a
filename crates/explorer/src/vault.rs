use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};
use std::path::{Path, PathBuf};
use tag_tree_core::link_parser::extract_links;
use tag_tree_core::LinkedDocument;
use walkdir::WalkDir;

/// Vault-relative id for `path`, always `/`-separated.
fn relative_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}

/// The documents of a vault directory and their outgoing links.
///
/// Every content file becomes a document so it can be a link target; only
/// markdown text is scanned for links.
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
    documents: Vec<LinkedDocument>,
}

impl Vault {
    pub fn scan(root: &Path, config: &ExplorerConfig) -> Result<Self> {
        if !root.is_dir() {
            return Err(ExplorerError::VaultNotFound(root.to_path_buf()));
        }

        let options = config.link_options();
        let mut documents = Vec::new();
        let mut skipped = 0usize;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                match relative_id(root, entry.path()) {
                    Some(dir) if config.is_excluded_dir(&dir) => {
                        tracing::debug!("Skipping excluded directory {}", dir);
                        false
                    }
                    _ => true,
                }
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable vault entry: {}", e);
                    skipped += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(id) = relative_id(root, entry.path()) else {
                continue;
            };
            if config.is_excluded(&id) || !config.extensions.is_content_path(&id) {
                continue;
            }

            let links = if config.extensions.is_markdown(&id) {
                match std::fs::read_to_string(entry.path()) {
                    Ok(markdown) => extract_links(&markdown, options),
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", id, e);
                        skipped += 1;
                        continue;
                    }
                }
            } else {
                Vec::new()
            };

            documents.push(LinkedDocument { id, links });
        }

        documents.sort_by(|a, b| a.id.cmp(&b.id));

        tracing::info!(
            "Scanned vault {}: {} documents, {} links, {} skipped",
            root.display(),
            documents.len(),
            documents.iter().map(|d| d.links.len()).sum::<usize>(),
            skipped
        );

        Ok(Self {
            root: root.to_path_buf(),
            documents,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn documents(&self) -> &[LinkedDocument] {
        &self.documents
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.id.as_str())
    }
}
