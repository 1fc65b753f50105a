use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tag_tree_core::link_parser::LinkOptions;
use tag_tree_core::ContentSuffixes;

/// Looked up in the vault root when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "explorer.toml";

/// Explorer settings, read from `explorer.toml`.
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Only link targets under this folder are grouped into the tree.
    pub base_path: String,
    /// File extensions treated as documents.
    pub extensions: ContentSuffixes,
    /// glob-match patterns, relative to the vault root.
    pub exclude: Vec<String>,
    pub include_frontmatter_links: bool,
    pub include_markdown_links: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            extensions: ContentSuffixes::default(),
            exclude: vec![".obsidian/**".to_string(), ".trash/**".to_string()],
            include_frontmatter_links: true,
            include_markdown_links: true,
        }
    }
}

impl ExplorerConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ExplorerError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&text).map_err(|source| ExplorerError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            markdown_links: self.include_markdown_links,
            frontmatter_links: self.include_frontmatter_links,
        }
    }

    /// Whether a vault-relative path matches any exclude pattern.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| glob_match::glob_match(pattern, relative_path))
    }

    /// Whether everything under a vault-relative directory is excluded, so the
    /// walk can skip it. Only `dir/**` style patterns prune whole directories.
    pub fn is_excluded_dir(&self, relative_dir: &str) -> bool {
        self.exclude.iter().any(|pattern| {
            pattern
                .strip_suffix("/**")
                .is_some_and(|prefix| glob_match::glob_match(prefix, relative_dir))
        })
    }
}
