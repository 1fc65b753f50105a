use serde::{Deserialize, Serialize};

/// Extensions the host treats as first-class documents.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "canvas", "base"];

/// The set of recognized content-type suffixes.
///
/// Matching is case-sensitive, the way vault paths are stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ContentSuffixes {
    extensions: Vec<String>,
}

impl Default for ContentSuffixes {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl From<Vec<String>> for ContentSuffixes {
    fn from(extensions: Vec<String>) -> Self {
        Self::new(extensions)
    }
}

impl From<ContentSuffixes> for Vec<String> {
    fn from(suffixes: ContentSuffixes) -> Self {
        suffixes.extensions
    }
}

impl ContentSuffixes {
    /// Build from bare extensions. A leading dot is tolerated and dropped.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extensions: Vec<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        let mut seen = std::collections::HashSet::new();
        extensions.retain(|ext| seen.insert(ext.clone()));
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// The recognized extension `path` ends with, if any.
    pub fn extension_of<'a>(&self, path: &'a str) -> Option<&'a str> {
        let (stem, ext) = path.rsplit_once('.')?;
        // "foo/.md" has no stem; a dot inside a directory name is not an extension
        if stem.is_empty() || stem.ends_with('/') || ext.contains('/') {
            return None;
        }
        self.extensions
            .iter()
            .any(|known| known == ext)
            .then_some(ext)
    }

    /// Remove one recognized suffix from the end of `key`.
    ///
    /// `"notes/a.md"` -> `"notes/a"`, `"notes/a.txt"` is returned unchanged.
    pub fn strip<'a>(&self, key: &'a str) -> &'a str {
        match self.extension_of(key) {
            Some(ext) => &key[..key.len() - ext.len() - 1],
            None => key,
        }
    }

    pub fn is_content_path(&self, path: &str) -> bool {
        self.extension_of(path).is_some()
    }

    /// Markdown is the only type whose text is scanned for links.
    pub fn is_markdown(&self, path: &str) -> bool {
        self.extension_of(path) == Some("md")
    }
}
