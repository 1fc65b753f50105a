use crate::backlink_tree::LinkResolver;
use crate::content_type::ContentSuffixes;
use std::collections::HashMap;

/// Resolve a page name relative to the directory containing `current_file_path`.
///
/// Both inputs are vault-relative. `.` segments are dropped and `..` pops a
/// directory, clamping at the vault root. No extension is added.
///
/// Example: `resolve_relative("Notes/Source.md", "../Ideas.md")` -> `"Ideas.md"`
pub fn resolve_relative(current_file_path: &str, page_name: &str) -> String {
    let dir = current_file_path
        .rfind('/')
        .map(|idx| &current_file_path[..idx])
        .unwrap_or("");
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();

    for part in page_name.split('/') {
        if part == ".." {
            segments.pop();
        } else if part != "." && !part.is_empty() {
            segments.push(part);
        }
    }

    segments.join("/")
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Case-insensitive map from vault paths to document ids.
///
/// Plays the part of the host's link resolver: given the raw text of a link and
/// the id of the document it appears in, find the document it points to.
pub struct DocumentResolver {
    suffixes: ContentSuffixes,
    /// Forward map: "projects/alpha.md" -> "Projects/Alpha.md"
    path_to_id: HashMap<String, String>,
    /// File name map: "alpha.md" -> every id with that file name
    name_to_ids: HashMap<String, Vec<String>>,
}

impl DocumentResolver {
    pub fn new(suffixes: ContentSuffixes) -> Self {
        Self {
            suffixes,
            path_to_id: HashMap::new(),
            name_to_ids: HashMap::new(),
        }
    }

    /// Build a resolver over every id in `ids`.
    pub fn from_ids<I, S>(suffixes: ContentSuffixes, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut resolver = Self::new(suffixes);
        for id in ids {
            resolver.register(id);
        }
        resolver
    }

    /// Register one document. Re-registering an id is a no-op.
    pub fn register(&mut self, id: impl Into<String>) {
        let id = id.into();
        let lower = id.to_lowercase();
        if self.path_to_id.contains_key(&lower) {
            return;
        }
        self.name_to_ids
            .entry(file_name(&lower).to_string())
            .or_default()
            .push(id.clone());
        self.path_to_id.insert(lower, id);
    }

    pub fn len(&self) -> usize {
        self.path_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_to_id.is_empty()
    }

    /// All registered document ids, sorted.
    pub fn all_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.path_to_id.values().cloned().collect();
        paths.sort();
        paths
    }

    /// Resolve a link to a document id.
    ///
    /// Order: relative to the source's directory, then absolute from the vault
    /// root, then a file name that is unique across the vault. Links without a
    /// recognized suffix are looked up as markdown.
    pub fn resolve(&self, link: &str, source_id: Option<&str>) -> Option<&str> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }

        let candidate = if self.suffixes.is_content_path(link) {
            link.to_string()
        } else {
            format!("{link}.md")
        };
        let candidate = candidate.to_lowercase();

        // Priority 1: relative match
        if let Some(source) = source_id {
            let relative = resolve_relative(&source.to_lowercase(), &candidate);
            if let Some(id) = self.path_to_id.get(&relative) {
                return Some(id.as_str());
            }
        }

        // Priority 2: absolute match
        let absolute = resolve_relative("", &candidate);
        if let Some(id) = self.path_to_id.get(&absolute) {
            return Some(id.as_str());
        }

        // Priority 3: bare name, only when unambiguous
        if candidate.contains('/') {
            return None;
        }
        match self.name_to_ids.get(&candidate).map(Vec::as_slice) {
            Some([only]) => Some(only.as_str()),
            _ => None,
        }
    }
}

impl LinkResolver for DocumentResolver {
    fn resolve_link(&self, link_text: &str, source_id: &str) -> Option<String> {
        self.resolve(link_text, Some(source_id)).map(str::to_string)
    }
}
