#[cfg(test)]
mod tests {
    use super::*;

    // === extract_wikilinks ===

    #[test]
    fn extracts_simple_wikilink() {
        let result = extract_wikilinks("[[Note]]");
        assert_eq!(result, vec!["Note"]);
    }

    #[test]
    fn returns_empty_for_no_links() {
        let result = extract_wikilinks("plain text");
        assert_eq!(result, Vec::<String>::new());
    }

    #[test]
    fn extracts_multiple_wikilinks() {
        let result = extract_wikilinks("[[One]] and [[Two]]");
        assert_eq!(result, vec!["One", "Two"]);
    }

    #[test]
    fn strips_anchor_and_alias() {
        assert_eq!(extract_wikilinks("[[Note#Section]]"), vec!["Note"]);
        assert_eq!(extract_wikilinks("[[Note|Display Text]]"), vec!["Note"]);
        assert_eq!(extract_wikilinks("[[Note#Section|Display]]"), vec!["Note"]);
    }

    #[test]
    fn block_reference_only_link_is_dropped() {
        // "[[#Heading]]" points inside the current note
        assert_eq!(extract_wikilinks("[[#Heading]]"), Vec::<String>::new());
    }

    #[test]
    fn embeds_count_as_links() {
        let result = extract_wikilinks("![[diagram.canvas]] and ![[Note]]");
        assert_eq!(result, vec!["diagram.canvas", "Note"]);
    }

    #[test]
    fn ignores_empty_brackets() {
        let result = extract_wikilinks("[[]]");
        assert_eq!(result, Vec::<String>::new());
    }

    #[test]
    fn ignores_links_in_code_blocks() {
        let markdown = "```\n[[CodeLink]]\n```\nOutside [[RealLink]]";
        let result = extract_wikilinks(markdown);
        assert_eq!(result, vec!["RealLink"]);
    }

    #[test]
    fn ignores_links_in_tilde_fences() {
        let markdown = "~~~rust\n[[CodeLink]]\n~~~\n[[RealLink]]";
        assert_eq!(extract_wikilinks(markdown), vec!["RealLink"]);
    }

    #[test]
    fn ignores_links_in_inline_code() {
        let result = extract_wikilinks("See `[[Fake]]` but [[Real]]");
        assert_eq!(result, vec!["Real"]);
    }

    #[test]
    fn preserves_relative_segments() {
        assert_eq!(extract_wikilinks("[[../Ideas]]"), vec!["../Ideas"]);
        assert_eq!(extract_wikilinks("[[./Sub/Ideas]]"), vec!["./Sub/Ideas"]);
    }

    // === extract_markdown_links ===

    #[test]
    fn extracts_local_markdown_link() {
        let result = extract_markdown_links("See [the plan](projects/plan.md).");
        assert_eq!(result, vec!["projects/plan.md"]);
    }

    #[test]
    fn decodes_percent_escapes() {
        let result = extract_markdown_links("[x](My%20Notes/Day%201.md)");
        assert_eq!(result, vec!["My Notes/Day 1.md"]);
    }

    #[test]
    fn angle_bracket_destination_keeps_spaces() {
        let result = extract_markdown_links("[x](<My Notes/Day 1.md>)");
        assert_eq!(result, vec!["My Notes/Day 1.md"]);
    }

    #[test]
    fn skips_external_and_anchor_only_links() {
        let markdown = "[a](https://example.com) [b](mailto:me@example.com) [c](#top)";
        assert_eq!(extract_markdown_links(markdown), Vec::<String>::new());
    }

    #[test]
    fn strips_anchor_and_title_from_markdown_link() {
        let result = extract_markdown_links(r#"[a](notes/a.md#part "Title")"#);
        assert_eq!(result, vec!["notes/a.md"]);
    }

    #[test]
    fn markdown_links_in_code_are_ignored() {
        let markdown = "`[a](a.md)`\n```\n[b](b.md)\n```\n[c](c.md)";
        assert_eq!(extract_markdown_links(markdown), vec!["c.md"]);
    }

    // === frontmatter ===

    #[test]
    fn splits_frontmatter_from_body() {
        let markdown = "---\ntags: [a]\n---\nBody [[Link]]";
        let (frontmatter, body) = split_frontmatter(markdown);
        assert_eq!(frontmatter, Some("tags: [a]\n"));
        assert_eq!(body, "Body [[Link]]");
    }

    #[test]
    fn unterminated_frontmatter_is_body() {
        let markdown = "---\ntags: [a]\nBody";
        let (frontmatter, body) = split_frontmatter(markdown);
        assert_eq!(frontmatter, None);
        assert_eq!(body, markdown);
    }

    #[test]
    fn frontmatter_links_are_quoted_wikilinks() {
        let markdown = "---\nrelated: \"[[Projects/Alpha]]\"\nup: \"[[Index|Home]]\"\n---\n[[Body]]";
        assert_eq!(extract_frontmatter_links(markdown), vec!["Projects/Alpha", "Index"]);
    }

    #[test]
    fn no_frontmatter_no_frontmatter_links() {
        assert_eq!(extract_frontmatter_links("[[Body]]"), Vec::<String>::new());
    }

    // === extract_links ===

    #[test]
    fn extract_links_honors_options() {
        let markdown = "---\nup: \"[[Index]]\"\n---\n[[Wiki]] and [md](md.md)";

        let all = extract_links(markdown, LinkOptions::default());
        assert_eq!(all, vec!["Wiki", "md.md", "Index"]);

        let wiki_only = extract_links(
            markdown,
            LinkOptions {
                markdown_links: false,
                frontmatter_links: false,
            },
        );
        assert_eq!(wiki_only, vec!["Wiki"]);
    }
}

use regex::Regex;
use std::sync::LazyLock;

// Compile regex once, reuse across calls
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]]+)\]\]").unwrap()
});

static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[[^\]]*\]\((?:<([^>]+)>|([^)\s]+))(?:\s+"[^"]*")?\)"#).unwrap()
});

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[^\n]*\n.*?```|~~~[^\n]*\n.*?~~~").unwrap()
});

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`]*`").unwrap()
});

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap()
});

/// Which link sources feed a document's outgoing references.
///
/// Wikilinks in the body are always extracted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkOptions {
    pub markdown_links: bool,
    pub frontmatter_links: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            markdown_links: true,
            frontmatter_links: true,
        }
    }
}

fn strip_code(markdown: &str) -> String {
    let without_fenced = FENCED_CODE_RE.replace_all(markdown, "");
    INLINE_CODE_RE.replace_all(&without_fenced, "").into_owned()
}

/// Extract wikilink targets from markdown text.
/// Returns page names only (strips anchors and aliases).
/// Ignores links inside code blocks and inline code.
pub fn extract_wikilinks(markdown: &str) -> Vec<String> {
    let without_code = strip_code(markdown);

    let mut links = Vec::new();

    for cap in WIKILINK_RE.captures_iter(&without_code) {
        let content = &cap[1];

        // Alias (|) first, then anchor (#)
        let content = content.split('|').next().unwrap_or(content);
        let content = content.split('#').next().unwrap_or(content);

        let trimmed = content.trim();
        if !trimmed.is_empty() {
            links.push(trimmed.to_string());
        }
    }

    links
}

/// Extract local `[text](target)` destinations from markdown text.
///
/// External URLs and anchor-only links are skipped. Percent escapes are decoded
/// so `My%20Note.md` compares equal to the vault path `My Note.md`.
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    let without_code = strip_code(markdown);

    let mut links = Vec::new();

    for cap in MARKDOWN_LINK_RE.captures_iter(&without_code) {
        let Some(target) = cap.get(1).or_else(|| cap.get(2)) else {
            continue;
        };
        let target = target.as_str();
        if SCHEME_RE.is_match(target) {
            continue;
        }

        let target = target.split('#').next().unwrap_or(target).trim();
        if target.is_empty() {
            continue;
        }

        let decoded = urlencoding::decode(target)
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| target.to_string());
        links.push(decoded);
    }

    links
}

/// Split a leading `---` YAML block from the body.
///
/// Returns `(None, markdown)` when there is no complete frontmatter block.
pub fn split_frontmatter(markdown: &str) -> (Option<&str>, &str) {
    let Some(rest) = markdown
        .strip_prefix("---\n")
        .or_else(|| markdown.strip_prefix("---\r\n"))
    else {
        return (None, markdown);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, markdown)
}

/// Wikilinks written as frontmatter values, e.g. `up: "[[Index]]"`.
pub fn extract_frontmatter_links(markdown: &str) -> Vec<String> {
    match split_frontmatter(markdown) {
        (Some(frontmatter), _) => extract_wikilinks(frontmatter),
        (None, _) => Vec::new(),
    }
}

/// All outgoing link references of a markdown document, unresolved.
///
/// Body wikilinks come first, then markdown links, then frontmatter links.
/// Duplicates are kept; grouping collapses them later.
pub fn extract_links(markdown: &str, options: LinkOptions) -> Vec<String> {
    let (frontmatter, body) = split_frontmatter(markdown);

    let mut links = extract_wikilinks(body);
    if options.markdown_links {
        links.extend(extract_markdown_links(body));
    }
    if options.frontmatter_links {
        if let Some(frontmatter) = frontmatter {
            links.extend(extract_wikilinks(frontmatter));
        }
    }
    links
}
