use colored::Colorize;
use tag_tree_core::{BacklinkTree, BacklinkTreeNode};

#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    pub color: bool,
    /// Levels below the starting nodes to show. `None` shows everything.
    pub max_depth: Option<usize>,
}

fn label(tree: &BacklinkTree, node: &BacklinkTreeNode, text: &str, options: RenderOptions) -> String {
    let count = tree.aggregate_count(node);
    if options.color {
        let name = if node.is_leaf() {
            text.normal()
        } else {
            text.bold()
        };
        format!("{} {}", name, format!("({count})").as_str().dimmed())
    } else {
        format!("{text} ({count})")
    }
}

/// The whole tree, children sorted by name, two spaces per level.
pub fn render_tree(tree: &BacklinkTree, options: RenderOptions) -> String {
    let mut out = String::new();
    // (node, depth) pairs; pushed in reverse so the pop order is sorted
    let mut stack: Vec<(&BacklinkTreeNode, usize)> =
        tree.sorted_roots().into_iter().rev().map(|n| (n, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        out.push_str(&format!(
            "{}{}\n",
            "  ".repeat(depth),
            label(tree, node, node.name(), options)
        ));
        if options.max_depth.is_some_and(|max| depth >= max) {
            continue;
        }
        for child in tree.sorted_children(node).into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    out
}

/// One node: its full path and count, then its direct documents sorted.
pub fn render_node(tree: &BacklinkTree, node: &BacklinkTreeNode, options: RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", label(tree, node, node.path(), options)));

    let mut documents: Vec<&String> = node.direct_documents().iter().collect();
    documents.sort();
    if documents.is_empty() {
        out.push_str("- (none)\n");
    }
    for document in documents {
        out.push_str(&format!("- {}\n", document));
    }
    out
}

/// Sorted lines, or `- (none)` when empty.
pub fn render_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut items: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    items.sort();
    if items.is_empty() {
        return "- (none)\n".to_string();
    }
    items.iter().map(|item| format!("- {item}\n")).collect()
}

/// Flat pre-order node list; see [`BacklinkTree::snapshot`].
pub fn tree_json(tree: &BacklinkTree, max_depth: Option<usize>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&tree.snapshot_roots(max_depth))
}

pub fn node_json(tree: &BacklinkTree, node: &BacklinkTreeNode, max_depth: Option<usize>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&tree.snapshot(node, max_depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tag_tree_core::{build_tree, ContentSuffixes, LinkedDocument};

    fn identity(link: &str, _source: &str) -> Option<String> {
        Some(link.to_string())
    }

    fn sample_tree() -> BacklinkTree {
        let documents = vec![
            LinkedDocument::new("n1", ["projects/x"]),
            LinkedDocument::new("n2", ["projects/x"]),
            LinkedDocument::new("n3", ["projects/y", "archive"]),
        ];
        build_tree(&documents, "", &identity, &ContentSuffixes::default())
    }

    const PLAIN: RenderOptions = RenderOptions {
        color: false,
        max_depth: None,
    };

    #[test]
    fn renders_sorted_indented_tree() {
        let tree = sample_tree();
        assert_eq!(
            render_tree(&tree, PLAIN),
            "archive (1)\nprojects (3)\n  x (2)\n  y (1)\n"
        );
    }

    #[test]
    fn depth_limit_hides_children() {
        let tree = sample_tree();
        let options = RenderOptions {
            max_depth: Some(0),
            ..PLAIN
        };
        assert_eq!(render_tree(&tree, options), "archive (1)\nprojects (3)\n");
    }

    #[test]
    fn empty_tree_renders_nothing() {
        assert_eq!(render_tree(&BacklinkTree::new(), PLAIN), "");
    }

    #[test]
    fn renders_node_with_documents() {
        let tree = sample_tree();
        let x = tree.find_node("projects/x").unwrap();
        assert_eq!(render_node(&tree, x, PLAIN), "projects/x (2)\n- n1\n- n2\n");

        let projects = tree.find_node("projects").unwrap();
        assert_eq!(render_node(&tree, projects, PLAIN), "projects (3)\n- (none)\n");
    }

    #[test]
    fn renders_sorted_list() {
        assert_eq!(render_list(["b", "a"]), "- a\n- b\n");
        assert_eq!(render_list(Vec::<String>::new()), "- (none)\n");
    }

    #[test]
    fn json_contains_counts() {
        let tree = sample_tree();
        let value: serde_json::Value = serde_json::from_str(&tree_json(&tree, None).unwrap()).unwrap();
        assert_eq!(value[1]["name"], "projects");
        assert_eq!(value[1]["count"], 3);
        assert_eq!(value[1]["children"], serde_json::json!(["x", "y"]));
        assert_eq!(value[2]["path"], "projects/x");
        assert_eq!(value[2]["depth"], 1);
        assert_eq!(value[2]["documents"], serde_json::json!(["n1", "n2"]));
    }

    #[test]
    fn node_json_respects_depth() {
        let tree = sample_tree();
        let projects = tree.find_node("projects").unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&node_json(&tree, projects, Some(0)).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["path"], "projects");
        assert_eq!(value[0]["children"], serde_json::json!(["x", "y"]));
    }

    #[test]
    fn deep_chain_renders_text_and_json() {
        let depth = 3_000;
        let key = (0..depth).map(|i| format!("s{i}")).collect::<Vec<_>>().join("/");
        let documents = vec![LinkedDocument::new("n1", [key.as_str()])];
        let tree = build_tree(&documents, "", &identity, &ContentSuffixes::default());

        assert_eq!(render_tree(&tree, PLAIN).lines().count(), depth);
        let value: serde_json::Value = serde_json::from_str(&tree_json(&tree, None).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), depth);
    }
}
