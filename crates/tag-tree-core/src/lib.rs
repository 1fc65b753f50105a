pub mod backlink_tree;
pub mod content_type;
pub mod doc_resolver;
pub mod link_parser;

pub use backlink_tree::{
    build_tree, group_backlinks, BacklinkGroups, BacklinkTree, BacklinkTreeNode, LinkResolver,
    LinkedDocument, NodeId, NodeSnapshot,
};
pub use content_type::ContentSuffixes;
pub use doc_resolver::DocumentResolver;
