//! Tree construction from a token sequence.

/// Stack-based tree builder.
pub mod core;

pub use self::core::{
    ParseIssue, TreeBuilder, TreeOutline, parse, print_tree, tree_to_string, write_tree,
};
