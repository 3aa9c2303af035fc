//! Filesystem primitives shared across features.

pub mod copy;
pub mod tree_hash;

pub use copy::{copy_tree_filtered, is_excluded_path};
pub use tree_hash::hash_tree;
