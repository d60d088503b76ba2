pub mod tree_render;

pub use tree_render::{render_subtree, render_tree};
