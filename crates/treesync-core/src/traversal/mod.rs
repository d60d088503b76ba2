pub mod path;
pub mod walk;

pub use path::path_to_root;
pub use walk::{depth_first, post_order};
