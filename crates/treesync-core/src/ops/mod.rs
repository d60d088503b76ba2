pub mod changeset;
pub mod registry;

pub use registry::NodeRegistry;
