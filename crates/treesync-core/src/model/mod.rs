pub mod data;
pub mod id;
pub mod node;
pub mod update;

pub use data::{NodeAttributes, NodeData, NodeRole};
pub use id::NodeId;
pub use node::Node;
pub use update::{NodeDescription, Update};
