use serde::{Deserialize, Serialize};

/// Stable identity of a node, supplied by the update source
///
/// Ids are 32-bit signed integers; negative values are legal (roots are
/// conventionally given negative ids). The engine never invents an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(i32);

impl NodeId {
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<NodeId> for i32 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format a list of ids as `a, b, c` for error messages
pub(crate) fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display_is_bare_integer() {
        assert_eq!(NodeId::new(-1).to_string(), "-1");
        assert_eq!(NodeId::from(42).to_string(), "42");
    }

    #[test]
    fn test_node_id_serializes_transparently() {
        let json = serde_json::to_string(&NodeId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: NodeId = serde_json::from_str("-3").unwrap();
        assert_eq!(back, NodeId::new(-3));
    }

    #[test]
    fn test_join_ids() {
        let ids = [NodeId::new(1), NodeId::new(-2), NodeId::new(99)];
        assert_eq!(join_ids(&ids), "1, -2, 99");
        assert_eq!(join_ids(&[]), "");
    }
}
