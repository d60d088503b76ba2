use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Payload contract for node data
///
/// The engine treats node data as opaque: it is stored, replaced wholesale
/// on every description of the node, and handed back to observers. The only
/// thing the engine needs to read from it is whether the payload marks its
/// node as the root of the tree.
///
/// `Default` supplies the placeholder payload of a node that was referenced
/// as a child but whose own description has not been applied yet.
pub trait NodeData: Debug + Default {
    /// True if this payload marks its node as the tree root
    fn is_root(&self) -> bool;

    /// One-line human readable summary used by tree dumps
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

/// Role of a node, the primary classification carried by [`NodeAttributes`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    #[default]
    Unknown,
    /// Root of a document tree
    RootWebArea,
    /// Root of a desktop/window-system tree
    Desktop,
    Window,
    Group,
    Button,
    CheckBox,
    Link,
    List,
    ListItem,
    StaticText,
    TextField,
    Image,
}

impl NodeRole {
    /// Roles that may sit at the root of a tree
    pub fn is_root_role(self) -> bool {
        matches!(self, NodeRole::RootWebArea | NodeRole::Desktop)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeRole::Unknown => "unknown",
            NodeRole::RootWebArea => "root_web_area",
            NodeRole::Desktop => "desktop",
            NodeRole::Window => "window",
            NodeRole::Group => "group",
            NodeRole::Button => "button",
            NodeRole::CheckBox => "check_box",
            NodeRole::Link => "link",
            NodeRole::List => "list",
            NodeRole::ListItem => "list_item",
            NodeRole::StaticText => "static_text",
            NodeRole::TextField => "text_field",
            NodeRole::Image => "image",
        }
    }
}

/// Ready-made attribute payload: a role, an optional name and a sorted
/// string attribute map
///
/// Attributes are kept in a `BTreeMap` so serialization (and therefore tree
/// digests) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(default)]
    pub role: NodeRole,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl NodeAttributes {
    pub fn new(role: NodeRole) -> Self {
        Self {
            role,
            name: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder: set the accessible name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set one string attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl NodeData for NodeAttributes {
    fn is_root(&self) -> bool {
        self.role.is_root_role()
    }

    fn summary(&self) -> String {
        let mut out = self.role.as_str().to_string();
        if let Some(ref name) = self.name {
            out.push_str(&format!(" name={:?}", name));
        }
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {}={:?}", key, value));
        }
        out
    }
}
