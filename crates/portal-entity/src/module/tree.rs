//! Side-menu tree structures.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a menu node; the backend sends either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    /// Numeric identifier.
    Int(i64),
    /// String identifier.
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

/// A node in the side navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleTreeNode {
    /// Node identifier.
    pub id: NodeId,
    /// Module name, also the permission key.
    pub name: String,
    /// Link target; group nodes often send `null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,
    /// Ordered child entries.
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<ModuleTreeNode>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ModuleTreeNode {
    /// Create a leaf node.
    pub fn leaf(id: i64, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: NodeId::Int(id),
            name: name.into(),
            url: url.into(),
            icon: None,
            children: Vec::new(),
        }
    }

    /// Attach children to this node.
    pub fn with_children(mut self, children: Vec<ModuleTreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether the node renders as a plain link rather than a group.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}
