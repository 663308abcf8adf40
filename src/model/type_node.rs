//! Nodes of the type browser.

use serde::{Deserialize, Serialize};

/// A type and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSummary {
    pub uri: String,
    pub label: String,
}

impl TypeSummary {
    pub fn new(uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self { uri: uri.into(), label: label.into() }
    }
}

/// One appearance of a type in the hierarchy forest.
///
/// A type with several direct parents appears once under each of them, each
/// appearance with its own subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeNode {
    pub uri: String,
    pub label: String,
    /// False for grouping-only ancestors: navigable, not selectable.
    pub is_shape: bool,
    /// Ordered by label.
    pub children: Vec<EntityTypeNode>,
}

impl EntityTypeNode {
    /// Depth-first walk over this node and its descendants.
    pub fn walk(&self) -> Vec<&EntityTypeNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    /// Every appearance of `uri` in this subtree.
    pub fn find_all(&self, uri: &str) -> Vec<&EntityTypeNode> {
        self.walk().into_iter().filter(|n| n.uri == uri).collect()
    }
}
