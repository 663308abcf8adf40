//! Typed read and write requests.
//!
//! Every request the core issues is one of these variants. Backends either
//! render them to SPARQL ([`super::sparql`]) or evaluate them directly
//! ([`super::MemoryStore`]).
//!
//! ## Result variables
//!
//! | Query | Variables (`?x` = optional) |
//! |-------|-----------------------------|
//! | `EntityTypes` | `class`, `?label` |
//! | `HierarchyFacts` | `class`, `?label`, `?parent`, `?parentLabel` |
//! | `SubclassEdges` | `child`, `parent`, `?parentLabel` |
//! | `ShapeProperties` | `path`, `?name`, `?description`, `?datatype`, `?class`, `?node`, `?editor`, `?viewer`, `?minCount`, `?maxCount`, `?order`, `?propertyRole` |
//! | `EnumValues` | `val` |
//! | `ShapePaths` | `path` |
//! | `EntityValues` | `path`, `value` |
//! | `Instances` | `uri`, `?label` |

use serde::{Deserialize, Serialize};

use crate::model::Triple;

/// A read request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Query {
    /// Classes bound to a node shape, explicitly or self-describing.
    EntityTypes,
    /// Shape-bearing classes with their asserted parents.
    HierarchyFacts,
    /// All usable subclass edges (self-loops, `owl:Thing`, blank parents excluded).
    SubclassEdges,
    /// Property rules of every shape matching `class`.
    ShapeProperties { class: String },
    /// Ordered `sh:in` members of the rule for `path`.
    EnumValues { class: String, path: String },
    /// Just the rule paths of `class`.
    ShapePaths { class: String },
    /// Values of `entity` at the rule paths of `class`.
    EntityValues { entity: String, class: String },
    /// Instances of `class` with display labels, ordered by label.
    Instances { class: String, limit: Option<usize> },
}

/// A write request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Update {
    InsertData(Vec<Triple>),
    /// Remove every `(subject, path, *)` for the given paths.
    DeletePaths { subject: String, paths: Vec<String> },
    /// `DeletePaths` followed by `InsertData` as one request.
    Replace { subject: String, paths: Vec<String>, insert: Vec<Triple> },
    /// Remove every `(subject, *, *)`. No-op when absent.
    DeleteSubject(String),
}

impl Query {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::EntityTypes => "entity_types",
            Query::HierarchyFacts => "hierarchy_facts",
            Query::SubclassEdges => "subclass_edges",
            Query::ShapeProperties { .. } => "shape_properties",
            Query::EnumValues { .. } => "enum_values",
            Query::ShapePaths { .. } => "shape_paths",
            Query::EntityValues { .. } => "entity_values",
            Query::Instances { .. } => "instances",
        }
    }
}

impl Update {
    pub fn kind(&self) -> &'static str {
        match self {
            Update::InsertData(_) => "insert_data",
            Update::DeletePaths { .. } => "delete_paths",
            Update::Replace { .. } => "replace",
            Update::DeleteSubject(_) => "delete_subject",
        }
    }
}
