//! Property rules attached to a node shape.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Term;
use crate::vocab;

/// `order` given to rules that declare no `sh:order`, so they sort last.
pub const DEFAULT_ORDER: i64 = 999;

/// One property rule of a type's shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeProperty {
    /// Predicate IRI. Unique within one type's property list.
    pub path: String,
    /// Display label (`sh:name`, else the local name of `path`).
    pub name: String,
    pub description: Option<String>,
    pub datatype: Option<String>,
    /// `sh:class`: values are instances of this type.
    pub referenced_class: Option<String>,
    /// `sh:node`: values conform to this shape.
    pub referenced_shape: Option<String>,
    pub editor_hint: Option<String>,
    pub viewer_hint: Option<String>,
    pub min_count: Option<u32>,
    pub max_count: Option<u32>,
    pub order: i64,
    /// Members of the `sh:in` list, in list order.
    pub enum_values: Option<Vec<Term>>,
    pub role: Option<String>,
}

impl ShapeProperty {
    /// A bare rule for `path` with every optional field unset.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: vocab::local_name(&path).to_owned(),
            path,
            description: None,
            datatype: None,
            referenced_class: None,
            referenced_shape: None,
            editor_hint: None,
            viewer_hint: None,
            min_count: None,
            max_count: None,
            order: DEFAULT_ORDER,
            enum_values: None,
            role: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self { self.name = name.into(); self }
    pub fn with_datatype(mut self, dt: impl Into<String>) -> Self { self.datatype = Some(dt.into()); self }
    pub fn with_class(mut self, class: impl Into<String>) -> Self { self.referenced_class = Some(class.into()); self }
    pub fn with_node(mut self, shape: impl Into<String>) -> Self { self.referenced_shape = Some(shape.into()); self }
    pub fn with_editor(mut self, iri: impl Into<String>) -> Self { self.editor_hint = Some(iri.into()); self }
    pub fn with_viewer(mut self, iri: impl Into<String>) -> Self { self.viewer_hint = Some(iri.into()); self }
    pub fn with_max_count(mut self, n: u32) -> Self { self.max_count = Some(n); self }
    pub fn with_min_count(mut self, n: u32) -> Self { self.min_count = Some(n); self }
    pub fn with_order(mut self, order: i64) -> Self { self.order = order; self }
    pub fn with_enum(mut self, values: Vec<Term>) -> Self { self.enum_values = Some(values); self }

    /// Values identify other entities (`sh:class` or `sh:node`).
    pub fn is_reference(&self) -> bool {
        self.referenced_class.is_some() || self.referenced_shape.is_some()
    }

    /// Type to resolve nested values against. `sh:class` wins over `sh:node`.
    pub fn target_type(&self) -> Option<&str> {
        self.referenced_class.as_deref().or(self.referenced_shape.as_deref())
    }

    /// Absent `maxCount`, or one above 1, means multi-valued.
    pub fn is_multi_valued(&self) -> bool {
        self.max_count != Some(1)
    }

    pub fn is_required(&self) -> bool {
        self.min_count.is_some_and(|n| n > 0)
    }

    /// Non-empty closed enumeration.
    pub fn has_enumeration(&self) -> bool {
        self.enum_values.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Total order within one type: `order`, then `path`.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.order.cmp(&other.order).then_with(|| self.path.cmp(&other.path))
    }
}

/// Sort rules into display order and drop repeated paths (first wins).
pub fn normalize(mut props: Vec<ShapeProperty>) -> Vec<ShapeProperty> {
    props.sort_by(ShapeProperty::display_cmp);
    let mut seen = hashbrown::HashSet::with_capacity(props.len());
    props.retain(|p| seen.insert(p.path.clone()));
    props
}
