//! # Type Hierarchy
//!
//! Turns `rdfs:subClassOf` facts into the forest shown by the type browser.
//!
//! ```text
//! shape classes (S) + direct-parent edges
//!   → universe U = S ∪ G   (G: parents that carry no shape)
//!   → arena of U with parent→children adjacency
//!   → depth-first expansion from each root, tracking the ancestors on the
//!     current path only
//! ```
//!
//! A child is expanded unless it is already on the current path, so a type
//! with two parents shows up under both (each copy with its own subtree)
//! while a genuine cycle stops at the first repeat. The build is pure and
//! deterministic: children and roots are ordered by label, then IRI.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::model::{Binding, EntityTypeNode, TypeSummary};
use crate::vocab;
use crate::Result;

/// `child rdfs:subClassOf parent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubclassEdge {
    pub child: String,
    pub parent: String,
}

impl SubclassEdge {
    pub fn new(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self { child: child.into(), parent: parent.into() }
    }
}

/// Input of [`build_hierarchy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyFacts {
    /// Shape-bearing types.
    pub shapes: BTreeSet<String>,
    /// Known labels; types without one fall back to their local name.
    pub labels: BTreeMap<String, String>,
    /// Subclass edges. Indirect edges are filtered out by the builder.
    pub edges: Vec<SubclassEdge>,
}

impl HierarchyFacts {
    pub fn new() -> Self { Self::default() }

    pub fn shape(mut self, uri: impl Into<String>, label: impl Into<String>) -> Self {
        let uri = uri.into();
        self.labels.insert(uri.clone(), label.into());
        self.shapes.insert(uri);
        self
    }

    pub fn label(mut self, uri: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(uri.into(), label.into());
        self
    }

    pub fn edge(mut self, child: impl Into<String>, parent: impl Into<String>) -> Self {
        self.edges.push(SubclassEdge::new(child, parent));
        self
    }

    /// Rows of `Query::HierarchyFacts`: `class`, `?label`, `?parent`, `?parentLabel`.
    pub fn from_rows(rows: &[Binding]) -> Result<Self> {
        let mut facts = HierarchyFacts::new();
        for row in rows {
            let class = row.require_iri("class")?.to_string();
            if let Some(label) = row.str("label") {
                facts.labels.insert(class.clone(), label.to_string());
            }
            if let Some(parent) = row.get("parent").and_then(|t| t.as_iri()) {
                if let Some(label) = row.str("parentLabel") {
                    facts.labels.entry(parent.to_string()).or_insert_with(|| label.to_string());
                }
                facts.edges.push(SubclassEdge::new(class.clone(), parent));
            }
            facts.shapes.insert(class);
        }
        Ok(facts)
    }

    pub fn label_of(&self, uri: &str) -> String {
        self.labels
            .get(uri)
            .cloned()
            .unwrap_or_else(|| vocab::local_name(uri).to_string())
    }
}

/// Label order used for children and roots: case-insensitive, then exact,
/// then IRI.
pub fn label_order(a_label: &str, a_uri: &str, b_label: &str, b_uri: &str) -> Ordering {
    a_label
        .to_lowercase()
        .cmp(&b_label.to_lowercase())
        .then_with(|| a_label.cmp(b_label))
        .then_with(|| a_uri.cmp(b_uri))
}

/// True when `parent` is an ancestor of `child` through one of its other
/// asserted parents, i.e. `(child, parent)` is not a direct edge.
///
/// The search never re-enters `child` and visits each node once, so it
/// terminates on cyclic input.
pub fn reachable_through_other_parent<N, F, I>(child: &N, parent: &N, parents: &[N], parents_of: F) -> bool
where
    N: Eq + Hash + Clone,
    F: Fn(&N) -> I,
    I: IntoIterator<Item = N>,
{
    let mut seen: HashSet<N> = HashSet::new();
    seen.insert(child.clone());
    let mut stack: Vec<N> = parents.iter().filter(|m| *m != parent && *m != child).cloned().collect();
    while let Some(node) = stack.pop() {
        if node == *parent {
            return true;
        }
        if !seen.insert(node.clone()) {
            continue;
        }
        stack.extend(parents_of(&node).into_iter().filter(|n| !seen.contains(n)));
    }
    false
}

/// Drop self-loops and every `(c, p)` where `p` is also reachable from
/// another parent of `c`, over any number of hops.
pub fn direct_edges(edges: &[SubclassEdge]) -> Vec<SubclassEdge> {
    let set: HashSet<(&str, &str)> = edges
        .iter()
        .filter(|e| e.child != e.parent)
        .map(|e| (e.child.as_str(), e.parent.as_str()))
        .collect();
    let mut parents_of: HashMap<&str, Vec<&str>> = HashMap::new();
    for &(c, p) in &set {
        parents_of.entry(c).or_default().push(p);
    }
    let mut out: Vec<SubclassEdge> = set
        .iter()
        .filter(|&&(c, p)| {
            !reachable_through_other_parent(&c, &p, &parents_of[c], |n| {
                parents_of.get(n).cloned().unwrap_or_default()
            })
        })
        .map(|&(c, p)| SubclassEdge::new(c, p))
        .collect();
    out.sort();
    out
}

// ============================================================================
// Arena
// ============================================================================

struct ArenaNode {
    uri: String,
    label: String,
    is_shape: bool,
    children: Vec<usize>,
    has_parent: bool,
}

struct TypeArena {
    nodes: Vec<ArenaNode>,
}

impl TypeArena {
    fn build(facts: &HierarchyFacts) -> Self {
        let edges = direct_edges(&facts.edges);

        // U = S ∪ G, where G holds parents of shape types that are not shapes.
        let mut universe: BTreeSet<&str> = facts.shapes.iter().map(String::as_str).collect();
        for e in &edges {
            if facts.shapes.contains(&e.child) {
                universe.insert(e.parent.as_str());
            }
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(universe.len());
        let mut nodes = Vec::with_capacity(universe.len());
        for &uri in &universe {
            index.insert(uri, nodes.len());
            nodes.push(ArenaNode {
                uri: uri.to_string(),
                label: facts.label_of(uri),
                is_shape: facts.shapes.contains(uri),
                children: Vec::new(),
                has_parent: false,
            });
        }

        for e in &edges {
            if let (Some(&c), Some(&p)) = (index.get(e.child.as_str()), index.get(e.parent.as_str())) {
                nodes[p].children.push(c);
                nodes[c].has_parent = true;
            }
        }

        let mut arena = TypeArena { nodes };
        for i in 0..arena.nodes.len() {
            let mut children = std::mem::take(&mut arena.nodes[i].children);
            children.sort_by(|&a, &b| arena.order(a, b));
            children.dedup();
            arena.nodes[i].children = children;
        }
        arena
    }

    fn order(&self, a: usize, b: usize) -> Ordering {
        let (a, b) = (&self.nodes[a], &self.nodes[b]);
        label_order(&a.label, &a.uri, &b.label, &b.uri)
    }

    /// Expand `i`, never re-entering a node already on the current path.
    fn expand(&self, i: usize, on_path: &mut [bool], reached: &mut [bool]) -> EntityTypeNode {
        on_path[i] = true;
        reached[i] = true;
        let node = &self.nodes[i];
        let mut children = Vec::with_capacity(node.children.len());
        for &c in &node.children {
            if !on_path[c] {
                children.push(self.expand(c, on_path, reached));
            }
        }
        on_path[i] = false;
        EntityTypeNode {
            uri: node.uri.clone(),
            label: node.label.clone(),
            is_shape: node.is_shape,
            children,
        }
    }
}

/// Build the type forest.
///
/// Roots are the types with no parent inside the universe. Types reachable
/// only through a parentless cycle would otherwise vanish; the first of them
/// in label order is promoted to a root until every type appears.
pub fn build_hierarchy(facts: &HierarchyFacts) -> Vec<EntityTypeNode> {
    let arena = TypeArena::build(facts);
    let n = arena.nodes.len();
    let mut on_path = vec![false; n];
    let mut reached = vec![false; n];

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| arena.order(a, b));

    let mut roots = Vec::new();
    for &i in &order {
        if !arena.nodes[i].has_parent {
            roots.push(arena.expand(i, &mut on_path, &mut reached));
        }
    }
    for &i in &order {
        if !reached[i] {
            roots.push(arena.expand(i, &mut on_path, &mut reached));
        }
    }

    roots.sort_by(|a, b| label_order(&a.label, &a.uri, &b.label, &b.uri));
    roots
}

/// Breadcrumb for `class`, root first.
///
/// Follows one direct parent per step (the first in label order) and stops
/// at the first repeat.
pub fn ancestor_chain(facts: &HierarchyFacts, class: &str) -> Vec<TypeSummary> {
    let edges = direct_edges(&facts.edges);
    let mut parent_of: HashMap<&str, &str> = HashMap::new();
    for e in &edges {
        let candidate = e.parent.as_str();
        parent_of
            .entry(e.child.as_str())
            .and_modify(|current| {
                let (cl, nl) = (facts.label_of(current), facts.label_of(candidate));
                if label_order(&nl, candidate, &cl, current) == Ordering::Less {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = class;
    while let Some(&parent) = parent_of.get(current) {
        if !visited.insert(current) {
            break;
        }
        chain.push(TypeSummary::new(parent, facts.label_of(parent)));
        current = parent;
    }
    chain.reverse();
    chain
}
