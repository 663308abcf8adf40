//! In-memory triple store.
//!
//! This is the reference implementation of `SparqlStore`. It keeps one
//! triple set behind an `RwLock` and evaluates every [`Query`]/[`Update`]
//! variant directly, with the same semantics as the SPARQL text in
//! [`super::sparql`].
//!
//! ## Limitations
//!
//! - **No inference**: `rdfs:subClassOf` is not closed transitively; only
//!   asserted triples are visible.
//! - **No indexes**: every lookup scans the triple set.
//!
//! Use this store for:
//! - Testing the catalog, the codec and the renderer
//! - Embedding shape-driven forms without an external repository

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Query, SparqlStore, StoreCapabilities, Update};
use crate::hierarchy;
use crate::model::{Binding, Term, Triple};
use crate::vocab::*;
use crate::Result;

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory triple set.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<TripleSet>>,
}

#[derive(Default)]
struct TripleSet {
    triples: BTreeSet<Triple>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `triples`.
    pub fn with_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let store = Self::new();
        store.extend(triples);
        store
    }

    pub fn insert(&self, triple: Triple) {
        self.inner.write().triples.insert(triple);
    }

    pub fn extend(&self, triples: impl IntoIterator<Item = Triple>) {
        self.inner.write().triples.extend(triples);
    }

    /// Assert an RDF list and return its head node.
    ///
    /// List cells are blank nodes named `{name}-{index}`.
    pub fn insert_list(&self, name: &str, members: impl IntoIterator<Item = Term>) -> Term {
        let members: Vec<Term> = members.into_iter().collect();
        if members.is_empty() {
            return Term::iri(RDF_NIL);
        }
        let cells: Vec<Term> = (0..members.len()).map(|i| Term::blank(format!("{name}-{i}"))).collect();
        let mut set = self.inner.write();
        for (i, member) in members.into_iter().enumerate() {
            set.triples.insert(Triple::new(cells[i].clone(), RDF_FIRST, member));
            let rest = cells.get(i + 1).cloned().unwrap_or_else(|| Term::iri(RDF_NIL));
            set.triples.insert(Triple::new(cells[i].clone(), RDF_REST, rest));
        }
        cells[0].clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().triples.is_empty()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.inner.read().triples.contains(triple)
    }

    /// Every triple about `subject`, ordered.
    pub fn describe(&self, subject: &str) -> Vec<Triple> {
        let s = Term::iri(subject);
        self.inner.read().triples.iter().filter(|t| t.subject == s).cloned().collect()
    }
}

// ============================================================================
// Evaluation
// ============================================================================

impl TripleSet {
    fn objects<'a>(&'a self, s: &'a Term, p: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == s && t.predicate == p)
            .map(|t| &t.object)
    }

    fn first_object(&self, s: &Term, p: &str) -> Option<Term> {
        self.objects(s, p).next().cloned()
    }

    fn subjects<'a>(&'a self, p: &'a str, o: &'a Term) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.predicate == p && &t.object == o)
            .map(|t| &t.subject)
    }

    fn has(&self, s: &Term, p: &str, o: &Term) -> bool {
        self.triples.contains(&Triple::new(s.clone(), p, o.clone()))
    }

    fn is_node_shape(&self, t: &Term) -> bool {
        self.has(t, RDF_TYPE, &Term::iri(SH_NODE_SHAPE))
    }

    fn has_target(&self, t: &Term) -> bool {
        self.objects(t, SH_TARGET_CLASS).next().is_some()
    }

    /// Shapes that describe `class`: explicit target, or self-describing.
    fn shapes_for(&self, class: &str) -> Vec<Term> {
        let class = Term::iri(class);
        let mut shapes: Vec<Term> = self
            .subjects(SH_TARGET_CLASS, &class)
            .filter(|s| self.is_node_shape(s))
            .cloned()
            .collect();
        if self.is_node_shape(&class) && !self.has_target(&class) {
            shapes.push(class);
        }
        shapes.sort();
        shapes.dedup();
        shapes
    }

    /// Classes that have a shape, by either binding.
    fn shape_classes(&self) -> Vec<Term> {
        let shape_type = Term::iri(SH_NODE_SHAPE);
        let mut classes = Vec::new();
        for t in self.triples.iter().filter(|t| t.predicate == SH_TARGET_CLASS) {
            if self.is_node_shape(&t.subject) {
                classes.push(t.object.clone());
            }
        }
        for s in self.subjects(RDF_TYPE, &shape_type) {
            if self.objects(s, SH_PROPERTY).next().is_some() && !self.has_target(s) {
                classes.push(s.clone());
            }
        }
        classes.sort();
        classes.dedup();
        classes
    }

    /// Asserted parents minus self-loops, `owl:Thing`, blank nodes and any
    /// parent also reachable through another asserted parent.
    fn direct_parents(&self, class: &Term) -> Vec<Term> {
        let thing = Term::iri(OWL_THING);
        let asserted: Vec<Term> = self.objects(class, RDFS_SUB_CLASS_OF).cloned().collect();
        asserted
            .iter()
            .filter(|p| *p != class && **p != thing && !p.is_blank())
            .filter(|p| {
                !hierarchy::reachable_through_other_parent(class, *p, &asserted, |n| {
                    self.objects(n, RDFS_SUB_CLASS_OF).cloned().collect::<Vec<Term>>()
                })
            })
            .cloned()
            .collect()
    }

    fn list_members(&self, head: &Term) -> Vec<Term> {
        let nil = Term::iri(RDF_NIL);
        let mut out = Vec::new();
        let mut seen = hashbrown::HashSet::new();
        let mut cell = head.clone();
        while cell != nil && seen.insert(cell.clone()) {
            if let Some(first) = self.first_object(&cell, RDF_FIRST) {
                out.push(first);
            }
            match self.first_object(&cell, RDF_REST) {
                Some(rest) => cell = rest,
                None => break,
            }
        }
        out
    }

    /// `(rule node, path)` for every rule of every shape of `class`.
    fn rules(&self, class: &str) -> Vec<(Term, Term)> {
        let mut out = Vec::new();
        for shape in self.shapes_for(class) {
            for prop in self.objects(&shape, SH_PROPERTY) {
                if let Some(path) = self.objects(prop, SH_PATH).find(|p| p.is_iri()) {
                    out.push((prop.clone(), path.clone()));
                }
            }
        }
        out
    }

    fn distinct_paths(&self, class: &str) -> Vec<Term> {
        let mut paths: Vec<Term> = self.rules(class).into_iter().map(|(_, p)| p).collect();
        paths.sort();
        paths.dedup();
        paths
    }

    fn select(&self, query: &Query) -> Vec<Binding> {
        match query {
            Query::EntityTypes => {
                let mut rows: Vec<Binding> = self
                    .shape_classes()
                    .into_iter()
                    .map(|class| {
                        let mut row = Binding::new();
                        if let Some(label) = self.first_object(&class, RDFS_LABEL) {
                            row.set("label", label);
                        }
                        row.with("class", class)
                    })
                    .collect();
                rows.sort_by(|a, b| a.get("label").cmp(&b.get("label")));
                rows
            }
            Query::HierarchyFacts => {
                let mut rows = Vec::new();
                for class in self.shape_classes() {
                    let mut base = Binding::new().with("class", class.clone());
                    if let Some(label) = self.first_object(&class, RDFS_LABEL) {
                        base.set("label", label);
                    }
                    let parents = self.direct_parents(&class);
                    if parents.is_empty() {
                        rows.push(base);
                        continue;
                    }
                    for parent in parents {
                        let mut row = base.clone();
                        if let Some(label) = self.first_object(&parent, RDFS_LABEL) {
                            row.set("parentLabel", label);
                        }
                        row.set("parent", parent);
                        rows.push(row);
                    }
                }
                rows
            }
            Query::SubclassEdges => {
                let children: BTreeSet<&Term> = self
                    .triples
                    .iter()
                    .filter(|t| t.predicate == RDFS_SUB_CLASS_OF)
                    .map(|t| &t.subject)
                    .collect();
                let mut rows = Vec::new();
                for child in children {
                    for parent in self.direct_parents(child) {
                        let mut row = Binding::new().with("child", child.clone());
                        if let Some(label) = self.first_object(&parent, RDFS_LABEL) {
                            row.set("parentLabel", label);
                        }
                        row.set("parent", parent);
                        rows.push(row);
                    }
                }
                rows
            }
            Query::ShapeProperties { class } => {
                const FIELDS: [(&str, &str); 11] = [
                    ("name", SH_NAME),
                    ("description", SH_DESCRIPTION),
                    ("datatype", SH_DATATYPE),
                    ("class", SH_CLASS),
                    ("node", SH_NODE),
                    ("editor", SHUI_EDITOR),
                    ("viewer", SHUI_VIEWER),
                    ("minCount", SH_MIN_COUNT),
                    ("maxCount", SH_MAX_COUNT),
                    ("order", SH_ORDER),
                    ("propertyRole", SHUI_PROPERTY_ROLE),
                ];
                self.rules(class)
                    .into_iter()
                    .map(|(prop, path)| {
                        let mut row = Binding::new().with("path", path);
                        for (var, predicate) in FIELDS {
                            if let Some(value) = self.first_object(&prop, predicate) {
                                row.set(var, value);
                            }
                        }
                        row
                    })
                    .collect()
            }
            Query::EnumValues { class, path } => {
                let path = Term::iri(path.as_str());
                let mut rows = Vec::new();
                for (prop, p) in self.rules(class) {
                    if p != path {
                        continue;
                    }
                    for head in self.objects(&prop, SH_IN) {
                        for val in self.list_members(head) {
                            rows.push(Binding::new().with("val", val));
                        }
                    }
                }
                rows
            }
            Query::ShapePaths { class } => self
                .distinct_paths(class)
                .into_iter()
                .map(|p| Binding::new().with("path", p))
                .collect(),
            Query::EntityValues { entity, class } => {
                let subject = Term::iri(entity.as_str());
                let mut rows = Vec::new();
                for path in self.distinct_paths(class) {
                    let Some(p) = path.as_iri() else { continue };
                    for value in self.objects(&subject, p) {
                        rows.push(Binding::new().with("path", path.clone()).with("value", value.clone()));
                    }
                }
                rows
            }
            Query::Instances { class, limit } => {
                let class = Term::iri(class.as_str());
                let mut rows: Vec<Binding> = self
                    .subjects(RDF_TYPE, &class)
                    .filter(|s| s.is_iri())
                    .map(|uri| {
                        let label = self
                            .first_object(uri, ARCHIMATE_NAME)
                            .or_else(|| self.first_object(uri, RDFS_LABEL))
                            .unwrap_or_else(|| Term::literal(uri.value()));
                        Binding::new().with("uri", uri.clone()).with("label", label)
                    })
                    .collect();
                rows.sort_by(|a, b| a.str("label").cmp(&b.str("label")));
                if let Some(n) = limit {
                    rows.truncate(*n);
                }
                rows
            }
        }
    }

    fn delete_paths(&mut self, subject: &str, paths: &[String]) {
        let s = Term::iri(subject);
        self.triples
            .retain(|t| !(t.subject == s && paths.iter().any(|p| *p == t.predicate)));
    }

    fn apply(&mut self, update: &Update) {
        match update {
            Update::InsertData(triples) => self.triples.extend(triples.iter().cloned()),
            Update::DeletePaths { subject, paths } => self.delete_paths(subject, paths),
            Update::Replace { subject, paths, insert } => {
                self.delete_paths(subject, paths);
                self.triples.extend(insert.iter().cloned());
            }
            Update::DeleteSubject(subject) => {
                let s = Term::iri(subject.as_str());
                self.triples.retain(|t| t.subject != s);
            }
        }
    }
}

// ============================================================================
// SparqlStore impl
// ============================================================================

#[async_trait]
impl SparqlStore for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Binding>> {
        Ok(self.inner.read().select(query))
    }

    async fn update(&self, update: &Update) -> Result<()> {
        self.inner.write().apply(update);
        Ok(())
    }

    /// `Replace` runs under a single write lock.
    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities { atomic_update: true }
    }
}

// ============================================================================
// Tests
// ============================================================================
