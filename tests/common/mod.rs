//! Shared fixtures for the end-to-end suites: a small ArchiMate-style shape
//! set loaded into a `MemoryStore`.

#![allow(dead_code)]

use shacl_ui::vocab::*;
use shacl_ui::{MemoryStore, Term, Triple};

pub fn am(local: &str) -> String {
    format!("{ARCHIMATE}{local}")
}

/// One `sh:property` rule under construction.
pub struct Rule {
    path: String,
    facts: Vec<(&'static str, Term)>,
}

impl Rule {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), facts: Vec::new() }
    }

    fn fact(mut self, predicate: &'static str, object: Term) -> Self {
        self.facts.push((predicate, object));
        self
    }

    pub fn name(self, name: &str) -> Self { self.fact(SH_NAME, Term::literal(name)) }
    pub fn order(self, n: i64) -> Self { self.fact(SH_ORDER, Term::typed(n.to_string(), XSD_INTEGER)) }
    pub fn min(self, n: u32) -> Self { self.fact(SH_MIN_COUNT, Term::typed(n.to_string(), XSD_INTEGER)) }
    pub fn max(self, n: u32) -> Self { self.fact(SH_MAX_COUNT, Term::typed(n.to_string(), XSD_INTEGER)) }
    pub fn datatype(self, dt: &str) -> Self { self.fact(SH_DATATYPE, Term::iri(dt)) }
    pub fn class(self, class: &str) -> Self { self.fact(SH_CLASS, Term::iri(class)) }
    pub fn node(self, shape: &str) -> Self { self.fact(SH_NODE, Term::iri(shape)) }
    pub fn editor(self, local: &str) -> Self { self.fact(SHUI_EDITOR, Term::iri(format!("{SHUI}{local}"))) }
    pub fn viewer(self, local: &str) -> Self { self.fact(SHUI_VIEWER, Term::iri(format!("{SHUI}{local}"))) }
}

/// Node shape `{class}Shape` targeting `class`.
pub fn add_shape(store: &MemoryStore, class: &str, label: &str, rules: Vec<Rule>) {
    let shape = Term::iri(format!("{class}Shape"));
    store.extend([
        Triple::new(shape.clone(), RDF_TYPE, Term::iri(SH_NODE_SHAPE)),
        Triple::new(shape.clone(), SH_TARGET_CLASS, Term::iri(class)),
        Triple::new(Term::iri(class), RDFS_LABEL, Term::literal(label)),
    ]);
    add_rules(store, &shape, class, rules);
}

/// Shape whose IRI is the class itself.
pub fn add_self_describing(store: &MemoryStore, class: &str, label: &str, rules: Vec<Rule>) {
    let shape = Term::iri(class);
    store.extend([
        Triple::new(shape.clone(), RDF_TYPE, Term::iri(SH_NODE_SHAPE)),
        Triple::new(shape.clone(), RDFS_LABEL, Term::literal(label)),
    ]);
    add_rules(store, &shape, class, rules);
}

fn add_rules(store: &MemoryStore, shape: &Term, class: &str, rules: Vec<Rule>) {
    for rule in rules {
        let node = Term::blank(format!("{}-{}", local_name(class), local_name(&rule.path)));
        store.insert(Triple::new(shape.clone(), SH_PROPERTY, node.clone()));
        store.insert(Triple::new(node.clone(), SH_PATH, Term::iri(rule.path.as_str())));
        for (predicate, object) in rule.facts {
            store.insert(Triple::new(node.clone(), predicate, object));
        }
    }
}

pub fn sub_class(store: &MemoryStore, child: &str, parent: &str) {
    store.insert(Triple::new(Term::iri(child), RDFS_SUB_CLASS_OF, Term::iri(parent)));
}

pub fn label(store: &MemoryStore, iri: &str, label: &str) {
    store.insert(Triple::new(Term::iri(iri), RDFS_LABEL, Term::literal(label)));
}

/// Instance `iri` of `class` with `(path, object)` statements.
pub fn add_entity(store: &MemoryStore, iri: &str, class: &str, facts: &[(&str, Term)]) {
    store.insert(Triple::new(Term::iri(iri), RDF_TYPE, Term::iri(class)));
    for (path, object) in facts {
        store.insert(Triple::new(Term::iri(iri), *path, object.clone()));
    }
}

/// ```text
/// Element (grouping)
/// ├── BusinessActor  Name, Documentation, assignedTo → BusinessRole (single), notes → Note (many)
/// └── BusinessRole   Name, reportsTo → BusinessRole (single)
/// Note (self-describing)  text
/// ```
pub fn archimate() -> MemoryStore {
    let store = MemoryStore::new();
    let actor = am("BusinessActor");
    let role = am("BusinessRole");
    let note = am("Note");

    add_shape(&store, &actor, "Business Actor", vec![
        Rule::new(am("Name")).name("Name").order(1).min(1).max(1).datatype(XSD_STRING),
        Rule::new(am("Documentation")).name("Documentation").order(2).editor("TextAreaEditor"),
        Rule::new(am("assignedTo")).name("Assigned to").order(3).max(1).class(&role),
        Rule::new(am("notes")).name("Notes").order(4).class(&note),
    ]);
    add_shape(&store, &role, "Business Role", vec![
        Rule::new(am("Name")).name("Name").order(1).max(1),
        Rule::new(am("reportsTo")).name("Reports to").order(2).max(1).class(&role),
    ]);
    add_self_describing(&store, &note, "Note", vec![Rule::new(am("text")).name("Text").order(1)]);

    label(&store, &am("Element"), "Element");
    sub_class(&store, &actor, &am("Element"));
    sub_class(&store, &role, &am("Element"));
    store
}
