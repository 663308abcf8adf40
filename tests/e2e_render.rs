//! End-to-end tests for nested rendering and form resolution.

mod common;

use async_trait::async_trait;
use common::*;
use pretty_assertions::assert_eq;
use shacl_ui::present::render_text;
use shacl_ui::{
    Binding, EditorKind, EntityView, Error, Fallback, MemoryStore, Query, RawValue, SparqlStore,
    Term, Update, ValueKind, ViewValue, ViewerKind, Workbench, WorkbenchConfig,
};

/// ada → r1 → r2 → r3 → r4 along `assignedTo` / `reportsTo`, plus notes.
fn org() -> MemoryStore {
    let store = archimate();
    add_entity(&store, "http://x/data#ada", &am("BusinessActor"), &[
        (am("Name").as_str(), Term::literal("Ada")),
        (am("assignedTo").as_str(), Term::iri("http://x/data#r1")),
        (am("notes").as_str(), Term::iri("http://x/data#n1")),
        (am("notes").as_str(), Term::iri("http://x/data#n2")),
        (am("notes").as_str(), Term::iri("http://x/data#n3")),
    ]);
    for i in 1..=4 {
        let mut facts = vec![(am("Name"), Term::literal(format!("Role {i}")))];
        if i < 4 {
            facts.push((am("reportsTo"), Term::iri(format!("http://x/data#r{}", i + 1))));
        }
        let facts: Vec<(&str, Term)> = facts.iter().map(|(p, o)| (p.as_str(), o.clone())).collect();
        add_entity(&store, &format!("http://x/data#r{i}"), &am("BusinessRole"), &facts);
    }
    add_entity(&store, "http://x/data#n1", &am("Note"), &[(am("text").as_str(), Term::literal("first"))]);
    add_entity(&store, "http://x/data#n2", &am("Note"), &[(am("text").as_str(), Term::literal("second"))]);
    store
}

/// Follow `reportsTo` (or `assignedTo` at the top) down the nested views.
fn role_chain(view: &EntityView) -> Vec<&ViewValue> {
    let mut out = Vec::new();
    let mut current = view.field(&am("assignedTo")).and_then(|f| f.values.first());
    while let Some(value) = current {
        out.push(value);
        current = match value {
            ViewValue::Nested(nested) => nested.field(&am("reportsTo")).and_then(|f| f.values.first()),
            _ => None,
        };
    }
    out
}

// ============================================================================
// 1. Depth bound
// ============================================================================

#[tokio::test]
async fn test_depth_at_max_falls_back_to_label() {
    let bench = Workbench::with_store(org());
    let view = bench.render_entity("http://x/data#ada", &am("BusinessActor")).await.unwrap();

    let chain = role_chain(&view);
    assert_eq!(chain.len(), 3);
    assert!(matches!(chain[0], ViewValue::Nested(v) if v.depth == 1 && v.entity == "http://x/data#r1"));
    assert!(matches!(chain[1], ViewValue::Nested(v) if v.depth == 2));
    assert_eq!(
        chain[2],
        &ViewValue::Label {
            target: "http://x/data#r3".into(),
            label: "r3".into(),
            reason: Fallback::DepthExceeded,
        }
    );
}

#[tokio::test]
async fn test_one_below_max_still_resolves() {
    let config = WorkbenchConfig { max_depth: 4, ..Default::default() };
    let bench = Workbench::with_config(org(), config).unwrap();
    let view = bench.render_entity("http://x/data#ada", &am("BusinessActor")).await.unwrap();

    let chain = role_chain(&view);
    assert!(matches!(chain[2], ViewValue::Nested(v) if v.depth == 3 && v.entity == "http://x/data#r3"));
    assert!(matches!(chain[3], ViewValue::Label { reason: Fallback::DepthExceeded, .. }));
}

#[tokio::test]
async fn test_renderer_depth_parameter_directly() {
    let store = org();
    let bench = Workbench::with_store(store);
    let renderer = bench.renderer();
    let max = renderer.max_depth();
    let role = am("BusinessRole");

    let below = renderer.render_nested("http://x/data#r1", Some(&role), max - 1).await;
    assert!(matches!(below, ViewValue::Nested(_)));
    let at = renderer.render_nested("http://x/data#r1", Some(&role), max).await;
    assert!(matches!(at, ViewValue::Label { reason: Fallback::DepthExceeded, .. }));
}

// ============================================================================
// 2. Tables and degradation
// ============================================================================

#[tokio::test]
async fn test_value_table_rows() {
    let bench = Workbench::with_store(org());
    let view = bench.render_entity("http://x/data#ada", &am("BusinessActor")).await.unwrap();

    let notes = view.field(&am("notes")).unwrap();
    assert_eq!(notes.viewer, ViewerKind::ValueTable);
    let [ViewValue::Table(table)] = notes.values.as_slice() else {
        panic!("expected a single table, got {:?}", notes.values);
    };
    assert_eq!(table.depth, 1);
    assert_eq!(table.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), ["Text"]);
    let rows: Vec<_> = table.rows.iter().map(|r| (r.entity.as_str(), r.fallback)).collect();
    assert_eq!(
        rows,
        [
            ("http://x/data#n1", None),
            ("http://x/data#n2", None),
            ("http://x/data#n3", Some(Fallback::NoValues)),
        ]
    );
    assert!(matches!(&table.rows[1].cells[0].values[0], ViewValue::Literal { text, .. } if text == "second"));
}

#[tokio::test]
async fn test_reference_to_unshaped_type_is_label() {
    let store = org();
    add_shape(&store, &am("Contract"), "Contract", vec![
        Rule::new(am("party")).name("Party").max(1).class(&am("Element")),
    ]);
    add_entity(&store, "http://x/data#c1", &am("Contract"), &[(am("party").as_str(), Term::iri("http://x/data#ada"))]);
    let bench = Workbench::with_store(store);

    let view = bench.render_entity("http://x/data#c1", &am("Contract")).await.unwrap();
    let party = view.field(&am("party")).unwrap();
    assert!(matches!(&party.values[0], ViewValue::Label { reason: Fallback::MissingShape, label, .. } if label == "ada"));
}

/// Fails every value read of one entity.
struct BrokenEntity {
    inner: MemoryStore,
    broken: &'static str,
}

#[async_trait]
impl SparqlStore for BrokenEntity {
    async fn select(&self, query: &Query) -> shacl_ui::Result<Vec<Binding>> {
        match query {
            Query::EntityValues { entity, .. } if entity == self.broken => {
                Err(Error::Transport("store timed out".into()))
            }
            _ => self.inner.select(query).await,
        }
    }

    async fn update(&self, update: &Update) -> shacl_ui::Result<()> {
        self.inner.update(update).await
    }
}

#[tokio::test]
async fn test_nested_transport_failure_does_not_fail_parent() {
    let bench = Workbench::with_store(BrokenEntity { inner: org(), broken: "http://x/data#r1" });
    let view = bench.render_entity("http://x/data#ada", &am("BusinessActor")).await.unwrap();

    let assigned = view.field(&am("assignedTo")).unwrap();
    assert!(matches!(assigned.values[0], ViewValue::Label { reason: Fallback::Unavailable, .. }));
    let name = view.field(&am("Name")).unwrap();
    assert!(matches!(&name.values[0], ViewValue::Literal { text, .. } if text == "Ada"));
}

#[tokio::test]
async fn test_top_level_transport_failure_propagates() {
    let bench = Workbench::with_store(BrokenEntity { inner: org(), broken: "http://x/data#ada" });
    let err = bench.render_entity("http://x/data#ada", &am("BusinessActor")).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_text_projection() {
    let bench = Workbench::with_store(org());
    let view = bench.render_entity("http://x/data#r3", &am("BusinessRole")).await.unwrap();
    let expected = "\
Name: Role 3
Reports to:
  Name: Role 4
";
    assert_eq!(render_text(&view), expected);
}

// ============================================================================
// 3. Forms
// ============================================================================

#[tokio::test]
async fn test_form_fields_and_collect() {
    let bench = Workbench::with_store(org());
    let form = bench.resolve_form(&am("BusinessActor")).await.unwrap();

    let name = form.field(&am("Name")).unwrap();
    assert!(name.required);
    assert_eq!(name.editor, EditorKind::TextField);
    let assigned = form.field(&am("assignedTo")).unwrap();
    assert_eq!(assigned.editor, EditorKind::InstancePicker { multiple: false });
    assert_eq!(assigned.value_kind, ValueKind::Reference);

    let candidates = bench.forms().candidates(&assigned.property).await.unwrap();
    let labels: Vec<_> = candidates.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, ["Role 1", "Role 2", "Role 3", "Role 4"]);

    let values = form.collect([
        (am("Name").as_str(), "Grace"),
        (am("assignedTo").as_str(), "http://x/data#r2"),
        (am("Documentation").as_str(), "  "),
    ]);
    assert_eq!(values.get(&am("Name")), &[RawValue::literal("Grace")]);
    assert_eq!(values.get(&am("assignedTo")), &[RawValue::reference("http://x/data#r2")]);
    assert!(form.missing_required(&values).is_empty());

    let id = bench.create(&am("BusinessActor"), &values).await.unwrap();
    let view = bench.render_entity(id.as_str(), &am("BusinessActor")).await.unwrap();
    assert!(matches!(role_chain(&view)[0], ViewValue::Nested(v) if v.entity == "http://x/data#r2"));
}

#[tokio::test]
async fn test_form_inlines_node_shapes_within_depth() {
    let store = org();
    add_self_describing(&store, &am("AddressShape"), "Address", vec![
        Rule::new(am("street")).name("Street").order(1),
        Rule::new(am("next")).name("Next").order(2).node(&am("AddressShape")),
    ]);
    add_shape(&store, &am("Site"), "Site", vec![Rule::new(am("address")).name("Address").node(&am("AddressShape"))]);
    let bench = Workbench::with_store(store);

    let form = bench.resolve_form(&am("Site")).await.unwrap();
    let level1 = form.field(&am("address")).and_then(|f| f.nested.as_ref()).unwrap();
    assert_eq!(level1.depth, 1);
    let level2 = level1.field(&am("next")).and_then(|f| f.nested.as_ref()).unwrap();
    assert_eq!(level2.depth, 2);
    assert!(level2.field(&am("next")).unwrap().nested.is_none());
}
