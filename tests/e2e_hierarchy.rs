//! Property-based tests for the pure parts: hierarchy building and widget
//! resolution.
//!
//! - the forest is finite and never repeats a type along one path
//! - every shape type appears, with its shape flag set
//! - builds are independent of edge order
//! - a type sits only under parents it cannot reach through its other parents
//! - widget inference is a function of the rule

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use shacl_ui::vocab::*;
use shacl_ui::widget::{resolve_editor, resolve_viewer};
use shacl_ui::{build_hierarchy, EditorKind, EntityTypeNode, HierarchyFacts, ShapeProperty, Term, ViewerKind};

const TYPES: usize = 7;

fn uri(i: usize) -> String {
    format!("http://x/ns#T{i}")
}

/// `TYPES` candidate types, up to four shaped, with arbitrary edges including cycles.
fn arb_facts() -> impl Strategy<Value = HierarchyFacts> {
    (
        proptest::collection::btree_set(0..TYPES, 1..=4),
        proptest::collection::vec((0..TYPES, 0..TYPES), 0..14),
        proptest::collection::vec("[A-Za-z]{1,6}", TYPES),
    )
        .prop_map(|(shapes, edges, labels)| {
            let mut facts = HierarchyFacts::new();
            for i in shapes {
                facts = facts.shape(uri(i), labels[i].clone());
            }
            for (c, p) in edges {
                facts = facts.edge(uri(c), uri(p));
            }
            facts
        })
}

fn no_repeat_on_path<'a>(node: &'a EntityTypeNode, path: &mut Vec<&'a str>) -> bool {
    if path.contains(&node.uri.as_str()) {
        return false;
    }
    path.push(&node.uri);
    let ok = node.children.iter().all(|c| no_repeat_on_path(c, path));
    path.pop();
    ok
}

/// Asserted parents per child, self-loops dropped.
fn asserted_parents(facts: &HierarchyFacts) -> BTreeMap<&str, BTreeSet<&str>> {
    let mut parents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for e in facts.edges.iter().filter(|e| e.child != e.parent) {
        parents.entry(e.child.as_str()).or_default().insert(e.parent.as_str());
    }
    parents
}

/// Whether `target` is an ancestor of `from`, never passing through `avoid`.
fn ancestor_of(parents: &BTreeMap<&str, BTreeSet<&str>>, from: &str, target: &str, avoid: &str) -> bool {
    let mut seen = BTreeSet::from([avoid]);
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
        if node == target {
            return true;
        }
        if seen.insert(node) {
            stack.extend(parents.get(node).into_iter().flatten().copied());
        }
    }
    false
}

fn parent_child_pairs(node: &EntityTypeNode, out: &mut Vec<(String, String)>) {
    for child in &node.children {
        out.push((node.uri.clone(), child.uri.clone()));
        parent_child_pairs(child, out);
    }
}

mod hierarchy_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn no_type_is_its_own_ancestor(facts in arb_facts()) {
            let forest = build_hierarchy(&facts);
            for root in &forest {
                prop_assert!(no_repeat_on_path(root, &mut Vec::new()), "cycle in {:?}", root);
            }
        }

        #[test]
        fn every_shape_appears_flagged(facts in arb_facts()) {
            let forest = build_hierarchy(&facts);
            let seen: BTreeSet<&str> = forest.iter().flat_map(|r| r.walk()).map(|n| n.uri.as_str()).collect();
            for shape in &facts.shapes {
                prop_assert!(seen.contains(shape.as_str()), "{} missing", shape);
            }
            for node in forest.iter().flat_map(|r| r.walk()) {
                prop_assert_eq!(node.is_shape, facts.shapes.contains(&node.uri));
            }
        }

        #[test]
        fn build_ignores_edge_order(facts in arb_facts()) {
            let mut reversed = facts.clone();
            reversed.edges.reverse();
            prop_assert_eq!(build_hierarchy(&facts), build_hierarchy(&reversed));
        }

        #[test]
        fn children_hang_only_under_direct_parents(facts in arb_facts()) {
            let parents = asserted_parents(&facts);
            let mut pairs = Vec::new();
            for root in build_hierarchy(&facts) {
                parent_child_pairs(&root, &mut pairs);
            }
            for (parent, child) in &pairs {
                let others = parents.get(child.as_str()).into_iter().flatten().filter(|m| **m != parent.as_str());
                for other in others {
                    prop_assert!(
                        !ancestor_of(&parents, other, parent, child),
                        "{} under {} is also reachable through {}", child, parent, other
                    );
                }
            }
        }

        #[test]
        fn roots_sorted_by_label(facts in arb_facts()) {
            let forest = build_hierarchy(&facts);
            for pair in forest.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.label.to_lowercase() <= b.label.to_lowercase());
            }
        }
    }
}

#[test]
fn diamond_copies_are_independent() {
    // Mixin has two parents; each appearance carries its own Leaf.
    let facts = HierarchyFacts::new()
        .label(uri(0), "Base")
        .shape(uri(1), "Left")
        .shape(uri(2), "Right")
        .shape(uri(3), "Mixin")
        .shape(uri(4), "Leaf")
        .edge(uri(1), uri(0))
        .edge(uri(2), uri(0))
        .edge(uri(3), uri(1))
        .edge(uri(3), uri(2))
        .edge(uri(4), uri(3));
    let forest = build_hierarchy(&facts);
    assert_eq!(forest.len(), 1);
    assert!(!forest[0].is_shape);

    let mixins = forest[0].find_all(&uri(3));
    assert_eq!(mixins.len(), 2);
    for mixin in &mixins {
        assert_eq!(mixin.children.len(), 1);
        assert_eq!(mixin.children[0].uri, uri(4));
    }
    assert_eq!(forest[0].find_all(&uri(4)).len(), 2);
}

mod widget_props {
    use super::*;

    fn arb_property() -> impl Strategy<Value = ShapeProperty> {
        let datatype = prop_oneof![
            Just(None),
            Just(Some(XSD_STRING)),
            Just(Some(XSD_BOOLEAN)),
            Just(Some(XSD_DATE)),
            Just(Some(XSD_ANY_URI)),
            Just(Some(RDF_HTML)),
            Just(Some(RDF_LANG_STRING)),
        ];
        (
            datatype,
            proptest::option::of("[a-z]{1,6}"),
            proptest::option::of(0u32..4),
            proptest::bool::ANY,
            0usize..3,
        )
            .prop_map(|(datatype, class, max, node, members)| {
                let mut p = ShapeProperty::new("http://x/ns#p");
                if let Some(dt) = datatype {
                    p = p.with_datatype(dt);
                }
                if let Some(class) = class {
                    p = p.with_class(format!("http://x/ns#{class}"));
                }
                if let Some(max) = max {
                    p = p.with_max_count(max);
                }
                if node {
                    p = p.with_node("http://x/ns#SomeShape");
                }
                if members > 0 {
                    p = p.with_enum((0..members).map(|i| Term::iri(format!("http://x/ns#v{i}"))).collect());
                }
                p
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn resolution_is_deterministic(p in arb_property()) {
            prop_assert_eq!(resolve_editor(&p), resolve_editor(&p.clone()));
            prop_assert_eq!(resolve_viewer(&p), resolve_viewer(&p.clone()));
        }

        #[test]
        fn enumeration_wins(p in arb_property()) {
            if p.has_enumeration() {
                prop_assert_eq!(resolve_editor(&p), EditorKind::EnumSelect);
                prop_assert_eq!(resolve_viewer(&p), ViewerKind::Enum);
            }
        }

        #[test]
        fn references_pick_instances(p in arb_property()) {
            if p.is_reference() && !p.has_enumeration() {
                prop_assert_eq!(
                    resolve_editor(&p),
                    EditorKind::InstancePicker { multiple: p.is_multi_valued() }
                );
                prop_assert!(resolve_viewer(&p).is_nested());
            } else {
                prop_assert!(!resolve_viewer(&p).is_nested());
            }
        }
    }
}
