//! # Widget Resolution
//!
//! Maps one [`ShapeProperty`] to the editor and the viewer used for its
//! values. Both resolvers are pure functions of the property:
//!
//! 1. an explicit `shui:editor` / `shui:viewer` hint naming a known widget wins;
//! 2. otherwise the first matching inference rule below picks the widget.
//!
//! | # | Constraint | Editor | Viewer |
//! |---|------------|--------|--------|
//! | 1 | non-empty `sh:in` | `EnumSelect` | `Enum` |
//! | 2 | `sh:class` / `sh:node`, `maxCount` = 1 | `InstancePicker` (single) | `Details` |
//! | 3 | `sh:class` / `sh:node`, otherwise | `InstancePicker` (multiple) | `ValueTable` |
//! | 4 | `xsd:boolean` | `BooleanSelect` | `Boolean` |
//! | 5 | `xsd:date` | `DatePicker` | `Date` |
//! | 6 | `rdf:HTML` | `RichText` | `Html` |
//! | 7 | `rdf:langString` | `TextFieldWithLang` | `LangString` |
//! | 8 | `xsd:anyURI` | `Uri` | `Hyperlink` |
//! | 9 | anything else | `TextField` | `Literal` |
//!
//! `TextArea`, `Image`, `Uri` (viewer) and `Label` are reachable by hint only.

pub mod editor;
pub mod viewer;

pub use editor::{resolve_editor, Choice, EditorKind};
pub use viewer::{resolve_viewer, ViewerKind};

use crate::model::ShapeProperty;
use crate::vocab;

/// Candidate page size of reference pickers.
pub const PICKER_PAGE_SIZE: usize = 100;

/// Datatype-driven rules shared by both resolvers (#4–#8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DatatypeRule {
    Boolean,
    Date,
    Html,
    LangString,
    AnyUri,
}

/// Rules in precedence order; the first predicate that holds applies.
pub(crate) const DATATYPE_RULES: [(DatatypeRule, &str); 5] = [
    (DatatypeRule::Boolean, vocab::XSD_BOOLEAN),
    (DatatypeRule::Date, vocab::XSD_DATE),
    (DatatypeRule::Html, vocab::RDF_HTML),
    (DatatypeRule::LangString, vocab::RDF_LANG_STRING),
    (DatatypeRule::AnyUri, vocab::XSD_ANY_URI),
];

/// Result of the shared part of the chain (#1–#8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inferred {
    Enumeration,
    Reference { multiple: bool },
    Datatype(DatatypeRule),
    Plain,
}

pub(crate) fn infer(property: &ShapeProperty) -> Inferred {
    if property.has_enumeration() {
        return Inferred::Enumeration;
    }
    if property.is_reference() {
        return Inferred::Reference { multiple: property.is_multi_valued() };
    }
    if let Some(dt) = property.datatype.as_deref() {
        if let Some((rule, _)) = DATATYPE_RULES.iter().find(|(_, iri)| *iri == dt) {
            return Inferred::Datatype(*rule);
        }
    }
    Inferred::Plain
}

/// Both widgets of one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWidgets {
    pub editor: EditorKind,
    pub viewer: ViewerKind,
}

pub fn resolve(property: &ShapeProperty) -> ResolvedWidgets {
    ResolvedWidgets { editor: resolve_editor(property), viewer: resolve_viewer(property) }
}
