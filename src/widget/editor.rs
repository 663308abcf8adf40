//! Editors: what a form field lets the user enter and how that input becomes
//! a value.

use serde::{Deserialize, Serialize};

use super::{infer, DatatypeRule, Inferred};
use crate::codec;
use crate::model::{RawValue, ShapeProperty, Term};
use crate::vocab;

/// Editing widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorKind {
    TextField,
    TextArea,
    EnumSelect,
    BooleanSelect,
    DatePicker,
    /// Picks existing instances of the referenced type.
    InstancePicker { multiple: bool },
    Uri,
    RichText,
    TextFieldWithLang,
}

/// One option of a select-style editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl EditorKind {
    /// Local name in the `shui:` namespace.
    pub fn name(&self) -> &'static str {
        match self {
            EditorKind::TextField => "TextFieldEditor",
            EditorKind::TextArea => "TextAreaEditor",
            EditorKind::EnumSelect => "EnumSelectEditor",
            EditorKind::BooleanSelect => "BooleanSelectEditor",
            EditorKind::DatePicker => "DatePickerEditor",
            EditorKind::InstancePicker { multiple: false } => "InstancesSelectEditor",
            EditorKind::InstancePicker { multiple: true } => "InstancesMultiSelectEditor",
            EditorKind::Uri => "URIEditor",
            EditorKind::RichText => "RichTextEditor",
            EditorKind::TextFieldWithLang => "TextFieldWithLangEditor",
        }
    }

    pub fn iri(&self) -> String {
        format!("{}{}", vocab::SHUI, self.name())
    }

    /// Known `shui:editor` hint. Picker hints take their multiplicity from
    /// the property's cardinality.
    pub fn from_hint(iri: &str, property: &ShapeProperty) -> Option<Self> {
        let name = iri.strip_prefix(vocab::SHUI)?;
        let picker = EditorKind::InstancePicker { multiple: property.is_multi_valued() };
        Some(match name {
            "TextFieldEditor" => EditorKind::TextField,
            "TextAreaEditor" => EditorKind::TextArea,
            "EnumSelectEditor" => EditorKind::EnumSelect,
            "BooleanSelectEditor" => EditorKind::BooleanSelect,
            "DatePickerEditor" => EditorKind::DatePicker,
            "AutoCompleteEditor" | "InstancesSelectEditor" => picker,
            "InstancesMultiSelectEditor" => EditorKind::InstancePicker { multiple: true },
            "URIEditor" => EditorKind::Uri,
            "RichTextEditor" => EditorKind::RichText,
            "TextFieldWithLangEditor" => EditorKind::TextFieldWithLang,
            _ => return None,
        })
    }

    /// Input of this editor is an entity identifier, not a literal.
    pub fn produces_reference(&self) -> bool {
        matches!(self, EditorKind::InstancePicker { .. } | EditorKind::Uri)
    }

    /// Fixed options of select editors. Pickers load theirs from the store.
    pub fn options(&self, property: &ShapeProperty) -> Vec<Choice> {
        match self {
            EditorKind::EnumSelect => property
                .enum_values
                .iter()
                .flatten()
                .map(|term| Choice {
                    value: term.value().to_string(),
                    label: match term {
                        Term::Iri { value } => vocab::local_name(value).to_string(),
                        other => other.value().to_string(),
                    },
                })
                .collect(),
            EditorKind::BooleanSelect => vec![
                Choice { value: "true".into(), label: "Yes".into() },
                Choice { value: "false".into(), label: "No".into() },
            ],
            _ => Vec::new(),
        }
    }

    /// Hint text shown in an empty input.
    pub fn placeholder<'p>(&self, property: &'p ShapeProperty) -> Option<&'p str> {
        match self {
            EditorKind::Uri => Some("https://..."),
            EditorKind::TextField | EditorKind::TextArea | EditorKind::TextFieldWithLang => {
                property.description.as_deref()
            }
            _ => None,
        }
    }

    /// Turn raw user input into the value to write. Blank input writes nothing.
    pub fn pending_value(&self, property: &ShapeProperty, input: &str) -> Option<RawValue> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let value = match self {
            EditorKind::EnumSelect => {
                let member = property.enum_values.iter().flatten().find(|t| t.value() == input);
                match member {
                    Some(term) => codec::decode(term)?,
                    None => codec::literal_for(input, property.datatype.as_deref()),
                }
            }
            kind if kind.produces_reference() => RawValue::reference(input),
            EditorKind::TextFieldWithLang => match split_lang_tag(input) {
                Some((text, lang)) => RawValue::lang(text, lang),
                None => RawValue::literal(input),
            },
            EditorKind::BooleanSelect => {
                let dt = property.datatype.as_deref().unwrap_or(vocab::XSD_BOOLEAN);
                RawValue::typed(input.to_ascii_lowercase(), dt)
            }
            _ => codec::literal_for(input, property.datatype.as_deref()),
        };
        Some(value)
    }
}

/// `"text@en"` → `("text", "en")`.
pub fn split_lang_tag(input: &str) -> Option<(&str, &str)> {
    let (text, tag) = input.rsplit_once('@')?;
    let valid = !text.is_empty()
        && !tag.is_empty()
        && tag.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
    valid.then_some((text, tag))
}

/// Editor for `property`: known hint, else the inference chain.
pub fn resolve_editor(property: &ShapeProperty) -> EditorKind {
    if let Some(kind) = property
        .editor_hint
        .as_deref()
        .and_then(|iri| EditorKind::from_hint(iri, property))
    {
        return kind;
    }
    match infer(property) {
        Inferred::Enumeration => EditorKind::EnumSelect,
        Inferred::Reference { multiple } => EditorKind::InstancePicker { multiple },
        Inferred::Datatype(DatatypeRule::Boolean) => EditorKind::BooleanSelect,
        Inferred::Datatype(DatatypeRule::Date) => EditorKind::DatePicker,
        Inferred::Datatype(DatatypeRule::Html) => EditorKind::RichText,
        Inferred::Datatype(DatatypeRule::LangString) => EditorKind::TextFieldWithLang,
        Inferred::Datatype(DatatypeRule::AnyUri) => EditorKind::Uri,
        Inferred::Plain => EditorKind::TextField,
    }
}
