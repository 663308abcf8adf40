//! Viewers: how a stored value is shown.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{infer, DatatypeRule, Inferred};
use crate::model::{RawValue, ShapeProperty};
use crate::vocab;

/// Viewing widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewerKind {
    Literal,
    /// Local name of an IRI.
    Label,
    Uri,
    LangString,
    Html,
    Image,
    Hyperlink,
    Boolean,
    Date,
    Enum,
    /// One referenced entity rendered inline.
    Details,
    /// Referenced entities rendered as a table.
    ValueTable,
}

impl ViewerKind {
    /// Local name in the `shui:` namespace.
    pub fn name(&self) -> &'static str {
        match self {
            ViewerKind::Literal => "LiteralViewer",
            ViewerKind::Label => "LabelViewer",
            ViewerKind::Uri => "URIViewer",
            ViewerKind::LangString => "LangStringViewer",
            ViewerKind::Html => "HTMLViewer",
            ViewerKind::Image => "ImageViewer",
            ViewerKind::Hyperlink => "HyperlinkViewer",
            ViewerKind::Boolean => "BooleanViewer",
            ViewerKind::Date => "DateViewer",
            ViewerKind::Enum => "EnumViewer",
            ViewerKind::Details => "DetailsViewer",
            ViewerKind::ValueTable => "ValueTableViewer",
        }
    }

    pub fn iri(&self) -> String {
        format!("{}{}", vocab::SHUI, self.name())
    }

    const ALL: [ViewerKind; 12] = [
        ViewerKind::Literal,
        ViewerKind::Label,
        ViewerKind::Uri,
        ViewerKind::LangString,
        ViewerKind::Html,
        ViewerKind::Image,
        ViewerKind::Hyperlink,
        ViewerKind::Boolean,
        ViewerKind::Date,
        ViewerKind::Enum,
        ViewerKind::Details,
        ViewerKind::ValueTable,
    ];

    /// Known `shui:viewer` hint.
    pub fn from_hint(iri: &str) -> Option<Self> {
        let name = iri.strip_prefix(vocab::SHUI)?;
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Values are resolved as nested entities.
    pub fn is_nested(&self) -> bool {
        matches!(self, ViewerKind::Details | ViewerKind::ValueTable)
    }

    /// Text shown for one value.
    pub fn display(&self, value: &RawValue) -> String {
        let raw = value.value.as_str();
        match self {
            ViewerKind::Literal | ViewerKind::Uri => raw.to_string(),
            ViewerKind::Label => vocab::local_name(raw).to_string(),
            ViewerKind::LangString => {
                let tagged = value
                    .lang_tag()
                    .map(|lang| (raw, lang))
                    .or_else(|| super::editor::split_lang_tag(raw));
                match tagged {
                    Some((text, lang)) => format!("{text} [{lang}]"),
                    None => raw.to_string(),
                }
            }
            ViewerKind::Html => strip_tags(raw),
            ViewerKind::Image if raw.is_empty() => String::new(),
            ViewerKind::Image => format!("[image] {raw}"),
            ViewerKind::Hyperlink => hyperlink_label(raw),
            ViewerKind::Boolean => match raw {
                "true" | "1" => "Yes".to_string(),
                "false" | "0" => "No".to_string(),
                other => other.to_string(),
            },
            ViewerKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|d| d.format("%-d %B %Y").to_string())
                .unwrap_or_else(|_| raw.to_string()),
            ViewerKind::Enum | ViewerKind::Details | ViewerKind::ValueTable => {
                if value.is_reference() {
                    vocab::local_name(raw).to_string()
                } else {
                    raw.to_string()
                }
            }
        }
    }
}

fn hyperlink_label(url: &str) -> String {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.strip_suffix('/').unwrap_or(rest).to_string()
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Viewer for `property`: known hint, else the inference chain.
pub fn resolve_viewer(property: &ShapeProperty) -> ViewerKind {
    if let Some(kind) = property.viewer_hint.as_deref().and_then(ViewerKind::from_hint) {
        return kind;
    }
    match infer(property) {
        Inferred::Enumeration => ViewerKind::Enum,
        Inferred::Reference { multiple: false } => ViewerKind::Details,
        Inferred::Reference { multiple: true } => ViewerKind::ValueTable,
        Inferred::Datatype(DatatypeRule::Boolean) => ViewerKind::Boolean,
        Inferred::Datatype(DatatypeRule::Date) => ViewerKind::Date,
        Inferred::Datatype(DatatypeRule::Html) => ViewerKind::Html,
        Inferred::Datatype(DatatypeRule::LangString) => ViewerKind::LangString,
        Inferred::Datatype(DatatypeRule::AnyUri) => ViewerKind::Hyperlink,
        Inferred::Plain => ViewerKind::Literal,
    }
}
