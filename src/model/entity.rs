//! Entity identity and property values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// IRI of a described entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(iri: impl Into<String>) -> Self { Self(iri.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId { fn from(v: &str) -> Self { Self(v.to_owned()) } }
impl From<String> for EntityId { fn from(v: String) -> Self { Self(v) } }

/// Whether a value links to another entity or holds a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueKind {
    Reference,
    Literal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },
}

/// One value at one property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawValue {
    pub value: String,
    #[serde(flatten)]
    pub kind: ValueKind,
}

impl RawValue {
    /// Identifier of another entity.
    pub fn reference(iri: impl Into<String>) -> Self {
        Self { value: iri.into(), kind: ValueKind::Reference }
    }

    /// Plain string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Self { value: value.into(), kind: ValueKind::Literal { datatype: None, lang: None } }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: ValueKind::Literal { datatype: Some(datatype.into()), lang: None },
        }
    }

    pub fn lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: ValueKind::Literal { datatype: None, lang: Some(lang.into()) },
        }
    }

    pub fn is_reference(&self) -> bool { matches!(self.kind, ValueKind::Reference) }

    pub fn datatype(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Literal { datatype, .. } => datatype.as_deref(),
            ValueKind::Reference => None,
        }
    }

    pub fn lang_tag(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Literal { lang, .. } => lang.as_deref(),
            ValueKind::Reference => None,
        }
    }
}

/// Values at one path; nearly always a single value.
pub type Values = SmallVec<[RawValue; 1]>;

/// Path → values of one entity, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityValues {
    entries: BTreeMap<String, Values>,
}

impl EntityValues {
    pub fn new() -> Self { Self::default() }

    /// Builder form of [`EntityValues::push`].
    pub fn with(mut self, path: impl Into<String>, value: RawValue) -> Self {
        self.push(path, value);
        self
    }

    /// Append a value at `path`, ignoring exact duplicates.
    pub fn push(&mut self, path: impl Into<String>, value: RawValue) {
        let slot = self.entries.entry(path.into()).or_default();
        if !slot.contains(&value) {
            slot.push(value);
        }
    }

    /// Replace every value at `path`.
    pub fn set(&mut self, path: impl Into<String>, values: impl IntoIterator<Item = RawValue>) {
        self.entries.insert(path.into(), values.into_iter().collect());
    }

    pub fn get(&self, path: &str) -> &[RawValue] {
        self.entries.get(path).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn first(&self, path: &str) -> Option<&RawValue> {
        self.get(path).first()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RawValue])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of paths with at least one value.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|v| !v.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(String, RawValue)> for EntityValues {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        let mut out = EntityValues::new();
        for (path, value) in iter {
            out.push(path, value);
        }
        out
    }
}
