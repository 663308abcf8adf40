//! RDF terms, triples and query bindings.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An RDF term as the store tags it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Term {
    Iri { value: String },
    Blank { value: String },
    Literal {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri { value: value.into() }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal { value: value.into(), datatype: None, lang: None }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal { value: value.into(), datatype: Some(datatype.into()), lang: None }
    }

    pub fn lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Term::Literal { value: value.into(), datatype: None, lang: Some(lang.into()) }
    }

    pub fn blank(value: impl Into<String>) -> Self {
        Term::Blank { value: value.into() }
    }

    /// Lexical value regardless of kind.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri { value } | Term::Blank { value } | Term::Literal { value, .. } => value,
        }
    }

    pub fn is_iri(&self) -> bool { matches!(self, Term::Iri { .. }) }
    pub fn is_blank(&self) -> bool { matches!(self, Term::Blank { .. }) }
    pub fn is_literal(&self) -> bool { matches!(self, Term::Literal { .. }) }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri { value } => Some(value),
            _ => None,
        }
    }

    pub fn datatype(&self) -> Option<&str> {
        match self {
            Term::Literal { datatype, .. } => datatype.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri { value } => write!(f, "<{value}>"),
            Term::Blank { value } => write!(f, "_:{value}"),
            Term::Literal { value, datatype, lang } => {
                write!(f, "\"{}\"", escape_literal(value))?;
                if let Some(lang) = lang {
                    write!(f, "@{lang}")
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Escape a lexical form for a double-quoted SPARQL/Turtle string.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// One asserted statement. Predicates are always IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self { subject, predicate: predicate.into(), object }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

/// One solution row of a read query: variable name → bound term.
///
/// Unbound (OPTIONAL) variables are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub values: HashMap<String, Term>,
}

impl Binding {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, var: impl Into<String>, term: Term) -> Self {
        self.values.insert(var.into(), term);
        self
    }

    pub fn set(&mut self, var: impl Into<String>, term: Term) {
        self.values.insert(var.into(), term);
    }

    pub fn get(&self, var: &str) -> Option<&Term> {
        self.values.get(var)
    }

    /// Lexical value of an optional variable.
    pub fn str(&self, var: &str) -> Option<&str> {
        self.values.get(var).map(Term::value)
    }

    /// A variable the query always binds.
    pub fn require(&self, var: &str) -> Result<&Term> {
        self.values
            .get(var)
            .ok_or_else(|| Error::Decode(format!("binding is missing variable ?{var}")))
    }

    /// A variable the query always binds to an IRI.
    pub fn require_iri(&self, var: &str) -> Result<&str> {
        let term = self.require(var)?;
        term.as_iri().ok_or_else(|| {
            Error::Decode(format!("?{var} should be an IRI, got {term}"))
        })
    }

    /// Optional integer variable (`sh:minCount`, `sh:order`, ...).
    pub fn int(&self, var: &str) -> Result<Option<i64>> {
        match self.str(var) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
                Error::InvalidShape(format!("?{var} is not an integer: {raw:?}"))
            }),
        }
    }
}
