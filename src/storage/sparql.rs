//! SPARQL 1.1 text for every [`Query`]/[`Update`], and the
//! `application/sparql-results+json` reader.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Deserialize;

use super::{Query, Update};
use crate::model::{Binding, Term, Triple};
use crate::{Error, Result};

pub const PREFIXES: &str = "\
PREFIX sh: <http://www.w3.org/ns/shacl#>
PREFIX shui: <http://www.w3.org/ns/shacl-ui#>
PREFIX archimate: <https://purl.org/archimate#>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
";

/// IRIs are interpolated inside `<...>`; refuse anything that would break out.
fn iri(value: &str) -> Result<String> {
    if value.is_empty()
        || value.chars().any(|c| matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') || c.is_whitespace())
    {
        return Err(Error::Decode(format!("not a usable IRI: {value:?}")));
    }
    Ok(format!("<{value}>"))
}

/// `?shape` bound to every node shape describing `class`.
fn shape_binding(class: &str) -> String {
    format!(
        "{{
    ?shape a sh:NodeShape ;
           sh:targetClass {class} .
  }} UNION {{
    BIND({class} AS ?shape)
    ?shape a sh:NodeShape .
    FILTER NOT EXISTS {{ ?shape sh:targetClass ?_any }}
  }}"
    )
}

const SHAPE_CLASSES: &str = "{
    ?shape a sh:NodeShape ; sh:targetClass ?class .
  } UNION {
    ?class a sh:NodeShape ; sh:property ?_p .
    FILTER NOT EXISTS { ?class sh:targetClass ?_any }
  }";

const USABLE_PARENT: &str = "FILTER(?parent != ?class)
    FILTER(?parent != owl:Thing)
    FILTER(!isBlank(?parent))";

/// Render a read request, prefixes included.
pub fn render_query(query: &Query) -> Result<String> {
    let body = match query {
        Query::EntityTypes => format!(
            "SELECT DISTINCT ?class ?label WHERE {{
  {SHAPE_CLASSES}
  OPTIONAL {{ ?class rdfs:label ?label }}
}}
ORDER BY ?label"
        ),
        Query::HierarchyFacts => format!(
            "SELECT DISTINCT ?class ?label ?parent ?parentLabel WHERE {{
  {SHAPE_CLASSES}
  OPTIONAL {{ ?class rdfs:label ?label }}
  OPTIONAL {{
    ?class rdfs:subClassOf ?parent .
    {USABLE_PARENT}
    FILTER NOT EXISTS {{
      ?class rdfs:subClassOf ?mid .
      ?mid rdfs:subClassOf ?parent .
      FILTER(?mid != ?class)
      FILTER(?mid != ?parent)
    }}
    OPTIONAL {{ ?parent rdfs:label ?parentLabel }}
  }}
}}"
        ),
        Query::SubclassEdges => format!(
            "SELECT DISTINCT ?child ?parent ?parentLabel WHERE {{
  ?child rdfs:subClassOf ?parent .
  {}
  FILTER NOT EXISTS {{
    ?child rdfs:subClassOf ?mid .
    ?mid rdfs:subClassOf ?parent .
    FILTER(?mid != ?child)
    FILTER(?mid != ?parent)
  }}
  OPTIONAL {{ ?parent rdfs:label ?parentLabel }}
}}",
            USABLE_PARENT.replace("?class", "?child")
        ),
        Query::ShapeProperties { class } => format!(
            "SELECT ?path ?name ?description ?datatype ?class ?node ?editor ?viewer ?minCount ?maxCount ?order ?propertyRole
WHERE {{
  {}
  ?shape sh:property ?prop .
  ?prop sh:path ?path .
  OPTIONAL {{ ?prop sh:name ?name }}
  OPTIONAL {{ ?prop sh:description ?description }}
  OPTIONAL {{ ?prop sh:datatype ?datatype }}
  OPTIONAL {{ ?prop sh:class ?class }}
  OPTIONAL {{ ?prop sh:node ?node }}
  OPTIONAL {{ ?prop shui:editor ?editor }}
  OPTIONAL {{ ?prop shui:viewer ?viewer }}
  OPTIONAL {{ ?prop sh:minCount ?minCount }}
  OPTIONAL {{ ?prop sh:maxCount ?maxCount }}
  OPTIONAL {{ ?prop sh:order ?order }}
  OPTIONAL {{ ?prop shui:propertyRole ?propertyRole }}
}}
ORDER BY ?order ?path",
            shape_binding(&iri(class)?)
        ),
        Query::EnumValues { class, path } => format!(
            "SELECT ?val WHERE {{
  {}
  ?shape sh:property ?prop .
  ?prop sh:path {} ;
        sh:in ?list .
  ?list rdf:rest*/rdf:first ?val .
}}",
            shape_binding(&iri(class)?),
            iri(path)?
        ),
        Query::ShapePaths { class } => format!(
            "SELECT DISTINCT ?path WHERE {{
  {}
  ?shape sh:property ?prop .
  ?prop sh:path ?path .
}}",
            shape_binding(&iri(class)?)
        ),
        Query::EntityValues { entity, class } => format!(
            "SELECT ?path ?value WHERE {{
  {}
  ?shape sh:property ?prop .
  ?prop sh:path ?path .
  {} ?path ?value .
}}",
            shape_binding(&iri(class)?),
            iri(entity)?
        ),
        Query::Instances { class, limit } => {
            let mut q = format!(
                "SELECT ?uri ?label WHERE {{
  ?uri a {} .
  OPTIONAL {{ ?uri archimate:Name ?archName }}
  OPTIONAL {{ ?uri rdfs:label ?lbl }}
  BIND(COALESCE(?archName, ?lbl, STR(?uri)) AS ?label)
}}
ORDER BY ?label",
                iri(class)?
            );
            if let Some(n) = limit {
                let _ = write!(q, "\nLIMIT {n}");
            }
            q
        }
    };
    Ok(format!("{PREFIXES}{body}"))
}

fn triples_block(triples: &[Triple]) -> Result<String> {
    let mut out = String::new();
    for t in triples {
        check_term(&t.subject)?;
        check_term(&t.object)?;
        iri(&t.predicate)?;
        let _ = writeln!(out, "  {t}");
    }
    Ok(out)
}

fn check_term(term: &Term) -> Result<()> {
    match term {
        Term::Iri { value } => iri(value).map(|_| ()),
        Term::Literal { datatype: Some(dt), .. } => iri(dt).map(|_| ()),
        _ => Ok(()),
    }
}

fn delete_paths(subject: &str, paths: &[String]) -> Result<String> {
    let s = iri(subject)?;
    let mut deletes = String::new();
    let mut optionals = String::new();
    for (i, p) in paths.iter().enumerate() {
        let p = iri(p)?;
        let _ = writeln!(deletes, "  {s} {p} ?old{i} .");
        let _ = writeln!(optionals, "  OPTIONAL {{ {s} {p} ?old{i} }}");
    }
    Ok(format!("DELETE {{\n{deletes}}}\nWHERE {{\n{optionals}}}"))
}

/// Render a write request, prefixes included.
pub fn render_update(update: &Update) -> Result<String> {
    let body = match update {
        Update::InsertData(triples) => format!("INSERT DATA {{\n{}}}", triples_block(triples)?),
        Update::DeletePaths { subject, paths } => delete_paths(subject, paths)?,
        Update::Replace { subject, paths, insert } => {
            let mut ops = Vec::new();
            if !paths.is_empty() {
                ops.push(delete_paths(subject, paths)?);
            }
            if !insert.is_empty() {
                ops.push(format!("INSERT DATA {{\n{}}}", triples_block(insert)?));
            }
            ops.join(" ;\n")
        }
        Update::DeleteSubject(subject) => format!("DELETE WHERE {{ {} ?p ?o }}", iri(subject)?),
    };
    Ok(format!("{PREFIXES}{body}"))
}

// ============================================================================
// Results JSON
// ============================================================================

#[derive(Debug, Deserialize)]
struct ResultsDocument {
    results: ResultsBody,
}

#[derive(Debug, Deserialize)]
struct ResultsBody {
    bindings: Vec<HashMap<String, JsonTerm>>,
}

#[derive(Debug, Deserialize)]
struct JsonTerm {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    datatype: Option<String>,
    #[serde(rename = "xml:lang")]
    lang: Option<String>,
}

impl JsonTerm {
    fn into_term(self) -> Result<Term> {
        match self.kind.as_str() {
            "uri" => Ok(Term::Iri { value: self.value }),
            "bnode" => Ok(Term::Blank { value: self.value }),
            "literal" | "typed-literal" => Ok(Term::Literal {
                value: self.value,
                datatype: self.datatype,
                lang: self.lang,
            }),
            other => Err(Error::Decode(format!("unknown term type {other:?}"))),
        }
    }
}

/// Parse a `application/sparql-results+json` document.
pub fn parse_results(json: &str) -> Result<Vec<Binding>> {
    let doc: ResultsDocument = serde_json::from_str(json)?;
    doc.results
        .bindings
        .into_iter()
        .map(|row| {
            let mut binding = Binding::new();
            for (var, term) in row {
                binding.set(var, term.into_term()?);
            }
            Ok(binding)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab;

    #[test]
    fn test_shape_properties_query_binds_both_shape_forms() {
        let q = render_query(&Query::ShapeProperties { class: "http://x/Person".into() }).unwrap();
        assert!(q.starts_with("PREFIX sh:"));
        assert!(q.contains("sh:targetClass <http://x/Person>"));
        assert!(q.contains("BIND(<http://x/Person> AS ?shape)"));
        assert!(q.contains("OPTIONAL { ?prop shui:editor ?editor }"));
    }

    #[test]
    fn test_hierarchy_query_excludes_indirect_parents() {
        let q = render_query(&Query::HierarchyFacts).unwrap();
        assert!(q.contains("FILTER NOT EXISTS {\n      ?class rdfs:subClassOf ?mid ."));
        assert!(q.contains("FILTER(?parent != owl:Thing)"));
        let edges = render_query(&Query::SubclassEdges).unwrap();
        assert!(edges.contains("FILTER(?parent != ?child)"));
    }

    #[test]
    fn test_instances_query_limit() {
        let q = render_query(&Query::Instances { class: "http://x/C".into(), limit: Some(100) }).unwrap();
        assert!(q.ends_with("ORDER BY ?label\nLIMIT 100"));
        let q = render_query(&Query::Instances { class: "http://x/C".into(), limit: None }).unwrap();
        assert!(!q.contains("LIMIT"));
    }

    #[test]
    fn test_rejects_injected_iri() {
        let bad = Query::ShapePaths { class: "http://x/C> } DROP ALL { <x".into() };
        assert!(render_query(&bad).is_err());
    }

    #[test]
    fn test_insert_data_escapes_literals() {
        let u = Update::InsertData(vec![Triple::new(
            Term::iri("http://x/e"),
            "http://x/name",
            Term::literal("a \"quoted\"\nname"),
        )]);
        let text = render_update(&u).unwrap();
        assert!(text.contains(r#"<http://x/e> <http://x/name> "a \"quoted\"\nname" ."#));
    }

    #[test]
    fn test_replace_is_one_request() {
        let u = Update::Replace {
            subject: "http://x/e".into(),
            paths: vec!["http://x/name".into(), "http://x/age".into()],
            insert: vec![Triple::new(Term::iri("http://x/e"), "http://x/name", Term::literal("Beta"))],
        };
        let text = render_update(&u).unwrap();
        let delete_at = text.find("DELETE {").unwrap();
        let insert_at = text.find("INSERT DATA").unwrap();
        assert!(delete_at < insert_at);
        assert!(text.contains("OPTIONAL { <http://x/e> <http://x/age> ?old1 }"));
        assert!(text.contains(" ;\nINSERT DATA"));
    }

    #[test]
    fn test_delete_subject() {
        let text = render_update(&Update::DeleteSubject("http://x/e".into())).unwrap();
        assert!(text.ends_with("DELETE WHERE { <http://x/e> ?p ?o }"));
    }

    #[test]
    fn test_parse_results() {
        let json = r#"{
          "head": {"vars": ["path", "value"]},
          "results": {"bindings": [
            {"path": {"type": "uri", "value": "http://x/name"},
             "value": {"type": "literal", "value": "Alpha"}},
            {"path": {"type": "uri", "value": "http://x/flag"},
             "value": {"type": "literal", "value": "true", "datatype": "http://www.w3.org/2001/XMLSchema#boolean"}},
            {"path": {"type": "uri", "value": "http://x/title"},
             "value": {"type": "literal", "value": "Hallo", "xml:lang": "de"}},
            {"path": {"type": "uri", "value": "http://x/part"},
             "value": {"type": "bnode", "value": "b0"}}
          ]}
        }"#;
        let rows = parse_results(json).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].get("value"), Some(&Term::literal("Alpha")));
        assert_eq!(rows[1].get("value"), Some(&Term::typed("true", vocab::XSD_BOOLEAN)));
        assert_eq!(rows[2].get("value"), Some(&Term::lang("Hallo", "de")));
        assert!(rows[3].get("value").unwrap().is_blank());
    }

    #[test]
    fn test_parse_results_rejects_unknown_term() {
        let json = r#"{"results": {"bindings": [{"x": {"type": "triple", "value": "?"}}]}}"#;
        assert!(matches!(parse_results(json), Err(Error::Decode(_))));
    }
}
