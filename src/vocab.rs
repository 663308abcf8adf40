//! IRIs of the vocabularies the shape catalog reads: SHACL, SHACL-UI hints,
//! RDF/RDFS/OWL structure, XSD datatypes and the ArchiMate naming property.

pub const SH: &str = "http://www.w3.org/ns/shacl#";
pub const SHUI: &str = "http://www.w3.org/ns/shacl-ui#";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const ARCHIMATE: &str = "https://purl.org/archimate#";

// rdf / rdfs / owl
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_HTML: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#HTML";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";

// xsd
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

// shacl
pub const SH_NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";
pub const SH_TARGET_CLASS: &str = "http://www.w3.org/ns/shacl#targetClass";
pub const SH_PROPERTY: &str = "http://www.w3.org/ns/shacl#property";
pub const SH_PATH: &str = "http://www.w3.org/ns/shacl#path";
pub const SH_NAME: &str = "http://www.w3.org/ns/shacl#name";
pub const SH_DESCRIPTION: &str = "http://www.w3.org/ns/shacl#description";
pub const SH_DATATYPE: &str = "http://www.w3.org/ns/shacl#datatype";
pub const SH_CLASS: &str = "http://www.w3.org/ns/shacl#class";
pub const SH_NODE: &str = "http://www.w3.org/ns/shacl#node";
pub const SH_MIN_COUNT: &str = "http://www.w3.org/ns/shacl#minCount";
pub const SH_MAX_COUNT: &str = "http://www.w3.org/ns/shacl#maxCount";
pub const SH_ORDER: &str = "http://www.w3.org/ns/shacl#order";
pub const SH_IN: &str = "http://www.w3.org/ns/shacl#in";

// shacl-ui
pub const SHUI_EDITOR: &str = "http://www.w3.org/ns/shacl-ui#editor";
pub const SHUI_VIEWER: &str = "http://www.w3.org/ns/shacl-ui#viewer";
pub const SHUI_PROPERTY_ROLE: &str = "http://www.w3.org/ns/shacl-ui#propertyRole";

pub const ARCHIMATE_NAME: &str = "https://purl.org/archimate#Name";

/// Trailing segment of an IRI: after the last `#`, else after the last `/`.
///
/// Falls back to the whole input when that segment is empty.
pub fn local_name(iri: &str) -> &str {
    let tail = match iri.rfind('#') {
        Some(i) => &iri[i + 1..],
        None => iri.rsplit('/').next().unwrap_or(iri),
    };
    if tail.is_empty() { iri } else { tail }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("https://purl.org/archimate#Name"), "Name");
        assert_eq!(local_name("http://example.org/things/Widget"), "Widget");
        assert_eq!(local_name("urn:plain"), "urn:plain");
        assert_eq!(local_name("http://example.org/ns#"), "http://example.org/ns#");
    }
}
