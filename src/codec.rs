//! # Entity Value Codec
//!
//! Translates between [`RawValue`]s and store terms. References become IRIs,
//! never literals. Literals keep their datatype, except that `xsd:string`
//! and an untagged `rdf:langString` are plain strings on both sides.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;

use crate::model::{Binding, EntityId, EntityValues, RawValue, Term, Triple, ValueKind};
use crate::vocab;
use crate::Result;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Process-wide mint count; no two IDs of one process share it.
static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Term written for `value`.
pub fn encode(value: &RawValue) -> Term {
    match &value.kind {
        ValueKind::Reference => Term::iri(value.value.as_str()),
        ValueKind::Literal { lang: Some(lang), .. } => Term::lang(value.value.as_str(), lang.as_str()),
        ValueKind::Literal { datatype: Some(dt), .. } if !is_plain_datatype(dt) => {
            Term::typed(value.value.as_str(), dt.as_str())
        }
        ValueKind::Literal { .. } => Term::literal(value.value.as_str()),
    }
}

/// Value read back from the store. Blank nodes carry no identity the caller
/// could follow, so they are skipped.
pub fn decode(term: &Term) -> Option<RawValue> {
    match term {
        Term::Iri { value } => Some(RawValue::reference(value.as_str())),
        Term::Blank { .. } => None,
        Term::Literal { value, lang: Some(lang), .. } => Some(RawValue::lang(value.as_str(), lang.as_str())),
        Term::Literal { value, datatype, .. } => Some(literal_for(value, datatype.as_deref())),
    }
}

/// Literal value with the declared datatype of its property.
pub fn literal_for(value: &str, datatype: Option<&str>) -> RawValue {
    match datatype {
        Some(dt) if !is_plain_datatype(dt) => RawValue::typed(value, dt),
        _ => RawValue::literal(value),
    }
}

fn is_plain_datatype(dt: &str) -> bool {
    dt == vocab::XSD_STRING || dt == vocab::RDF_LANG_STRING
}

/// One statement per value of `values`.
pub fn value_triples(entity: &EntityId, values: &EntityValues) -> Vec<Triple> {
    let subject = Term::iri(entity.as_str());
    values
        .iter()
        .flat_map(|(path, vals)| {
            let subject = subject.clone();
            vals.iter().map(move |v| Triple::new(subject.clone(), path, encode(v)))
        })
        .collect()
}

/// Type assertion plus [`value_triples`]: everything a new entity needs.
pub fn entity_triples(entity: &EntityId, class: &str, values: &EntityValues) -> Vec<Triple> {
    let mut triples = vec![Triple::new(Term::iri(entity.as_str()), vocab::RDF_TYPE, Term::iri(class))];
    triples.extend(value_triples(entity, values));
    triples
}

/// Collect `(path, value)` rows into entity values.
pub fn values_from_rows(rows: &[Binding]) -> Result<EntityValues> {
    let mut values = EntityValues::new();
    for row in rows {
        let path = row.require_iri("path")?;
        if let Some(value) = decode(row.require("value")?) {
            values.push(path, value);
        }
    }
    Ok(values)
}

/// `{namespace}#inst-{millis}-{sequence}-{suffix}`, sequence and suffix in base 36.
pub fn mint_entity_id(namespace: &str) -> EntityId {
    let sequence = base36(ID_SEQUENCE.fetch_add(1, Ordering::Relaxed));
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    let namespace = namespace.trim_end_matches(['#', '/']);
    EntityId(format!("{namespace}#inst-{}-{sequence}-{suffix}", Utc::now().timestamp_millis()))
}

fn base36(mut n: u64) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_kinds() {
        assert_eq!(encode(&RawValue::reference("http://x/a")), Term::iri("http://x/a"));
        assert_eq!(encode(&RawValue::literal("Alpha")), Term::literal("Alpha"));
        assert_eq!(
            encode(&RawValue::typed("3", vocab::XSD_INTEGER)),
            Term::typed("3", vocab::XSD_INTEGER)
        );
        assert_eq!(encode(&RawValue::typed("s", vocab::XSD_STRING)), Term::literal("s"));
        assert_eq!(encode(&RawValue::lang("Hallo", "de")), Term::lang("Hallo", "de"));
    }

    #[test]
    fn test_decode_kinds() {
        assert_eq!(decode(&Term::iri("http://x/a")), Some(RawValue::reference("http://x/a")));
        assert_eq!(decode(&Term::blank("b0")), None);
        assert_eq!(decode(&Term::typed("s", vocab::XSD_STRING)), Some(RawValue::literal("s")));
        assert_eq!(
            decode(&Term::typed("2024-05-01", vocab::XSD_DATE)),
            Some(RawValue::typed("2024-05-01", vocab::XSD_DATE))
        );
    }

    #[test]
    fn test_entity_triples_include_type() {
        let id = EntityId::from("http://x/data#inst-1");
        let values = EntityValues::new()
            .with("http://x/name", RawValue::literal("Alpha"))
            .with("http://x/owner", RawValue::reference("http://x/ada"));
        let triples = entity_triples(&id, "http://x/Thing", &values);
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[0].predicate, vocab::RDF_TYPE);
        assert!(triples.iter().any(|t| t.object == Term::iri("http://x/ada")));
    }

    #[test]
    fn test_values_from_rows_skips_blank() {
        let rows = vec![
            Binding::new().with("path", Term::iri("http://x/name")).with("value", Term::literal("Alpha")),
            Binding::new().with("path", Term::iri("http://x/name")).with("value", Term::blank("b1")),
        ];
        let values = values_from_rows(&rows).unwrap();
        assert_eq!(values.get("http://x/name"), &[RawValue::literal("Alpha")]);
    }

    #[test]
    fn test_minted_ids() {
        let a = mint_entity_id("http://archigraph.org/data");
        let b = mint_entity_id("http://archigraph.org/data#");
        assert!(a.as_str().starts_with("http://archigraph.org/data#inst-"));
        assert!(b.as_str().starts_with("http://archigraph.org/data#inst-"));
        assert_ne!(a, b);
        let suffix = a.as_str().rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
    }

    #[test]
    fn test_minted_sequence_increases() {
        let sequence_of = |id: &EntityId| {
            let parts: Vec<&str> = id.as_str().rsplit('-').collect();
            u64::from_str_radix(parts[1], 36).unwrap()
        };
        let ids: Vec<EntityId> = (0..1000).map(|_| mint_entity_id("http://x/data")).collect();
        for pair in ids.windows(2) {
            assert!(sequence_of(&pair[1]) > sequence_of(&pair[0]));
        }
        let distinct: std::collections::BTreeSet<_> = ids.iter().collect();
        assert_eq!(distinct.len(), ids.len());
    }

    #[test]
    fn test_base36() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(u64::MAX), "3w5e11264sgsf");
    }
}
