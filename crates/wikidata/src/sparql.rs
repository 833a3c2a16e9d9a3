//! SPARQL query text for the relation and property lookups.

use crate::error::WikidataError;
use crate::params::RelationType;

/// Hard cap on the `LIMIT` appended by [`ensure_limit`].
pub const MAX_SPARQL_LIMIT: u32 = 1000;
/// Hard cap on relation rows.
pub const MAX_RELATIONS_LIMIT: u32 = 100;
/// Hard cap on `find_by_property` rows.
pub const MAX_FIND_LIMIT: u32 = 100;

/// Append ` LIMIT n` unless the query already mentions `LIMIT` in any case.
///
/// This is a plain substring test on the raw text, so a `LIMIT` inside a
/// comment or literal also counts, and the clause is appended after any
/// trailing comment or whitespace.
pub fn ensure_limit(query: &str, limit: u32) -> String {
    if query.to_uppercase().contains("LIMIT") {
        query.to_string()
    } else {
        format!("{query} LIMIT {}", limit.min(MAX_SPARQL_LIMIT))
    }
}

/// Escape text for use inside a double-quoted SPARQL string literal.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Check that `id` looks like a Wikidata entity id (`Q42`, `P31`, `L7`).
pub fn validate_entity_id(id: &str) -> Result<(), WikidataError> {
    let mut chars = id.chars();
    let prefix_ok = matches!(chars.next(), Some('Q' | 'P' | 'L'));
    let digits = chars.as_str();
    if prefix_ok && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(WikidataError::InvalidArgument(format!("Invalid entity id: {id}")))
    }
}

/// Check that `id` is a property id (`P31`).
pub fn validate_property_id(id: &str) -> Result<(), WikidataError> {
    match id.strip_prefix('P') {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => Ok(()),
        _ => Err(WikidataError::InvalidArgument(format!("Invalid property id: {id}"))),
    }
}

/// Build the relation query for `entity_id`.
///
/// Labels are always requested in English. The outgoing pattern binds
/// `?target`, the incoming one binds `?source`; `All` unions both so a row
/// carries exactly one of the two.
pub fn relations_query(
    entity_id: &str,
    relation_type: RelationType,
    property_filter: &[String],
    limit: u32,
) -> String {
    let outgoing = format!("wd:{entity_id} ?property ?target .");
    let incoming = format!("?source ?property wd:{entity_id} .");
    let (select, pattern) = match relation_type {
        RelationType::Outgoing => ("?prop ?propLabel ?target ?targetLabel", outgoing),
        RelationType::Incoming => ("?prop ?propLabel ?source ?sourceLabel", incoming),
        RelationType::All => (
            "?prop ?propLabel ?target ?targetLabel ?source ?sourceLabel",
            format!("{{ {outgoing} }} UNION {{ {incoming} }}"),
        ),
    };
    let values = if property_filter.is_empty() {
        String::new()
    } else {
        let props: Vec<String> = property_filter.iter().map(|p| format!("wdt:{p}")).collect();
        format!("  VALUES ?property {{ {} }}\n", props.join(" "))
    };
    format!(
        "SELECT {select} WHERE {{\n\
         {values}  {pattern}\n  \
         ?prop wikibase:directClaim ?property .\n  \
         SERVICE wikibase:label {{ bd:serviceParam wikibase:language \"en\" . }}\n\
         }}\n\
         LIMIT {}",
        limit.min(MAX_RELATIONS_LIMIT)
    )
}

/// Build the query matching items whose `property` equals the string `value`.
pub fn find_by_property_query(property: &str, value: &str, language: &str, limit: u32) -> String {
    format!(
        "SELECT ?item ?itemLabel WHERE {{\n  \
         ?item wdt:{property} \"{}\" .\n  \
         SERVICE wikibase:label {{ bd:serviceParam wikibase:language \"{}\" . }}\n\
         }}\n\
         LIMIT {}",
        escape_literal(value),
        escape_literal(language),
        limit.min(MAX_FIND_LIMIT)
    )
}
