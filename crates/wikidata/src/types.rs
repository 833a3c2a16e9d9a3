use std::collections::{BTreeMap, HashMap};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Base of the canonical entity URIs returned in search results.
pub const ENTITY_URI_BASE: &str = "https://www.wikidata.org/entity/";

// ── Output shapes ──────────────────────────────────────────────────────────

/// Result of `search_entities`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub entities: Vec<SearchHit>,
}

/// One row of `search_entities`. Missing upstream fields stay empty.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub label: Option<String>,
    pub description: String,
    pub url: String,
}

/// Result of `get_entity`.
#[derive(Debug, Clone, Serialize)]
pub struct EntityResult {
    pub entity: EntityPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EntityPayload {
    /// The `wbgetentities` record, verbatim apart from claim filtering.
    Raw(Value),
    Simplified(SimplifiedEntity),
}

/// Flattened projection of an entity record. Rank, qualifiers, and
/// references are dropped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimplifiedEntity {
    pub id: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub descriptions: BTreeMap<String, String>,
    pub properties: PropertyMap,
}

/// Property id to values, kept in the order the upstream delivered them.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap(pub Vec<(String, Vec<PropertyValue>)>);

impl PropertyMap {
    pub fn get(&self, property: &str) -> Option<&[PropertyValue]> {
        self.0
            .iter()
            .find(|(id, _)| id == property)
            .map(|(_, values)| values.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(id, _)| id.as_str())
    }
}

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, values) in &self.0 {
            map.serialize_entry(id, values)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyValue {
    pub value: String,
    /// Set for entity references only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Result of `sparql_query`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SparqlOutput {
    /// Parsed `application/sparql-results+json` document.
    Json(Value),
    /// Unparsed body for CSV and XML.
    Raw { result: String },
}

/// Result of `get_relations`.
#[derive(Debug, Clone, Serialize)]
pub struct RelationsResult {
    pub relations: Vec<Relation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Relation {
    pub property: String,
    pub property_label: String,
    pub direction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<EntityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<EntityRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub id: String,
    pub label: String,
}

/// Result of `find_by_property`.
#[derive(Debug, Clone, Serialize)]
pub struct FoundEntities {
    pub entities: Vec<EntityRef>,
}

// ── Upstream shapes ────────────────────────────────────────────────────────
//
// Every field is optional or defaulted: the upstream omits keys freely and a
// missing key is never an error here.

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub search: Vec<SearchRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchRow {
    pub id: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetEntitiesResponse {
    #[serde(default)]
    pub entities: serde_json::Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SparqlResults {
    #[serde(default)]
    pub results: SparqlResultSet,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SparqlResultSet {
    #[serde(default)]
    pub bindings: Vec<SparqlBinding>,
}

/// One SPARQL result row: variable name to bound term.
pub(crate) type SparqlBinding = HashMap<String, SparqlTerm>;

#[derive(Debug, Deserialize)]
pub(crate) struct SparqlTerm {
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl SparqlTerm {
    /// Entity id for a bound URI (its trailing path segment); literals and
    /// blank nodes are returned as-is.
    pub fn id(&self) -> String {
        match self.kind.as_deref() {
            Some("literal") | Some("bnode") => self.value.clone(),
            _ => trailing_segment(&self.value).to_string(),
        }
    }
}

pub(crate) fn trailing_segment(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}
