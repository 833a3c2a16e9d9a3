use schemars::JsonSchema;
use serde::Deserialize;
use wikidata::{
    EntityType, FindByPropertyParams, GetEntityParams, RelationsParams, SearchParams,
    SparqlFormat, SparqlParams,
};

/// Deserialize `Option<u32>` accepting both JSON integers and quoted strings.
/// Some MCP clients serialize numeric parameters as strings ("10" vs 10).
fn lax_optional_u32<'de, D>(d: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Lax {
        Int(u32),
        Str(String),
    }
    match Option::<Lax>::deserialize(d)? {
        None => Ok(None),
        Some(Lax::Int(n)) => Ok(Some(n)),
        Some(Lax::Str(s)) if s.is_empty() => Ok(None),
        Some(Lax::Str(s)) => s.parse::<u32>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Parameters for the `search_entities` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchEntitiesToolParams {
    /// Search term
    pub query: String,
    /// Language code (default: en)
    pub language: Option<String>,
    /// Maximum number of results (default: 10, max: 50)
    #[serde(default, deserialize_with = "lax_optional_u32")]
    #[schemars(range(max = 50), extend("default" = 10))]
    pub limit: Option<u32>,
    /// Entity type filter (item, property)
    pub r#type: Option<EntityType>,
}

impl SearchEntitiesToolParams {
    pub fn into_search_params(self) -> SearchParams {
        SearchParams::builder()
            .query(self.query)
            .maybe_language(self.language)
            .maybe_limit(self.limit)
            .maybe_entity_type(self.r#type)
            .build()
    }
}

/// Parameters for the `get_entity` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetEntityToolParams {
    /// Wikidata entity ID (Q123, P456)
    pub entity_id: String,
    /// Language code (default: en)
    pub language: Option<String>,
    /// Specific properties to include
    pub properties: Option<Vec<String>>,
    /// Return simplified format (default: false)
    #[serde(default)]
    pub simplified: bool,
}

impl GetEntityToolParams {
    pub fn into_get_entity_params(self) -> GetEntityParams {
        GetEntityParams::builder()
            .entity_id(self.entity_id)
            .maybe_language(self.language)
            .maybe_properties(self.properties)
            .simplified(self.simplified)
            .build()
    }
}

/// Parameters for the `sparql_query` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SparqlQueryToolParams {
    /// SPARQL query
    pub query: String,
    /// Response format
    #[serde(default)]
    pub format: SparqlFormat,
    /// Maximum number of results (default: 100, max: 1000). Only applied when
    /// the query has no LIMIT clause of its own.
    #[serde(default, deserialize_with = "lax_optional_u32")]
    #[schemars(range(max = 1000), extend("default" = 100))]
    pub limit: Option<u32>,
}

impl SparqlQueryToolParams {
    pub fn into_sparql_params(self) -> SparqlParams {
        SparqlParams::builder()
            .query(self.query)
            .format(self.format)
            .maybe_limit(self.limit)
            .build()
    }
}

/// Parameters for the `get_relations` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetRelationsToolParams {
    /// Wikidata entity ID
    pub entity_id: String,
    /// Type of relations to retrieve
    #[schemars(extend("enum" = ["incoming", "outgoing", "all"], "default" = "outgoing"))]
    pub relation_type: Option<String>,
    /// Filter by specific properties
    pub property_filter: Option<Vec<String>>,
    /// Maximum number of relations
    #[serde(default, deserialize_with = "lax_optional_u32")]
    #[schemars(range(max = 100), extend("default" = 20))]
    pub limit: Option<u32>,
}

impl GetRelationsToolParams {
    pub fn into_relations_params(self) -> RelationsParams {
        RelationsParams::builder()
            .entity_id(self.entity_id)
            .maybe_relation_type(self.relation_type)
            .maybe_property_filter(self.property_filter)
            .maybe_limit(self.limit)
            .build()
    }
}

/// Parameters for the `find_by_property` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindByPropertyToolParams {
    /// Property ID (P123)
    pub property: String,
    /// Property value to search for
    pub value: String,
    /// Language code (default: en)
    pub language: Option<String>,
    /// Maximum number of results
    #[serde(default, deserialize_with = "lax_optional_u32")]
    #[schemars(range(max = 100), extend("default" = 10))]
    pub limit: Option<u32>,
}

impl FindByPropertyToolParams {
    pub fn into_find_params(self) -> FindByPropertyParams {
        FindByPropertyParams::builder()
            .property(self.property)
            .value(self.value)
            .maybe_language(self.language)
            .maybe_limit(self.limit)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikidata::RelationType;

    #[test]
    fn test_search_params_conversion() {
        let tool_params: SearchEntitiesToolParams = serde_json::from_str(
            r#"{"query": "Douglas Adams", "language": "fr", "limit": 5, "type": "item"}"#,
        )
        .unwrap();
        let params = tool_params.into_search_params();
        assert_eq!(params.query, "Douglas Adams");
        assert_eq!(params.language.as_deref(), Some("fr"));
        assert_eq!(params.limit, 5);
        assert_eq!(params.entity_type, Some(EntityType::Item));
    }

    #[test]
    fn test_search_defaults() {
        let tool_params: SearchEntitiesToolParams =
            serde_json::from_str(r#"{"query": "x"}"#).unwrap();
        let params = tool_params.into_search_params();
        assert!(params.language.is_none());
        assert_eq!(params.limit, 10);
        assert!(params.entity_type.is_none());
    }

    #[test]
    fn test_limit_accepts_quoted_numbers() {
        let tool_params: SearchEntitiesToolParams =
            serde_json::from_str(r#"{"query": "x", "limit": "7"}"#).unwrap();
        assert_eq!(tool_params.limit, Some(7));

        let tool_params: SearchEntitiesToolParams =
            serde_json::from_str(r#"{"query": "x", "limit": ""}"#).unwrap();
        assert_eq!(tool_params.limit, None);

        let err = serde_json::from_str::<SearchEntitiesToolParams>(r#"{"query": "x", "limit": "ten"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_required_field() {
        let err = serde_json::from_str::<FindByPropertyToolParams>(r#"{"property": "P496"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("missing field `value`"));
    }

    #[test]
    fn test_unknown_entity_type_rejected() {
        let err = serde_json::from_str::<SearchEntitiesToolParams>(r#"{"query": "x", "type": "lexeme"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_get_entity_defaults() {
        let tool_params: GetEntityToolParams =
            serde_json::from_str(r#"{"entity_id": "Q42"}"#).unwrap();
        let params = tool_params.into_get_entity_params();
        assert_eq!(params.entity_id, "Q42");
        assert!(!params.simplified);
        assert!(params.properties.is_none());
    }

    #[test]
    fn test_sparql_defaults() {
        let tool_params: SparqlQueryToolParams =
            serde_json::from_str(r#"{"query": "SELECT * WHERE { ?s ?p ?o }"}"#).unwrap();
        let params = tool_params.into_sparql_params();
        assert_eq!(params.format, SparqlFormat::Json);
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn test_relations_defaults_and_passthrough() {
        let tool_params: GetRelationsToolParams =
            serde_json::from_str(r#"{"entity_id": "Q42"}"#).unwrap();
        let params = tool_params.into_relations_params();
        assert_eq!(params.relation_type.parse::<RelationType>().unwrap(), RelationType::Outgoing);
        assert_eq!(params.limit, 20);

        // Unknown values are left for the client to reject.
        let tool_params: GetRelationsToolParams =
            serde_json::from_str(r#"{"entity_id": "Q42", "relation_type": "bogus"}"#).unwrap();
        assert_eq!(tool_params.into_relations_params().relation_type, "bogus");
    }

    #[test]
    fn test_find_defaults() {
        let tool_params: FindByPropertyToolParams =
            serde_json::from_str(r#"{"property": "P496", "value": "0000-0002-1825-0097"}"#)
                .unwrap();
        let params = tool_params.into_find_params();
        assert_eq!(params.limit, 10);
        assert!(params.language.is_none());
    }

    #[test]
    fn test_schema_limits_and_defaults() {
        let schema = serde_json::to_value(schemars::schema_for!(GetRelationsToolParams)).unwrap();
        let props = &schema["properties"];
        assert_eq!(props["limit"]["maximum"], 100);
        assert_eq!(props["limit"]["default"], 20);
        assert_eq!(props["relation_type"]["default"], "outgoing");
        assert_eq!(
            props["relation_type"]["enum"],
            serde_json::json!(["incoming", "outgoing", "all"])
        );
        assert_eq!(schema["required"], serde_json::json!(["entity_id"]));
    }
}
