//! Static catalog of the tools this server exposes.

use std::sync::Arc;

use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::params::{
    FindByPropertyToolParams, GetEntityToolParams, GetRelationsToolParams,
    SearchEntitiesToolParams, SparqlQueryToolParams,
};

/// One invocable tool: its unique name, a human description, and the JSON
/// schema of its arguments.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Arc<Map<String, Value>>,
}

impl ToolDefinition {
    fn new<T: JsonSchema>(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            input_schema: Arc::new(input_schema_for::<T>()),
        }
    }
}

/// Inline object schema for a params struct, without the root metadata that
/// tool hosts don't expect.
fn input_schema_for<T: JsonSchema>() -> Map<String, Value> {
    let schema = SchemaSettings::draft2020_12()
        .with(|s| s.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>();
    let Value::Object(mut map) = Value::from(schema) else {
        return Map::new();
    };
    for key in ["$schema", "title", "description"] {
        map.remove(key);
    }
    map
}

/// Ordered tool catalog. Built once and shared read-only.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Arc<[ToolDefinition]>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        let tools = [
            ToolDefinition::new::<SearchEntitiesToolParams>(
                "search_entities",
                "Search for entities in Wikidata by text query",
            ),
            ToolDefinition::new::<GetEntityToolParams>(
                "get_entity",
                "Get detailed information about a Wikidata entity",
            ),
            ToolDefinition::new::<SparqlQueryToolParams>(
                "sparql_query",
                "Execute a SPARQL query against Wikidata",
            ),
            ToolDefinition::new::<GetRelationsToolParams>(
                "get_relations",
                "Get relations of a Wikidata entity",
            ),
            ToolDefinition::new::<FindByPropertyToolParams>(
                "find_by_property",
                "Find entities by property and value",
            ),
        ];
        Self {
            tools: Arc::from(tools),
        }
    }

    /// Copy of the catalog, in declaration order.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.to_vec()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_order() {
        let names: Vec<&str> = ToolRegistry::new().list_tools().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            ["search_entities", "get_entity", "sparql_query", "get_relations", "find_by_property"]
        );
    }

    #[test]
    fn test_list_tools_is_stable() {
        let registry = ToolRegistry::new();
        let first = serde_json::to_value(registry.list_tools()).unwrap();
        let second = serde_json::to_value(registry.list_tools()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_required_parameters() {
        let registry = ToolRegistry::new();
        let required = |name: &str| registry.get(name).unwrap().input_schema["required"].clone();
        assert_eq!(required("search_entities"), json!(["query"]));
        assert_eq!(required("get_entity"), json!(["entity_id"]));
        assert_eq!(required("sparql_query"), json!(["query"]));
        assert_eq!(required("get_relations"), json!(["entity_id"]));
        assert_eq!(required("find_by_property"), json!(["property", "value"]));
    }

    #[test]
    fn test_schema_is_inline_object() {
        let registry = ToolRegistry::new();
        for tool in registry.list_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(!tool.input_schema.contains_key("$schema"));
            assert!(!tool.input_schema.contains_key("$defs"), "{}", tool.name);
        }
    }

    #[test]
    fn test_enum_parameters() {
        let registry = ToolRegistry::new();
        let search = registry.get("search_entities").unwrap();
        let type_schema = search.input_schema["properties"]["type"].to_string();
        assert!(type_schema.contains("\"item\""));
        assert!(type_schema.contains("\"property\""));

        let sparql = registry.get("sparql_query").unwrap();
        let format = &sparql.input_schema["properties"]["format"];
        assert_eq!(format["enum"], json!(["json", "csv", "xml"]));
        assert_eq!(sparql.input_schema["properties"]["limit"]["maximum"], 1000);
    }

    #[test]
    fn test_unknown_name() {
        assert!(ToolRegistry::new().get("ghost_tool").is_none());
    }
}
