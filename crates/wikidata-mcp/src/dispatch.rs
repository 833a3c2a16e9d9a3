//! Routing of `(name, arguments)` tool calls onto the Wikidata client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use wikidata::{WikidataClient, WikidataError};

use crate::params::{
    FindByPropertyToolParams, GetEntityToolParams, GetRelationsToolParams,
    SearchEntitiesToolParams, SparqlQueryToolParams,
};
use crate::registry::ToolRegistry;

#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[source] serde_json::Error),
    #[error(transparent)]
    Operation(#[from] WikidataError),
    #[error("JSON serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// A decoded tool call, one variant per catalog entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    SearchEntities(SearchEntitiesToolParams),
    GetEntity(GetEntityToolParams),
    SparqlQuery(SparqlQueryToolParams),
    GetRelations(GetRelationsToolParams),
    FindByProperty(FindByPropertyToolParams),
}

impl ToolCall {
    pub fn decode(name: &str, arguments: Map<String, Value>) -> Result<Self, DispatchError> {
        serde_json::from_value(json!({ "name": name, "arguments": arguments }))
            .map_err(DispatchError::InvalidArguments)
    }
}

/// Outcome of a tool call: always a single text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallResult {
    pub text: String,
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn success(text: String) -> Self {
        Self { text, is_error: false }
    }

    /// `"Error executing {name}: {message}"`, with a stock message when the
    /// error renders blank.
    pub fn failure(name: &str, err: &DispatchError) -> Self {
        let message = err.to_string();
        let message = if message.trim().is_empty() {
            format!("Unknown error occurred while executing {name}")
        } else {
            message
        };
        Self {
            text: format!("Error executing {name}: {message}"),
            is_error: true,
        }
    }
}

fn json_result<T: Serialize>(result: Result<T, WikidataError>) -> Result<String, DispatchError> {
    let response = result?;
    serde_json::to_string_pretty(&response).map_err(DispatchError::Serialize)
}

#[derive(Clone)]
pub struct Dispatcher {
    client: WikidataClient,
    registry: ToolRegistry,
}

impl Dispatcher {
    pub fn new(client: WikidataClient) -> Self {
        Self {
            client,
            registry: ToolRegistry::new(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one tool call. Every failure, from an unknown name to an upstream
    /// error, comes back as an error result rather than an `Err`.
    pub async fn call_tool(&self, name: &str, arguments: Option<Map<String, Value>>) -> ToolCallResult {
        debug!(tool = name, "call_tool");
        match self.execute(name, arguments.unwrap_or_default()).await {
            Ok(text) => ToolCallResult::success(text),
            Err(err) => {
                warn!(tool = name, error = %err, "tool call failed");
                ToolCallResult::failure(name, &err)
            }
        }
    }

    async fn execute(&self, name: &str, arguments: Map<String, Value>) -> Result<String, DispatchError> {
        if !self.registry.contains(name) {
            return Err(DispatchError::UnknownTool(name.to_string()));
        }
        match ToolCall::decode(name, arguments)? {
            ToolCall::SearchEntities(p) => {
                json_result(self.client.search_entities(&p.into_search_params()).await)
            }
            ToolCall::GetEntity(p) => {
                json_result(self.client.get_entity(&p.into_get_entity_params()).await)
            }
            ToolCall::SparqlQuery(p) => {
                json_result(self.client.sparql_query(&p.into_sparql_params()).await)
            }
            ToolCall::GetRelations(p) => {
                json_result(self.client.get_relations(&p.into_relations_params()).await)
            }
            ToolCall::FindByProperty(p) => {
                json_result(self.client.find_by_property(&p.into_find_params()).await)
            }
        }
    }
}
