use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::WikidataError;

/// Entity kind accepted by `wbsearchentities`' `type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Item,
    Property,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Property => "property",
        }
    }
}

/// SPARQL result serialization requested from the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SparqlFormat {
    #[default]
    Json,
    Csv,
    Xml,
}

impl SparqlFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xml => "xml",
        }
    }

    /// Value of the `Accept` header for this format.
    pub fn accept(self) -> String {
        format!("application/sparql-results+{}", self.as_str())
    }
}

/// Direction of the edges returned by [`get_relations`](crate::WikidataClient::get_relations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    /// The entity is the subject.
    Outgoing,
    /// The entity is the object.
    Incoming,
    /// Both of the above, in a single query.
    All,
}

impl RelationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Incoming => "incoming",
            Self::All => "all",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = WikidataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outgoing" => Ok(Self::Outgoing),
            "incoming" => Ok(Self::Incoming),
            "all" => Ok(Self::All),
            other => Err(WikidataError::InvalidArgument(format!(
                "Invalid relation_type: {other}"
            ))),
        }
    }
}

/// Parameters for [`search_entities`](crate::WikidataClient::search_entities).
#[derive(Debug, Clone, bon::Builder)]
pub struct SearchParams {
    #[builder(into)]
    pub query: String,
    /// Falls back to the configured default language.
    #[builder(into)]
    pub language: Option<String>,
    /// Capped at the configured `max_results`.
    #[builder(default = 10)]
    pub limit: u32,
    pub entity_type: Option<EntityType>,
}

/// Parameters for [`get_entity`](crate::WikidataClient::get_entity).
#[derive(Debug, Clone, bon::Builder)]
pub struct GetEntityParams {
    #[builder(into)]
    pub entity_id: String,
    #[builder(into)]
    pub language: Option<String>,
    /// Property ids (`P31`, `P569`, ...) whose claims are kept. `None` or an
    /// empty list keeps every claim.
    pub properties: Option<Vec<String>>,
    #[builder(default)]
    pub simplified: bool,
}

/// Parameters for [`sparql_query`](crate::WikidataClient::sparql_query).
#[derive(Debug, Clone, bon::Builder)]
pub struct SparqlParams {
    #[builder(into)]
    pub query: String,
    #[builder(default)]
    pub format: SparqlFormat,
    /// Only used when the query has no `LIMIT` clause. Capped at 1000.
    #[builder(default = 100)]
    pub limit: u32,
}

/// Parameters for [`get_relations`](crate::WikidataClient::get_relations).
///
/// `relation_type` stays a string so that callers passing arbitrary input get
/// an [`WikidataError::InvalidArgument`] from the client itself.
#[derive(Debug, Clone, bon::Builder)]
pub struct RelationsParams {
    #[builder(into)]
    pub entity_id: String,
    #[builder(into, default = String::from("outgoing"))]
    pub relation_type: String,
    /// Restrict to these property ids.
    pub property_filter: Option<Vec<String>>,
    /// Capped at 100.
    #[builder(default = 20)]
    pub limit: u32,
}

/// Parameters for [`find_by_property`](crate::WikidataClient::find_by_property).
#[derive(Debug, Clone, bon::Builder)]
pub struct FindByPropertyParams {
    #[builder(into)]
    pub property: String,
    #[builder(into)]
    pub value: String,
    #[builder(into)]
    pub language: Option<String>,
    /// Capped at 100.
    #[builder(default = 10)]
    pub limit: u32,
}
