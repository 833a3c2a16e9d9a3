use std::sync::Arc;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::Config;
use crate::entity::{retain_claims, simplify};
use crate::error::{Result, WikidataError};
use crate::params::{
    FindByPropertyParams, GetEntityParams, RelationType, RelationsParams, SearchParams,
    SparqlFormat, SparqlParams,
};
use crate::sparql::{
    MAX_FIND_LIMIT, MAX_RELATIONS_LIMIT, ensure_limit, find_by_property_query, relations_query,
    validate_entity_id, validate_property_id,
};
use crate::types::{
    ENTITY_URI_BASE, EntityPayload, EntityRef, EntityResult, FoundEntities, GetEntitiesResponse,
    Relation, RelationsResult, SearchHit, SearchResponse, SearchResult, SparqlBinding,
    SparqlOutput, SparqlResults,
};

/// Async client for the Wikibase action API and the SPARQL endpoint.
///
/// Cloning is cheap and clones share both the HTTP connection pool and the
/// request gate, which admits at most `rate_limit` requests in flight. The
/// gate caps concurrency only; it does not pace requests over time.
#[derive(Clone)]
pub struct WikidataClient {
    http: reqwest::Client,
    config: Arc<Config>,
    gate: Arc<Semaphore>,
}

impl WikidataClient {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()
            .map_err(WikidataError::Client)?;
        let gate = Arc::new(Semaphore::new(config.rate_limit.max(1) as usize));
        Ok(Self {
            http,
            config: Arc::new(config),
            gate,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn language<'a>(&'a self, language: Option<&'a str>) -> &'a str {
        language.unwrap_or(&self.config.default_language)
    }

    // ── Operations ─────────────────────────────────────────────────────────

    /// Full-text search over labels and aliases via `wbsearchentities`.
    pub async fn search_entities(&self, params: &SearchParams) -> Result<SearchResult> {
        let limit = params.limit.min(self.config.max_results);
        let mut query = vec![
            ("action", "wbsearchentities".to_string()),
            ("search", params.query.clone()),
            ("language", self.language(params.language.as_deref()).to_string()),
            ("limit", limit.to_string()),
            ("format", "json".to_string()),
        ];
        if let Some(entity_type) = params.entity_type {
            query.push(("type", entity_type.as_str().to_string()));
        }

        let response: SearchResponse = self.get_api(&query).await?;
        let entities = response
            .search
            .into_iter()
            .map(|row| {
                let id = row.id.unwrap_or_default();
                SearchHit {
                    url: format!("{ENTITY_URI_BASE}{id}"),
                    id,
                    label: row.label,
                    description: row.description.unwrap_or_default(),
                }
            })
            .collect();
        Ok(SearchResult { entities })
    }

    /// Fetch one entity via `wbgetentities`.
    ///
    /// Fails with [`WikidataError::EntityNotFound`] when the response has no
    /// record for the id or the record is flagged `missing`.
    pub async fn get_entity(&self, params: &GetEntityParams) -> Result<EntityResult> {
        let query = [
            ("action", "wbgetentities".to_string()),
            ("ids", params.entity_id.clone()),
            ("languages", self.language(params.language.as_deref()).to_string()),
            ("format", "json".to_string()),
        ];

        let response: GetEntitiesResponse = self.get_api(&query).await?;
        let mut entity = match response.entities.get(&params.entity_id) {
            Some(entity) if entity.get("missing").is_none() => entity.clone(),
            _ => return Err(WikidataError::EntityNotFound(params.entity_id.clone())),
        };

        if let Some(properties) = &params.properties {
            retain_claims(&mut entity, properties);
        }

        let payload = if params.simplified {
            EntityPayload::Simplified(simplify(&entity))
        } else {
            EntityPayload::Raw(entity)
        };
        Ok(EntityResult { entity: payload })
    }

    /// Run a SPARQL query as given, appending a `LIMIT` if it has none.
    ///
    /// JSON results are parsed; CSV and XML are returned as raw text under
    /// `result`.
    pub async fn sparql_query(&self, params: &SparqlParams) -> Result<SparqlOutput> {
        let query = ensure_limit(&params.query, params.limit);
        let body = self.get_sparql(&query, params.format).await?;
        match params.format {
            SparqlFormat::Json => Ok(SparqlOutput::Json(serde_json::from_str(&body)?)),
            SparqlFormat::Csv | SparqlFormat::Xml => Ok(SparqlOutput::Raw { result: body }),
        }
    }

    /// Direct-claim edges of an entity.
    ///
    /// The relation type and ids are validated before any request is made.
    pub async fn get_relations(&self, params: &RelationsParams) -> Result<RelationsResult> {
        let relation_type: RelationType = params.relation_type.parse()?;
        validate_entity_id(&params.entity_id)?;
        let filter = params.property_filter.as_deref().unwrap_or_default();
        for property in filter {
            validate_property_id(property)?;
        }

        let query = relations_query(&params.entity_id, relation_type, filter, params.limit);
        debug!(
            entity = %params.entity_id,
            direction = %relation_type,
            limit = params.limit.min(MAX_RELATIONS_LIMIT),
            "get_relations"
        );
        let results: SparqlResults = self.sparql_json(&query).await?;
        let relations = results
            .results
            .bindings
            .iter()
            .map(relation_from_binding)
            .collect();
        Ok(RelationsResult { relations })
    }

    /// Items whose `property` has exactly the string value `value`.
    pub async fn find_by_property(&self, params: &FindByPropertyParams) -> Result<FoundEntities> {
        validate_property_id(&params.property)?;
        let language = self.language(params.language.as_deref());
        let query = find_by_property_query(&params.property, &params.value, language, params.limit);
        debug!(
            property = %params.property,
            limit = params.limit.min(MAX_FIND_LIMIT),
            "find_by_property"
        );
        let results: SparqlResults = self.sparql_json(&query).await?;
        let entities = results
            .results
            .bindings
            .iter()
            .map(|row| EntityRef {
                id: row.get("item").map(|t| t.id()).unwrap_or_default(),
                label: label_of(row, "itemLabel"),
            })
            .collect();
        Ok(FoundEntities { entities })
    }

    // ── HTTP ───────────────────────────────────────────────────────────────

    async fn get_api<T: DeserializeOwned>(&self, query: &[(&str, String)]) -> Result<T> {
        let body = self
            .send(self.http.get(&self.config.wikibase_api_url).query(query))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_sparql(&self, query: &str, format: SparqlFormat) -> Result<String> {
        let request = self
            .http
            .get(&self.config.sparql_endpoint)
            .query(&[("query", query), ("format", format.as_str())])
            .header(ACCEPT, format.accept());
        self.send(request).await
    }

    async fn sparql_json<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        let query = ensure_limit(query, crate::sparql::MAX_SPARQL_LIMIT);
        let body = self.get_sparql(&query, SparqlFormat::Json).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request while holding a gate permit and return the body text.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| WikidataError::UpstreamUnavailable("request gate closed".to_string()))?;

        let response = request.send().await.map_err(WikidataError::transport)?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "upstream response");
        let body = response.text().await.map_err(WikidataError::transport)?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "upstream returned an error status");
            return Err(WikidataError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

fn label_of(row: &SparqlBinding, var: &str) -> String {
    row.get(var).map(|t| t.value.clone()).unwrap_or_default()
}

fn relation_from_binding(row: &SparqlBinding) -> Relation {
    let property = row.get("prop").map(|t| t.id()).unwrap_or_default();
    let property_label = label_of(row, "propLabel");
    let endpoint = |var: &str, label_var: &str| {
        row.get(var).map(|t| EntityRef {
            id: t.id(),
            label: label_of(row, label_var),
        })
    };
    let target = endpoint("target", "targetLabel");
    let source = endpoint("source", "sourceLabel");
    let direction = if target.is_some() {
        RelationType::Outgoing
    } else {
        RelationType::Incoming
    };
    Relation {
        property,
        property_label,
        direction: direction.as_str().to_string(),
        target,
        source,
    }
}
