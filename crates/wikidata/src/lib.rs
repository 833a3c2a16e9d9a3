pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod params;
pub mod sparql;
pub mod types;

pub use client::WikidataClient;
pub use config::{Config, ConfigError};
pub use error::{Result, WikidataError};
pub use params::{
    EntityType, FindByPropertyParams, GetEntityParams, RelationType, RelationsParams,
    SearchParams, SparqlFormat, SparqlParams,
};
pub use types::{
    EntityPayload, EntityRef, EntityResult, FoundEntities, PropertyMap, PropertyValue, Relation,
    RelationsResult, SearchHit, SearchResult, SimplifiedEntity, SparqlOutput,
};
