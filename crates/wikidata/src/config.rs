//! Runtime configuration for the Wikidata client.
//!
//! Two sources are supported, both layered over [`Config::default`]:
//!
//! - Environment variables prefixed with `WIKIDATA_` ([`Config::from_env`]):
//!
//!   | Variable                     | Field              | Default                               |
//!   |------------------------------|--------------------|---------------------------------------|
//!   | `WIKIDATA_USER_AGENT`        | `user_agent`       | `MCP-Wikidata/0.1.0`                  |
//!   | `WIKIDATA_RATE_LIMIT`        | `rate_limit`       | `60`                                  |
//!   | `WIKIDATA_TIMEOUT`           | `timeout`          | `30`                                  |
//!   | `WIKIDATA_CACHE_TTL`         | `cache_ttl`        | `3600`                                |
//!   | `WIKIDATA_MAX_RESULTS`       | `max_results`      | `50`                                  |
//!   | `WIKIDATA_SPARQL_ENDPOINT`   | `sparql_endpoint`  | `https://query.wikidata.org/sparql`   |
//!   | `WIKIDATA_API_URL`           | `wikibase_api_url` | `https://www.wikidata.org/w/api.php`  |
//!   | `WIKIDATA_DEFAULT_LANGUAGE`  | `default_language` | `en`                                  |
//!
//! - A JSON file with the same field names ([`Config::from_file`]):
//!
//! ```json
//! { "user_agent": "my-bot/1.0 (ops@example.org)", "rate_limit": 10, "timeout": 15 }
//! ```
//!
//! Absent fields keep their defaults. A value of the wrong type is an error,
//! as is any numeric field set to zero or a URL that is not absolute.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "WIKIDATA_";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("invalid configuration: {0}")]
    Extract(Box<figment::Error>),
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User-Agent sent with every upstream request. Wikimedia asks for a
    /// contact address here.
    pub user_agent: String,
    /// Maximum number of upstream requests in flight at once.
    pub rate_limit: u32,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Declared for compatibility with existing config files; nothing reads it.
    pub cache_ttl: u64,
    /// Upper bound applied to `search_entities` limits.
    pub max_results: u32,
    pub sparql_endpoint: String,
    pub wikibase_api_url: String,
    pub default_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: "MCP-Wikidata/0.1.0".to_string(),
            rate_limit: 60,
            timeout: 30,
            cache_ttl: 3600,
            max_results: 50,
            sparql_endpoint: "https://query.wikidata.org/sparql".to_string(),
            wikibase_api_url: "https://www.wikidata.org/w/api.php".to_string(),
            default_language: "en".to_string(),
        }
    }
}

impl Config {
    /// Load from `WIKIDATA_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = Env::prefixed(ENV_PREFIX).map(|key| {
            if key.as_str().eq_ignore_ascii_case("api_url") {
                "wikibase_api_url".into()
            } else {
                key.as_str().to_ascii_lowercase().into()
            }
        });
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(env)
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file over the defaults. Environment variables are not
    /// consulted.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file(path))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, u64); 4] = [
            ("rate_limit", u64::from(self.rate_limit)),
            ("timeout", self.timeout),
            ("cache_ttl", self.cache_ttl),
            ("max_results", u64::from(self.max_results)),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    name,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        check_absolute_url("sparql_endpoint", &self.sparql_endpoint)?;
        check_absolute_url("wikibase_api_url", &self.wikibase_api_url)?;
        if self.default_language.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "default_language",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn check_absolute_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    match url::Url::parse(value) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        Ok(_) => Err(ConfigError::Invalid {
            name,
            reason: format!("{value:?} has no host"),
        }),
        Err(e) => Err(ConfigError::Invalid {
            name,
            reason: format!("{value:?} is not an absolute URL ({e})"),
        }),
    }
}
