//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheConfig, MAX_TTL};
use crate::catalog::CatalogConfig;
use crate::parser::ParserConfig;
use crate::service::RequestDefaults;

/// Default listen port on localhost.
const DEFAULT_PORT: u16 = 3000;

/// Errors reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: SocketAddr,

    /// Catalog client settings
    pub catalog: CatalogConfig,

    /// Parser client settings
    pub parser: ParserConfig,

    /// Whether `PARSER_URL` was given explicitly
    pub parser_url_set: bool,

    /// Cache settings
    pub cache: CacheConfig,

    /// Language/publication fallbacks
    pub defaults: RequestDefaults,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// | Variable              | Default                          |
    /// |-----------------------|----------------------------------|
    /// | `SCHEDULE_BIND_ADDR`  | `127.0.0.1:3000`                 |
    /// | `CATALOG_BASE_URL`    | media-links endpoint             |
    /// | `CATALOG_TIMEOUT_SECS`| 30                               |
    /// | `PARSER_URL`          | `http://127.0.0.1:8081/parse`    |
    /// | `PARSER_TIMEOUT_SECS` | 120                              |
    /// | `CACHE_TTL_SECS`      | 604800 (7 days)                  |
    /// | `CACHE_MAX_CAPACITY`  | 10000                            |
    /// | `DEFAULT_LANG`        | `E`                              |
    /// | `DEFAULT_PUB`         | `mwb`                            |
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_var(&get, "SCHEDULE_BIND_ADDR")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)));

        let mut catalog = CatalogConfig::default();
        if let Some(url) = get("CATALOG_BASE_URL") {
            catalog = catalog.with_base_url(url);
        }
        if let Some(secs) = parse_var(&get, "CATALOG_TIMEOUT_SECS")? {
            catalog = catalog.with_timeout(secs);
        }

        let mut parser = ParserConfig::default();
        let parser_url = get("PARSER_URL");
        let parser_url_set = parser_url.is_some();
        if let Some(url) = parser_url {
            parser = parser.with_base_url(url);
        }
        if let Some(secs) = parse_var(&get, "PARSER_TIMEOUT_SECS")? {
            parser = parser.with_timeout(secs);
        }

        let mut cache = CacheConfig::default();
        if let Some(secs) = parse_var(&get, "CACHE_TTL_SECS")? {
            let ttl = Duration::from_secs(secs);
            if ttl > MAX_TTL {
                return Err(ConfigError::Invalid {
                    name: "CACHE_TTL_SECS",
                    value: secs.to_string(),
                });
            }
            cache.ttl = ttl;
        }
        if let Some(capacity) = parse_var(&get, "CACHE_MAX_CAPACITY")? {
            cache.max_capacity = capacity;
        }

        let mut defaults = RequestDefaults::default();
        if let Some(lang) = get("DEFAULT_LANG") {
            defaults.lang = lang;
        }
        if let Some(pub_code) = get("DEFAULT_PUB") {
            defaults.pub_code = pub_code;
        }

        Ok(Self {
            bind_addr,
            catalog,
            parser,
            parser_url_set,
            cache,
            defaults,
        })
    }
}

fn parse_var<T, G>(get: &G, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}
