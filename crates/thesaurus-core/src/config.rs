//! Service configuration.
//!
//! Values come from environment variables (a `.env` file is loaded by the
//! binary before this runs). The labeling kind table is compiled in and can be
//! replaced by a YAML file.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/thesaurus` |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `THESAURUS_DEFAULT_LANGUAGE` | `en` |
//! | `THESAURUS_LANGUAGES` | `en,de` |
//! | `THESAURUS_LABELINGS_FILE` | unset (built-in table) |
//! | `THESAURUS_STRICT_RELATION_NAMES` | `true` |
//! | `MAX_BODY_BYTES` | `1048576` |
//! | `DATABASE_MAX_CONNECTIONS` | `10` |
//! | `DATABASE_MIN_CONNECTIONS` | `1` |
//! | `DATABASE_CONNECT_TIMEOUT_SECS` | `30` |
//! | `DATABASE_IDLE_TIMEOUT_SECS` | `600` |
//! | `DATABASE_MAX_LIFETIME_SECS` | `1800` (`0` keeps connections forever) |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::labeling::LabelingRegistry;
use crate::models::DEFAULT_LANGUAGE;

/// Default request body limit (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Connection pool sizing and timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a free connection.
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// `None` keeps connections open indefinitely.
    pub max_lifetime_secs: Option<u64>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: Some(1800),
        }
    }
}

/// Runtime configuration for the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThesaurusConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Language used when a request does not name one.
    pub default_language: String,
    /// Languages offered by the vocabulary.
    pub languages: Vec<String>,
    /// YAML labeling kind table replacing the built-in one.
    pub labelings_file: Option<PathBuf>,
    /// Reject labeling kinds without an explicit relation name.
    pub strict_relation_names: bool,
    pub max_body_bytes: usize,
    pub pool: PoolSettings,
}

impl Default for ThesaurusConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/thesaurus".to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            default_language: DEFAULT_LANGUAGE.to_string(),
            languages: vec!["en".to_string(), "de".to_string()],
            labelings_file: None,
            strict_relation_names: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            pool: PoolSettings::default(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_number<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} is not a valid number: {}", key, raw))),
        None => Ok(default),
    }
}

impl ThesaurusConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_number(&lookup, "PORT", defaults.port)?;

        let strict_relation_names = match lookup("THESAURUS_STRICT_RELATION_NAMES") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                Error::Config(format!(
                    "THESAURUS_STRICT_RELATION_NAMES must be a boolean, got: {}",
                    raw
                ))
            })?,
            None => defaults.strict_relation_names,
        };

        let max_body_bytes = parse_number(&lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?;

        let pool_defaults = defaults.pool;
        let max_lifetime_secs = parse_number(
            &lookup,
            "DATABASE_MAX_LIFETIME_SECS",
            pool_defaults.max_lifetime_secs.unwrap_or(0),
        )?;
        let pool = PoolSettings {
            max_connections: parse_number(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                pool_defaults.max_connections,
            )?,
            min_connections: parse_number(
                &lookup,
                "DATABASE_MIN_CONNECTIONS",
                pool_defaults.min_connections,
            )?,
            connect_timeout_secs: parse_number(
                &lookup,
                "DATABASE_CONNECT_TIMEOUT_SECS",
                pool_defaults.connect_timeout_secs,
            )?,
            idle_timeout_secs: parse_number(
                &lookup,
                "DATABASE_IDLE_TIMEOUT_SECS",
                pool_defaults.idle_timeout_secs,
            )?,
            max_lifetime_secs: (max_lifetime_secs > 0).then_some(max_lifetime_secs),
        };

        let languages = lookup("THESAURUS_LANGUAGES")
            .map(|raw| {
                raw.split(',')
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.languages);

        let config = Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            default_language: lookup("THESAURUS_DEFAULT_LANGUAGE")
                .unwrap_or(defaults.default_language),
            languages,
            labelings_file: lookup("THESAURUS_LABELINGS_FILE").map(PathBuf::from),
            strict_relation_names,
            max_body_bytes,
            pool,
        };
        config.validate()?;

        debug!(
            subsystem = "config",
            host = %config.host,
            port = config.port,
            default_language = %config.default_language,
            strict_relation_names = config.strict_relation_names,
            max_connections = config.pool.max_connections,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(Error::Config(
                "THESAURUS_LANGUAGES must name at least one language".to_string(),
            ));
        }
        if !self.languages.contains(&self.default_language) {
            return Err(Error::Config(format!(
                "default language {} is not one of {:?}",
                self.default_language, self.languages
            )));
        }
        if self.max_body_bytes == 0 {
            return Err(Error::Config("MAX_BODY_BYTES must be positive".to_string()));
        }
        if self.pool.max_connections == 0 {
            return Err(Error::Config(
                "DATABASE_MAX_CONNECTIONS must be positive".to_string(),
            ));
        }
        if self.pool.min_connections > self.pool.max_connections {
            return Err(Error::Config(format!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                self.pool.min_connections, self.pool.max_connections
            )));
        }
        Ok(())
    }

    /// Build the labeling registry this configuration describes.
    pub fn labeling_registry(&self) -> Result<LabelingRegistry> {
        match &self.labelings_file {
            Some(path) => {
                info!(
                    subsystem = "config",
                    path = %path.display(),
                    "Loading labeling kinds from file"
                );
                LabelingRegistry::from_file(path, self.strict_relation_names)
            }
            None => Ok(LabelingRegistry::builtin()),
        }
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
