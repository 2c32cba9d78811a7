//! CLI configuration
//!
//! Layered in order: built-in defaults, an optional TOML file, then
//! `QIDO__`-prefixed environment variables (`QIDO__QUERY__MAX_RESULT_COUNT=50`,
//! `QIDO__LOGGING__JSON=true`). Command-line flags are applied by the caller.

use anyhow::Context;
use config::{Config, Environment, File};
use qido_query::{QueryOptions, MAX_QUERY_RESULT_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "QIDO";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub query: QueryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Largest accepted `limit` value
    pub max_result_count: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_result_count: MAX_QUERY_RESULT_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level for the qido crates (`RUST_LOG` takes precedence)
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl CliConfig {
    /// Load configuration from defaults, `file` (if given) and the environment.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        // A missing .env is fine
        let _ = dotenvy::dotenv();
        Self::load_from(file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(file: Option<&Path>, environment: Environment) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&CliConfig::default()).context("Failed to build default configuration")?;

        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(environment.separator("__").try_parsing(true))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            max_result_count: self.query.max_result_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn defaults_without_sources() {
        let config = CliConfig::load_from(None, environment(&[])).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.query_options().max_result_count, MAX_QUERY_RESULT_COUNT);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = CliConfig::load_from(
            None,
            environment(&[
                ("QIDO__QUERY__MAX_RESULT_COUNT", "25"),
                ("QIDO__LOGGING__JSON", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(config.query.max_result_count, 25);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = CliConfig::load_from(
            Some(Path::new("/nonexistent/qido.toml")),
            environment(&[]),
        );
        assert!(result.is_err());
    }
}
