//! Configuration: `weft.toml` discovery and parsing.
//!
//! The file is looked up in the working directory first, then under the
//! user config directory (`<config>/weft/weft.toml`). The
//! `WEFT_DATABASE_URL` environment variable takes precedence over the
//! file's URL; precedence is applied by the CLI.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{WeftError, WeftResult};
use crate::registry::Registry;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub table: String,
    /// Entity shape name; defaults to the `{name}Entity` convention.
    pub entity: Option<String>,
}

impl Config {
    /// Load the nearest configuration file, or an empty configuration if
    /// none exists.
    pub fn load() -> WeftResult<Self> {
        for path in Self::candidate_paths() {
            if path.is_file() {
                let content = std::fs::read_to_string(&path)?;
                return Self::parse(&content);
            }
        }
        Ok(Self::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("weft.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("weft").join("weft.toml"));
        }
        paths
    }

    pub fn parse(content: &str) -> WeftResult<Self> {
        toml::from_str(content).map_err(|e| WeftError::config(e.to_string()))
    }

    /// The configured database URL, if any.
    pub fn database_url(&self) -> Option<&str> {
        self.database.as_ref().map(|db| db.url.as_str())
    }

    /// Build a registry from the declared models. Each declaration
    /// registers the model and its entity shape — the declared name, or
    /// the `{name}Entity` convention when none is given.
    pub fn registry(&self) -> Registry {
        let mut registry = Registry::new();
        for model in &self.models {
            let entity = model
                .entity
                .clone()
                .unwrap_or_else(|| format!("{}Entity", model.name));
            registry = registry.model(&model.name, &model.table).entity(&entity);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [database]
            url = "postgres://localhost/entity"

            [[models]]
            name = "User"
            table = "users"

            [[models]]
            name = "Post"
            table = "posts"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_url(), Some("postgres://localhost/entity"));
        assert_eq!(config.models.len(), 2);

        let registry = config.registry();
        assert_eq!(registry.get("Post").unwrap().table, "posts");
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.database_url(), None);
        assert!(config.models.is_empty());
    }

    #[test]
    fn test_unknown_model_is_a_config_error() {
        let config = Config::parse(
            r#"
            [[models]]
            name = "User"
            table = "users"
            "#,
        )
        .unwrap();
        let registry = config.registry();
        let err = registry.get("Comment").unwrap_err();
        assert_eq!(err.to_string(), "Model Comment does not exist");
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        let err = Config::parse("[database").unwrap_err();
        assert!(matches!(err, WeftError::Config(_)));
    }
}
