//! Load naming configuration from JSON (string or file) or from environment variables.

use crate::config::types::{NamingConfig, TableNameStrategy};
use crate::error::ConfigError;
use crate::request::set_array_value_delimiter;
use std::path::Path;

pub const ENV_CONVERT_FIELD_NAMES: &str = "QUERY_FIELDS_CONVERT_FIELD_NAMES_TO_SNAKE_CASE";
pub const ENV_CONVERT_RELATION_NAMES: &str = "QUERY_FIELDS_CONVERT_RELATION_NAMES_TO_SNAKE_CASE_PLURAL";
pub const ENV_TABLE_NAME_STRATEGY: &str = "QUERY_FIELDS_RELATION_TABLE_NAME_STRATEGY";
pub const ENV_ARRAY_VALUE_DELIMITER: &str = "QUERY_FIELDS_ARRAY_VALUE_DELIMITER";

/// Parse naming config from a JSON object. Missing keys take their defaults.
pub fn load_from_json(json: &str) -> Result<NamingConfig, ConfigError> {
    let config = serde_json::from_str(json)?;
    Ok(config)
}

/// Read and parse a JSON config file.
pub fn load_from_path(path: &Path) -> Result<NamingConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    load_from_json(&raw)
}

impl NamingConfig {
    /// Build from `QUERY_FIELDS_*` environment variables, falling back to defaults.
    /// `QUERY_FIELDS_ARRAY_VALUE_DELIMITER`, when set, updates the process-wide delimiter.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NamingConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = NamingConfig::default();
        if let Some(v) = lookup(ENV_CONVERT_FIELD_NAMES) {
            config.convert_field_names_to_snake_case = parse_bool(ENV_CONVERT_FIELD_NAMES, &v)?;
        }
        if let Some(v) = lookup(ENV_CONVERT_RELATION_NAMES) {
            config.convert_relation_names_to_snake_case_plural = parse_bool(ENV_CONVERT_RELATION_NAMES, &v)?;
        }
        if let Some(v) = lookup(ENV_TABLE_NAME_STRATEGY) {
            config.convert_relation_table_name_strategy = parse_strategy(&v)?;
        }
        if let Some(v) = lookup(ENV_ARRAY_VALUE_DELIMITER) {
            set_array_value_delimiter(Some(v.as_str()));
        }
        tracing::debug!(config = ?config, "naming config loaded");
        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid(format!(
            "{} must be a boolean, got '{}'",
            key, value
        ))),
    }
}

fn parse_strategy(value: &str) -> Result<Option<TableNameStrategy>, ConfigError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("false") {
        return Ok(None);
    }
    value.parse().map(Some)
}
