//! Naming-convention configuration read by the field resolver.

use crate::case::{to_camel_case, to_snake_case};
use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How table identifiers are rewritten before they are matched or used as qualifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableNameStrategy {
    SnakeCase,
    CamelCase,
    /// Use the table name as given.
    Verbatim,
}

impl TableNameStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableNameStrategy::SnakeCase => "snake_case",
            TableNameStrategy::CamelCase => "camelCase",
            TableNameStrategy::Verbatim => "none",
        }
    }

    pub fn apply(&self, table: &str) -> String {
        match self {
            TableNameStrategy::SnakeCase => to_snake_case(table),
            TableNameStrategy::CamelCase => to_camel_case(table),
            TableNameStrategy::Verbatim => table.to_string(),
        }
    }
}

impl std::str::FromStr for TableNameStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "snake_case" | "snake" => Ok(TableNameStrategy::SnakeCase),
            "camelCase" | "camel" => Ok(TableNameStrategy::CamelCase),
            "none" => Ok(TableNameStrategy::Verbatim),
            other => Err(ConfigError::Invalid(format!(
                "invalid relation table name strategy: {} (expected snake_case, camelCase or none)",
                other
            ))),
        }
    }
}

impl Serialize for TableNameStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TableNameStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Unset strategy may be written as `false` or `null`.
fn deserialize_strategy<'de, D>(deserializer: D) -> Result<Option<TableNameStrategy>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    match v {
        serde_json::Value::Null | serde_json::Value::Bool(false) => Ok(None),
        serde_json::Value::String(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "relation table name strategy must be a string, false or null; got {}",
            other
        ))),
    }
}

/// Process-wide naming conventions. Treat as immutable once the process has started; the resolver
/// takes its own copy at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Snake-case internal names of allowed fields and requested related-table field names.
    pub convert_field_names_to_snake_case: bool,
    /// Match related tables by the snake_case plural of the relation name (`author` -> `authors`).
    pub convert_relation_names_to_snake_case_plural: bool,
    #[serde(deserialize_with = "deserialize_strategy")]
    pub convert_relation_table_name_strategy: Option<TableNameStrategy>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingConfig {
            convert_field_names_to_snake_case: false,
            convert_relation_names_to_snake_case_plural: true,
            convert_relation_table_name_strategy: None,
        }
    }
}
