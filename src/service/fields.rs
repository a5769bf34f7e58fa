//! Field resolution: validate requested fields against the allow-list and turn them into
//! qualified column selections for the base table and for related tables.

use crate::case::{fields_to_snake_case, to_plural, to_snake_case};
use crate::config::{NamingConfig, TableNameStrategy};
use crate::error::FieldError;
use crate::field::{AllowedField, FieldInput};
use crate::request::{RequestFieldParser, RequestedFieldSet};
use crate::sql::{QueryExecutor, SelectQuery};
use indexmap::IndexMap;

/// Name of the base table being queried.
pub trait SchemaIntrospector {
    fn table_name(&self) -> String;
}

impl SchemaIntrospector for str {
    fn table_name(&self) -> String {
        self.to_string()
    }
}

impl SchemaIntrospector for String {
    fn table_name(&self) -> String {
        self.clone()
    }
}

impl SchemaIntrospector for SelectQuery {
    fn table_name(&self) -> String {
        self.table().to_string()
    }
}

/// Prefix `field` with `table` unless it is already qualified.
pub fn qualify(field: &str, table: &str) -> String {
    if field.contains('.') {
        field.to_string()
    } else {
        format!("{}.{}", table, field)
    }
}

pub fn qualify_all<S: AsRef<str>>(fields: &[S], table: &str) -> Vec<String> {
    fields.iter().map(|f| qualify(f.as_ref(), table)).collect()
}

/// Qualified columns for the base table.
///
/// With a non-empty `requested` list only those public fields are kept, otherwise every allowed
/// field is. Internal names are flattened in allow-list order, first occurrence wins. An empty
/// result means "leave the executor's default selection alone".
pub fn compose_base_selection(
    allowed: &[AllowedField],
    requested: &[String],
    table: &str,
    snake_case: bool,
) -> Vec<String> {
    // Later declarations of the same public name replace earlier ones in place.
    let mut by_name: IndexMap<&str, Vec<String>> = IndexMap::new();
    for field in allowed {
        by_name.insert(field.name(), field.internal_names(snake_case));
    }

    let mut columns: Vec<String> = Vec::new();
    for (name, internal_names) in &by_name {
        if !requested.is_empty() && !requested.iter().any(|r| r == name) {
            continue;
        }
        for column in qualify_all(internal_names, table) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
    }
    columns
}

/// Where a related-table candidate identifier comes from. Evaluated in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CandidateSource {
    /// The relation name, snake-cased and pluralized when configured.
    Relation,
    /// The explicit table name under the configured strategy.
    Table(TableNameStrategy),
}

impl CandidateSource {
    fn candidate(self, relation: &str, table_name: Option<&str>, config: &NamingConfig) -> Option<String> {
        match self {
            CandidateSource::Relation => Some(if config.convert_relation_names_to_snake_case_plural {
                to_plural(&to_snake_case(relation))
            } else {
                relation.to_string()
            }),
            CandidateSource::Table(strategy) => table_name.map(|t| strategy.apply(t)),
        }
    }
}

/// Table identifiers to look up in the request for a relation, highest priority first.
pub fn related_table_candidates(relation: &str, table_name: Option<&str>, config: &NamingConfig) -> Vec<String> {
    let mut sources = vec![CandidateSource::Relation];
    if let (Some(_), Some(strategy)) = (table_name, config.convert_relation_table_name_strategy) {
        sources.push(CandidateSource::Table(strategy));
    }
    sources
        .into_iter()
        .filter_map(|source| source.candidate(relation, table_name, config))
        .collect()
}

/// Request-scoped resolver. Owns the query executor it writes the base selection into.
pub struct FieldResolver<Q> {
    config: NamingConfig,
    requested: RequestedFieldSet,
    model_table: String,
    executor: Q,
    allowed_fields: Option<Vec<AllowedField>>,
    allowed_includes: Option<Vec<String>>,
}

impl<Q: QueryExecutor> FieldResolver<Q> {
    pub fn new<R, S>(request: &R, schema: &S, executor: Q, config: NamingConfig) -> Self
    where
        R: RequestFieldParser + ?Sized,
        S: SchemaIntrospector + ?Sized,
    {
        FieldResolver {
            config,
            requested: request.fields(),
            model_table: schema.table_name(),
            executor,
            allowed_fields: None,
            allowed_includes: None,
        }
    }

    /// Register the allow-list, reject unknown requested base fields, then select the requested
    /// (or all allowed) columns on the executor.
    pub fn allowed_fields<I>(&mut self, fields: I) -> Result<&mut Self, FieldError>
    where
        I: IntoIterator,
        I::Item: Into<FieldInput>,
    {
        if self.allowed_includes.is_some() {
            return Err(FieldError::OrderingViolation);
        }
        let fields: Vec<AllowedField> = fields
            .into_iter()
            .map(|f| f.into().into_allowed_field())
            .collect();
        if fields.iter().any(|f| f.name().is_empty()) {
            return Err(FieldError::EmptyFieldName);
        }
        self.allowed_fields = Some(fields);

        self.ensure_all_fields_exist()?;
        self.add_requested_model_fields();
        Ok(self)
    }

    /// Register the include allow-list. Fields can no longer be registered afterwards.
    pub fn allowed_includes<I, S>(&mut self, includes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_includes = Some(includes.into_iter().map(Into::into).collect());
        self
    }

    fn requested_base_fields(&self) -> Vec<String> {
        self.requested.base_fields(&self.base_table())
    }

    fn ensure_all_fields_exist(&self) -> Result<(), FieldError> {
        let allowed: Vec<String> = self
            .allowed()
            .unwrap_or_default()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        let unknown: Vec<String> = self
            .requested_base_fields()
            .into_iter()
            .filter(|name| !allowed.contains(name))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        tracing::warn!(table = %self.model_table, unknown = ?unknown, "requested fields are not allowed");
        Err(FieldError::InvalidFieldQuery { unknown, allowed })
    }

    fn add_requested_model_fields(&mut self) {
        let table = self.base_table();
        let columns = compose_base_selection(
            self.allowed().unwrap_or_default(),
            &self.requested_base_fields(),
            &table,
            self.config.convert_field_names_to_snake_case,
        );
        if columns.is_empty() {
            tracing::debug!(table = %table, "no fields to select, keeping default selection");
            return;
        }
        tracing::debug!(table = %table, columns = ?columns, "selecting fields");
        self.executor.select_columns(columns);
    }
}

impl<Q> FieldResolver<Q> {
    /// Requested fields for a related (joined or eager-loaded) table.
    ///
    /// Candidate table identifiers are tried in priority order and the first bucket present in
    /// the request wins. Nothing requested for the relation yields an empty list. With
    /// `table_name` the fields come back qualified by it.
    pub fn requested_fields_for_related_table(
        &self,
        relation: &str,
        table_name: Option<&str>,
    ) -> Result<Vec<String>, FieldError> {
        let candidates = related_table_candidates(relation, table_name, &self.config);

        let snake_cased;
        let fields = if self.config.convert_field_names_to_snake_case {
            snake_cased = fields_to_snake_case(&self.requested);
            &snake_cased
        } else {
            &self.requested
        };

        let Some((matched_table, matched)) = candidates
            .iter()
            .find_map(|candidate| fields.get(candidate).map(|f| (candidate, f)))
        else {
            return Ok(Vec::new());
        };
        if matched.is_empty() {
            return Ok(Vec::new());
        }
        if self.allowed_fields.is_none() {
            return Err(FieldError::UnknownIncludedFieldsQuery {
                fields: matched.to_vec(),
            });
        }
        tracing::debug!(relation = %relation, table = %matched_table, fields = ?matched, "related fields requested");

        Ok(match table_name {
            Some(table) => qualify_all(matched, table),
            None => matched.to_vec(),
        })
    }

    /// Base table identifier after the relation table name strategy.
    pub fn base_table(&self) -> String {
        match self.config.convert_relation_table_name_strategy {
            Some(strategy) => strategy.apply(&self.model_table),
            None => self.model_table.clone(),
        }
    }

    /// `None` until [`FieldResolver::allowed_fields`] has been called.
    pub fn allowed(&self) -> Option<&[AllowedField]> {
        self.allowed_fields.as_deref()
    }

    pub fn includes(&self) -> Option<&[String]> {
        self.allowed_includes.as_deref()
    }

    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    pub fn executor(&self) -> &Q {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut Q {
        &mut self.executor
    }

    pub fn into_executor(self) -> Q {
        self.executor
    }
}
