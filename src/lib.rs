//! Query Fields: allow-listed, naming-convention aware field selection for REST query builders.

pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod field;
pub mod request;
pub mod service;
pub mod sql;

pub use config::{load_from_json, load_from_path, NamingConfig, TableNameStrategy};
pub use error::{AppError, ConfigError, FieldError};
pub use extractors::RequestedFields;
pub use field::{AllowedField, FieldInput};
pub use request::{
    array_value_delimiter, set_array_value_delimiter, QueryStringFields, RequestFieldParser, RequestedFieldSet,
};
pub use service::{FieldResolver, SchemaIntrospector, SelectService};
pub use sql::{QueryExecutor, SelectQuery};
