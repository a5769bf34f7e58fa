//! Run a resolved SELECT against PostgreSQL and return rows as JSON objects.

use crate::error::AppError;
use crate::sql::SelectQuery;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row, TypeInfo};

pub struct SelectService;

impl SelectService {
    pub async fn fetch_all(pool: &PgPool, query: &SelectQuery) -> Result<Vec<Value>, AppError> {
        let sql = query.to_sql();
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql).fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    pub async fn fetch_optional(pool: &PgPool, query: &SelectQuery) -> Result<Option<Value>, AppError> {
        let sql = query.to_sql();
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query(&sql).fetch_optional(pool).await?;
        Ok(row.as_ref().map(row_to_json))
    }
}

fn row_to_json(row: &PgRow) -> Value {
    let mut map = Map::new();
    for (i, col) in row.columns().iter().enumerate() {
        map.insert(col.name().to_string(), cell_to_value(row, i, col.type_info().name()));
    }
    Value::Object(map)
}

/// Decode by declared column type; unknown types fall back to text.
fn cell_to_value(row: &PgRow, i: usize, type_name: &str) -> Value {
    let decoded = match type_name {
        "INT2" => row.try_get::<Option<i16>, _>(i).map(|v| v.map(Value::from)),
        "INT4" => row.try_get::<Option<i32>, _>(i).map(|v| v.map(Value::from)),
        "INT8" => row.try_get::<Option<i64>, _>(i).map(|v| v.map(Value::from)),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(i)
            .map(|v| v.and_then(|n| serde_json::Number::from_f64(n as f64)).map(Value::Number)),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(i)
            .map(|v| v.and_then(serde_json::Number::from_f64).map(Value::Number)),
        "BOOL" => row.try_get::<Option<bool>, _>(i).map(|v| v.map(Value::Bool)),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(i)
            .map(|v| v.map(|u| Value::String(u.to_string()))),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(i)
            .map(|v| v.map(|d| Value::String(d.to_rfc3339()))),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(i)
            .map(|v| v.map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(i)
            .map(|v| v.map(|d| Value::String(d.format("%Y-%m-%d").to_string()))),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(i),
        _ => row.try_get::<Option<String>, _>(i).map(|v| v.map(Value::String)),
    };
    decoded.ok().flatten().unwrap_or(Value::Null)
}
