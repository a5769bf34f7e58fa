//! Extract the requested field selection from the query string.

use crate::error::AppError;
use crate::request::{QueryStringFields, RequestFieldParser, RequestedFieldSet};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// Extractor for `fields` / `fields[table]` query parameters.
#[derive(Clone, Debug, Default)]
pub struct RequestedFields(pub QueryStringFields);

#[async_trait]
impl<S> FromRequestParts<S> for RequestedFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(RequestedFields(QueryStringFields::from_pairs(pairs)))
    }
}

impl RequestFieldParser for RequestedFields {
    fn fields(&self) -> RequestedFieldSet {
        self.0.fields()
    }
}
