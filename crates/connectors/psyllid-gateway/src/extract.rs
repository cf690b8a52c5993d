//! Request extractors.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// The query string of a request.
///
/// A repeated key keeps its first value and a missing key reads as empty, so extracting it
/// never rejects a request. Handlers report missing parameters in their own error shape.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let mut params = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        QueryParams(params)
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for QueryParams {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.uri.query().map(QueryParams::parse).unwrap_or_default())
    }
}
