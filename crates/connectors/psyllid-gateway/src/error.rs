//! Errors returned by the HTTP handlers, and how they are rendered.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use query_engine_execution::error as execution;
use query_engine_execution::response::WeekTotal;
use query_engine_translation::translation::error as translation;

/// Everything a data endpoint can fail with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// A parameter is missing or not allowed. Rendered as 400.
    InvalidArgument(String),
    /// The warehouse call failed. Rendered as 500 with the underlying message.
    Upstream(String),
}

impl ServerError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ServerError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

#[derive(Serialize)]
struct JsonErrorResponse {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        tracing::error!("Returning error: {error} with status code: {status}");
        (status, Json(JsonErrorResponse { error })).into_response()
    }
}

impl From<translation::Error> for ServerError {
    fn from(value: translation::Error) -> Self {
        ServerError::InvalidArgument(value.to_string())
    }
}

impl From<execution::Error> for ServerError {
    fn from(value: execution::Error) -> Self {
        ServerError::Upstream(value.to_string())
    }
}

/// An error from the weekly series endpoint. Its body keeps the `series` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesError(pub ServerError);

#[derive(Serialize)]
struct JsonSeriesErrorResponse {
    error: String,
    series: Vec<WeekTotal>,
}

impl IntoResponse for SeriesError {
    fn into_response(self) -> Response {
        let (status, error) = self.0.status_and_message();
        tracing::error!("Returning error: {error} with status code: {status}");
        (
            status,
            Json(JsonSeriesErrorResponse {
                error,
                series: vec![],
            }),
        )
            .into_response()
    }
}

impl From<ServerError> for SeriesError {
    fn from(value: ServerError) -> Self {
        SeriesError(value)
    }
}

impl From<execution::Error> for SeriesError {
    fn from(value: execution::Error) -> Self {
        SeriesError(value.into())
    }
}
