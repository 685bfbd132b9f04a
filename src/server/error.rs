use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::error::{ApiError, Error};

/// Failure of a route handler, rendered as `{"error": "..."}`.
///
/// `Internal` keeps the underlying cause for the log; only the short message
/// reaches the client.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{message}")]
    Internal {
        message: &'static str,
        details: String,
    },
}

impl RouteError {
    /// Caller mistakes become 400s, anything else a 500 with `message`
    pub fn classify(err: Error, message: &'static str) -> Self {
        match err {
            Error::Input(e) => RouteError::BadRequest(e.to_string()),
            Error::Workflow(e) => RouteError::BadRequest(e.to_string()),
            other => RouteError::Internal {
                message,
                details: other.to_string(),
            },
        }
    }

    /// Like [`RouteError::classify`], with upstream 404s surfaced as `not_found`
    pub fn classify_lookup(err: Error, not_found: &'static str, message: &'static str) -> Self {
        match err {
            Error::Api(ApiError::NotFound(_)) => RouteError::NotFound(not_found),
            other => Self::classify(other, message),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RouteError::NotFound(_) => StatusCode::NOT_FOUND,
            RouteError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            RouteError::Internal { message, details } => {
                log::error!("{}: {}", message, details);
            }
            other => log::info!("Rejected request ({}): {}", status, other),
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
