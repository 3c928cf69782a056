//! Uniform error body shared by every endpoint: `{"detail": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

pub const INTERNAL_ERROR_DETAIL: &str = "internal server error";

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub detail: String,
}

impl ErrorResponse {
    /// Client input failed validation; nothing reached the database.
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }

    /// Logs the full error and builds a 500. The error text is only sent to
    /// the client when `expose_detail` is set.
    pub fn internal(err: &(dyn std::error::Error + 'static), expose_detail: bool) -> Self {
        error!(error = %err, causes = %cause_chain(err), "Request failed");

        let detail = if expose_detail {
            err.to_string()
        } else {
            INTERNAL_ERROR_DETAIL.to_owned()
        };

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail,
        }
    }
}

/// Every `source()` below `err`, outermost first, joined with `: `.
fn cause_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes.join(": ")
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
