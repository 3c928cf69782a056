use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::app::AppState;
use crate::db::{
    activity::{
        models::ActivityRecord,
        queries::{get_repo_activity, GetRepoActivityError},
    },
    pool::AcquireConnectionError,
};
use crate::endpoints::error::ErrorResponse;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("InvalidPath: {source}")]
    InvalidPath {
        #[from]
        source: PathRejection,
    },
    #[error("InvalidQueryString: {source}")]
    InvalidQueryString {
        #[from]
        source: QueryRejection,
    },
    #[error("{param} is required (YYYY-MM-DD)")]
    MissingDate { param: &'static str },
    #[error("{param} must be a date in YYYY-MM-DD format (got '{value}')")]
    InvalidDate { param: &'static str, value: String },
    #[error(transparent)]
    GetConnectionFromPool {
        #[from]
        source: AcquireConnectionError,
    },
    #[error(transparent)]
    GetRepoActivity {
        #[from]
        source: GetRepoActivityError,
    },
    #[error("QueryTask: {source}")]
    QueryTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl HandlerError {
    fn into_error_response(self, expose_detail: bool) -> ErrorResponse {
        match self {
            HandlerError::InvalidPath { .. }
            | HandlerError::InvalidQueryString { .. }
            | HandlerError::MissingDate { .. }
            | HandlerError::InvalidDate { .. } => ErrorResponse::unprocessable(self.to_string()),
            HandlerError::GetConnectionFromPool { .. }
            | HandlerError::GetRepoActivity { .. }
            | HandlerError::QueryTask { .. } => ErrorResponse::internal(&self, expose_detail),
        }
    }
}

/// Query parameters for the endpoint. Both are required; they are kept as
/// strings so a bad value produces our own 422 instead of axum's 400.
#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    since: Option<String>,
    until: Option<String>,
}

/// Axum handler: GET /api/repos/{owner}/{repo}/activity?since=<date>&until=<date>
pub async fn handler(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    params: Result<Query<ActivityParams>, QueryRejection>,
) -> Result<Json<Vec<ActivityRecord>>, ErrorResponse> {
    fetch(&state, path, params)
        .await
        .map(Json)
        .map_err(|err| err.into_error_response(state.expose_error_detail))
}

async fn fetch(
    state: &AppState,
    path: Result<Path<(String, String)>, PathRejection>,
    params: Result<Query<ActivityParams>, QueryRejection>,
) -> Result<Vec<ActivityRecord>, HandlerError> {
    let Path((owner, repo)) = path?;
    let Query(params) = params?;
    let since = parse_date("since", params.since.as_deref())?;
    let until = parse_date("until", params.until.as_deref())?;

    state
        .pool
        .run(move |conn| -> Result<_, HandlerError> {
            Ok(get_repo_activity(conn, &owner, &repo, since, until)?)
        })
        .await
}

fn parse_date(param: &'static str, value: Option<&str>) -> Result<NaiveDate, HandlerError> {
    let value = value.ok_or(HandlerError::MissingDate { param })?;

    let invalid = || HandlerError::InvalidDate {
        param,
        value: value.to_owned(),
    };

    // chrono alone also accepts signs, leading spaces and unpadded fields.
    if !is_iso_date_shape(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

/// `DDDD-DD-DD` with ASCII digits only.
fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
