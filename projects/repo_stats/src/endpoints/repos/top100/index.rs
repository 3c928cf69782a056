use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use thiserror::Error;

use crate::app::AppState;
use crate::db::{
    pool::AcquireConnectionError,
    repos::{
        models::{OrderField, ParseOrderFieldError, RepositorySnapshot},
        queries::{get_top_repositories, GetTopRepositoriesError},
    },
};
use crate::endpoints::error::ErrorResponse;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("InvalidQueryString: {source}")]
    InvalidQueryString {
        #[from]
        source: QueryRejection,
    },
    #[error("{source}")]
    InvalidOrderBy {
        #[from]
        source: ParseOrderFieldError,
    },
    #[error(transparent)]
    GetConnectionFromPool {
        #[from]
        source: AcquireConnectionError,
    },
    #[error(transparent)]
    GetTopRepositories {
        #[from]
        source: GetTopRepositoriesError,
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
            HandlerError::InvalidQueryString { .. } | HandlerError::InvalidOrderBy { .. } => {
                ErrorResponse::unprocessable(self.to_string())
            }
            HandlerError::GetConnectionFromPool { .. }
            | HandlerError::GetTopRepositories { .. }
            | HandlerError::QueryTask { .. } => ErrorResponse::internal(&self, expose_detail),
        }
    }
}

/// Query parameters for the endpoint.
#[derive(Debug, Deserialize)]
pub struct Top100Params {
    order_by: Option<String>,
}

/// Axum handler: GET /api/repos/top100?order_by=<field>
pub async fn handler(
    State(state): State<AppState>,
    params: Result<Query<Top100Params>, QueryRejection>,
) -> Result<Json<Vec<RepositorySnapshot>>, ErrorResponse> {
    fetch(&state, params)
        .await
        .map(Json)
        .map_err(|err| err.into_error_response(state.expose_error_detail))
}

async fn fetch(
    state: &AppState,
    params: Result<Query<Top100Params>, QueryRejection>,
) -> Result<Vec<RepositorySnapshot>, HandlerError> {
    let Query(params) = params?;
    let order = parse_order_by(params.order_by.as_deref())?;

    state
        .pool
        .run(move |conn| -> Result<_, HandlerError> {
            Ok(get_top_repositories(conn, order)?)
        })
        .await
}

fn parse_order_by(value: Option<&str>) -> Result<OrderField, ParseOrderFieldError> {
    value.map_or(Ok(OrderField::default()), str::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_order_by_defaults_to_stars() {
        assert_eq!(parse_order_by(None).unwrap(), OrderField::Stars);
    }

    #[test]
    fn explicit_order_by_is_parsed() {
        assert_eq!(parse_order_by(Some("open_issues")).unwrap(), OrderField::OpenIssues);
        assert!(parse_order_by(Some("invalid")).is_err());
        assert!(parse_order_by(Some("")).is_err());
    }
}
