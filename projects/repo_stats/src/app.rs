use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::db::DbPool;
use crate::endpoints::repos::{
    activity::index::handler as repos_activity_handler,
    top100::index::handler as repos_top100_handler,
};

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub expose_error_detail: bool,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/repos/top100", get(repos_top100_handler))
        .route("/api/repos/{owner}/{repo}/activity", get(repos_activity_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
