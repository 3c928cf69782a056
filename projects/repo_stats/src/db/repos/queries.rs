use diesel::prelude::*;
use thiserror::Error;

use crate::db::{repos::models::*, schema::repos::dsl::*};

pub const TOP_REPOSITORIES_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum GetTopRepositoriesError {
    #[error("GetTopRepositories: {source}")]
    GetTopRepositories {
        #[from]
        source: diesel::result::Error,
    },
}

/// Highest `TOP_REPOSITORIES_LIMIT` repositories by `order`, descending.
/// Ties come back in whatever order the database produces.
pub fn get_top_repositories(
    conn: &mut PgConnection,
    order: OrderField,
) -> Result<Vec<RepositorySnapshot>, GetTopRepositoriesError> {
    let query = repos
        .select(RepositorySnapshot::as_select())
        .limit(TOP_REPOSITORIES_LIMIT)
        .into_boxed();

    let query = match order {
        OrderField::Stars => query.order(stars.desc()),
        OrderField::Forks => query.order(forks.desc()),
        OrderField::Watchers => query.order(watchers.desc()),
        OrderField::OpenIssues => query.order(open_issues.desc()),
    };

    query
        .load::<RepositorySnapshot>(conn)
        .map_err(|source| GetTopRepositoriesError::GetTopRepositories { source })
}
