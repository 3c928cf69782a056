use chrono::NaiveDate;
use diesel::prelude::*;
use thiserror::Error;

use crate::db::{activity::models::*, schema::repo_activity::dsl::*};

#[derive(Debug, Error)]
pub enum GetRepoActivityError {
    #[error("GetRepoActivity: {source}")]
    GetRepoActivity {
        #[from]
        source: diesel::result::Error,
    },
}

/// Activity rows for `owner_val/repo_val` with `since <= date <= until`,
/// oldest first. An inverted range matches nothing.
pub fn get_repo_activity(
    conn: &mut PgConnection,
    owner_val: &str,
    repo_val: &str,
    since: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<ActivityRecord>, GetRepoActivityError> {
    repo_activity
        .filter(owner.eq(owner_val))
        .filter(repo.eq(repo_val))
        .filter(date.between(since, until))
        .order(date.asc())
        .select(ActivityRecord::as_select())
        .load::<ActivityRecord>(conn)
        .map_err(|source| GetRepoActivityError::GetRepoActivity { source })
}
