//! Helpers for tests that need a real Postgres. They return `None` when
//! `TEST_DATABASE_URL` is unset so the suite still passes without one.
//!
//! Every connection gets session-local `TEMP` tables that shadow `repos` and
//! `repo_activity`, so tests never see or touch real data.

use std::time::Duration;

use chrono::NaiveDate;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;

use crate::db::pool::{DbPool, PoolSettings};
use crate::db::repos::models::RepositorySnapshot;
use crate::db::schema::{repo_activity, repos};

const CREATE_TEMP_TABLES: &str = "
    CREATE TEMP TABLE repos (
        owner text NOT NULL,
        repo text NOT NULL,
        position_cur int4 NOT NULL,
        position_prev int4 NOT NULL,
        stars int4 NOT NULL,
        watchers int4 NOT NULL,
        forks int4 NOT NULL,
        open_issues int4 NOT NULL,
        language text NOT NULL,
        PRIMARY KEY (owner, repo)
    );
    CREATE TEMP TABLE repo_activity (
        owner text NOT NULL,
        repo text NOT NULL,
        date date NOT NULL,
        commits int4 NOT NULL,
        authors text[] NOT NULL,
        PRIMARY KEY (owner, repo, date)
    );
";

fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok()
}

pub fn test_connection() -> Option<PgConnection> {
    let url = test_database_url()?;
    let mut conn = PgConnection::establish(&url).expect("test database should connect");
    conn.batch_execute(CREATE_TEMP_TABLES)
        .expect("temp tables should be created");
    Some(conn)
}

/// Single-connection pool, so every request reuses the session that owns the
/// temp tables. The returned pool is already seeded by `seed`.
pub fn test_pool<F>(seed: F) -> Option<DbPool>
where
    F: FnOnce(&mut PgConnection),
{
    let url = test_database_url()?;
    let settings = PoolSettings {
        max_size: 1,
        acquire_timeout: Duration::from_secs(5),
    };
    let pool = DbPool::initialize(&url, &settings).expect("test pool should initialize");
    {
        let mut conn = pool.acquire().expect("test pool should hand out a connection");
        conn.batch_execute(CREATE_TEMP_TABLES)
            .expect("temp tables should be created");
        seed(&mut conn);
    }
    Some(pool)
}

pub fn snapshot(owner: &str, repo: &str) -> RepositorySnapshot {
    RepositorySnapshot {
        repo: repo.to_owned(),
        owner: owner.to_owned(),
        position_cur: 1,
        position_prev: 1,
        stars: 0,
        watchers: 0,
        forks: 0,
        open_issues: 0,
        language: "Rust".to_owned(),
    }
}

pub fn insert_repos(conn: &mut PgConnection, rows: &[RepositorySnapshot]) {
    diesel::insert_into(repos::table)
        .values(rows)
        .execute(conn)
        .expect("repos rows should insert");
}

#[derive(Insertable)]
#[diesel(table_name = repo_activity)]
pub struct NewActivity<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub date: NaiveDate,
    pub commits: i32,
    pub authors: Vec<String>,
}

pub fn activity<'a>(
    owner: &'a str,
    repo: &'a str,
    date: &str,
    commits: i32,
    authors: &[&str],
) -> NewActivity<'a> {
    NewActivity {
        owner,
        repo,
        date: date.parse().expect("test dates are ISO 8601"),
        commits,
        authors: authors.iter().map(|a| a.to_string()).collect(),
    }
}

pub fn insert_activity(conn: &mut PgConnection, rows: &[NewActivity<'_>]) {
    diesel::insert_into(repo_activity::table)
        .values(rows)
        .execute(conn)
        .expect("repo_activity rows should insert");
}
