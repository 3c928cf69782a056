use std::fmt;
use std::str::FromStr;

use diesel::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::db::schema::repos;

/// One leaderboard row. Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = repos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[cfg_attr(test, derive(Insertable))]
pub struct RepositorySnapshot {
    pub repo: String,
    pub owner: String,
    pub position_cur: i32,
    pub position_prev: i32,
    pub stars: i32,
    pub watchers: i32,
    pub forks: i32,
    pub open_issues: i32,
    pub language: String,
}

/// Columns the leaderboard may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderField {
    #[default]
    Stars,
    Forks,
    Watchers,
    OpenIssues,
}

impl OrderField {
    pub const ALL: [OrderField; 4] = [
        OrderField::Stars,
        OrderField::Forks,
        OrderField::Watchers,
        OrderField::OpenIssues,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderField::Stars => "stars",
            OrderField::Forks => "forks",
            OrderField::Watchers => "watchers",
            OrderField::OpenIssues => "open_issues",
        }
    }

    /// Value of this field on a snapshot.
    #[cfg(test)]
    pub(crate) fn value_of(self, snapshot: &RepositorySnapshot) -> i32 {
        match self {
            OrderField::Stars => snapshot.stars,
            OrderField::Forks => snapshot.forks,
            OrderField::Watchers => snapshot.watchers,
            OrderField::OpenIssues => snapshot.open_issues,
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("order_by must be one of: stars, forks, watchers, open_issues (got '{value}')")]
pub struct ParseOrderFieldError {
    pub value: String,
}

impl FromStr for OrderField {
    type Err = ParseOrderFieldError;

    /// Case-sensitive: only the exact column names are accepted.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OrderField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| ParseOrderFieldError {
                value: value.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_allowed_field() {
        for field in OrderField::ALL {
            assert_eq!(field.as_str().parse::<OrderField>().unwrap(), field);
            assert_eq!(field.to_string(), field.as_str());
        }
    }

    #[test]
    fn rejects_anything_outside_the_allow_list() {
        for value in ["", "invalid", "Stars", "stars ", "stars; DROP TABLE repos", "position_cur"] {
            let err = value.parse::<OrderField>().unwrap_err();
            assert_eq!(err.value, value);
        }
    }

    #[test]
    fn error_message_lists_allowed_values() {
        let err = "invalid".parse::<OrderField>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "order_by must be one of: stars, forks, watchers, open_issues (got 'invalid')"
        );
    }

    #[test]
    fn default_is_stars() {
        assert_eq!(OrderField::default(), OrderField::Stars);
    }

    #[test]
    fn snapshot_serializes_with_expected_keys() {
        let snapshot = RepositorySnapshot {
            repo: "widget".to_owned(),
            owner: "acme".to_owned(),
            position_cur: 1,
            position_prev: 3,
            stars: 120,
            watchers: 40,
            forks: 12,
            open_issues: 5,
            language: "Rust".to_owned(),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"{"repo":"widget","owner":"acme","position_cur":1,"position_prev":3,"stars":120,"watchers":40,"forks":12,"open_issues":5,"language":"Rust"}"#
        );
        assert_eq!(OrderField::Forks.value_of(&snapshot), 12);
        assert_eq!(OrderField::OpenIssues.value_of(&snapshot), 5);
    }
}
