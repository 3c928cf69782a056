use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::repo_activity;

/// One day of commit activity. Days without a row are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = repo_activity)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub commits: i32,
    pub authors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_date_as_iso_8601() {
        let record = ActivityRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            commits: 2,
            authors: vec!["alice".to_owned(), "bob".to_owned()],
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "date": "2024-01-03",
                "commits": 2,
                "authors": ["alice", "bob"],
            })
        );
    }
}
