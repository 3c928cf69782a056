// Tables are owned and populated by the ingestion job; this service only reads them.

diesel::table! {
    repos (owner, repo) {
        owner -> Text,
        repo -> Text,
        position_cur -> Int4,
        position_prev -> Int4,
        stars -> Int4,
        watchers -> Int4,
        forks -> Int4,
        open_issues -> Int4,
        language -> Text,
    }
}

diesel::table! {
    repo_activity (owner, repo, date) {
        owner -> Text,
        repo -> Text,
        date -> Date,
        commits -> Int4,
        authors -> Array<Text>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    repos,
    repo_activity,
);
