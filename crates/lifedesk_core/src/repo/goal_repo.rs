//! `goals` table binding. Goals list by their `date`, not creation time.

use crate::model::goal::Goal;
use crate::repo::record_repo::{
    bool_column, bool_value, timestamp_column, timestamp_value, uuid_column, RecordTable,
    RepoResult, SqliteRecordRepository,
};
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteGoalRepository<'conn> = SqliteRecordRepository<'conn, Goal>;

impl RecordTable for Goal {
    const TABLE: &'static str = "goals";
    const COLUMNS: &'static [&'static str] =
        &["title", "is_completed", "date", "created_at", "updated_at"];
    const ORDER_BY: &'static str = "date DESC, rowid DESC";

    fn column_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.title.clone()),
            bool_value(self.is_completed),
            timestamp_value(self.date),
            timestamp_value(self.created_at),
            timestamp_value(self.updated_at),
        ])
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Goal {
            id: uuid_column(row, "id")?,
            owner: uuid_column(row, "owner_id")?,
            title: row.get("title")?,
            is_completed: bool_column(row, "is_completed")?,
            date: timestamp_column(row, "date")?,
            created_at: timestamp_column(row, "created_at")?,
            updated_at: timestamp_column(row, "updated_at")?,
        })
    }
}
