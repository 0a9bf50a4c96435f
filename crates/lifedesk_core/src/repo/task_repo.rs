//! `tasks` table binding.

use crate::model::task::{Category, Task};
use crate::repo::record_repo::{
    bool_column, bool_value, optional_text_value, optional_timestamp_column, timestamp_column,
    timestamp_value, uuid_column, RecordTable, RepoError, RepoResult, SqliteRecordRepository,
};
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteTaskRepository<'conn> = SqliteRecordRepository<'conn, Task>;

impl RecordTable for Task {
    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "description",
        "category",
        "is_completed",
        "due_date",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";

    fn column_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.title.clone()),
            optional_text_value(self.description.as_deref()),
            Value::Text(self.category.as_str().to_string()),
            bool_value(self.is_completed),
            self.due_date.map_or(Value::Null, timestamp_value),
            timestamp_value(self.created_at),
            timestamp_value(self.updated_at),
        ])
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let category_text: String = row.get("category")?;
        let category = category_text.parse::<Category>().map_err(|_| {
            RepoError::InvalidData(format!("invalid category `{category_text}` in tasks.category"))
        })?;

        Ok(Task {
            id: uuid_column(row, "id")?,
            owner: uuid_column(row, "owner_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            category,
            is_completed: bool_column(row, "is_completed")?,
            due_date: optional_timestamp_column(row, "due_date")?,
            created_at: timestamp_column(row, "created_at")?,
            updated_at: timestamp_column(row, "updated_at")?,
        })
    }
}
