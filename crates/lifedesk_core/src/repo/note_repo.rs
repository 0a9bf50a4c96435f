//! `notes` table binding.
//!
//! Tags are stored as a JSON array in a single column so their order
//! survives a round trip.

use crate::model::note::Note;
use crate::repo::record_repo::{
    timestamp_column, timestamp_value, uuid_column, RecordTable, RepoError, RepoResult,
    SqliteRecordRepository,
};
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteNoteRepository<'conn> = SqliteRecordRepository<'conn, Note>;

impl RecordTable for Note {
    const TABLE: &'static str = "notes";
    const COLUMNS: &'static [&'static str] =
        &["title", "content", "tags", "created_at", "updated_at"];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";

    fn column_values(&self) -> RepoResult<Vec<Value>> {
        let tags = serde_json::to_string(&self.tags)
            .map_err(|err| RepoError::InvalidData(format!("unencodable note tags: {err}")))?;
        Ok(vec![
            Value::Text(self.title.clone()),
            Value::Text(self.content.clone()),
            Value::Text(tags),
            timestamp_value(self.created_at),
            timestamp_value(self.updated_at),
        ])
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let tags_text: String = row.get("tags")?;
        let tags = serde_json::from_str::<Vec<String>>(&tags_text).map_err(|_| {
            RepoError::InvalidData(format!("invalid tag list `{tags_text}` in notes.tags"))
        })?;

        Ok(Note {
            id: uuid_column(row, "id")?,
            owner: uuid_column(row, "owner_id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            tags,
            created_at: timestamp_column(row, "created_at")?,
            updated_at: timestamp_column(row, "updated_at")?,
        })
    }
}
