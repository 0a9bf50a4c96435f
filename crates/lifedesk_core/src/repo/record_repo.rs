//! Generic owner-scoped record repository.
//!
//! # Invariants
//! - `list_by_owner` filters on `owner_id` in SQL; callers never see other
//!   users' rows.
//! - Ordering ties fall back to insertion order, newest first.

use crate::db::DbError;
use crate::model::record::{OwnedRecord, RecordId, RecordValidationError, UserId};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    NotFound(Uuid),
    /// A uniqueness constraint rejected the write; carries the field name.
    Conflict(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Conflict(field) => write!(f, "{field} already exists"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Table shape of a record kind.
///
/// Every table has `id` and `owner_id` as its first two columns; `COLUMNS`
/// lists the remaining ones in bind order.
pub trait RecordTable: OwnedRecord {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    /// `ORDER BY` clause used by `list_by_owner`.
    const ORDER_BY: &'static str;

    /// Values for `COLUMNS`, same order.
    fn column_values(&self) -> RepoResult<Vec<Value>>;

    /// Builds a record from a row selected with `id, owner_id, COLUMNS...`.
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// Storage contract for one record kind.
pub trait RecordRepository<R: OwnedRecord> {
    fn insert(&self, record: &R) -> RepoResult<RecordId>;
    fn get(&self, id: RecordId) -> RepoResult<Option<R>>;
    fn list_by_owner(&self, owner: UserId) -> RepoResult<Vec<R>>;
    /// Rewrites every data column; returns `NotFound` when no row matched.
    fn update(&self, record: &R) -> RepoResult<()>;
    /// Hard-deletes one row; returns `NotFound` when no row matched.
    fn delete(&self, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed repository for any [`RecordTable`].
pub struct SqliteRecordRepository<'conn, R> {
    conn: &'conn Connection,
    _record: PhantomData<fn() -> R>,
}

impl<'conn, R: RecordTable> SqliteRecordRepository<'conn, R> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _record: PhantomData,
        }
    }

    fn select_sql() -> String {
        format!(
            "SELECT id, owner_id, {} FROM {}",
            R::COLUMNS.join(", "),
            R::TABLE
        )
    }
}

impl<R: RecordTable> RecordRepository<R> for SqliteRecordRepository<'_, R> {
    fn insert(&self, record: &R) -> RepoResult<RecordId> {
        let column_count = R::COLUMNS.len() + 2;
        let placeholders = (1..=column_count)
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} (id, owner_id, {}) VALUES ({placeholders});",
            R::TABLE,
            R::COLUMNS.join(", ")
        );

        let mut values = vec![
            Value::Text(record.id().to_string()),
            Value::Text(record.owner().to_string()),
        ];
        values.extend(record.column_values()?);

        self.conn.execute(&sql, params_from_iter(values))?;
        Ok(record.id())
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<R>> {
        let sql = format!("{} WHERE id = ?1;", Self::select_sql());
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(R::from_row(row)?));
        }
        Ok(None)
    }

    fn list_by_owner(&self, owner: UserId) -> RepoResult<Vec<R>> {
        let sql = format!(
            "{} WHERE owner_id = ?1 ORDER BY {};",
            Self::select_sql(),
            R::ORDER_BY
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(R::from_row(row)?);
        }
        Ok(records)
    }

    fn update(&self, record: &R) -> RepoResult<()> {
        let assignments = R::COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{};",
            R::TABLE,
            R::COLUMNS.len() + 1
        );

        let mut values = record.column_values()?;
        values.push(Value::Text(record.id().to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(record.id()));
        }
        Ok(())
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1;", R::TABLE);
        let changed = self.conn.execute(&sql, [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

pub(crate) fn uuid_column(row: &Row<'_>, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{text}` in {column}")))
}

pub(crate) fn timestamp_column(row: &Row<'_>, column: &str) -> RepoResult<DateTime<Utc>> {
    let millis: i64 = row.get(column)?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{millis}` in {column}")))
}

pub(crate) fn optional_timestamp_column(
    row: &Row<'_>,
    column: &str,
) -> RepoResult<Option<DateTime<Utc>>> {
    match row.get::<_, Option<i64>>(column)? {
        Some(millis) => DateTime::from_timestamp_millis(millis)
            .map(Some)
            .ok_or_else(|| {
                RepoError::InvalidData(format!("invalid timestamp `{millis}` in {column}"))
            }),
        None => Ok(None),
    }
}

pub(crate) fn bool_column(row: &Row<'_>, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in {column}"
        ))),
    }
}

pub(crate) fn timestamp_value(value: DateTime<Utc>) -> Value {
    Value::Integer(value.timestamp_millis())
}

pub(crate) fn optional_text_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_string()))
}

pub(crate) fn bool_value(value: bool) -> Value {
    Value::Integer(if value { 1 } else { 0 })
}
