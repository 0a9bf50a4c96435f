//! Generic owner-scoped record contract.
//!
//! Task, note and goal differ only in field shape. Everything that stores,
//! serves or renders them is written once against [`OwnedRecord`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a user.
pub type UserId = Uuid;

/// Stable identifier of a task, note or goal.
pub type RecordId = Uuid;

/// Validation failure raised while building or patching a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A required field was absent or empty at creation.
    MissingField(&'static str),
    /// Task category outside `work|personal|study`.
    InvalidCategory(String),
    /// Date input that is neither RFC 3339 nor `YYYY-MM-DD`.
    InvalidDate(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidCategory(value) => write!(
                f,
                "invalid category `{value}`; expected work|personal|study"
            ),
            Self::InvalidDate(value) => write!(f, "invalid date `{value}`"),
        }
    }
}

impl Error for RecordValidationError {}

/// A persisted entity owned by exactly one user.
pub trait OwnedRecord:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Human label used in messages (`"Task"`).
    const LABEL: &'static str;

    /// Creation input.
    type Draft: Serialize + DeserializeOwned + Send + 'static;

    /// Partial update input; absent fields leave the record unchanged.
    type Patch: Serialize + DeserializeOwned + Default + Send + 'static;

    fn id(&self) -> RecordId;

    fn owner(&self) -> UserId;

    /// Builds a fresh record owned by `owner`.
    ///
    /// # Errors
    /// - `MissingField` when a required field is absent or empty.
    fn from_draft(
        owner: UserId,
        draft: Self::Draft,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError>;

    /// Merges set-if-present fields from `patch`.
    ///
    /// An explicitly supplied empty string is applied as-is.
    fn apply_patch(&mut self, patch: Self::Patch) -> Result<(), RecordValidationError>;

    /// Refreshes the modification timestamp.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Records with a completion flag (tasks and goals).
pub trait Completable: OwnedRecord {
    fn is_completed(&self) -> bool;

    /// Patch that only sets the completion flag.
    fn completion_patch(is_completed: bool) -> Self::Patch;
}

/// Current time truncated to millisecond precision, matching storage.
pub fn now_ms() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Returns the value when present and non-empty.
pub(crate) fn require(
    field: &'static str,
    value: Option<String>,
) -> Result<String, RecordValidationError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RecordValidationError::MissingField(field)),
    }
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` calendar date (UTC midnight).
///
/// Blank input means "no date".
pub fn parse_date_input(raw: &str) -> Result<Option<DateTime<Utc>>, RecordValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| RecordValidationError::InvalidDate(trimmed.to_string()))
}

/// Distinguishes an explicit JSON `null` (`Some(None)`) from an absent field (`None`).
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
